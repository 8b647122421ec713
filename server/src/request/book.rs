use serde::Deserialize;

use application::transfer::{
    CreateBookDto, DeleteBookDto, GetBookByIsbnDto, GetBookDto, UpdateBookDto,
};

use crate::controller::{Intake, TryIntake};
use crate::validation::{ValidationError, Validator};

// Fields stay optional so a missing field becomes a validation message instead of a parse error.
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    title: Option<String>,
    #[serde(alias = "autor")]
    author: Option<String>,
    isbn: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    #[serde(alias = "autor")]
    author: Option<String>,
    isbn: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetBookByIsbnRequest {
    isbn: String,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: i64,
}

impl GetBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: i64,
}

impl DeleteBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

struct BookFields {
    title: String,
    author: String,
    isbn: String,
}

fn validate_fields(
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
) -> Result<BookFields, ValidationError> {
    let mut validator = Validator::default();
    let fields = BookFields {
        title: validator.not_empty("title", title),
        author: validator.not_empty("author", author),
        isbn: validator.not_empty("isbn", isbn),
    };
    validator.finish(fields)
}

pub struct BookTransformer;

impl TryIntake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    type Error = ValidationError;
    fn emit(&self, input: CreateBookRequest) -> Result<Self::To, Self::Error> {
        let BookFields {
            title,
            author,
            isbn,
        } = validate_fields(input.title, input.author, input.isbn)?;
        Ok(CreateBookDto {
            title,
            author,
            isbn,
        })
    }
}

impl TryIntake<(i64, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    type Error = ValidationError;
    fn emit(&self, input: (i64, UpdateBookRequest)) -> Result<Self::To, Self::Error> {
        let (id, input) = input;
        let BookFields {
            title,
            author,
            isbn,
        } = validate_fields(input.title, input.author, input.isbn)?;
        Ok(UpdateBookDto {
            id: Some(id),
            title,
            author,
            isbn,
        })
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<GetBookByIsbnRequest> for BookTransformer {
    type To = GetBookByIsbnDto;
    fn emit(&self, input: GetBookByIsbnRequest) -> Self::To {
        GetBookByIsbnDto { isbn: input.isbn }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: Some(input.id) }
    }
}

#[cfg(test)]
mod test {
    use crate::controller::TryIntake;
    use crate::request::{BookTransformer, CreateBookRequest};

    #[test]
    fn empty_body_reports_three_fields() {
        let request: CreateBookRequest = serde_json::from_str("{}").expect("valid json");

        let error = BookTransformer
            .emit(request)
            .err()
            .expect("every field is missing");

        let fields = error
            .violations()
            .iter()
            .map(|violation| violation.field())
            .collect::<Vec<_>>();
        assert_eq!(fields, vec!["title", "author", "isbn"]);
    }

    #[test]
    fn legacy_autor_field_is_accepted() {
        let request: CreateBookRequest =
            serde_json::from_str(r#"{"title":"title","autor":"autor","isbn":"isbn","id":9}"#)
                .expect("valid json");

        let dto = BookTransformer
            .emit(request)
            .ok()
            .expect("every field is present");

        assert_eq!(dto.author, "autor");
        assert_eq!(dto.isbn, "isbn");
    }
}
