use error_stack::Report;

use kernel::prelude::entity::{Book, DestructBook};
use kernel::KernelError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl TryFrom<Book> for BookDto {
    type Error = Report<KernelError>;
    fn try_from(value: Book) -> Result<Self, Self::Error> {
        let DestructBook {
            id,
            title,
            author,
            isbn,
        } = value.into_destruct();
        let id = id.ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable("Stored book has no id")
        })?;
        Ok(Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        })
    }
}

pub struct GetBookDto {
    pub id: i64,
}

pub struct GetBookByIsbnDto {
    pub isbn: String,
}

pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Full replacement of a stored book. `id` must be set.
pub struct UpdateBookDto {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

pub struct DeleteBookDto {
    pub id: Option<i64>,
}
