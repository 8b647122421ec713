use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use application::transfer::BookDto;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: i64,
    title: String,
    author: String,
    isbn: String,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        let BookDto {
            id,
            title,
            author,
            isbn,
        } = value;
        Self {
            id,
            title,
            author,
            isbn,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct CreatedBookResponse(BookResponse);

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self.0)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<BookDto> for BookPresenter {
    type To = CreatedBookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        CreatedBookResponse(BookResponse::from(input))
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(BookResponse::from)
    }
}

/// `Some(())` is a performed deletion, `None` a book that was not there.
impl Exhaust<Option<()>> for BookPresenter {
    type To = StatusCode;
    fn emit(&self, input: Option<()>) -> Self::To {
        match input {
            Some(()) => StatusCode::NO_CONTENT,
            None => StatusCode::NOT_FOUND,
        }
    }
}
