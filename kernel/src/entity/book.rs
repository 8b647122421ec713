mod author;
mod id;
mod isbn;
mod title;

pub use self::{author::*, id::*, isbn::*, title::*};
use destructure::Destructure;
use vodca::References;

/// A book record. `id` stays empty until the store assigns one on first save.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: Option<BookId>,
    title: BookTitle,
    author: BookAuthor,
    isbn: BookIsbn,
}

impl Book {
    pub fn new(id: Option<BookId>, title: BookTitle, author: BookAuthor, isbn: BookIsbn) -> Self {
        Self {
            id,
            title,
            author,
            isbn,
        }
    }
}
