use error_stack::Report;

use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookId, BookIsbn, DestructBook};
use kernel::KernelError;

use crate::database::memory::{InMemoryDatabase, InMemoryTransaction};

pub struct InMemoryBookRepository;

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.staged.rows.get(id.as_ref()).cloned())
    }

    async fn find_by_isbn(
        &self,
        con: &mut InMemoryTransaction,
        isbn: &BookIsbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let found = con
            .staged
            .rows
            .values()
            .find(|book| book.isbn() == isbn)
            .cloned();
        Ok(found)
    }

    async fn exists_by_isbn(
        &self,
        con: &mut InMemoryTransaction,
        isbn: &BookIsbn,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con.staged.rows.values().any(|book| book.isbn() == isbn))
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn save(
        &self,
        con: &mut InMemoryTransaction,
        book: Book,
    ) -> error_stack::Result<Book, KernelError> {
        let table = &mut con.staged;
        let DestructBook {
            id,
            title,
            author,
            isbn,
        } = book.into_destruct();

        // Same guarantee as the unique index on books.isbn.
        if table
            .rows
            .values()
            .any(|stored| stored.isbn() == &isbn && stored.id() != &id)
        {
            return Err(Report::new(KernelError::DuplicateIsbn)
                .attach_printable(format!("isbn {} is taken", isbn.as_ref())));
        }

        let id = match id {
            Some(id) if table.rows.contains_key(id.as_ref()) => id,
            Some(id) => {
                return Err(Report::new(KernelError::Internal)
                    .attach_printable(format!("No book with id {} to replace", id.as_ref())));
            }
            None => {
                table.last_id += 1;
                BookId::new(table.last_id)
            }
        };
        let saved = Book::new(Some(id), title, author, isbn);
        table.rows.insert(*id.as_ref(), saved.clone());
        Ok(saved)
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.staged.rows.remove(book_id.as_ref());
        Ok(())
    }
}
