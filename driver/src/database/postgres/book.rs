use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookAuthor, BookId, BookIsbn, BookTitle, DestructBook};
use kernel::KernelError;

use crate::database::postgres::{PostgresDatabase, PostgresTransaction};
use crate::error::ConvertError;

pub struct PostgresBookRepository;

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_isbn(
        &self,
        con: &mut PostgresTransaction,
        isbn: &BookIsbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_isbn(con, isbn).await
    }

    async fn exists_by_isbn(
        &self,
        con: &mut PostgresTransaction,
        isbn: &BookIsbn,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::exists_by_isbn(con, isbn).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn save(
        &self,
        con: &mut PostgresTransaction,
        book: Book,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::save(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    isbn: String,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            Some(BookId::new(value.id)),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookIsbn::new(value.isbn),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_isbn(
        con: &mut PgConnection,
        isbn: &BookIsbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn exists_by_isbn(
        con: &mut PgConnection,
        isbn: &BookIsbn,
    ) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)
            "#,
        )
        .bind(isbn.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }

    async fn save(con: &mut PgConnection, book: Book) -> error_stack::Result<Book, KernelError> {
        let DestructBook {
            id,
            title,
            author,
            isbn,
        } = book.into_destruct();
        let Some(id) = id else {
            tracing::debug!(isbn = %isbn.as_ref(), "Inserting book");
            let row = sqlx::query_as::<_, BookRow>(
                // language=postgresql
                r#"
                INSERT INTO books (title, author, isbn)
                VALUES ($1, $2, $3)
                RETURNING id, title, author, isbn
                "#,
            )
            .bind(title.as_ref())
            .bind(author.as_ref())
            .bind(isbn.as_ref())
            .fetch_one(con)
            .await
            .convert_error()?;
            return Ok(Book::from(row));
        };

        tracing::debug!(id = id.as_ref(), "Replacing book");
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4
            WHERE id = $1
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(id.as_ref())
        .bind(title.as_ref())
        .bind(author.as_ref())
        .bind(isbn.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::from).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("No book with id {} to replace", id.as_ref()))
        })
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
