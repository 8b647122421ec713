use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{Book, BookAuthor, BookId, BookIsbn, BookTitle};
use kernel::KernelError;

use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookByIsbnDto, GetBookDto, UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut transaction = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let book = self.book_query().find_by_id(&mut transaction, &id).await?;
        transaction.commit().await?;

        book.map(BookDto::try_from).transpose()
    }

    async fn get_book_by_isbn(
        &self,
        dto: GetBookByIsbnDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut transaction = self.database_connection().transact().await?;

        let isbn = BookIsbn::new(dto.isbn);
        let book = self
            .book_query()
            .find_by_isbn(&mut transaction, &isbn)
            .await?;
        transaction.commit().await?;

        book.map(BookDto::try_from).transpose()
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

/// Registers a new book.
///
/// The isbn check and the insert run as two statements. Two concurrent requests for the same
/// isbn can both pass the check; the store's unique constraint then rejects the second insert
/// with [`KernelError::DuplicateIsbn`].
#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookQuery + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut transaction = self.database_connection().transact().await?;

        let isbn = BookIsbn::new(dto.isbn);
        if self
            .book_query()
            .exists_by_isbn(&mut transaction, &isbn)
            .await?
        {
            tracing::warn!(isbn = %isbn.as_ref(), "Rejected book with a registered isbn");
            transaction.roll_back().await?;
            return Err(Report::new(KernelError::DuplicateIsbn)
                .attach_printable(format!("isbn {} is taken", isbn.as_ref())));
        }

        let book = Book::new(
            None,
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            isbn,
        );
        let saved = self.book_modifier().save(&mut transaction, book).await?;
        transaction.commit().await?;

        BookDto::try_from(saved)
    }
}

impl<T> CreateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService: 'static + Sync + Send + DependOnBookQuery + DependOnBookModifier {
    /// Replaces the stored book. `None` when no book has the given id.
    async fn update_book(
        &self,
        dto: UpdateBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let Some(id) = dto.id.map(BookId::new) else {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable("Cannot update a book that was never saved"));
        };
        let mut transaction = self.database_connection().transact().await?;

        if self
            .book_query()
            .find_by_id(&mut transaction, &id)
            .await?
            .is_none()
        {
            transaction.roll_back().await?;
            return Ok(None);
        }

        let isbn = BookIsbn::new(dto.isbn);
        let holder = self
            .book_query()
            .find_by_isbn(&mut transaction, &isbn)
            .await?;
        if let Some(holder) = holder {
            if holder.id().as_ref() != Some(&id) {
                tracing::warn!(isbn = %isbn.as_ref(), id = id.as_ref(), "Rejected update onto a registered isbn");
                transaction.roll_back().await?;
                return Err(Report::new(KernelError::DuplicateIsbn)
                    .attach_printable(format!("isbn {} is taken", isbn.as_ref())));
            }
        }

        let book = Book::new(
            Some(id),
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            isbn,
        );
        let saved = self.book_modifier().save(&mut transaction, book).await?;
        transaction.commit().await?;

        BookDto::try_from(saved).map(Some)
    }
}

impl<T> UpdateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookQuery + DependOnBookModifier {
    /// `Some(())` when a book was removed, `None` when no book has the given id.
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<Option<()>, KernelError> {
        let Some(id) = dto.id.map(BookId::new) else {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable("Cannot delete a book that was never saved"));
        };
        let mut transaction = self.database_connection().transact().await?;

        if self
            .book_query()
            .find_by_id(&mut transaction, &id)
            .await?
            .is_none()
        {
            transaction.roll_back().await?;
            return Ok(None);
        }

        self.book_modifier().delete(&mut transaction, &id).await?;
        transaction.commit().await?;

        Ok(Some(()))
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}
