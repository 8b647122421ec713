use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, BookIsbn};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    async fn find_by_isbn(
        &self,
        con: &mut Self::Transaction,
        isbn: &BookIsbn,
    ) -> error_stack::Result<Option<Book>, KernelError>;
    async fn exists_by_isbn(
        &self,
        con: &mut Self::Transaction,
        isbn: &BookIsbn,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
