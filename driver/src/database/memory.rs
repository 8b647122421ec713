use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::Book;
use kernel::KernelError;

pub use self::book::*;

mod book;

/// Process-local store. Transactions hold the table lock until they finish, so they run one
/// at a time.
pub struct InMemoryDatabase {
    table: Arc<Mutex<BookTable>>,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(BookTable::default())),
        }
    }
}

impl Clone for InMemoryDatabase {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct BookTable {
    rows: BTreeMap<i64, Book>,
    last_id: i64,
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction { guard, staged })
    }
}

/// Writes go to a staged copy of the table that replaces the shared one on commit.
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<BookTable>,
    staged: BookTable,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}
