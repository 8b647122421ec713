use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    /// Another book already holds the isbn.
    DuplicateIsbn,
    /// The operation needs a book that has been persisted before.
    InvalidArgument,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::DuplicateIsbn => write!(f, "ISBN already registered"),
            KernelError::InvalidArgument => write!(f, "Book id must be set"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
