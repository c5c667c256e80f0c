//! Error types and result types for document store operations.
//!
//! Errors are split in two: conditions the adapter detects itself
//! ([`AdapterError`]) and whatever the backend reports, which is carried
//! through untouched in [`StoreError::Backend`]. Use [`StoreResult<T, E>`] as
//! the return type for fallible operations.

use std::time::Duration;

use thiserror::Error;

/// The closed set of failures detected by the adapter before or after talking
/// to a backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// A data operation was attempted on a handle with no live connection.
    #[error("No connection to database")]
    NotConnected,
    /// A find operation matched zero documents.
    #[error("No document found")]
    DocumentNotFound,
    /// An insert or update was called without a document body.
    #[error("Empty object")]
    EmptyObject,
    /// The identifier field did not hold a 24 character lowercase hex string.
    /// Carries a rendering of the rejected value.
    #[error("Invalid ID: {0}")]
    InvalidId(String),
}

/// Represents every error a document store operation can return.
///
/// The backend variant holds the backend's own error type so callers can
/// inspect driver failures with their native API.
#[derive(Error, Debug)]
pub enum StoreError<E> {
    /// A failure detected by the adapter itself.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    /// A failure reported by the backend, passed through unmodified.
    #[error(transparent)]
    Backend(E),
}

impl<E> StoreError<E> {
    /// Returns the adapter error, if this is one.
    pub fn adapter(&self) -> Option<&AdapterError> {
        match self {
            StoreError::Adapter(err) => Some(err),
            StoreError::Backend(_) => None,
        }
    }

    /// Returns the backend error, if this is one.
    pub fn backend(&self) -> Option<&E> {
        match self {
            StoreError::Adapter(_) => None,
            StoreError::Backend(err) => Some(err),
        }
    }

    /// Consumes the error, returning the backend error if this is one.
    pub fn into_backend(self) -> Option<E> {
        match self {
            StoreError::Adapter(_) => None,
            StoreError::Backend(err) => Some(err),
        }
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self, StoreError::Adapter(AdapterError::NotConnected))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Adapter(AdapterError::DocumentNotFound))
    }

    pub fn is_empty_object(&self) -> bool {
        matches!(self, StoreError::Adapter(AdapterError::EmptyObject))
    }

    pub fn is_invalid_id(&self) -> bool {
        matches!(self, StoreError::Adapter(AdapterError::InvalidId(_)))
    }
}

/// A specialized `Result` type for document store operations.
pub type StoreResult<T, E> = Result<T, StoreError<E>>;

/// Raised when a backend call does not finish within its deadline.
///
/// Backends fold this into their own error type, so a timeout is reported
/// through [`StoreError::Backend`] like any other driver failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Deadline of {0:?} exceeded")]
pub struct DeadlineExceeded(pub Duration);
