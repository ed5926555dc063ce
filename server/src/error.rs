//! Error taxonomy for the storage service and its HTTP mapping.
//!
//! Two layers: [`StoreError`] is what a content store backend can report
//! (a key is missing, or the underlying storage failed), and
//! [`StorageError`] is the caller-facing classification the service hands
//! to the HTTP layer. Backend failures are folded into
//! [`StorageError::Store`] and rendered as an opaque 500; their detail is
//! logged server-side and never leaves the process.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::io;
use thiserror::Error;

/// Failure reported by a content store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested key has no stored content.
    #[error("no content stored under this key")]
    Missing,

    /// The backend could not complete the operation.
    #[error("storage backend error: {0}")]
    Io(#[from] io::Error),
}

/// Storage operation during which a missing item was detected. Decides
/// how the resulting 404 is phrased: update points the caller at the
/// create endpoint, delete states the plain fact, read sends no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

/// Outcome classification for storage service operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The item name violates the naming policy.
    #[error(
        "{name} is an invalid file name. File name should contain 1-64 characters from [a-z][A-Z][0-9]_-"
    )]
    InvalidName { name: String },

    /// No item exists under the given name.
    #[error("{}", not_found_message(.name, .op))]
    NotFound { name: String, op: Operation },

    /// An item already exists under the given name.
    #[error(
        "File {name} already existing. Storage system has not been modified. Try again using /update endpoint."
    )]
    AlreadyExists { name: String },

    /// The content store failed for a reason other than a missing key.
    #[error("storage system failure")]
    Store(#[source] StoreError),
}

fn not_found_message(name: &str, op: &Operation) -> String {
    match op {
        Operation::Update => format!(
            "File {} not existing. Storage system has not been modified. Try again using /create endpoint.",
            name
        ),
        Operation::Read | Operation::Delete => format!("File {} not existing.", name),
    }
}

impl StorageError {
    pub fn invalid_name(name: &str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
        }
    }

    pub fn not_found(name: &str, op: Operation) -> Self {
        Self::NotFound {
            name: name.to_string(),
            op,
        }
    }

    pub fn already_exists(name: &str) -> Self {
        Self::AlreadyExists {
            name: name.to_string(),
        }
    }
}

impl ResponseError for StorageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidName { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Backend detail stays server-side; the client gets a bare 500.
            Self::Store(_) => HttpResponse::new(self.status_code()),
            // A failed read answers with the status alone.
            Self::NotFound {
                op: Operation::Read,
                ..
            } => HttpResponse::new(self.status_code()),
            _ => HttpResponse::build(self.status_code()).body(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn status_codes_match_classification() {
        assert_eq!(
            StorageError::invalid_name("bad name").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StorageError::not_found("report", Operation::Delete).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StorageError::already_exists("report").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StorageError::Store(StoreError::Io(io::Error::other("disk on fire"))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn client_error_messages_name_the_item() {
        assert_eq!(
            StorageError::already_exists("report").to_string(),
            "File report already existing. Storage system has not been modified. \
             Try again using /update endpoint."
        );
        assert_eq!(
            StorageError::not_found("report", Operation::Delete).to_string(),
            "File report not existing."
        );
        assert_eq!(
            StorageError::not_found("report", Operation::Update).to_string(),
            "File report not existing. Storage system has not been modified. \
             Try again using /create endpoint."
        );
        assert_eq!(
            StorageError::invalid_name("bad/name").to_string(),
            "bad/name is an invalid file name. File name should contain \
             1-64 characters from [a-z][A-Z][0-9]_-"
        );
    }

    #[test]
    fn store_failure_response_has_no_body() {
        let err = StorageError::Store(StoreError::Io(io::Error::other("disk on fire")));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Opaque failure: nothing about the backend may leak to the client.
        assert!(resp.body().size().is_eof());
    }

    #[test]
    fn missing_read_target_responds_with_status_alone() {
        let err = StorageError::not_found("report", Operation::Read);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.body().size().is_eof());
    }

    #[test]
    fn missing_delete_target_carries_a_body() {
        let err = StorageError::not_found("report", Operation::Delete);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(!resp.body().size().is_eof());
    }
}
