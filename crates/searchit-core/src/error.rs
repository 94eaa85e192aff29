//! Error types for Searchit.

use std::time::Duration;

use serde_json::Value;

/// Result type alias for Searchit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing searchable types and items.
///
/// Every non-success engine response is classified into one of these
/// variants; nothing is silently swallowed or replaced with a default.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested document or searchable type does not exist.
    #[error("{kind} not found: {identifier}")]
    NotFound {
        /// What was looked up ("document" or "searchable type")
        kind: &'static str,
        /// Identifier that was not found
        identifier: String,
    },

    /// A document with the same (type, identifier) is already indexed.
    #[error("Document already exists: {doc_type}/{identifier}")]
    DocumentAlreadyExists {
        /// Type the document belongs to
        doc_type: String,
        /// Document identifier
        identifier: String,
    },

    /// A searchable type with the same identifier already exists.
    #[error("Searchable type already exists: {identifier}")]
    SchemaAlreadyExists {
        /// Type identifier
        identifier: String,
    },

    /// Update targeted a document that does not exist.
    #[error("Document not found for update: {doc_type}/{identifier}")]
    DocumentNotFound {
        /// Type the document belongs to
        doc_type: String,
        /// Document identifier
        identifier: String,
    },

    /// Operation is deliberately not offered (permanent rejection).
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// The engine failed, timed out, or answered with an unexpected shape.
    #[error("Transport failure: {message}")]
    Transport {
        /// Human-readable error message
        message: String,
        /// Raw engine response, when one was received
        response: Option<Value>,
        /// Underlying error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller input rejected before any request was issued.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Only transport-level failures are transient. Reads may always be
    /// retried; writes only when the caller tolerates at-least-once delivery.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::Io(_) => true,
            Error::NotFound { .. } => false,
            Error::DocumentAlreadyExists { .. } => false,
            Error::SchemaAlreadyExists { .. } => false,
            Error::DocumentNotFound { .. } => false,
            Error::UnsupportedOperation { .. } => false,
            Error::InvalidArgument { .. } => false,
            Error::Config { .. } => false,
        }
    }

    /// Returns the raw engine response carried by a transport failure.
    pub fn response(&self) -> Option<&Value> {
        match self {
            Error::Transport { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    /// Creates a not-found error for a document.
    pub fn document_missing<S: Into<String>>(identifier: S) -> Self {
        Error::NotFound {
            kind: "document",
            identifier: identifier.into(),
        }
    }

    /// Creates a not-found error for a searchable type.
    pub fn schema_missing<S: Into<String>>(identifier: S) -> Self {
        Error::NotFound {
            kind: "searchable type",
            identifier: identifier.into(),
        }
    }

    /// Creates a duplicate-document error.
    pub fn document_exists<T, I>(doc_type: T, identifier: I) -> Self
    where
        T: Into<String>,
        I: Into<String>,
    {
        Error::DocumentAlreadyExists {
            doc_type: doc_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates a duplicate-schema error.
    pub fn schema_exists<S: Into<String>>(identifier: S) -> Self {
        Error::SchemaAlreadyExists {
            identifier: identifier.into(),
        }
    }

    /// Creates an update-target-missing error.
    pub fn document_not_found<T, I>(doc_type: T, identifier: I) -> Self
    where
        T: Into<String>,
        I: Into<String>,
    {
        Error::DocumentNotFound {
            doc_type: doc_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Creates an unsupported-operation error.
    pub fn unsupported(operation: &'static str) -> Self {
        Error::UnsupportedOperation { operation }
    }

    /// Creates a transport error with a message.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Error::Transport {
            message: message.into(),
            response: None,
            source: None,
        }
    }

    /// Creates a transport error carrying the raw engine response.
    pub fn transport_with_response<S: Into<String>>(message: S, response: Value) -> Self {
        Error::Transport {
            message: message.into(),
            response: Some(response),
            source: None,
        }
    }

    /// Creates a transport error with a message and source error.
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            message: message.into(),
            response: None,
            source: Some(Box::new(source)),
        }
    }

    /// Creates a transport error for an elapsed request deadline.
    pub fn timeout(operation: impl std::fmt::Display, after: Duration) -> Self {
        Error::Transport {
            message: format!("{operation} timed out after {}ms", after.as_millis()),
            response: None,
            source: None,
        }
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
