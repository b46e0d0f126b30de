//! Error types for the index crate.

use thiserror::Error;

/// Errors that can occur when mutating or querying a collection.
///
/// All of these are programmer or configuration errors. Nothing in the
/// crate retries, and a query that matches nothing is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The entity's kind is not one of the kinds the collection accepts.
    #[error("type mismatch: collection accepts {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The method-name façade could not map a call onto an operation.
    #[error("unsupported operation '{method}': {reason}")]
    UnsupportedOperation { method: String, reason: String },

    /// The attribute accessor could not resolve a named attribute.
    #[error("cannot access attribute '{attribute}' on {kind}")]
    AttributeAccess { attribute: String, kind: String },
}

impl IndexError {
    pub(crate) fn unsupported(method: &str, reason: impl Into<String>) -> Self {
        IndexError::UnsupportedOperation {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = IndexError::TypeMismatch {
            expected: "Circle | Square".into(),
            actual: "Triangle".into(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: collection accepts Circle | Square, got Triangle"
        );

        let err = IndexError::AttributeAccess {
            attribute: "colour".into(),
            kind: "Task".into(),
        };
        assert_eq!(err.to_string(), "cannot access attribute 'colour' on Task");
    }

    #[test]
    fn unsupported_helper() {
        let err = IndexError::unsupported("sort_by_name", "unknown verb 'sort'");
        assert_eq!(
            err.to_string(),
            "unsupported operation 'sort_by_name': unknown verb 'sort'"
        );
    }
}
