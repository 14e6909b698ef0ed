use thiserror::Error;

use plantstore_core::DomainError;

/// A collaborator call failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Network failure or the server did not answer.
    #[error("could not reach the store: {0}")]
    Transport(String),

    /// The server refused the request with a reason, optionally tied to one
    /// input field (e.g. `quantity`).
    #[error("{message}")]
    Rejected {
        field: Option<String>,
        message: String,
    },

    #[error("not allowed: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Unexpected server-side failure.
    #[error("store error: {0}")]
    Server(String),
}

impl RemoteError {
    pub fn rejected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// The server-supplied per-field reason, when there is one.
    pub fn field_reason(&self) -> Option<(&str, &str)> {
        match self {
            RemoteError::Rejected {
                field: Some(field),
                message,
            } => Some((field.as_str(), message.as_str())),
            _ => None,
        }
    }
}

impl From<DomainError> for RemoteError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => RemoteError::Rejected { field: None, message },
            DomainError::NotFound(what) => RemoteError::NotFound(what),
            DomainError::Forbidden(msg) => RemoteError::Forbidden(msg),
            other => RemoteError::Rejected {
                field: None,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_field_rejections_expose_a_reason() {
        let err = RemoteError::rejected("quantity", "Only 2 items left.");
        assert_eq!(err.field_reason(), Some(("quantity", "Only 2 items left.")));
        assert_eq!(err.to_string(), "Only 2 items left.");

        assert_eq!(RemoteError::Transport("timeout".into()).field_reason(), None);
        assert_eq!(
            RemoteError::Rejected { field: None, message: "nope".into() }.field_reason(),
            None
        );
    }

    #[test]
    fn domain_errors_map_onto_remote_errors() {
        assert_eq!(
            RemoteError::from(DomainError::validation("bad")),
            RemoteError::Rejected { field: None, message: "bad".into() }
        );
        assert_eq!(
            RemoteError::from(DomainError::not_found("product 4")),
            RemoteError::NotFound("product 4".into())
        );
        assert!(matches!(
            RemoteError::from(DomainError::forbidden("x")),
            RemoteError::Forbidden(_)
        ));
    }
}
