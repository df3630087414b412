//! Error type for client operations.

use payments_types::{AuthError, ProblemDetails, SigningError, TransportError};
use tagged_union::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("API error: {status}{}", describe(.problem, .trace_id))]
    Api {
        status: u16,
        trace_id: Option<String>,
        problem: ProblemDetails,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe(problem: &ProblemDetails, trace_id: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(title) = &problem.title {
        out.push_str(" - ");
        out.push_str(title);
    }
    if let Some(detail) = &problem.detail {
        out.push_str(": ");
        out.push_str(detail);
    }
    if let Some(trace_id) = trace_id {
        out.push_str(" [trace id ");
        out.push_str(trace_id);
        out.push(']');
    }
    out
}

impl ClientError {
    /// HTTP status of an API or auth rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Auth(err) => err.as_failure().map(|f| f.status),
            _ => None,
        }
    }

    /// Trace identifier reported by the server, when there is one.
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            ClientError::Api { trace_id, .. } => trace_id.as_deref(),
            ClientError::Auth(err) => err.as_failure().and_then(|f| f.trace_id.as_deref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 400,
            trace_id: Some("abc".into()),
            problem: ProblemDetails {
                title: Some("Invalid Parameters".into()),
                detail: Some("Some fields are invalid.".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            err.to_string(),
            "API error: 400 - Invalid Parameters: Some fields are invalid. [trace id abc]"
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.trace_id(), Some("abc"));
    }
}
