//! Error types shared by the auth cache and the HTTP ports.

/// A non-success answer from the auth server.
///
/// Returned as a value, never retried by the core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("auth request failed with status {status}{}", describe(.error, .detail, .trace_id))]
pub struct AuthFailure {
    /// HTTP status code of the response.
    pub status: u16,
    /// Trace identifier the server attached to the response.
    pub trace_id: Option<String>,
    /// OAuth error code, e.g. `invalid_client`.
    pub error: Option<String>,
    pub detail: Option<String>,
}

impl AuthFailure {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            trace_id: None,
            error: None,
            detail: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }
}

fn describe(
    error: &Option<String>,
    detail: &Option<String>,
    trace_id: &Option<String>,
) -> String {
    let mut out = String::new();
    if let Some(error) = error {
        out.push_str(": ");
        out.push_str(error);
    }
    if let Some(detail) = detail {
        out.push_str(&format!(" ({})", detail));
    }
    if let Some(trace_id) = trace_id {
        out.push_str(&format!(" [trace id {}]", trace_id));
    }
    out
}

/// The HTTP exchange itself failed (no response was received).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// The request signer could not produce a signature.
#[derive(Debug, thiserror::Error)]
#[error("Signing failed: {0}")]
pub struct SigningError(pub String);

/// Failure to obtain an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Rejected(#[from] AuthFailure),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid token response: {0}")]
    Decode(String),

    #[error("Token request cancelled")]
    Cancelled,
}

impl AuthError {
    /// The structured failure, when the auth server answered with an error.
    pub fn as_failure(&self) -> Option<&AuthFailure> {
        match self {
            AuthError::Rejected(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_display() {
        let failure = AuthFailure {
            status: 400,
            trace_id: Some("abc".into()),
            error: Some("invalid_client".into()),
            detail: None,
        };
        assert_eq!(
            failure.to_string(),
            "auth request failed with status 400: invalid_client [trace id abc]"
        );

        let err = AuthError::from(failure.clone());
        assert_eq!(err.as_failure(), Some(&failure));
        assert_eq!(err.to_string(), failure.to_string());
    }

    #[test]
    fn test_auth_failure_display_with_detail_only() {
        let failure = AuthFailure {
            detail: Some("scope not allowed".into()),
            ..AuthFailure::new(403)
        };
        assert_eq!(
            failure.to_string(),
            "auth request failed with status 403 (scope not allowed)"
        );
        assert_eq!(
            AuthFailure::new(500).to_string(),
            "auth request failed with status 500"
        );
    }
}
