//! Envelope types shared across endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Auth DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Body of a client-credentials token request.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthTokenRequest {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl AuthTokenRequest {
    /// Builds a client-credentials request. An empty scope is sent as no scope.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: &str,
    ) -> Self {
        Self {
            grant_type: "client_credentials".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: (!scope.is_empty()).then(|| scope.to_string()),
        }
    }
}

impl std::fmt::Debug for AuthTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokenRequest")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// OAuth error body returned by the auth server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// API envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// RFC 7807 problem details returned by the API on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Field name to list of validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// Wrapper of list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_credentials_request() {
        let req = AuthTokenRequest::client_credentials("c1", "s3cr3t", "payments paydirect");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "grant_type": "client_credentials",
                "client_id": "c1",
                "client_secret": "s3cr3t",
                "scope": "payments paydirect"
            })
        );
        assert!(!format!("{:?}", req).contains("s3cr3t"));

        let unscoped = AuthTokenRequest::client_credentials("c1", "s3cr3t", "");
        assert!(serde_json::to_value(&unscoped).unwrap().get("scope").is_none());
    }

    #[test]
    fn test_problem_details_decode() {
        let problem: ProblemDetails = serde_json::from_value(json!({
            "type": "https://docs.example.com/errors#400",
            "title": "Invalid Parameters",
            "status": 400,
            "trace_id": "trace-1",
            "detail": "Some fields are invalid.",
            "errors": { "amount_in_minor": ["must be positive"] }
        }))
        .unwrap();

        assert_eq!(problem.status, Some(400));
        assert_eq!(problem.trace_id.as_deref(), Some("trace-1"));
        assert_eq!(
            problem.problem_type.as_deref(),
            Some("https://docs.example.com/errors#400")
        );
    }
}
