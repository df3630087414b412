//! Client-credentials auth API.

use std::sync::Arc;

use payments_types::{
    AccessToken, AuthError, AuthFailure, AuthTokenRequest, AuthTokenSource, HttpRequest,
    HttpTransport, Method, TokenErrorResponse,
};

/// Header carrying the server's trace identifier.
pub const TRACE_ID_HEADER: &str = "tl-trace-id";

/// Issues tokens from `POST {auth_uri}/connect/token`.
///
/// Uncached: every call reaches the auth server. Wrap it in a
/// `CachingAuthTokenSource` to memoize tokens.
pub struct AuthApi {
    transport: Arc<dyn HttpTransport>,
    auth_uri: String,
    client_id: String,
    client_secret: String,
}

impl AuthApi {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth_uri: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            auth_uri: auth_uri.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait::async_trait]
impl AuthTokenSource for AuthApi {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    #[tracing::instrument(skip(self), fields(client_id = %self.client_id))]
    async fn request_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let body = AuthTokenRequest::client_credentials(&self.client_id, &self.client_secret, scope);
        let body = serde_json::to_vec(&body).map_err(|e| AuthError::Decode(e.to_string()))?;

        let request = HttpRequest::new(Method::Post, format!("{}/connect/token", self.auth_uri))
            .header("Accept", "application/json")
            .json_body(body);

        let response = self.transport.send(request).await?;

        if response.is_success() {
            return serde_json::from_slice::<AccessToken>(&response.body)
                .map_err(|e| AuthError::Decode(e.to_string()));
        }

        let error = serde_json::from_slice::<TokenErrorResponse>(&response.body).unwrap_or_default();
        Err(AuthError::Rejected(AuthFailure {
            status: response.status,
            trace_id: response.header(TRACE_ID_HEADER).map(str::to_string),
            error: error.error,
            detail: error.error_description,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_types::{HttpResponse, TransportError};
    use std::sync::Mutex;

    struct CannedTransport {
        response: HttpResponse,
        requests: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait::async_trait]
    impl HttpTransport for CannedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn canned(status: u16, body: &str) -> Arc<CannedTransport> {
        Arc::new(CannedTransport {
            response: HttpResponse {
                status,
                headers: vec![(TRACE_ID_HEADER.to_string(), "trace-9".to_string())],
                body: body.as_bytes().to_vec(),
            },
            requests: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_success_decodes_token() {
        let transport = canned(
            200,
            r#"{"access_token":"t1","token_type":"Bearer","expires_in":3600,"scope":"payments"}"#,
        );
        let api = AuthApi::new(transport.clone(), "https://auth.example.com/", "c1", "s1");

        let token = api.request_token("payments").await.unwrap();
        assert_eq!(token.access_token, "t1");
        assert_eq!(token.expires_in, 3600);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].url, "https://auth.example.com/connect/token");
        assert_eq!(requests[0].method, Method::Post);
    }

    #[tokio::test]
    async fn test_rejection_is_structured() {
        let transport = canned(
            400,
            r#"{"error":"invalid_client","error_description":"bad secret"}"#,
        );
        let api = AuthApi::new(transport, "https://auth.example.com", "c1", "s1");

        let err = api.request_token("payments").await.unwrap_err();
        assert_eq!(
            err.as_failure(),
            Some(&AuthFailure {
                status: 400,
                trace_id: Some("trace-9".into()),
                error: Some("invalid_client".into()),
                detail: Some("bad secret".into()),
            })
        );
    }

    #[tokio::test]
    async fn test_rejection_with_unreadable_body() {
        let api = AuthApi::new(canned(503, "<html>"), "https://auth.example.com", "c1", "s1");

        let err = api.request_token("").await.unwrap_err();
        let failure = err.as_failure().unwrap();
        assert_eq!(failure.status, 503);
        assert!(failure.error.is_none());
    }
}
