//! Request plumbing shared by the resource clients.

use std::sync::Arc;

use payments_types::{
    AuthTokenSource, HttpRequest, HttpResponse, HttpTransport, Method, ProblemDetails,
    RequestSigner,
};
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::TRACE_ID_HEADER;
use crate::error::ClientError;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
pub const SIGNATURE_HEADER: &str = "Tl-Signature";

/// Everything a resource client needs to make an authenticated call.
pub(crate) struct ApiContext {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) auth: Arc<dyn AuthTokenSource>,
    pub(crate) signer: Option<Arc<dyn RequestSigner>>,
    pub(crate) api_uri: String,
    pub(crate) hpp_uri: String,
}

impl ApiContext {
    /// Absolute URL for `path`, with `query` pairs encoded.
    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let mut url = Url::parse(&format!("{}{}", self.api_uri, path))
            .map_err(|e| ClientError::Config(format!("invalid API URI: {}", e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.to_string())
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: String,
        scope: &str,
    ) -> Result<T, ClientError> {
        let request = HttpRequest::new(Method::Get, url);
        self.send(request, scope).await
    }

    /// POSTs `body` with a fresh idempotency key.
    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
        scope: &str,
    ) -> Result<T, ClientError> {
        let body = tagged_union::to_vec(body)?;
        let request = HttpRequest::new(Method::Post, url)
            .header(IDEMPOTENCY_KEY_HEADER, uuid::Uuid::new_v4().to_string())
            .json_body(body);
        self.send(request, scope).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        scope: &str,
    ) -> Result<T, ClientError> {
        let token = self.auth.request_token(scope).await?;
        let mut request = request
            .header("Authorization", token.authorization_header())
            .header("Accept", "application/json");

        if let Some(signer) = &self.signer {
            if request.method != Method::Get {
                let signature = signer.sign(&request)?;
                request = request.header(SIGNATURE_HEADER, signature);
            }
        }

        let response = self.transport.send(request).await?;
        handle_response(response)
    }
}

/// Decodes a success body, or turns a failure into [`ClientError::Api`].
pub(crate) fn handle_response<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<T, ClientError> {
    if response.is_success() {
        return Ok(tagged_union::from_slice(&response.body)?);
    }

    let problem: ProblemDetails = serde_json::from_slice(&response.body).unwrap_or_default();
    let trace_id = problem
        .trace_id
        .clone()
        .or_else(|| response.header(TRACE_ID_HEADER).map(str::to_string));

    tracing::debug!(
        status = response.status,
        trace_id = trace_id.as_deref().unwrap_or("-"),
        "API call failed"
    );
    Err(ClientError::Api {
        status: response.status,
        trace_id,
        problem,
    })
}
