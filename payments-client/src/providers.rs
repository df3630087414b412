//! Payments providers API.

use std::sync::Arc;

use payments_types::Provider;

use crate::api::ApiContext;
use crate::error::ClientError;
use crate::payments::PAYMENTS_SCOPE;

pub struct ProvidersApi {
    ctx: Arc<ApiContext>,
    client_id: String,
}

impl ProvidersApi {
    pub(crate) fn new(ctx: Arc<ApiContext>, client_id: String) -> Self {
        Self { ctx, client_id }
    }

    /// Gets a provider by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, provider_id: &str) -> Result<Provider, ClientError> {
        let url = self.ctx.url(
            &format!("/v3/payments-providers/{}", provider_id),
            &[("client_id", self.client_id.as_str())],
        )?;
        self.ctx.get(url, PAYMENTS_SCOPE).await
    }
}
