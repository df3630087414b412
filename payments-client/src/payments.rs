//! Payments API.

use std::sync::Arc;

use payments_types::{CreatePaymentRequest, CreatePaymentResponse, GetPaymentResponse};
use reqwest::Url;

use crate::api::ApiContext;
use crate::error::ClientError;

/// Scope requested for payment operations.
pub const PAYMENTS_SCOPE: &str = "payments";

pub struct PaymentsApi {
    ctx: Arc<ApiContext>,
}

impl PaymentsApi {
    pub(crate) fn new(ctx: Arc<ApiContext>) -> Self {
        Self { ctx }
    }

    /// Creates a payment.
    #[tracing::instrument(skip(self, request), fields(amount = request.amount_in_minor, currency = %request.currency))]
    pub async fn create(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<CreatePaymentResponse, ClientError> {
        let url = self.ctx.url("/v3/payments", &[])?;
        let created: CreatePaymentResponse = self.ctx.post(url, request, PAYMENTS_SCOPE).await?;
        tracing::info!(payment_id = %created.id, status = %created.status, "payment created");
        Ok(created)
    }

    /// Gets a payment by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, payment_id: &str) -> Result<GetPaymentResponse, ClientError> {
        let url = self.ctx.url(&format!("/v3/payments/{}", payment_id), &[])?;
        self.ctx.get(url, PAYMENTS_SCOPE).await
    }

    /// Link to the hosted payment page for a created payment.
    pub fn hosted_payment_page_link(
        &self,
        payment_id: &str,
        resource_token: &str,
        return_uri: &str,
    ) -> Result<String, ClientError> {
        let mut url = Url::parse(&format!("{}/payments", self.ctx.hpp_uri))
            .map_err(|e| ClientError::Config(format!("invalid hosted payment page URI: {}", e)))?;

        // The hosted page reads its parameters from the fragment.
        url.query_pairs_mut()
            .append_pair("payment_id", payment_id)
            .append_pair("resource_token", resource_token)
            .append_pair("return_uri", return_uri);
        let fragment = url.query().map(str::to_string);
        url.set_query(None);
        url.set_fragment(fragment.as_deref());

        Ok(url.to_string())
    }
}
