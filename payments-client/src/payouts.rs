//! Payouts API.

use std::sync::Arc;

use payments_types::{CreatePayoutRequest, CreatePayoutResponse, GetPayoutResponse};

use crate::api::ApiContext;
use crate::error::ClientError;
use crate::payments::PAYMENTS_SCOPE;

pub struct PayoutsApi {
    ctx: Arc<ApiContext>,
}

impl PayoutsApi {
    pub(crate) fn new(ctx: Arc<ApiContext>) -> Self {
        Self { ctx }
    }

    /// Creates a payout from a merchant account.
    #[tracing::instrument(skip(self, request), fields(merchant_account_id = %request.merchant_account_id))]
    pub async fn create(
        &self,
        request: &CreatePayoutRequest,
    ) -> Result<CreatePayoutResponse, ClientError> {
        let url = self.ctx.url("/v3/payouts", &[])?;
        let created: CreatePayoutResponse = self.ctx.post(url, request, PAYMENTS_SCOPE).await?;
        tracing::info!(payout_id = %created.id, "payout created");
        Ok(created)
    }

    /// Gets a payout by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, payout_id: &str) -> Result<GetPayoutResponse, ClientError> {
        let url = self.ctx.url(&format!("/v3/payouts/{}", payout_id), &[])?;
        self.ctx.get(url, PAYMENTS_SCOPE).await
    }
}
