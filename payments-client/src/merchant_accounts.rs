//! Merchant accounts API.

use std::sync::Arc;

use payments_types::{ListResponse, MerchantAccount};

use crate::api::ApiContext;
use crate::error::ClientError;
use crate::payments::PAYMENTS_SCOPE;

pub struct MerchantAccountsApi {
    ctx: Arc<ApiContext>,
}

impl MerchantAccountsApi {
    pub(crate) fn new(ctx: Arc<ApiContext>) -> Self {
        Self { ctx }
    }

    /// Lists all merchant accounts.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<MerchantAccount>, ClientError> {
        let url = self.ctx.url("/v3/merchant-accounts", &[])?;
        let list: ListResponse<MerchantAccount> = self.ctx.get(url, PAYMENTS_SCOPE).await?;
        Ok(list.items)
    }

    /// Gets a merchant account by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, merchant_account_id: &str) -> Result<MerchantAccount, ClientError> {
        let url = self
            .ctx
            .url(&format!("/v3/merchant-accounts/{}", merchant_account_id), &[])?;
        self.ctx.get(url, PAYMENTS_SCOPE).await
    }
}
