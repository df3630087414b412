//! # Payments Client SDK
//!
//! A typed Rust client for the Payments API.
//!
//! ```no_run
//! use payments_client::{ClientOptions, PaymentsClient};
//!
//! # async fn run() -> Result<(), payments_client::ClientError> {
//! let client = PaymentsClient::builder(ClientOptions::from_env()?).build()?;
//! let accounts = client.merchant_accounts().list().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use payments_auth::{CachingAuthTokenSource, InMemoryTokenCache, NoopTokenCache};
use payments_types::{HttpTransport, RequestSigner, TokenCacheStore};

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod merchant_accounts;
pub mod payments;
pub mod payouts;
pub mod providers;
pub mod transport;

pub use auth::AuthApi;
pub use config::{ClientOptions, Environment, TokenCacheMode};
pub use error::ClientError;
pub use merchant_accounts::MerchantAccountsApi;
pub use payments::PaymentsApi;
pub use payouts::PayoutsApi;
pub use providers::ProvidersApi;
pub use transport::ReqwestTransport;

use api::ApiContext;

/// The token source used by the client: the auth API behind the token cache.
pub type CachedAuth = CachingAuthTokenSource<AuthApi, Arc<dyn TokenCacheStore>>;

/// Payments API client.
pub struct PaymentsClient {
    auth: Arc<CachedAuth>,
    payments: PaymentsApi,
    payouts: PayoutsApi,
    merchant_accounts: MerchantAccountsApi,
    providers: ProvidersApi,
}

impl PaymentsClient {
    /// Starts building a client.
    pub fn builder(options: ClientOptions) -> PaymentsClientBuilder {
        PaymentsClientBuilder {
            options,
            transport: None,
            token_cache: None,
            signer: None,
        }
    }

    /// Cached token source, for callers that need a raw access token.
    pub fn auth(&self) -> &CachedAuth {
        &self.auth
    }

    pub fn payments(&self) -> &PaymentsApi {
        &self.payments
    }

    pub fn payouts(&self) -> &PayoutsApi {
        &self.payouts
    }

    pub fn merchant_accounts(&self) -> &MerchantAccountsApi {
        &self.merchant_accounts
    }

    pub fn providers(&self) -> &ProvidersApi {
        &self.providers
    }
}

/// Builder for [`PaymentsClient`].
pub struct PaymentsClientBuilder {
    options: ClientOptions,
    transport: Option<Arc<dyn HttpTransport>>,
    token_cache: Option<Arc<dyn TokenCacheStore>>,
    signer: Option<Arc<dyn RequestSigner>>,
}

impl PaymentsClientBuilder {
    /// Replaces the default reqwest transport.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses a caller-supplied token store instead of the one
    /// [`TokenCacheMode`] selects.
    pub fn with_token_cache(mut self, store: Arc<dyn TokenCacheStore>) -> Self {
        self.token_cache = Some(store);
        self
    }

    /// Signs every non-GET request.
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<PaymentsClient, ClientError> {
        let options = self.options;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(options.timeout)?),
        };

        let store: Arc<dyn TokenCacheStore> = match (self.token_cache, options.token_cache) {
            (Some(store), _) => store,
            (None, TokenCacheMode::InMemory) => Arc::new(InMemoryTokenCache::new()),
            (None, TokenCacheMode::None) => Arc::new(NoopTokenCache),
        };

        let auth_api = AuthApi::new(
            transport.clone(),
            options.environment.auth_uri(),
            options.client_id.clone(),
            options.client_secret.clone(),
        );
        let auth = Arc::new(
            CachingAuthTokenSource::new(auth_api, store)
                .with_renewal_buffer(options.token_renewal_buffer),
        );

        let ctx = Arc::new(ApiContext {
            transport,
            auth: auth.clone(),
            signer: self.signer,
            api_uri: options.environment.api_uri().to_string(),
            hpp_uri: options.environment.hpp_uri().to_string(),
        });

        tracing::debug!(
            client_id = %options.client_id,
            api_uri = %ctx.api_uri,
            token_cache = ?options.token_cache,
            "payments client built"
        );

        Ok(PaymentsClient {
            auth,
            payments: PaymentsApi::new(ctx.clone()),
            payouts: PayoutsApi::new(ctx.clone()),
            merchant_accounts: MerchantAccountsApi::new(ctx.clone()),
            providers: ProvidersApi::new(ctx, options.client_id),
        })
    }
}
