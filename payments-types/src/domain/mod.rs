//! Wire models for the payments API.

pub mod auth;
pub mod common;
pub mod merchant_account;
pub mod payment;
pub mod payout;
pub mod provider;

pub use auth::{AccessToken, CachedAuthToken, TOKEN_CACHE_KEY_PREFIX, TokenCacheKey};
pub use common::{AccountIdentifier, Address, Currency};
pub use merchant_account::MerchantAccount;
pub use payment::{
    Beneficiary, CreatePaymentRequest, CreatePaymentResponse, GetPaymentResponse, PaymentMethod,
    PaymentStatus, PaymentUser, ProviderSelection,
};
pub use payout::{
    CreatePayoutRequest, CreatePayoutResponse, GetPayoutResponse, PayoutBeneficiary, PayoutStatus,
};
pub use provider::Provider;
