//! Payment initiation: requests, responses and the unions they carry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tagged_union::{Variant, tagged_union};

use super::common::{AccountIdentifier, Address, Currency};

// ─────────────────────────────────────────────────────────────────────────────
// Payment method
// ─────────────────────────────────────────────────────────────────────────────

/// Pay by bank transfer through a provider the user or merchant picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransfer {
    pub provider_selection: ProviderSelection,
    pub beneficiary: Beneficiary,
}

impl Variant for BankTransfer {
    const DISCRIMINATOR: &'static str = "bank_transfer";
}

/// Pay against an existing mandate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mandate {
    pub mandate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Variant for Mandate {
    const DISCRIMINATOR: &'static str = "mandate";
}

tagged_union! {
    /// How the payer pays.
    #[derive(Debug, Clone, PartialEq)]
    pub enum PaymentMethod {
        BankTransfer(BankTransfer),
        Mandate(Mandate),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider selection
// ─────────────────────────────────────────────────────────────────────────────

/// Restricts which providers are offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_segments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_ids: Option<Vec<String>>,
}

/// The user picks their provider on the hosted page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSelected {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ProviderFilter>,
}

impl Variant for UserSelected {
    const DISCRIMINATOR: &'static str = "user_selected";
}

/// The account the payer pays from, when known up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remitter {
    pub account_holder_name: String,
    pub account_identifier: AccountIdentifier,
}

/// The merchant has already chosen the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preselected {
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remitter: Option<Remitter>,
}

impl Variant for Preselected {
    const DISCRIMINATOR: &'static str = "preselected";
}

tagged_union! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum ProviderSelection {
        UserSelected(UserSelected),
        Preselected(Preselected),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Beneficiary
// ─────────────────────────────────────────────────────────────────────────────

/// Funds go to one of the merchant's own accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantAccountBeneficiary {
    pub merchant_account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Variant for MerchantAccountBeneficiary {
    const DISCRIMINATOR: &'static str = "merchant_account";
}

/// Funds go to an arbitrary external account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAccount {
    pub account_holder_name: String,
    pub account_identifier: AccountIdentifier,
    pub reference: String,
}

impl Variant for ExternalAccount {
    const DISCRIMINATOR: &'static str = "external_account";
}

tagged_union! {
    /// Who receives the funds of a payment.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Beneficiary {
        MerchantAccount(MerchantAccountBeneficiary),
        ExternalAccount(ExternalAccount),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests and responses
// ─────────────────────────────────────────────────────────────────────────────

/// The paying user. Either `id` (existing user) or `name` plus a contact
/// detail (new user) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Request to create a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount_in_minor: u64,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub user: PaymentUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

/// Reference to the user a payment was created for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUserId {
    pub id: String,
}

/// Response after creating a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    pub id: String,
    pub user: PaymentUserId,
    /// Token handed to the hosted payment page or front-end SDKs.
    pub resource_token: String,
    pub status: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment status
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRequired {}

impl Variant for AuthorizationRequired {
    const DISCRIMINATOR: &'static str = "authorization_required";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authorizing {
    /// Provider-driven authorization flow, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<Value>,
}

impl Variant for Authorizing {
    const DISCRIMINATOR: &'static str = "authorizing";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authorized {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_flow: Option<Value>,
}

impl Variant for Authorized {
    const DISCRIMINATOR: &'static str = "authorized";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executed {
    pub executed_at: DateTime<Utc>,
}

impl Variant for Executed {
    const DISCRIMINATOR: &'static str = "executed";
}

/// The account a settled payment was paid from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub account_identifiers: Vec<AccountIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settled {
    pub executed_at: DateTime<Utc>,
    pub settled_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_source: Option<PaymentSource>,
}

impl Variant for Settled {
    const DISCRIMINATOR: &'static str = "settled";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failed {
    pub failed_at: DateTime<Utc>,
    pub failure_stage: String,
    pub failure_reason: String,
}

impl Variant for Failed {
    const DISCRIMINATOR: &'static str = "failed";
}

tagged_union! {
    /// Lifecycle state of a payment, keyed by the `status` field.
    #[derive(Debug, Clone, PartialEq)]
    pub enum PaymentStatus(tag = "status") {
        AuthorizationRequired(AuthorizationRequired),
        Authorizing(Authorizing),
        Authorized(Authorized),
        Executed(Executed),
        Settled(Settled),
        Failed(Failed),
    }
}

impl PaymentStatus {
    /// Returns true once the payment can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Settled(_) | PaymentStatus::Failed(_))
    }
}

/// A payment as returned by the API.
///
/// The status-specific fields sit next to the common ones on the wire, so the
/// status union is flattened into the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetPaymentResponse {
    pub id: String,
    pub amount_in_minor: u64,
    pub currency: Currency,
    pub user: PaymentUserId,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(flatten)]
    pub status: PaymentStatus,
}
