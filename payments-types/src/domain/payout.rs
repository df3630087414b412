//! Payouts from a merchant account to a beneficiary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagged_union::{Variant, tagged_union};

use super::common::{AccountIdentifier, Currency};
use super::payment::ExternalAccount;

// ─────────────────────────────────────────────────────────────────────────────
// Beneficiary
// ─────────────────────────────────────────────────────────────────────────────

/// Pay back the account a previous payment came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSourceBeneficiary {
    pub payment_source_id: String,
    pub user_id: String,
    pub reference: String,
}

impl Variant for PaymentSourceBeneficiary {
    const DISCRIMINATOR: &'static str = "payment_source";
}

/// Pay out to the merchant's own registered business account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessAccount {
    pub reference: String,
}

impl Variant for BusinessAccount {
    const DISCRIMINATOR: &'static str = "business_account";
}

tagged_union! {
    /// Who receives the funds of a payout.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PayoutBeneficiary {
        ExternalAccount(ExternalAccount),
        PaymentSource(PaymentSourceBeneficiary),
        BusinessAccount(BusinessAccount),
    }
}

impl PayoutBeneficiary {
    /// Shorthand for an external account beneficiary.
    pub fn external_account(
        account_holder_name: impl Into<String>,
        account_identifier: AccountIdentifier,
        reference: impl Into<String>,
    ) -> Self {
        PayoutBeneficiary::ExternalAccount(ExternalAccount {
            account_holder_name: account_holder_name.into(),
            account_identifier,
            reference: reference.into(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests and responses
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayoutRequest {
    pub merchant_account_id: String,
    pub amount_in_minor: u64,
    pub currency: Currency,
    pub beneficiary: PayoutBeneficiary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

/// Response after creating a payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayoutResponse {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {}

impl Variant for Pending {
    const DISCRIMINATOR: &'static str = "pending";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutAuthorized {
    pub authorized_at: DateTime<Utc>,
}

impl Variant for PayoutAuthorized {
    const DISCRIMINATOR: &'static str = "authorized";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutExecuted {
    pub authorized_at: DateTime<Utc>,
    pub executed_at: DateTime<Utc>,
}

impl Variant for PayoutExecuted {
    const DISCRIMINATOR: &'static str = "executed";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutFailed {
    pub failed_at: DateTime<Utc>,
    pub failure_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_at: Option<DateTime<Utc>>,
}

impl Variant for PayoutFailed {
    const DISCRIMINATOR: &'static str = "failed";
}

tagged_union! {
    /// Lifecycle state of a payout, keyed by the `status` field.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PayoutStatus(tag = "status") {
        Pending(Pending),
        Authorized(PayoutAuthorized),
        Executed(PayoutExecuted),
        Failed(PayoutFailed),
    }
}

/// A payout as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPayoutResponse {
    pub id: String,
    pub merchant_account_id: String,
    pub amount_in_minor: u64,
    pub currency: Currency,
    pub beneficiary: PayoutBeneficiary,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(flatten)]
    pub status: PayoutStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payout_request_wire_format() {
        let req = CreatePayoutRequest {
            merchant_account_id: "ma-1".into(),
            amount_in_minor: 2500,
            currency: Currency::EUR,
            beneficiary: PayoutBeneficiary::external_account(
                "Bene Ficiary",
                AccountIdentifier::iban("GB33BUKB20201555555555"),
                "refund-7",
            ),
            metadata: None,
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "merchant_account_id": "ma-1",
                "amount_in_minor": 2500,
                "currency": "EUR",
                "beneficiary": {
                    "type": "external_account",
                    "account_holder_name": "Bene Ficiary",
                    "account_identifier": {
                        "type": "iban",
                        "iban": "GB33BUKB20201555555555"
                    },
                    "reference": "refund-7"
                }
            })
        );
    }

    #[test]
    fn test_get_payout_response_statuses() {
        let base = json!({
            "id": "po-1",
            "merchant_account_id": "ma-1",
            "amount_in_minor": 2500,
            "currency": "GBP",
            "beneficiary": { "type": "business_account", "reference": "sweep" },
            "created_at": "2024-03-01T09:00:00Z"
        });

        let with = |extra: serde_json::Value| {
            let mut body = base.clone();
            let map = body.as_object_mut().unwrap();
            for (k, v) in extra.as_object().unwrap() {
                map.insert(k.clone(), v.clone());
            }
            serde_json::from_value::<GetPayoutResponse>(body).unwrap()
        };

        assert!(matches!(
            with(json!({ "status": "pending" })).status,
            PayoutStatus::Pending(_)
        ));
        assert!(matches!(
            with(json!({
                "status": "executed",
                "authorized_at": "2024-03-01T09:01:00Z",
                "executed_at": "2024-03-01T09:02:00Z"
            }))
            .status,
            PayoutStatus::Executed(_)
        ));

        let failed = with(json!({
            "status": "failed",
            "failed_at": "2024-03-01T09:03:00Z",
            "failure_reason": "insufficient_funds"
        }));
        match failed.status {
            PayoutStatus::Failed(f) => {
                assert_eq!(f.failure_reason, "insufficient_funds");
                assert!(f.authorized_at.is_none());
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(matches!(failed.beneficiary, PayoutBeneficiary::BusinessAccount(_)));
    }
}
