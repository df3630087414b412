//! Types shared by several resources: currency and account identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use tagged_union::{Variant, tagged_union};

/// Currencies accepted by the payments API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    GBP,
    EUR,
    PLN,
}

impl Currency {
    /// Returns the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::GBP | Currency::EUR | Currency::PLN => 2,
        }
    }

    /// Returns the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::GBP => "£",
            Currency::EUR => "€",
            Currency::PLN => "zł",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GBP" => Ok(Currency::GBP),
            "EUR" => Ok(Currency::EUR),
            "PLN" => Ok(Currency::PLN),
            _ => Err(format!("Unknown currency: {}. Supported: GBP, EUR, PLN", s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Account identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// UK sort code and account number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCodeAccountNumber {
    pub sort_code: String,
    pub account_number: String,
}

impl Variant for SortCodeAccountNumber {
    const DISCRIMINATOR: &'static str = "sort_code_account_number";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iban {
    pub iban: String,
}

impl Variant for Iban {
    const DISCRIMINATOR: &'static str = "iban";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bban {
    pub bban: String,
}

impl Variant for Bban {
    const DISCRIMINATOR: &'static str = "bban";
}

/// Polish domestic account number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nrb {
    pub nrb: String,
}

impl Variant for Nrb {
    const DISCRIMINATOR: &'static str = "nrb";
}

tagged_union! {
    /// Identifies a bank account in one of the supported schemes.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AccountIdentifier(tag = "type") {
        SortCodeAccountNumber(SortCodeAccountNumber),
        Iban(Iban),
        Bban(Bban),
        Nrb(Nrb),
    }
}

impl AccountIdentifier {
    /// Shorthand for a sort code / account number identifier.
    pub fn sort_code_account_number(
        sort_code: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        AccountIdentifier::SortCodeAccountNumber(SortCodeAccountNumber {
            sort_code: sort_code.into(),
            account_number: account_number.into(),
        })
    }

    /// Shorthand for an IBAN identifier.
    pub fn iban(iban: impl Into<String>) -> Self {
        AccountIdentifier::Iban(Iban { iban: iban.into() })
    }
}

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub zip: String,
    pub country_code: String,
}
