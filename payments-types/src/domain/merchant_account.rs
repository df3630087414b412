//! Merchant accounts held with the payments provider.

use serde::{Deserialize, Serialize};

use super::common::{AccountIdentifier, Currency};

/// A merchant account and its balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantAccount {
    pub id: String,
    pub currency: Currency,
    #[serde(default)]
    pub account_identifiers: Vec<AccountIdentifier>,
    /// Balance in the smallest currency unit that can be paid out.
    pub available_balance_in_minor: i64,
    /// Balance in the smallest currency unit including pending transactions.
    pub current_balance_in_minor: i64,
    pub account_holder_name: String,
}

impl MerchantAccount {
    /// Formats the available balance for display.
    pub fn display_available_balance(&self) -> String {
        let divisor = 10_i64.pow(self.currency.decimal_places() as u32);
        let amount = self.available_balance_in_minor;
        let sign = if amount < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.currency.symbol(),
            (amount / divisor).abs(),
            (amount % divisor).abs(),
            width = self.currency.decimal_places() as usize
        )
    }
}
