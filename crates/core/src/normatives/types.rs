//! Normative report inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Count and total of one payment class over a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTotals {
    /// Number of payments.
    pub count: u64,
    /// Sum of their amounts.
    pub amount: Decimal,
}

impl PaymentTotals {
    /// Totals of a list of payment amounts.
    pub fn from_amounts<'a>(amounts: impl IntoIterator<Item = &'a Decimal>) -> Self {
        amounts.into_iter().fold(Self::default(), |acc, amount| Self {
            count: acc.count + 1,
            amount: acc.amount + amount,
        })
    }
}

impl std::ops::Add for PaymentTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            amount: self.amount + other.amount,
        }
    }
}

/// Account counts and balances at the end of a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAggregates {
    /// Number of user accounts.
    pub users: u64,
    /// Sum of user balances.
    pub users_balance: Decimal,
    /// Number of commerce accounts.
    pub commerces: u64,
    /// Sum of commerce balances.
    pub commerces_balance: Decimal,
}
