//! Semantic classification of ledger movements.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::identity::{display_name, non_empty};
use super::types::{AccountRef, Movement, MovementDetail, Sale};

/// Origin name of a plain deposit.
pub const CASH_IN: &str = "Cash-In";
/// Origin name of a plain withdrawal.
pub const CASH_OUT: &str = "Cash-Out";
/// Placeholder for an id that does not apply to the movement kind.
pub const NOT_APPLICABLE: &str = "-";

/// What a movement means for the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    /// Nothing recognisable.
    Empty,
    /// A sale.
    Payment,
    /// Money returned for an earlier payment or TEF deposit.
    Refund,
    /// A reversed payment or sale.
    Reverse,
    /// A tip.
    Tip,
    /// Money withdrawn to a bank account.
    CashOuts,
}

impl TransactionType {
    /// Name used in report rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Payment => "payment",
            Self::Refund => "refund",
            Self::Reverse => "reverse",
            Self::Tip => "tip",
            Self::CashOuts => "cashOuts",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`MovementClassifier::classify`].
///
/// `refunded_payment_id` is `None` where the ledger value is passed through
/// and was null, and `Some("")` where no original transaction applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Transaction type.
    pub transaction: TransactionType,
    /// Refunded payment or deposit id.
    pub refunded_payment_id: Option<String>,
}

impl Classification {
    fn new(transaction: TransactionType, refunded_payment_id: Option<&str>) -> Self {
        Self {
            transaction,
            refunded_payment_id: refunded_payment_id.map(String::from),
        }
    }

    fn blank(transaction: TransactionType) -> Self {
        Self::new(transaction, Some(""))
    }
}

/// Store and point-of-sale attribution. Missing links are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAndPos {
    /// Store id.
    pub store_id: String,
    /// Store name.
    pub store_name: String,
    /// Point of sale id.
    pub pos_id: String,
    /// Point of sale name.
    pub pos_name: String,
}

impl StoreAndPos {
    fn from_sale(sale: Option<&Sale>) -> Self {
        let Some(sale) = sale else {
            return Self::default();
        };
        let store = sale.points_of_sale.as_ref().and_then(|pos| pos.store.as_ref());
        Self {
            store_id: store.and_then(|s| s.store_id.clone()).unwrap_or_default(),
            store_name: store.and_then(|s| s.store_name.clone()).unwrap_or_default(),
            pos_id: sale.point_of_sales_id.clone().unwrap_or_default(),
            pos_name: sale
                .point_of_sales_info
                .as_ref()
                .and_then(|info| info.name.clone())
                .unwrap_or_default(),
        }
    }
}

/// Origin and destination of a movement together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterparties {
    /// Origin display name.
    pub origin: String,
    /// Origin account id.
    pub origin_id: String,
    /// Destination display name.
    pub destination: String,
    /// Destination account id.
    pub destination_id: String,
    /// Transaction classification.
    pub transaction_type: Classification,
}

/// Movement classification operations.
///
/// Every operation is total: a missing movement, detail or nested link yields
/// a default value instead of an error.
pub struct MovementClassifier;

impl MovementClassifier {
    /// Classify a movement. First matching rule wins.
    pub fn classify(movement: Option<&Movement>) -> Classification {
        let Some(movement) = movement else {
            return Classification::blank(TransactionType::Empty);
        };

        if let MovementDetail::Payment(payment) = &movement.detail {
            let refunded = payment.refunded_payment_id.as_deref();
            if non_empty(refunded).is_some() {
                return Classification::new(TransactionType::Refund, refunded);
            }
            if payment.reversed {
                return Classification::new(TransactionType::Reverse, refunded);
            }
            if non_empty(payment.tip_from_payment_id.as_deref()).is_some() {
                return Classification::new(TransactionType::Tip, refunded);
            }
            if non_empty(payment.transaction_id.as_deref()).is_some() {
                return Classification::new(TransactionType::Payment, refunded);
            }
        }

        match &movement.detail {
            MovementDetail::Withdraw(withdraw)
                if non_empty(withdraw.refunded_deposit_id.as_deref()).is_none() =>
            {
                Classification::blank(TransactionType::CashOuts)
            }
            MovementDetail::Deposit(deposit) => match &deposit.sale {
                Some(sale) if sale.is_tip => Classification::blank(TransactionType::Tip),
                Some(sale) if sale.reversed => Classification::blank(TransactionType::Reverse),
                Some(_) => Classification::blank(TransactionType::Payment),
                None => Classification::blank(TransactionType::Empty),
            },
            MovementDetail::Withdraw(withdraw)
                if non_empty(withdraw.refund_id.as_deref()).is_some() =>
            {
                Classification::new(
                    TransactionType::Refund,
                    withdraw.refunded_deposit_id.as_deref(),
                )
            }
            _ => Classification::blank(TransactionType::Empty),
        }
    }

    /// Display name of whoever the money came from.
    pub fn origin_name(movement: Option<&Movement>) -> String {
        let Some(movement) = movement else {
            return String::new();
        };

        match &movement.detail {
            MovementDetail::Payment(payment) => {
                display_name(payment.payer.as_ref().and_then(AccountRef::identity))
            }
            MovementDetail::Deposit(deposit) if is_tef(deposit.charge_id.as_deref()) => {
                display_name(deposit.sale.as_ref().and_then(Sale::payer_info))
            }
            MovementDetail::Withdraw(withdraw)
                if is_tef(withdraw.refunded_deposit_id.as_deref()) =>
            {
                display_name(movement.owner())
            }
            MovementDetail::Deposit(_) => CASH_IN.to_string(),
            MovementDetail::Withdraw(_) => CASH_OUT.to_string(),
            MovementDetail::Absent => String::new(),
        }
    }

    /// Display name of whoever the money went to.
    pub fn destination_name(movement: Option<&Movement>) -> String {
        let Some(movement) = movement else {
            return String::new();
        };

        match &movement.detail {
            MovementDetail::Payment(payment) => {
                display_name(payment.receiver.as_ref().and_then(AccountRef::identity))
            }
            MovementDetail::Withdraw(withdraw)
                if is_tef(withdraw.refunded_deposit_id.as_deref()) =>
            {
                display_name(
                    withdraw
                        .deposit
                        .as_ref()
                        .and_then(|deposit| deposit.sale.as_ref())
                        .and_then(Sale::payer_info),
                )
            }
            MovementDetail::Deposit(_) | MovementDetail::Withdraw(_) => {
                display_name(movement.owner())
            }
            MovementDetail::Absent => String::new(),
        }
    }

    /// Account id the money came from.
    pub fn origin_id(movement: Option<&Movement>) -> String {
        let Some(movement) = movement else {
            return String::new();
        };

        match &movement.detail {
            MovementDetail::Payment(payment) => account_id(payment.from_account_id.as_ref()),
            MovementDetail::Withdraw(withdraw) => account_id(withdraw.from_account_id.as_ref()),
            MovementDetail::Deposit(_) | MovementDetail::Absent => NOT_APPLICABLE.to_string(),
        }
    }

    /// Account id the money went to.
    pub fn destination_id(movement: Option<&Movement>) -> String {
        let Some(movement) = movement else {
            return String::new();
        };

        match &movement.detail {
            MovementDetail::Payment(payment) => account_id(payment.to_account_id.as_ref()),
            MovementDetail::Deposit(deposit) => account_id(deposit.to_account_id.as_ref()),
            MovementDetail::Withdraw(_) | MovementDetail::Absent => NOT_APPLICABLE.to_string(),
        }
    }

    /// Origin, destination and classification in one pass.
    pub fn counterparties(movement: Option<&Movement>) -> Counterparties {
        Counterparties {
            origin: Self::origin_name(movement),
            origin_id: Self::origin_id(movement),
            destination: Self::destination_name(movement),
            destination_id: Self::destination_id(movement),
            transaction_type: Self::classify(movement),
        }
    }

    /// Store and point of sale a movement was made at.
    ///
    /// Only payments, TEF deposits and TEF refund withdrawals carry a sale;
    /// everything else is blank.
    pub fn store_and_pos(movement: Option<&Movement>) -> StoreAndPos {
        let Some(movement) = movement else {
            return StoreAndPos::default();
        };

        match &movement.detail {
            MovementDetail::Payment(payment) => StoreAndPos::from_sale(payment.sale.as_ref()),
            MovementDetail::Deposit(deposit) if is_tef(deposit.charge_id.as_deref()) => {
                StoreAndPos::from_sale(deposit.sale.as_ref())
            }
            MovementDetail::Withdraw(withdraw)
                if is_tef(withdraw.refunded_deposit_id.as_deref()) =>
            {
                StoreAndPos::from_sale(
                    withdraw.deposit.as_ref().and_then(|deposit| deposit.sale.as_ref()),
                )
            }
            _ => StoreAndPos::default(),
        }
    }
}

/// TEF (bank transfer at a point of sale) resources carry a charge or
/// refunded deposit id.
fn is_tef(link: Option<&str>) -> bool {
    non_empty(link).is_some()
}

fn account_id(id: Option<&payreport_shared::types::AccountId>) -> String {
    id.map(|id| id.as_str().to_string()).unwrap_or_default()
}
