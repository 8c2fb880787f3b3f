//! Amount and balance of a transaction as seen from one account.
//!
//! A transaction's ledger rows share a source id. Payments produce two rows
//! (payer first, receiver second); deposits and withdrawals produce one.

use std::collections::HashMap;
use std::fmt;

use payreport_shared::types::{AccountId, SourceId};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::types::Movement;

/// The rows of one transaction, in ledger order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementGroup {
    source_id: SourceId,
    movements: Vec<Movement>,
}

impl MovementGroup {
    fn new(source_id: SourceId, first: Movement) -> Self {
        Self {
            source_id,
            movements: vec![first],
        }
    }

    /// Shared source id.
    #[must_use]
    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    /// First row; the classifier looks at this one.
    #[must_use]
    pub fn first(&self) -> Option<&Movement> {
        self.movements.first()
    }

    /// All rows.
    #[must_use]
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Row seen from `viewpoint`: the matching first row, otherwise the
    /// second row of a pair, otherwise the only row.
    fn row_for(&self, viewpoint: Option<&AccountId>) -> Option<&Movement> {
        match self.movements.as_slice() {
            [] => None,
            [only] => Some(only),
            [first, second, ..] => {
                if viewpoint.is_some_and(|account| *account == first.account_id) {
                    Some(first)
                } else {
                    Some(second)
                }
            }
        }
    }

    /// Amount of the transaction for `viewpoint`.
    ///
    /// Without a viewpoint this is the absolute value of the first row, so a
    /// payment reads the same from either side. With one, the sign is kept.
    pub fn net_variation(&self, viewpoint: Option<&AccountId>) -> Decimal {
        match viewpoint {
            None => self
                .first()
                .map(|m| m.balance_variation.abs())
                .unwrap_or_default(),
            Some(_) => self
                .row_for(viewpoint)
                .map(|m| m.balance_variation)
                .unwrap_or_default(),
        }
    }

    /// Balance left on the viewpoint's account after the transaction.
    pub fn remaining_balance(&self, viewpoint: Option<&AccountId>) -> RemainingBalance {
        match self.first() {
            Some(first) if first.reversed => RemainingBalance::Reversed,
            _ => self
                .row_for(viewpoint)
                .map_or(RemainingBalance::Reversed, |m| {
                    RemainingBalance::Amount(m.remaining_balance)
                }),
        }
    }
}

/// Group rows by source id, keeping the order in which each id first appears.
pub fn group_by_source(movements: impl IntoIterator<Item = Movement>) -> Vec<MovementGroup> {
    let mut groups: Vec<MovementGroup> = Vec::new();
    let mut index: HashMap<SourceId, usize> = HashMap::new();
    for movement in movements {
        match index.get(&movement.source_id) {
            Some(&at) => groups[at].movements.push(movement),
            None => {
                index.insert(movement.source_id.clone(), groups.len());
                groups.push(MovementGroup::new(movement.source_id.clone(), movement));
            }
        }
    }
    groups
}

/// Remaining balance cell: an amount, or `-` for reversed transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingBalance {
    /// Balance after the transaction.
    Amount(Decimal),
    /// The transaction was reversed; no meaningful balance.
    Reversed,
}

impl fmt::Display for RemainingBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(amount) => write!(f, "{amount}"),
            Self::Reversed => f.write_str("-"),
        }
    }
}

impl Serialize for RemainingBalance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(amount) => Serialize::serialize(amount, serializer),
            Self::Reversed => serializer.serialize_str("-"),
        }
    }
}
