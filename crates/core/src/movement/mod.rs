//! Ledger movements and their classification.
//!
//! A movement is one account's view of a payment, deposit or withdrawal. The
//! classifier turns the nested, optional-heavy ledger record into the
//! semantic fields every report shares: transaction type, counterparties,
//! store/POS attribution and the amount seen from a given account.

pub mod balance;
pub mod classifier;
pub mod identity;
pub mod types;

#[cfg(test)]
mod tests;

pub use balance::{MovementGroup, RemainingBalance, group_by_source};
pub use classifier::{Classification, Counterparties, MovementClassifier, StoreAndPos, TransactionType};
pub use identity::display_name;
pub use types::*;
