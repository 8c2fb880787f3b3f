//! Normative file generation.

use rust_decimal::Decimal;

use super::error::NormativeError;
use super::fixed_width::zero_shift;
use super::names::{NO_SECOND_LAST_NAME, clean_name, format_name};
use super::types::{BalanceAggregates, PaymentTotals};
use crate::movement::{AccountRef, OwnerType};

const COUNT_WIDTH: usize = 7;
const AMOUNT_WIDTH: usize = 12;
const ACCOUNTS_WIDTH: usize = 10;

/// Name the normative files are downloaded as.
pub const NORMATIVE_FILE_NAME: &str = "file.txt";

/// Service for building regulatory files.
pub struct NormativeService;

impl NormativeService {
    /// P41 monthly payment summary: P2C, P2P and total lines.
    #[must_use]
    pub fn p41(p2p: PaymentTotals, p2c: PaymentTotals) -> String {
        let total = p2p + p2c;
        [("P2C", p2c), ("P2P", p2p), ("   ", total)]
            .into_iter()
            .map(|(label, totals)| {
                format!(
                    "{label} {} {}",
                    zero_shift(totals.count, COUNT_WIDTH),
                    zero_shift(whole(totals.amount), AMOUNT_WIDTH)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Accounts and balances file: users, commerces and total lines.
    #[must_use]
    pub fn balances(aggregates: &BalanceAggregates) -> String {
        let users_balance = whole(aggregates.users_balance);
        let commerces_balance = whole(aggregates.commerces_balance);
        let lines = [
            ("Usuarios ", aggregates.users, users_balance),
            ("Comercios", aggregates.commerces, commerces_balance),
            (
                "Total    ",
                aggregates.users + aggregates.commerces,
                users_balance + commerces_balance,
            ),
        ];

        lines
            .into_iter()
            .map(|(label, accounts, balance)| {
                format!(
                    "{label} {} {}",
                    zero_shift(accounts, ACCOUNTS_WIDTH),
                    zero_shift(balance, AMOUNT_WIDTH)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// D50 registry name of an account holder.
    ///
    /// Commerces use their cleaned name. People are written
    /// `LAST/SECOND/FIRST`, each part cleaned, with an empty second part
    /// when they have no second last name.
    pub fn d50_name(account: &AccountRef) -> Result<String, NormativeError> {
        if account.kind() == Some(OwnerType::Commerce) {
            let name = account
                .commerce_info
                .as_ref()
                .and_then(|info| info.name.as_deref())
                .unwrap_or_default();
            return Ok(clean_name(name));
        }

        let Some(owner) = account.owner_info.as_ref() else {
            return Ok(String::new());
        };

        let raw = [
            owner.last_name.as_deref().unwrap_or_default(),
            owner
                .second_last_name
                .as_deref()
                .unwrap_or(NO_SECOND_LAST_NAME),
            owner.first_name.as_deref().unwrap_or_default(),
        ];
        let cleaned: Vec<String> = raw.iter().map(|part| clean_name(part)).collect();

        format_name(&cleaned.join("|"))
    }
}

/// Amounts are reported in whole pesos.
fn whole(amount: Decimal) -> Decimal {
    amount.trunc().normalize()
}
