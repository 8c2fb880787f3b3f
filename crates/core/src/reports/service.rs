//! Report generation service.

use chrono::NaiveDate;
use chrono_tz::Tz;
use payreport_shared::types::AccountId;

use super::error::ReportError;
use super::types::{
    AccountMovementRow, Commerce, CommerceMovementRow, CommerceMovementsExport, GlossaryEntry,
};
use crate::calendar::format::{file_date, report_timestamp};
use crate::movement::{
    Movement, MovementClassifier, MovementGroup, SourceType, group_by_source,
};
use crate::movement::classifier::NOT_APPLICABLE;

const GLOSSARY_HEAD: [GlossaryEntry; 8] = [
    GlossaryEntry {
        title: "Id_transaccion",
        value: "Identificador único de la transacción.",
    },
    GlossaryEntry {
        title: "Fecha",
        value: "Fecha y hora cuando se originó el movimiento. Formato fecha DD-MM-YYYY HH:MM",
    },
    GlossaryEntry {
        title: "origenId",
        value: "Identificador único de cuenta origen.",
    },
    GlossaryEntry {
        title: "Origen",
        value: "Nombre cuenta origen.",
    },
    GlossaryEntry {
        title: "destinoId",
        value: "Identificador único de cuenta destino.",
    },
    GlossaryEntry {
        title: "Destino",
        value: "Nombre cuenta destino.",
    },
    GlossaryEntry {
        title: "Tipo_Transaccion",
        value: "Tipo de movimiento que se registró. Los valores pueden ser PAGO, REEMBOLSO, PROPINA o Retiro de dinero.",
    },
    GlossaryEntry {
        title: "id_Transaccion_Original",
        value: "[Exclusivo para reembolsos] Muestra el identificador del pago que se está reembolsando.",
    },
];

const GLOSSARY_STORES: [GlossaryEntry; 2] = [
    GlossaryEntry {
        title: "Id_Sucursal",
        value: "Código de identificación de la sucursal",
    },
    GlossaryEntry {
        title: "Sucursal",
        value: "Nombre de la sucursal",
    },
];

const GLOSSARY_TAIL: [GlossaryEntry; 3] = [
    GlossaryEntry {
        title: "Punto_de_venta",
        value: "Caja que llevó a cabo la transacción",
    },
    GlossaryEntry {
        title: "Id_POS",
        value: "Código de identificación de la caja",
    },
    GlossaryEntry {
        title: "monto",
        value: "Monto de la transacción expresada en pesos chilenos",
    },
];

/// Service for generating movement reports.
pub struct ReportService;

impl ReportService {
    /// Builds the commerce movements export for `[start, end]`.
    ///
    /// `movements` are the commerce account's ledger rows for that window, in
    /// ledger order.
    pub fn commerce_export(
        commerce: &Commerce,
        start: NaiveDate,
        end: NaiveDate,
        movements: Vec<Movement>,
        viewpoint: Option<&AccountId>,
        timezone: Tz,
    ) -> Result<CommerceMovementsExport, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }

        let groups = group_by_source(movements);
        let with_stores = commerce.with_stores();

        Ok(CommerceMovementsExport {
            file_name: Self::export_file_name(commerce.name.as_deref(), start, end),
            start_date: start,
            end_date: end,
            rows: Self::commerce_rows(&groups, viewpoint, with_stores, timezone),
            glossary: Self::glossary(with_stores),
        })
    }

    /// One commerce row per transaction.
    #[must_use]
    pub fn commerce_rows(
        groups: &[MovementGroup],
        viewpoint: Option<&AccountId>,
        with_stores: bool,
        timezone: Tz,
    ) -> Vec<CommerceMovementRow> {
        groups
            .iter()
            .map(|group| {
                let first = group.first();
                let parties = MovementClassifier::counterparties(first);
                let store = MovementClassifier::store_and_pos(first);

                CommerceMovementRow {
                    transaction_id: group.source_id().to_string(),
                    date: booking_time(first, timezone),
                    origin_id: parties.origin_id,
                    origin: parties.origin,
                    destination_id: parties.destination_id,
                    destination: parties.destination,
                    transaction_type: parties.transaction_type.transaction,
                    original_transaction_id: parties.transaction_type.refunded_payment_id,
                    store_id: with_stores.then_some(store.store_id),
                    store_name: with_stores.then_some(store.store_name),
                    pos_name: store.pos_name,
                    pos_id: store.pos_id,
                    amount: group.net_variation(viewpoint),
                }
            })
            .collect()
    }

    /// One account row per transaction.
    ///
    /// Withdrawals are read from the account holder's side, so their origin
    /// and destination names are swapped.
    #[must_use]
    pub fn account_rows(
        groups: &[MovementGroup],
        viewpoint: Option<&AccountId>,
        timezone: Tz,
    ) -> Vec<AccountMovementRow> {
        groups
            .iter()
            .filter_map(|group| {
                let first = group.first()?;
                let origin_name = MovementClassifier::origin_name(Some(first));
                let destination_name = MovementClassifier::destination_name(Some(first));

                let (origin, origin_id, destination, destination_id) = match first.source_type {
                    SourceType::Payment => (
                        origin_name,
                        MovementClassifier::origin_id(Some(first)),
                        destination_name,
                        MovementClassifier::destination_id(Some(first)),
                    ),
                    SourceType::Deposit => (
                        origin_name,
                        NOT_APPLICABLE.to_string(),
                        destination_name,
                        MovementClassifier::destination_id(Some(first)),
                    ),
                    SourceType::Withdraw | SourceType::Unknown => (
                        destination_name,
                        first
                            .withdraw()
                            .and_then(|w| w.from_account_id.as_ref())
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                        origin_name,
                        NOT_APPLICABLE.to_string(),
                    ),
                };

                Some(AccountMovementRow {
                    source_id: group.source_id().to_string(),
                    date: booking_time(Some(first), timezone),
                    reversed: first.reversed,
                    reversed_date: first
                        .reversed_at
                        .map(|at| report_timestamp(at, timezone))
                        .unwrap_or_default(),
                    origin,
                    origin_id,
                    destination,
                    destination_id,
                    source_type: first.source_type.as_str().to_string(),
                    source_subtype: first.source_subtype.clone(),
                    amount: group.net_variation(viewpoint),
                    balance: group.remaining_balance(viewpoint),
                })
            })
            .collect()
    }

    /// Glossary sheet; store entries only when the commerce has stores.
    #[must_use]
    pub fn glossary(with_stores: bool) -> Vec<GlossaryEntry> {
        let stores: &[GlossaryEntry] = if with_stores { &GLOSSARY_STORES } else { &[] };
        GLOSSARY_HEAD
            .iter()
            .chain(stores)
            .chain(GLOSSARY_TAIL.iter())
            .cloned()
            .collect()
    }

    /// `<Name>_MOV_<DDMMYYYY>_<DDMMYYYY>.xlsx`, whitespace removed from the
    /// name. Without a name the file starts at `MOV_`.
    #[must_use]
    pub fn export_file_name(commerce_name: Option<&str>, start: NaiveDate, end: NaiveDate) -> String {
        let prefix: String = commerce_name
            .map(|name| name.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|name| !name.is_empty())
            .map(|name| name + "_")
            .unwrap_or_default();

        format!("{prefix}MOV_{}_{}.xlsx", file_date(start), file_date(end))
    }
}

fn booking_time(movement: Option<&Movement>, timezone: Tz) -> String {
    movement
        .and_then(|m| m.created_at)
        .map(|at| report_timestamp(at, timezone))
        .unwrap_or_default()
}
