//! Report data types.

use chrono::NaiveDate;
use payreport_shared::types::{AccountId, CommerceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::movement::{RemainingBalance, TransactionType};

/// Commerce whose movements are exported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Commerce {
    /// Commerce id.
    pub id: CommerceId,
    /// Commerce display name.
    pub name: Option<String>,
    /// Account that receives the commerce's sales.
    pub primary_account_id: AccountId,
    /// The commerce has stores configured; adds store columns to exports.
    pub stores_active: Option<bool>,
}

impl Commerce {
    /// Store columns are only shown for commerces with stores enabled.
    #[must_use]
    pub fn with_stores(&self) -> bool {
        self.stores_active.unwrap_or(false)
    }
}

/// One row of the commerce movements sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommerceMovementRow {
    /// Source id of the transaction.
    #[serde(rename = "Id_transaccion")]
    pub transaction_id: String,
    /// Local booking time, `DD-MM-YYYY HH:mm`.
    #[serde(rename = "Fecha")]
    pub date: String,
    /// Origin account id.
    #[serde(rename = "origenId")]
    pub origin_id: String,
    /// Origin name.
    #[serde(rename = "Origen")]
    pub origin: String,
    /// Destination account id.
    #[serde(rename = "destinoId")]
    pub destination_id: String,
    /// Destination name.
    #[serde(rename = "Destino")]
    pub destination: String,
    /// Transaction type.
    #[serde(rename = "Tipo_Transaccion")]
    pub transaction_type: TransactionType,
    /// Refunded transaction, for refunds.
    #[serde(rename = "id_Transaccion_Original")]
    pub original_transaction_id: Option<String>,
    /// Store id, when the commerce has stores.
    #[serde(rename = "Id_Sucursal", skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    /// Store name, when the commerce has stores.
    #[serde(rename = "Sucursal", skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    /// Point of sale name.
    #[serde(rename = "Punto_de_Venta")]
    pub pos_name: String,
    /// Point of sale id.
    #[serde(rename = "Id_POS")]
    pub pos_id: String,
    /// Amount.
    #[serde(rename = "monto")]
    pub amount: Decimal,
}

/// One row of the account movements sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMovementRow {
    /// Source id of the transaction.
    pub source_id: String,
    /// Local booking time.
    #[serde(rename = "fecha")]
    pub date: String,
    /// The transaction was reversed.
    #[serde(rename = "reversada")]
    pub reversed: bool,
    /// Local reversal time, or empty.
    #[serde(rename = "fechaReversa")]
    pub reversed_date: String,
    /// Origin name.
    #[serde(rename = "origen")]
    pub origin: String,
    /// Origin account id.
    #[serde(rename = "origenId")]
    pub origin_id: String,
    /// Destination name.
    #[serde(rename = "destino")]
    pub destination: String,
    /// Destination account id.
    #[serde(rename = "destinoId")]
    pub destination_id: String,
    /// Source type.
    #[serde(rename = "type")]
    pub source_type: String,
    /// Source subtype.
    #[serde(rename = "subtype")]
    pub source_subtype: Option<String>,
    /// Amount as seen by the account.
    #[serde(rename = "monto")]
    pub amount: Decimal,
    /// Balance after the transaction.
    #[serde(rename = "saldo")]
    pub balance: RemainingBalance,
}

/// Title/value pair of the glossary sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlossaryEntry {
    /// Column name.
    pub title: &'static str,
    /// Column description.
    pub value: &'static str,
}

/// Everything needed to write a commerce movements workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommerceMovementsExport {
    /// Workbook file name.
    pub file_name: String,
    /// First exported day.
    pub start_date: NaiveDate,
    /// Last exported day.
    pub end_date: NaiveDate,
    /// Movements sheet.
    pub rows: Vec<CommerceMovementRow>,
    /// Glossary sheet.
    pub glossary: Vec<GlossaryEntry>,
}
