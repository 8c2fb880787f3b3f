//! Movement domain types.
//!
//! The ledger API sends the payment, deposit and withdrawal of a movement as
//! sibling optional fields. Here they are a single [`MovementDetail`] so the
//! classifier can match on exactly one shape.

use chrono::{DateTime, Utc};
use payreport_shared::types::{AccountId, MovementId, SourceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of ledger resource that produced a movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Wallet-to-wallet payment.
    Payment,
    /// Money entering the platform.
    Deposit,
    /// Money leaving the platform.
    Withdraw,
    /// Any other value sent by the ledger.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SourceType {
    /// Wire name of the source type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Unknown => "",
        }
    }
}

/// Who owns an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    /// A person.
    User,
    /// A commerce.
    Commerce,
    /// Any other owner kind.
    #[serde(other)]
    Other,
}

/// Person or commerce profile attached to an account or a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    /// Composite display name, when the profile has one.
    pub full_name: Option<String>,
    /// Commerce name or short name.
    pub name: Option<String>,
    /// Person first name(s).
    pub first_name: Option<String>,
    /// Person first last name.
    pub last_name: Option<String>,
    /// Person second last name.
    pub second_last_name: Option<String>,
    /// National id (RUT).
    pub national_id: Option<String>,
}

/// Account as embedded in a movement or payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountRef {
    /// Account id.
    pub id: Option<AccountId>,
    /// Owner kind as `ownerType`.
    pub owner_type: Option<OwnerType>,
    /// Owner kind as `type`; older rows carry only this one.
    #[serde(rename = "type")]
    pub account_type: Option<OwnerType>,
    /// Owner national id.
    pub owner_national_id: Option<String>,
    /// Person profile for user accounts.
    pub owner_info: Option<Identity>,
    /// Commerce profile for commerce accounts.
    pub commerce_info: Option<Identity>,
}

impl AccountRef {
    /// Owner kind from whichever of `ownerType` / `type` is present.
    #[must_use]
    pub fn kind(&self) -> Option<OwnerType> {
        self.owner_type.or(self.account_type)
    }

    /// Profile of whoever owns the account: the commerce profile for
    /// commerce accounts, the person profile otherwise.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self.kind() {
            Some(OwnerType::Commerce) => self.commerce_info.as_ref(),
            _ => self.owner_info.as_ref(),
        }
    }
}

/// Store a point of sale belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Store {
    /// Public store id.
    pub store_id: Option<String>,
    /// Store display name.
    pub store_name: Option<String>,
}

/// Point of sale with its store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointOfSales {
    /// Point of sale id.
    pub id: Option<String>,
    /// Point of sale name.
    pub name: Option<String>,
    /// Store the point of sale belongs to.
    pub store: Option<Store>,
}

/// Snapshot of the point of sale stored on the sale itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointOfSalesInfo {
    /// Point of sale name at sale time.
    pub name: Option<String>,
}

/// Extra data of a TEF deposit linked to a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleDepositData {
    /// Who paid through the bank transfer.
    pub payer_info: Option<Identity>,
}

/// Deposit information of a sale paid by bank transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleDepositInfo {
    /// Transfer details.
    pub additional_data: Option<SaleDepositData>,
}

/// Point-of-sale attribution of a payment or TEF deposit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sale {
    /// Sale id.
    pub id: Option<String>,
    /// The sale is a tip on a previous sale.
    #[serde(deserialize_with = "null_as_default")]
    pub is_tip: bool,
    /// The sale was reversed.
    #[serde(deserialize_with = "null_as_default")]
    pub reversed: bool,
    /// Point of sale id.
    pub point_of_sales_id: Option<String>,
    /// Point of sale snapshot.
    pub point_of_sales_info: Option<PointOfSalesInfo>,
    /// Point of sale with store.
    pub points_of_sale: Option<PointOfSales>,
    /// Transfer data for TEF sales.
    pub deposit_info: Option<SaleDepositInfo>,
}

impl Sale {
    /// Payer of a TEF sale, if recorded.
    #[must_use]
    pub fn payer_info(&self) -> Option<&Identity> {
        self.deposit_info
            .as_ref()?
            .additional_data
            .as_ref()?
            .payer_info
            .as_ref()
    }
}

/// Bank account or card a deposit came from or a withdrawal goes to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceInfo {
    /// Holder national id.
    pub national_id: Option<String>,
    /// Holder name.
    pub name: Option<String>,
    /// Bank account number.
    pub account_number: Option<String>,
    /// Bank account type.
    #[serde(alias = "bankAccountTypeId")]
    pub account_type_id: Option<String>,
    /// Bank id.
    pub bank_id: Option<String>,
    /// Card brand (one-click deposits).
    pub brand: Option<String>,
    /// Card last digits (one-click deposits).
    pub last_digits: Option<String>,
}

/// Payment between two wallets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentDetail {
    /// Payment id.
    pub id: Option<String>,
    /// Paying account id.
    pub from_account_id: Option<AccountId>,
    /// Receiving account id.
    pub to_account_id: Option<AccountId>,
    /// Paid amount.
    #[serde(deserialize_with = "null_as_default")]
    pub amount: Decimal,
    /// Set when this payment refunds another one.
    pub refunded_payment_id: Option<String>,
    /// Set when this payment is a tip on another one.
    pub tip_from_payment_id: Option<String>,
    /// Processor transaction id.
    pub transaction_id: Option<String>,
    /// The payment was reversed.
    #[serde(deserialize_with = "null_as_default")]
    pub reversed: bool,
    /// Point-of-sale attribution.
    pub sale: Option<Sale>,
    /// Paying account.
    pub payer: Option<AccountRef>,
    /// Receiving account.
    pub receiver: Option<AccountRef>,
}

/// Money entering a wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepositDetail {
    /// Deposit id.
    pub id: Option<String>,
    /// Channel, e.g. `oneclick` or `transfer`.
    #[serde(rename = "type")]
    pub deposit_type: Option<String>,
    /// Charge paid by this deposit; marks a TEF point-of-sale deposit.
    pub charge_id: Option<String>,
    /// Point-of-sale attribution of a TEF deposit.
    pub sale: Option<Sale>,
    /// Credited account id.
    pub to_account_id: Option<AccountId>,
    /// Deposited amount.
    #[serde(deserialize_with = "null_as_default")]
    pub amount: Decimal,
    /// Processor transaction id.
    pub transaction_id: Option<String>,
    /// Where the money came from.
    pub from_resource_info: Option<ResourceInfo>,
}

/// Money leaving a wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawDetail {
    /// Withdrawal id.
    pub id: Option<String>,
    /// Set when the withdrawal refunds a TEF deposit.
    pub refunded_deposit_id: Option<String>,
    /// Refund record id.
    pub refund_id: Option<String>,
    /// The refunded deposit, with its sale.
    pub deposit: Option<Box<DepositDetail>>,
    /// Debited account id.
    pub from_account_id: Option<AccountId>,
    /// Withdrawn amount.
    #[serde(deserialize_with = "null_as_default")]
    pub amount: Decimal,
    /// Processor transaction id.
    pub transaction_id: Option<String>,
    /// Destination bank account.
    pub to_resource_info: Option<ResourceInfo>,
}

/// The resource behind a movement. Exactly one per movement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum MovementDetail {
    /// Wallet-to-wallet payment.
    Payment(PaymentDetail),
    /// Deposit.
    Deposit(DepositDetail),
    /// Withdrawal.
    Withdraw(WithdrawDetail),
    /// The ledger did not join any resource.
    #[default]
    Absent,
}

/// One account's ledger row for a financial event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "MovementRecord")]
pub struct Movement {
    /// Movement id.
    pub id: MovementId,
    /// Resource kind.
    pub source_type: SourceType,
    /// Resource subtype as sent by the ledger.
    pub source_subtype: Option<String>,
    /// Id shared by the rows of the same transaction.
    pub source_id: SourceId,
    /// Account whose ledger this row belongs to.
    pub account_id: AccountId,
    /// Signed balance change for `account_id`.
    pub balance_variation: Decimal,
    /// Balance of `account_id` after this row.
    pub remaining_balance: Decimal,
    /// The movement was reversed.
    pub reversed: bool,
    /// When it was reversed.
    pub reversed_at: Option<DateTime<Utc>>,
    /// When it was booked.
    pub created_at: Option<DateTime<Utc>>,
    /// Owning account with its profile.
    pub account: Option<AccountRef>,
    /// Underlying resource.
    pub detail: MovementDetail,
}

/// Movement as sent by the ledger API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MovementRecord {
    id: MovementId,
    source_type: SourceType,
    source_subtype: Option<String>,
    source_id: SourceId,
    account_id: AccountId,
    #[serde(deserialize_with = "null_as_default")]
    balance_variation: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    remaining_balance: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    reversed: bool,
    reversed_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    account: Option<AccountRef>,
    payment: Option<PaymentDetail>,
    deposit: Option<DepositDetail>,
    withdraw: Option<WithdrawDetail>,
}

impl From<MovementRecord> for Movement {
    fn from(record: MovementRecord) -> Self {
        // a payment always wins; otherwise the declared source type, then
        // withdraw before deposit
        let detail = match (record.source_type, record.payment, record.deposit, record.withdraw) {
            (_, Some(payment), _, _) => MovementDetail::Payment(payment),
            (SourceType::Deposit, _, Some(deposit), _) => MovementDetail::Deposit(deposit),
            (SourceType::Withdraw, _, _, Some(withdraw)) => MovementDetail::Withdraw(withdraw),
            (_, _, _, Some(withdraw)) => MovementDetail::Withdraw(withdraw),
            (_, _, Some(deposit), _) => MovementDetail::Deposit(deposit),
            _ => MovementDetail::Absent,
        };

        Self {
            id: record.id,
            source_type: record.source_type,
            source_subtype: record.source_subtype,
            source_id: record.source_id,
            account_id: record.account_id,
            balance_variation: record.balance_variation,
            remaining_balance: record.remaining_balance,
            reversed: record.reversed,
            reversed_at: record.reversed_at,
            created_at: record.created_at,
            account: record.account,
            detail,
        }
    }
}

impl Movement {
    /// Payment detail, if this is a payment movement.
    #[must_use]
    pub fn payment(&self) -> Option<&PaymentDetail> {
        match &self.detail {
            MovementDetail::Payment(payment) => Some(payment),
            _ => None,
        }
    }

    /// Deposit detail, if this is a deposit movement.
    #[must_use]
    pub fn deposit(&self) -> Option<&DepositDetail> {
        match &self.detail {
            MovementDetail::Deposit(deposit) => Some(deposit),
            _ => None,
        }
    }

    /// Withdraw detail, if this is a withdrawal movement.
    #[must_use]
    pub fn withdraw(&self) -> Option<&WithdrawDetail> {
        match &self.detail {
            MovementDetail::Withdraw(withdraw) => Some(withdraw),
            _ => None,
        }
    }

    /// Profile of the account owning this row.
    #[must_use]
    pub fn owner(&self) -> Option<&Identity> {
        self.account.as_ref().and_then(AccountRef::identity)
    }
}
