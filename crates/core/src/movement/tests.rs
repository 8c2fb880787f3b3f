//! Tests for movement deserialization, classification and balances.

use payreport_shared::types::{AccountId, SourceId};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn person(full_name: &str) -> Identity {
    Identity {
        full_name: Some(full_name.to_string()),
        ..Identity::default()
    }
}

fn commerce(name: &str) -> Identity {
    Identity {
        name: Some(name.to_string()),
        ..Identity::default()
    }
}

fn user_account(id: &str, full_name: &str) -> AccountRef {
    AccountRef {
        id: Some(AccountId::new(id)),
        owner_type: Some(OwnerType::User),
        owner_info: Some(person(full_name)),
        ..AccountRef::default()
    }
}

fn commerce_account(id: &str, name: &str) -> AccountRef {
    AccountRef {
        id: Some(AccountId::new(id)),
        owner_type: Some(OwnerType::Commerce),
        commerce_info: Some(commerce(name)),
        ..AccountRef::default()
    }
}

fn sale_at_store() -> Sale {
    Sale {
        point_of_sales_id: Some("pos-1".to_string()),
        point_of_sales_info: Some(PointOfSalesInfo {
            name: Some("Caja 1".to_string()),
        }),
        points_of_sale: Some(PointOfSales {
            store: Some(Store {
                store_id: Some("store-9".to_string()),
                store_name: Some("Sucursal Centro".to_string()),
            }),
            ..PointOfSales::default()
        }),
        deposit_info: Some(SaleDepositInfo {
            additional_data: Some(SaleDepositData {
                payer_info: Some(person("Ana Tef")),
            }),
        }),
        ..Sale::default()
    }
}

fn movement(detail: MovementDetail) -> Movement {
    Movement {
        source_id: SourceId::new("src-1"),
        account_id: AccountId::new("acc-commerce"),
        account: Some(commerce_account("acc-commerce", "Cafe Sur")),
        detail,
        ..Movement::default()
    }
}

fn payment() -> PaymentDetail {
    PaymentDetail {
        from_account_id: Some(AccountId::new("acc-user")),
        to_account_id: Some(AccountId::new("acc-commerce")),
        amount: dec!(100),
        transaction_id: Some("tx-1".to_string()),
        payer: Some(user_account("acc-user", "Camilo Rivas")),
        receiver: Some(commerce_account("acc-commerce", "Cafe Sur")),
        sale: Some(sale_at_store()),
        ..PaymentDetail::default()
    }
}

fn tef_deposit() -> DepositDetail {
    DepositDetail {
        charge_id: Some("charge-1".to_string()),
        to_account_id: Some(AccountId::new("acc-commerce")),
        sale: Some(sale_at_store()),
        ..DepositDetail::default()
    }
}

fn row(account: &str, variation: Decimal, balance: Decimal) -> Movement {
    Movement {
        source_id: SourceId::new("src-1"),
        account_id: AccountId::new(account),
        balance_variation: variation,
        remaining_balance: balance,
        ..Movement::default()
    }
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

#[test]
fn test_deserialize_payment_movement() {
    let json = serde_json::json!({
        "id": "mov-1",
        "sourceType": "payment",
        "sourceSubtype": "p2c",
        "sourceId": "src-1",
        "accountId": "acc-user",
        "balanceVariation": "-1500",
        "remainingBalance": 3500,
        "reversed": null,
        "createdAt": "2020-08-03T16:30:00.000Z",
        "payment": {
            "fromAccountId": "acc-user",
            "toAccountId": "acc-commerce",
            "amount": 1500,
            "transactionId": "tx-1",
            "refundedPaymentId": null,
            "payer": { "id": "acc-user", "type": "user", "ownerInfo": { "fullName": "Camilo Rivas" } },
            "receiver": { "id": "acc-commerce", "ownerType": "commerce", "commerceInfo": { "name": "Cafe Sur" } }
        },
        "deposit": null,
        "withdraw": null
    });

    let movement: Movement = serde_json::from_value(json).unwrap();

    assert_eq!(movement.source_type, SourceType::Payment);
    assert_eq!(movement.balance_variation, dec!(-1500));
    assert_eq!(movement.remaining_balance, dec!(3500));
    assert!(!movement.reversed);
    let payment = movement.payment().unwrap();
    assert_eq!(payment.amount, dec!(1500));
    assert_eq!(payment.refunded_payment_id, None);
    assert_eq!(payment.payer.as_ref().unwrap().owner_type, None);
    assert_eq!(payment.payer.as_ref().unwrap().kind(), Some(OwnerType::User));
    assert_eq!(
        payment.receiver.as_ref().unwrap().owner_type,
        Some(OwnerType::Commerce)
    );
}

#[test]
fn test_deserialize_picks_detail_by_source_type() {
    let json = serde_json::json!({
        "sourceType": "withdraw",
        "sourceId": "src-2",
        "accountId": "acc-commerce",
        "deposit": { "type": "transfer" },
        "withdraw": { "fromAccountId": "acc-commerce", "refundedDepositId": "dep-1" }
    });

    let movement: Movement = serde_json::from_value(json).unwrap();

    assert!(movement.withdraw().is_some());
    assert!(movement.deposit().is_none());
}

#[test]
fn test_deserialize_account_with_owner_type_and_type() {
    let json = serde_json::json!({
        "sourceType": "payment",
        "sourceId": "src-1",
        "accountId": "acc-user",
        "account": { "id": "acc-user", "ownerType": "user", "type": "user", "ownerInfo": { "fullName": "Camilo Rivas" } },
        "payment": {
            "fromAccountId": "acc-user",
            "toAccountId": "acc-commerce",
            "transactionId": "tx-1",
            "payer": { "id": "acc-user", "ownerType": "user", "type": "user", "ownerInfo": { "fullName": "Camilo Rivas" } },
            "receiver": {
                "id": "acc-commerce",
                "ownerType": "commerce",
                "type": "commerce",
                "commerceInfo": { "name": "Cafe Sur" }
            }
        }
    });

    let movement: Movement = serde_json::from_value(json).unwrap();

    let payment = movement.payment().unwrap();
    assert_eq!(payment.payer.as_ref().unwrap().kind(), Some(OwnerType::User));
    assert_eq!(payment.receiver.as_ref().unwrap().kind(), Some(OwnerType::Commerce));
    assert_eq!(movement.owner().and_then(|o| o.full_name.as_deref()), Some("Camilo Rivas"));
    assert_eq!(MovementClassifier::origin_name(Some(&movement)), "Camilo Rivas");
    assert_eq!(MovementClassifier::destination_name(Some(&movement)), "Cafe Sur");
}

#[test]
fn test_deserialize_payment_wins_over_declared_source_type() {
    let json = serde_json::json!({
        "sourceType": "deposit",
        "sourceId": "src-3",
        "accountId": "acc-commerce",
        "payment": { "transactionId": "tx-3" },
        "deposit": { "chargeId": "charge-3" }
    });

    let movement: Movement = serde_json::from_value(json).unwrap();

    assert!(movement.payment().is_some());
    assert_eq!(
        MovementClassifier::classify(Some(&movement)).transaction,
        TransactionType::Payment
    );
}

#[test]
fn test_user_account_ignores_commerce_profile() {
    let account = AccountRef {
        owner_type: Some(OwnerType::User),
        commerce_info: Some(commerce("Cafe Sur")),
        ..AccountRef::default()
    };
    assert_eq!(account.identity(), None);

    let mut m = movement(MovementDetail::Deposit(DepositDetail::default()));
    m.account = Some(account);
    assert_eq!(MovementClassifier::destination_name(Some(&m)), "");
}

#[test]
fn test_deserialize_without_detail() {
    let json = serde_json::json!({ "sourceType": "something", "sourceId": "x", "accountId": "a" });

    let movement: Movement = serde_json::from_value(json).unwrap();

    assert_eq!(movement.source_type, SourceType::Unknown);
    assert_eq!(movement.detail, MovementDetail::Absent);
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn test_classify_no_movement_is_empty() {
    let result = MovementClassifier::classify(None);
    assert_eq!(result.transaction, TransactionType::Empty);
    assert_eq!(result.refunded_payment_id.as_deref(), Some(""));
}

#[test]
fn test_classify_detail_less_movement_is_empty() {
    let m = movement(MovementDetail::Absent);
    let result = MovementClassifier::classify(Some(&m));
    assert_eq!(result.transaction, TransactionType::Empty);
    assert_eq!(result.refunded_payment_id.as_deref(), Some(""));
}

#[test]
fn test_refund_wins_over_reversed() {
    let m = movement(MovementDetail::Payment(PaymentDetail {
        refunded_payment_id: Some("pay-0".to_string()),
        reversed: true,
        ..payment()
    }));
    let result = MovementClassifier::classify(Some(&m));
    assert_eq!(result.transaction, TransactionType::Refund);
    assert_eq!(result.refunded_payment_id.as_deref(), Some("pay-0"));
}

#[rstest]
#[case::reversed(PaymentDetail { reversed: true, ..payment() }, TransactionType::Reverse)]
#[case::tip(PaymentDetail { tip_from_payment_id: Some("pay-0".into()), ..payment() }, TransactionType::Tip)]
#[case::plain(payment(), TransactionType::Payment)]
#[case::no_transaction_id(PaymentDetail { transaction_id: None, ..payment() }, TransactionType::Empty)]
fn test_classify_payment(#[case] detail: PaymentDetail, #[case] expected: TransactionType) {
    let m = movement(MovementDetail::Payment(detail));
    assert_eq!(MovementClassifier::classify(Some(&m)).transaction, expected);
}

#[test]
fn test_payment_passes_through_null_refund_id() {
    let m = movement(MovementDetail::Payment(payment()));
    assert_eq!(MovementClassifier::classify(Some(&m)).refunded_payment_id, None);
}

#[test]
fn test_blank_refund_id_is_not_a_refund() {
    let m = movement(MovementDetail::Payment(PaymentDetail {
        refunded_payment_id: Some(String::new()),
        ..payment()
    }));
    let result = MovementClassifier::classify(Some(&m));
    assert_eq!(result.transaction, TransactionType::Payment);
    assert_eq!(result.refunded_payment_id.as_deref(), Some(""));
}

#[rstest]
#[case::plain(Sale::default(), TransactionType::Payment)]
#[case::tip(Sale { is_tip: true, reversed: true, ..Sale::default() }, TransactionType::Tip)]
#[case::reversed(Sale { reversed: true, ..Sale::default() }, TransactionType::Reverse)]
fn test_classify_tef_deposit(#[case] sale: Sale, #[case] expected: TransactionType) {
    let m = movement(MovementDetail::Deposit(DepositDetail {
        sale: Some(sale),
        ..tef_deposit()
    }));
    let result = MovementClassifier::classify(Some(&m));
    assert_eq!(result.transaction, expected);
    assert_eq!(result.refunded_payment_id.as_deref(), Some(""));
}

#[test]
fn test_classify_plain_deposit_is_empty() {
    let m = movement(MovementDetail::Deposit(DepositDetail::default()));
    assert_eq!(
        MovementClassifier::classify(Some(&m)).transaction,
        TransactionType::Empty
    );
}

#[test]
fn test_classify_withdrawals() {
    let cash_out = movement(MovementDetail::Withdraw(WithdrawDetail::default()));
    let result = MovementClassifier::classify(Some(&cash_out));
    assert_eq!(result.transaction, TransactionType::CashOuts);
    assert_eq!(result.refunded_payment_id.as_deref(), Some(""));

    let refund = movement(MovementDetail::Withdraw(WithdrawDetail {
        refunded_deposit_id: Some("dep-1".to_string()),
        refund_id: Some("ref-1".to_string()),
        ..WithdrawDetail::default()
    }));
    let result = MovementClassifier::classify(Some(&refund));
    assert_eq!(result.transaction, TransactionType::Refund);
    assert_eq!(result.refunded_payment_id.as_deref(), Some("dep-1"));

    let unlinked = movement(MovementDetail::Withdraw(WithdrawDetail {
        refunded_deposit_id: Some("dep-1".to_string()),
        ..WithdrawDetail::default()
    }));
    assert_eq!(
        MovementClassifier::classify(Some(&unlinked)).transaction,
        TransactionType::Empty
    );
}

#[test]
fn test_transaction_type_wire_names() {
    assert_eq!(
        serde_json::to_value(TransactionType::CashOuts).unwrap(),
        serde_json::json!("cashOuts")
    );
    assert_eq!(TransactionType::Reverse.to_string(), "reverse");
}

// ---------------------------------------------------------------------------
// Counterparties
// ---------------------------------------------------------------------------

#[test]
fn test_payment_counterparties() {
    let m = movement(MovementDetail::Payment(payment()));
    let parties = MovementClassifier::counterparties(Some(&m));

    assert_eq!(parties.origin, "Camilo Rivas");
    assert_eq!(parties.origin_id, "acc-user");
    assert_eq!(parties.destination, "Cafe Sur");
    assert_eq!(parties.destination_id, "acc-commerce");
    assert_eq!(parties.transaction_type.transaction, TransactionType::Payment);
}

#[test]
fn test_commerce_refund_payment_uses_commerce_name_as_origin() {
    let m = movement(MovementDetail::Payment(PaymentDetail {
        payer: Some(commerce_account("acc-commerce", "Cafe Sur")),
        receiver: Some(user_account("acc-user", "Camilo Rivas")),
        refunded_payment_id: Some("pay-0".to_string()),
        ..payment()
    }));

    assert_eq!(MovementClassifier::origin_name(Some(&m)), "Cafe Sur");
    assert_eq!(MovementClassifier::destination_name(Some(&m)), "Camilo Rivas");
}

#[test]
fn test_tef_deposit_counterparties() {
    let m = movement(MovementDetail::Deposit(tef_deposit()));
    let parties = MovementClassifier::counterparties(Some(&m));

    assert_eq!(parties.origin, "Ana Tef");
    assert_eq!(parties.origin_id, "-");
    assert_eq!(parties.destination, "Cafe Sur");
    assert_eq!(parties.destination_id, "acc-commerce");
}

#[test]
fn test_tef_refund_counterparties() {
    let m = movement(MovementDetail::Withdraw(WithdrawDetail {
        refunded_deposit_id: Some("dep-1".to_string()),
        refund_id: Some("ref-1".to_string()),
        from_account_id: Some(AccountId::new("acc-commerce")),
        deposit: Some(Box::new(tef_deposit())),
        ..WithdrawDetail::default()
    }));
    let parties = MovementClassifier::counterparties(Some(&m));

    assert_eq!(parties.origin, "Cafe Sur");
    assert_eq!(parties.origin_id, "acc-commerce");
    assert_eq!(parties.destination, "Ana Tef");
    assert_eq!(parties.destination_id, "-");
}

#[test]
fn test_cash_in_and_cash_out() {
    let deposit = movement(MovementDetail::Deposit(DepositDetail {
        to_account_id: Some(AccountId::new("acc-commerce")),
        ..DepositDetail::default()
    }));
    assert_eq!(MovementClassifier::origin_name(Some(&deposit)), "Cash-In");
    assert_eq!(MovementClassifier::destination_name(Some(&deposit)), "Cafe Sur");

    let withdraw = movement(MovementDetail::Withdraw(WithdrawDetail::default()));
    assert_eq!(MovementClassifier::origin_name(Some(&withdraw)), "Cash-Out");
    assert_eq!(MovementClassifier::destination_name(Some(&withdraw)), "Cafe Sur");
}

#[test]
fn test_plain_deposit_of_user_account_names_the_person() {
    let mut m = movement(MovementDetail::Deposit(DepositDetail::default()));
    m.account = Some(user_account("acc-user", "Camilo Rivas"));
    assert_eq!(MovementClassifier::destination_name(Some(&m)), "Camilo Rivas");
}

#[test]
fn test_ids_and_names_without_movement_or_detail() {
    assert_eq!(MovementClassifier::origin_id(None), "");
    assert_eq!(MovementClassifier::destination_id(None), "");
    assert_eq!(MovementClassifier::origin_name(None), "");
    assert_eq!(MovementClassifier::destination_name(None), "");

    let m = movement(MovementDetail::Absent);
    assert_eq!(MovementClassifier::origin_id(Some(&m)), "-");
    assert_eq!(MovementClassifier::destination_id(Some(&m)), "-");
    assert_eq!(MovementClassifier::origin_name(Some(&m)), "");
}

// ---------------------------------------------------------------------------
// Store and POS
// ---------------------------------------------------------------------------

#[test]
fn test_store_and_pos_of_payment() {
    let m = movement(MovementDetail::Payment(payment()));
    let store = MovementClassifier::store_and_pos(Some(&m));

    assert_eq!(store.store_id, "store-9");
    assert_eq!(store.store_name, "Sucursal Centro");
    assert_eq!(store.pos_id, "pos-1");
    assert_eq!(store.pos_name, "Caja 1");
}

#[test]
fn test_store_and_pos_of_tef_refund_reads_refunded_sale() {
    let m = movement(MovementDetail::Withdraw(WithdrawDetail {
        refunded_deposit_id: Some("dep-1".to_string()),
        deposit: Some(Box::new(tef_deposit())),
        ..WithdrawDetail::default()
    }));
    assert_eq!(MovementClassifier::store_and_pos(Some(&m)).pos_name, "Caja 1");
}

#[test]
fn test_store_and_pos_blank_for_cash_movements() {
    let deposit = movement(MovementDetail::Deposit(DepositDetail {
        sale: Some(sale_at_store()),
        ..DepositDetail::default()
    }));
    assert_eq!(
        MovementClassifier::store_and_pos(Some(&deposit)),
        StoreAndPos::default()
    );

    let withdraw = movement(MovementDetail::Withdraw(WithdrawDetail::default()));
    assert_eq!(
        MovementClassifier::store_and_pos(Some(&withdraw)),
        StoreAndPos::default()
    );
}

#[test]
fn test_store_and_pos_missing_links_are_blank() {
    let m = movement(MovementDetail::Payment(PaymentDetail {
        sale: Some(Sale {
            point_of_sales_id: Some("pos-2".to_string()),
            ..Sale::default()
        }),
        ..payment()
    }));
    let store = MovementClassifier::store_and_pos(Some(&m));
    assert_eq!(store.pos_id, "pos-2");
    assert_eq!(store.store_id, "");
    assert_eq!(store.pos_name, "");
}

// ---------------------------------------------------------------------------
// Grouping and balances
// ---------------------------------------------------------------------------

#[test]
fn test_group_by_source_keeps_first_seen_order() {
    let mut a = row("acc-a", dec!(-1), dec!(0));
    a.source_id = SourceId::new("s2");
    let mut b = row("acc-b", dec!(1), dec!(0));
    b.source_id = SourceId::new("s1");
    let mut c = row("acc-c", dec!(1), dec!(0));
    c.source_id = SourceId::new("s2");

    let groups = group_by_source(vec![a, b, c]);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].source_id().as_str(), "s2");
    assert_eq!(groups[0].movements().len(), 2);
    assert_eq!(groups[1].source_id().as_str(), "s1");
}

#[test]
fn test_net_variation_by_viewpoint() {
    let group = group_by_source(vec![
        row("A", dec!(-100), dec!(400)),
        row("B", dec!(100), dec!(900)),
    ])
    .remove(0);

    assert_eq!(group.net_variation(Some(&AccountId::new("A"))), dec!(-100));
    assert_eq!(group.net_variation(Some(&AccountId::new("B"))), dec!(100));
    assert_eq!(group.net_variation(None), dec!(100));
    // unknown viewpoint reads the second row
    assert_eq!(group.net_variation(Some(&AccountId::new("Z"))), dec!(100));
}

#[test]
fn test_single_row_keeps_sign() {
    let group = group_by_source(vec![row("A", dec!(-250), dec!(10))]).remove(0);
    assert_eq!(group.net_variation(Some(&AccountId::new("B"))), dec!(-250));
    assert_eq!(group.net_variation(None), dec!(250));
}

#[test]
fn test_remaining_balance() {
    let group = group_by_source(vec![
        row("A", dec!(-100), dec!(400)),
        row("B", dec!(100), dec!(900)),
    ])
    .remove(0);

    assert_eq!(
        group.remaining_balance(Some(&AccountId::new("A"))),
        RemainingBalance::Amount(dec!(400))
    );
    assert_eq!(
        group.remaining_balance(None),
        RemainingBalance::Amount(dec!(900))
    );
}

#[test]
fn test_remaining_balance_of_reversed_is_dash() {
    let mut first = row("A", dec!(-100), dec!(400));
    first.reversed = true;
    let group = group_by_source(vec![first]).remove(0);

    let balance = group.remaining_balance(Some(&AccountId::new("A")));
    assert_eq!(balance, RemainingBalance::Reversed);
    assert_eq!(balance.to_string(), "-");
    assert_eq!(serde_json::to_value(balance).unwrap(), serde_json::json!("-"));
}

#[test]
fn test_remaining_balance_amount_serializes_as_decimal_string() {
    let balance = RemainingBalance::Amount(dec!(900.50));
    assert_eq!(serde_json::to_value(balance).unwrap(), serde_json::json!("900.50"));
}

proptest! {
    /// Each side of a payment sees its own signed amount; no viewpoint sees
    /// the absolute value.
    #[test]
    fn prop_pair_variation_matches_viewpoint(cents in 1i64..10_000_000) {
        let amount = Decimal::new(cents, 2);
        let group = group_by_source(vec![
            row("A", -amount, Decimal::ZERO),
            row("B", amount, Decimal::ZERO),
        ])
        .remove(0);

        prop_assert_eq!(group.net_variation(Some(&AccountId::new("A"))), -amount);
        prop_assert_eq!(group.net_variation(Some(&AccountId::new("B"))), amount);
        prop_assert_eq!(group.net_variation(None), amount);
    }

    /// Classification never fails on arbitrary flag combinations.
    #[test]
    fn prop_classify_is_total(
        reversed in any::<bool>(),
        refund in proptest::option::of("[a-z0-9]{0,4}"),
        tip in proptest::option::of("[a-z0-9]{0,4}"),
        tx in proptest::option::of("[a-z0-9]{0,4}"),
    ) {
        let m = movement(MovementDetail::Payment(PaymentDetail {
            reversed,
            refunded_payment_id: refund.clone(),
            tip_from_payment_id: tip,
            transaction_id: tx,
            ..PaymentDetail::default()
        }));

        let result = MovementClassifier::classify(Some(&m));
        if refund.as_deref().is_some_and(|r| !r.is_empty()) {
            prop_assert_eq!(result.transaction, TransactionType::Refund);
        } else if reversed {
            prop_assert_eq!(result.transaction, TransactionType::Reverse);
        }
        if result.transaction != TransactionType::Empty {
            prop_assert_eq!(result.refunded_payment_id, refund);
        }
    }
}
