//! Fact-transaction transform: quality filter, sign, running balance.

use bankdata_core::{
    error::BatchError,
    transform::{
        cumulative_balance_changes, load_raw_transactions, quality_filter, signed_amount,
        transform_transactions, FactTransaction, RawTransaction,
    },
    types::Money,
};
use chrono::NaiveDate;
use std::str::FromStr;

fn money(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn raw(id: &str, account: &str, d: u32, amount: Option<&str>, kind: &str) -> RawTransaction {
    RawTransaction {
        transaction_id: id.into(),
        account_id: account.into(),
        transaction_date: day(d),
        amount: amount.map(money),
        transaction_type: kind.into(),
        source_channel: "WEB".into(),
    }
}

fn running_for(facts: &[FactTransaction], account: &str) -> Vec<String> {
    facts
        .iter()
        .filter(|f| f.account_id == account)
        .map(|f| f.cumulative_balance_change.to_string())
        .collect()
}

// ── Quality filter ─────────────────────────────────────────────────

#[test]
fn quality_filter_drops_null_zero_and_negative_amounts_only() {
    let rows = vec![
        raw("TX1", "A", 1, Some("10.00"), "DEPOSIT"),
        raw("TX2", "A", 1, None, "DEPOSIT"),
        raw("TX3", "A", 2, Some("0.00"), "PURCHASE"),
        raw("TX4", "B", 2, Some("-5.00"), "WITHDRAWAL"),
        raw("TX5", "B", 3, Some("0.01"), "TRANSFER"),
    ];
    let expected = vec![rows[0].clone(), rows[4].clone()];

    let outcome = quality_filter(rows);
    assert_eq!(outcome.dropped, 3);
    assert_eq!(outcome.retained, expected, "kept rows must be untouched and in order");
}

// ── Sign ───────────────────────────────────────────────────────────

#[test]
fn sign_is_positive_only_for_deposits_and_transfers() {
    let amount = money("42.50");
    for (kind, expected) in [
        ("DEPOSIT", "42.50"),
        ("TRANSFER", "42.50"),
        ("WITHDRAWAL", "-42.50"),
        ("PURCHASE", "-42.50"),
    ] {
        assert_eq!(signed_amount(kind, amount), money(expected), "{kind}");
    }
}

// ── Running balance ────────────────────────────────────────────────

#[test]
fn two_account_scenario() {
    let rows = vec![
        raw("TX1", "A", 1, Some("100"), "DEPOSIT"),
        raw("TX2", "B", 1, Some("20"), "PURCHASE"),
        raw("TX3", "A", 2, Some("30"), "WITHDRAWAL"),
    ];
    let out = transform_transactions(rows);

    assert_eq!(running_for(&out.facts, "A"), vec!["100.00", "70.00"]);
    assert_eq!(running_for(&out.facts, "B"), vec!["-20.00"]);
    assert_eq!(out.report.accounts, 2);
    assert_eq!(out.report.retained, 3);
}

#[test]
fn running_sum_orders_by_date_not_input_position() {
    // Account A arrives out of date order and interleaved with B and C.
    let rows = vec![
        raw("TX1", "A", 3, Some("3.00"), "DEPOSIT"),
        raw("TX2", "B", 1, Some("50.00"), "DEPOSIT"),
        raw("TX3", "A", 1, Some("1.00"), "DEPOSIT"),
        raw("TX4", "C", 2, Some("7.00"), "PURCHASE"),
        raw("TX5", "A", 2, Some("2.00"), "WITHDRAWAL"),
    ];
    let out = transform_transactions(rows);

    // Output keeps input order; values follow date order within A.
    let by_id = |id: &str| {
        out.facts
            .iter()
            .find(|f| f.transaction_id == id)
            .map(|f| f.cumulative_balance_change)
            .unwrap()
    };
    assert_eq!(by_id("TX3"), money("1.00"));
    assert_eq!(by_id("TX5"), money("-1.00"));
    assert_eq!(by_id("TX1"), money("2.00"));
    assert_eq!(by_id("TX2"), money("50.00"));
    assert_eq!(by_id("TX4"), money("-7.00"));

    let ids: Vec<&str> = out.facts.iter().map(|f| f.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["TX1", "TX2", "TX3", "TX4", "TX5"]);
}

#[test]
fn same_day_rows_accumulate_in_input_order() {
    let rows = vec![
        raw("TX9", "A", 1, Some("10.00"), "DEPOSIT"),
        raw("TX2", "A", 1, Some("4.00"), "PURCHASE"),
        raw("TX5", "A", 1, Some("1.00"), "TRANSFER"),
    ];
    let out = transform_transactions(rows);
    assert_eq!(running_for(&out.facts, "A"), vec!["10.00", "6.00", "7.00"]);
}

#[test]
fn other_accounts_do_not_change_an_accounts_running_values() {
    let alone = transform_transactions(vec![
        raw("TX1", "A", 1, Some("5.00"), "DEPOSIT"),
        raw("TX2", "A", 2, Some("8.00"), "DEPOSIT"),
        raw("TX3", "A", 3, Some("2.00"), "PURCHASE"),
    ]);
    let mixed = transform_transactions(vec![
        raw("TX7", "Z", 1, Some("900.00"), "DEPOSIT"),
        raw("TX3", "A", 3, Some("2.00"), "PURCHASE"),
        raw("TX8", "Z", 2, Some("1.00"), "PURCHASE"),
        raw("TX1", "A", 1, Some("5.00"), "DEPOSIT"),
        raw("TX2", "A", 2, Some("8.00"), "DEPOSIT"),
    ]);

    let value = |facts: &[FactTransaction], id: &str| {
        facts.iter().find(|f| f.transaction_id == id).map(|f| f.cumulative_balance_change)
    };
    for id in ["TX1", "TX2", "TX3"] {
        assert_eq!(value(&alone.facts, id), value(&mixed.facts, id), "{id}");
    }
    assert_eq!(value(&alone.facts, "TX3"), Some(money("11.00")));
}

#[test]
fn dropped_rows_do_not_contribute_to_running_sum() {
    let out = transform_transactions(vec![
        raw("TX1", "A", 1, Some("10.00"), "DEPOSIT"),
        raw("TX2", "A", 2, None, "DEPOSIT"),
        raw("TX3", "A", 3, Some("-99.00"), "DEPOSIT"),
        raw("TX4", "A", 4, Some("3.00"), "WITHDRAWAL"),
    ]);
    assert_eq!(out.report.loaded, 4);
    assert_eq!(out.report.dropped, 2);
    assert_eq!(running_for(&out.facts, "A"), vec!["10.00", "7.00"]);
}

#[test]
fn empty_input_gives_empty_output() {
    let out = transform_transactions(Vec::new());
    assert!(out.facts.is_empty());
    assert!(cumulative_balance_changes(&out.facts).is_empty());
    assert_eq!(out.report.accounts, 0);
}

// ── Load ───────────────────────────────────────────────────────────

#[test]
fn loader_casts_amounts_and_finds_columns_by_name() {
    let csv = "\
type,amount,transaction_date,account_id,transaction_id,source_channel
DEPOSIT,100.005,2025-01-01,ACC000001,TX000000001,WEB
PURCHASE,,2025-01-02,ACC000001,TX000000002,ATM
WITHDRAWAL,abc,2025-01-02,ACC000002,TX000000003,BRANCH
";
    let rows = load_raw_transactions(csv.as_bytes(), "inline").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].amount, Some(money("100.01")));
    assert_eq!(rows[0].transaction_date, day(1));
    assert_eq!(rows[0].source_channel, "WEB");
    assert_eq!(rows[1].amount, None);
    assert_eq!(rows[2].amount, None);
}

#[test]
fn loader_rejects_missing_columns() {
    let csv = "transaction_id,account_id,transaction_date,amount,type\n\
               TX1,A,2025-01-01,1.00,DEPOSIT\n";
    let err = load_raw_transactions(csv.as_bytes(), "inline").unwrap_err();
    match err {
        BatchError::MissingColumn { column, .. } => assert_eq!(column, "source_channel"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn loader_fails_on_unparsable_date() {
    let csv = "\
transaction_id,account_id,transaction_date,amount,type,source_channel
TX1,A,2025-01-01,1.00,DEPOSIT,WEB
TX2,A,01/02/2025,1.00,DEPOSIT,WEB
";
    let err = load_raw_transactions(csv.as_bytes(), "inline").unwrap_err();
    match err {
        BatchError::InvalidDate { record, value, .. } => {
            assert_eq!(record, 2);
            assert_eq!(value, "01/02/2025");
        }
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}

#[test]
fn loader_fails_on_ragged_record() {
    let csv = "\
transaction_id,account_id,transaction_date,amount,type,source_channel
TX1,A,2025-01-01,1.00,DEPOSIT
";
    let err = load_raw_transactions(csv.as_bytes(), "inline").unwrap_err();
    assert!(matches!(err, BatchError::Csv(_)), "got {err:?}");
}
