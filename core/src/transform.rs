//! Fact-transaction transform.
//!
//! load -> quality filter -> sign -> running balance per account -> project
//!
//! Every step here is a pure function over rows. `transformer.rs` wires
//! them to the store.

use crate::{
    config::FactProjection,
    error::{BatchError, BatchResult},
    records::TransactionType,
    types::{fits_money_precision, round_money, AccountId, Money, TransactionId},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A transaction row as loaded, before any quality rule is applied.
/// `amount` is `None` when the field was empty, not a number, or does
/// not fit decimal(18,2).
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub transaction_date: NaiveDate,
    pub amount: Option<Money>,
    pub transaction_type: String,
    pub source_channel: String,
}

impl RawTransaction {
    /// The amount, if it passes the quality rule (present and positive).
    pub fn qualified_amount(&self) -> Option<Money> {
        self.amount.filter(|amount| *amount > Money::ZERO)
    }
}

// ── Load ───────────────────────────────────────────────────────────

struct ColumnIndex {
    transaction_id: usize,
    account_id: usize,
    transaction_date: usize,
    amount: usize,
    transaction_type: usize,
    source_channel: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, source_name: &str) -> BatchResult<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| BatchError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: column.to_string(),
                })
        };
        Ok(Self {
            transaction_id: find("transaction_id")?,
            account_id: find("account_id")?,
            transaction_date: find("transaction_date")?,
            amount: find("amount")?,
            transaction_type: find("type")?,
            source_channel: find("source_channel")?,
        })
    }
}

/// Read a raw transaction table. Columns are located by header name.
///
/// A malformed record, a missing column or an unparsable date fails the
/// whole load. A bad amount does not: it becomes `None` and is left for
/// the quality filter.
pub fn load_raw_transactions<R: io::Read>(
    source: R,
    source_name: &str,
) -> BatchResult<Vec<RawTransaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    let columns = ColumnIndex::resolve(reader.headers()?, source_name)?;

    let mut rows = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or_default();

        let raw_date = field(columns.transaction_date);
        let transaction_date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|cause| {
            BatchError::InvalidDate {
                source_name: source_name.to_string(),
                record: n as u64 + 1,
                value: raw_date.to_string(),
                cause,
            }
        })?;

        rows.push(RawTransaction {
            transaction_id: field(columns.transaction_id).to_string(),
            account_id: field(columns.account_id).to_string(),
            transaction_date,
            amount: parse_amount(field(columns.amount)),
            transaction_type: field(columns.transaction_type).to_string(),
            source_channel: field(columns.source_channel).to_string(),
        });
    }

    log::info!("transform: loaded {} raw transactions from {source_name}", rows.len());
    Ok(rows)
}

/// Cast a raw amount field to decimal(18,2), rounding half up.
/// Anything that is not a number, or overflows the precision, is `None`.
pub fn parse_amount(raw: &str) -> Option<Money> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    let amount = round_money(parsed);
    fits_money_precision(amount).then_some(amount)
}

// ── Quality filter ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct QualityOutcome {
    pub retained: Vec<RawTransaction>,
    pub dropped: usize,
}

/// Drop rows whose amount is null or not positive. Retained rows are
/// passed through untouched and in their original order.
pub fn quality_filter(rows: Vec<RawTransaction>) -> QualityOutcome {
    let before = rows.len();
    let retained: Vec<RawTransaction> = rows
        .into_iter()
        .filter(|row| row.qualified_amount().is_some())
        .collect();
    let dropped = before - retained.len();
    if dropped > 0 {
        log::warn!("transform: dropped {dropped} transactions with null or non-positive amount");
    }
    QualityOutcome { retained, dropped }
}

// ── Sign ───────────────────────────────────────────────────────────

/// Deposits and transfers keep their sign; every other type, including
/// unrecognised ones, is negated.
pub fn signed_amount(transaction_type: &str, amount: Money) -> Money {
    match TransactionType::parse(transaction_type) {
        Some(kind) if kind.is_credit() => amount,
        _ => -amount,
    }
}

// ── Fact rows ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactTransaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub transaction_date: NaiveDate,
    pub transaction_amount: Money,
    pub transaction_type: String,
    pub source_channel: String,
    pub signed_amount: Money,
    pub cumulative_balance_change: Money,
}

impl FactTransaction {
    /// Build a fact row with its signed amount. The running balance is
    /// filled in later by [`apply_running_balance`]. `None` if the row
    /// does not pass the quality rule.
    pub fn from_raw(raw: RawTransaction) -> Option<Self> {
        let amount = round_money(raw.qualified_amount()?);
        Some(Self {
            signed_amount: signed_amount(&raw.transaction_type, amount),
            cumulative_balance_change: Money::ZERO,
            transaction_id: raw.transaction_id,
            account_id: raw.account_id,
            transaction_date: raw.transaction_date,
            transaction_amount: amount,
            transaction_type: raw.transaction_type,
            source_channel: raw.source_channel,
        })
    }
}

/// The six staging columns, borrowed from a fact row.
#[derive(Debug, Serialize)]
pub struct StagingFact<'a> {
    pub transaction_id: &'a str,
    pub account_id: &'a str,
    pub transaction_date: NaiveDate,
    pub transaction_amount: Money,
    pub transaction_type: &'a str,
    pub source_channel: &'a str,
}

impl<'a> From<&'a FactTransaction> for StagingFact<'a> {
    fn from(fact: &'a FactTransaction) -> Self {
        Self {
            transaction_id: &fact.transaction_id,
            account_id: &fact.account_id,
            transaction_date: fact.transaction_date,
            transaction_amount: fact.transaction_amount,
            transaction_type: &fact.transaction_type,
            source_channel: &fact.source_channel,
        }
    }
}

const STAGING_SCHEMA: [(&str, &str); 6] = [
    ("transaction_id", "string"),
    ("account_id", "string"),
    ("transaction_date", "date"),
    ("transaction_amount", "decimal(18,2)"),
    ("transaction_type", "string"),
    ("source_channel", "string"),
];

const ENRICHED_SCHEMA: [(&str, &str); 8] = [
    ("transaction_id", "string"),
    ("account_id", "string"),
    ("transaction_date", "date"),
    ("transaction_amount", "decimal(18,2)"),
    ("transaction_type", "string"),
    ("source_channel", "string"),
    ("signed_amount", "decimal(18,2)"),
    ("cumulative_balance_change", "decimal(28,2)"),
];

/// `(column, type)` pairs of the fact table, in output order.
pub fn fact_schema(projection: FactProjection) -> &'static [(&'static str, &'static str)] {
    match projection {
        FactProjection::Staging => &STAGING_SCHEMA,
        FactProjection::Enriched => &ENRICHED_SCHEMA,
    }
}

// ── Running balance ────────────────────────────────────────────────

/// Inclusive running sum of `signed_amount` within each account, ordered
/// by `transaction_date`. Rows sharing an account and a date are summed in
/// their input order. The result is indexed like `facts`.
pub fn cumulative_balance_changes(facts: &[FactTransaction]) -> Vec<Money> {
    let mut partitions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (position, fact) in facts.iter().enumerate() {
        partitions
            .entry(fact.account_id.as_str())
            .or_default()
            .push(position);
    }

    let mut running = vec![Money::ZERO; facts.len()];
    for positions in partitions.values_mut() {
        // Stable sort: positions are pushed in input order.
        positions.sort_by_key(|&p| facts[p].transaction_date);
        let mut total = Money::ZERO;
        for &p in positions.iter() {
            total += facts[p].signed_amount;
            running[p] = total;
        }
    }
    running
}

pub fn apply_running_balance(facts: &mut [FactTransaction]) {
    let running = cumulative_balance_changes(facts);
    for (fact, total) in facts.iter_mut().zip(running) {
        fact.cumulative_balance_change = total;
    }
}

// ── Whole transform ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub loaded: usize,
    pub retained: usize,
    pub dropped: usize,
    pub accounts: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub facts: Vec<FactTransaction>,
    pub report: TransformReport,
}

/// Filter, sign and accumulate. Fact rows keep the input order.
pub fn transform_transactions(rows: Vec<RawTransaction>) -> Transformed {
    let loaded = rows.len();
    let QualityOutcome { retained, dropped } = quality_filter(rows);
    log::info!(
        "transform: passed data quality, {} records remaining after null/zero check",
        retained.len()
    );

    let mut facts: Vec<FactTransaction> = retained
        .into_iter()
        .filter_map(FactTransaction::from_raw)
        .collect();
    apply_running_balance(&mut facts);

    let accounts = facts
        .iter()
        .map(|f| f.account_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let report = TransformReport {
        loaded,
        retained: facts.len(),
        dropped,
        accounts,
    };
    Transformed { facts, report }
}
