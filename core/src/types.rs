//! Shared primitive types used across the entire batch.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// `CUSTNNNNN`
pub type CustomerId = String;

/// `ACCNNNNNN`
pub type AccountId = String;

/// `TXNNNNNNNNN`
pub type TransactionId = String;

/// Every money value in the batch. Values leaving a generator or the
/// transaction loader always carry exactly [`MONEY_SCALE`] decimal places.
pub type Money = Decimal;

/// Digits after the decimal point for all money columns.
pub const MONEY_SCALE: u32 = 2;

/// Total significant digits allowed in a money column, decimal(18,2).
pub const MONEY_PRECISION: u32 = 18;

/// Round half away from zero to cents and pin the scale so that
/// `100` renders as `100.00`.
pub fn round_money(value: Decimal) -> Money {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Convert a sampled float into money. Non-finite input maps to zero.
pub fn money_from_f64(value: f64) -> Money {
    round_money(Decimal::from_f64(value).unwrap_or_default())
}

/// True when `value` fits decimal(18,2), i.e. at most 16 integer digits.
pub fn fits_money_precision(value: Money) -> bool {
    let integer_limit = Decimal::from(10_i64.pow(MONEY_PRECISION - MONEY_SCALE));
    value.abs() < integer_limit
}

/// Mints zero-padded, strictly increasing identifiers.
///
/// A sequence is passed by `&mut` into every routine that needs ids, so a
/// counter spanning several generation steps (e.g. transaction ids across
/// all simulated days) is an explicit value rather than hidden state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    prefix: &'static str,
    width: usize,
    start: u64,
    next: u64,
}

impl IdSequence {
    pub fn new(prefix: &'static str, width: usize, start: u64) -> Self {
        Self {
            prefix,
            width,
            start,
            next: start,
        }
    }

    pub fn customers() -> Self {
        Self::new("CUST", 5, 1)
    }

    pub fn accounts() -> Self {
        Self::new("ACC", 6, 1)
    }

    pub fn transactions() -> Self {
        Self::new("TX", 9, 1)
    }

    /// Issue the next id and advance the counter.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}{:0width$}", self.prefix, self.next, width = self.width);
        self.next += 1;
        id
    }

    /// How many ids this sequence has handed out.
    pub fn issued(&self) -> u64 {
        self.next - self.start
    }
}
