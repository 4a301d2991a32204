use crate::{
    calendar::DateRange,
    error::{BatchError, BatchResult},
    records::{Account, Channel, Transaction, TransactionType},
    rng::StreamRng,
    types::{money_from_f64, IdSequence},
};
use chrono::NaiveDate;
use rand_distr::Normal;

pub const AMOUNT_MEAN: f64 = 150.0;
pub const AMOUNT_STD_DEV: f64 = 100.0;
pub const AMOUNT_FLOOR: f64 = 1.0;

/// Daily volume is `accounts * k` with `k` uniform in `[1, MAX_DAILY_MULTIPLIER)`.
pub const MAX_DAILY_MULTIPLIER: u64 = 4;

pub struct TransactionGenerator {
    range: DateRange,
    amount: Normal<f64>,
}

impl TransactionGenerator {
    pub fn new(range: DateRange) -> BatchResult<Self> {
        let amount = Normal::new(AMOUNT_MEAN, AMOUNT_STD_DEV)
            .map_err(|e| BatchError::invalid_config(format!("amount distribution: {e}")))?;
        Ok(Self { range, amount })
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Generate one day's batch. `ids` carries the transaction counter
    /// across days, so ids keep increasing over the whole run.
    pub fn generate_day(
        &self,
        day: NaiveDate,
        accounts: &[Account],
        rng: &mut StreamRng,
        ids: &mut IdSequence,
    ) -> Vec<Transaction> {
        if accounts.is_empty() {
            return Vec::new();
        }

        let multiplier = 1 + rng.next_u64_below(MAX_DAILY_MULTIPLIER - 1) as usize;
        let daily_count = accounts.len() * multiplier;

        let mut batch = Vec::with_capacity(daily_count);
        for _ in 0..daily_count {
            let Some(account) = rng.pick(accounts) else {
                break;
            };
            let amount = rng.normal(&self.amount).max(AMOUNT_FLOOR);
            batch.push(Transaction {
                transaction_id: ids.next_id(),
                account_id: account.account_id.clone(),
                transaction_date: day,
                amount: money_from_f64(amount),
                transaction_type: rng.pick_weighted(&TransactionType::WEIGHTS),
                source_channel: rng.pick_weighted(&Channel::WEIGHTS),
            });
        }

        log::debug!("day={day} txn: {} transactions", batch.len());
        batch
    }

    /// Every day of the range concatenated in date order.
    pub fn generate(
        &self,
        accounts: &[Account],
        rng: &mut StreamRng,
        ids: &mut IdSequence,
    ) -> Vec<Transaction> {
        self.range
            .iter()
            .flat_map(|day| self.generate_day(day, accounts, rng, ids))
            .collect()
    }
}
