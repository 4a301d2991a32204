use crate::{
    error::{BatchError, BatchResult},
    records::{Account, AccountType, Customer},
    rng::StreamRng,
    types::{money_from_f64, IdSequence},
};
use rand_distr::Normal;

pub const BALANCE_MEAN: f64 = 10_000.0;
pub const BALANCE_STD_DEV: f64 = 8_000.0;
/// Draws below this are clipped up to it, never rejected.
pub const BALANCE_FLOOR: f64 = 100.0;

pub struct AccountGenerator {
    total_accounts: usize,
    balance: Normal<f64>,
}

impl AccountGenerator {
    pub fn new(total_accounts: usize) -> BatchResult<Self> {
        let balance = Normal::new(BALANCE_MEAN, BALANCE_STD_DEV)
            .map_err(|e| BatchError::invalid_config(format!("balance distribution: {e}")))?;
        Ok(Self {
            total_accounts,
            balance,
        })
    }

    /// One account per customer in customer order, then extra accounts
    /// owned by customers drawn uniformly with replacement until the
    /// target total is reached.
    pub fn generate(
        &self,
        customers: &[Customer],
        rng: &mut StreamRng,
        ids: &mut IdSequence,
    ) -> BatchResult<Vec<Account>> {
        let extra = self.total_accounts.saturating_sub(customers.len());
        if customers.is_empty() && extra > 0 {
            return Err(BatchError::invalid_config(
                "cannot assign extra accounts without customers",
            ));
        }

        let mut owners: Vec<&str> = Vec::with_capacity(customers.len() + extra);
        owners.extend(customers.iter().map(|c| c.customer_id.as_str()));
        for _ in 0..extra {
            if let Some(customer) = rng.pick(customers) {
                owners.push(&customer.customer_id);
            }
        }

        // Categorical and balance draws happen after ownership, one column at a time.
        let types: Vec<AccountType> = owners
            .iter()
            .map(|_| rng.pick_weighted(&AccountType::WEIGHTS))
            .collect();

        let accounts: Vec<Account> = owners
            .into_iter()
            .zip(types)
            .map(|(customer_id, account_type)| Account {
                account_id: ids.next_id(),
                customer_id: customer_id.to_string(),
                account_type,
                current_balance: money_from_f64(rng.normal(&self.balance).max(BALANCE_FLOOR)),
            })
            .collect();

        log::info!(
            "account: generated {} accounts ({} beyond one per customer)",
            accounts.len(),
            extra
        );
        Ok(accounts)
    }
}
