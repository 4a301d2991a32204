//! The batch engine: runs the generation stage end to end.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Customers     -> customer_master.csv
//!   2. Accounts      -> account_balances.csv
//!   3. Transactions  -> transaction_data.csv, streamed one day at a time
//!   4. Manifest      -> batch_manifest.json
//!
//! RULES:
//!   - Each table draws from its own RNG stream in the RngBank.
//!   - Id sequences are owned here and passed down by `&mut`.
//!   - All file access goes through the CsvStore.

use crate::{
    account_generator::AccountGenerator,
    config::GeneratorConfig,
    customer_generator::CustomerGenerator,
    error::BatchResult,
    manifest::BatchManifest,
    rng::{RngBank, StreamSlot},
    store::{
        CsvStore, ACCOUNT_COLUMNS, ACCOUNT_FILE, CUSTOMER_COLUMNS, CUSTOMER_FILE,
        TRANSACTION_COLUMNS, TRANSACTION_FILE,
    },
    transaction_generator::TransactionGenerator,
    types::IdSequence,
};
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub customers: usize,
    pub accounts: usize,
    pub transactions: usize,
    pub days: u32,
    pub first_day: NaiveDate,
    /// `None` for a zero-day range.
    pub last_day: Option<NaiveDate>,
    pub output_dir: PathBuf,
}

pub struct BatchEngine {
    config: GeneratorConfig,
    rng_bank: RngBank,
    store: CsvStore,
}

impl BatchEngine {
    /// Validate the config and prepare the output directory.
    pub fn new(config: GeneratorConfig) -> BatchResult<Self> {
        config.validate()?;
        let store = CsvStore::create(&config.output_dir)?;
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            config,
            store,
        })
    }

    /// Generate and write all three tables plus the manifest.
    pub fn generate(&self) -> BatchResult<GenerationSummary> {
        log::info!(
            "generate: seed={} customers={} accounts={} days={} out={}",
            self.rng_bank.master_seed(),
            self.config.num_customers,
            self.config.num_accounts,
            self.config.days_of_transactions,
            self.store.root().display()
        );

        // 1. Customers
        let mut customer_rng = self.rng_bank.for_stream(StreamSlot::Customer);
        let mut customer_ids = IdSequence::customers();
        let customers = CustomerGenerator::new(self.config.num_customers)
            .generate(&mut customer_rng, &mut customer_ids);
        self.store
            .write_table(CUSTOMER_FILE, CUSTOMER_COLUMNS, &customers)?;

        // 2. Accounts
        let mut account_rng = self.rng_bank.for_stream(StreamSlot::Account);
        let mut account_ids = IdSequence::accounts();
        let accounts = AccountGenerator::new(self.config.num_accounts)?
            .generate(&customers, &mut account_rng, &mut account_ids)?;
        self.store
            .write_table(ACCOUNT_FILE, ACCOUNT_COLUMNS, &accounts)?;

        // 3. Transactions, one day at a time so the full table never sits in memory.
        let mut txn_rng = self.rng_bank.for_stream(StreamSlot::Transaction);
        let mut txn_ids = IdSequence::transactions();
        let range = self.config.transaction_range();
        let txn_gen = TransactionGenerator::new(range)?;
        let mut writer = self
            .store
            .table_writer(TRANSACTION_FILE, TRANSACTION_COLUMNS)?;
        for day in txn_gen.range().iter() {
            let batch = txn_gen.generate_day(day, &accounts, &mut txn_rng, &mut txn_ids);
            writer.append(&batch)?;
        }
        let transactions = writer.finish()?;
        log::info!(
            "transaction: generated {transactions} transactions over {} days",
            self.config.days_of_transactions
        );

        // 4. Manifest
        let manifest =
            BatchManifest::new(&self.config, customers.len(), accounts.len(), transactions);
        self.store.write_manifest(&manifest)?;

        Ok(GenerationSummary {
            customers: customers.len(),
            accounts: accounts.len(),
            transactions,
            days: self.config.days_of_transactions,
            first_day: range.start,
            last_day: range.last_day(),
            output_dir: self.store.root().to_path_buf(),
        })
    }
}
