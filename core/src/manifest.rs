//! Batch manifest: a JSON record written next to the generated files.
//!
//! It captures the seed and config that produced the batch plus the row
//! count of every table, so a batch can be regenerated byte for byte.

use crate::{config::GeneratorConfig, store};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchManifest {
    pub generator_version: String,
    pub seed: u64,
    pub config: GeneratorConfig,
    pub tables: Vec<TableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableEntry {
    pub file: String,
    pub rows: usize,
}

impl TableEntry {
    fn new(file: &str, rows: usize) -> Self {
        Self {
            file: file.to_string(),
            rows,
        }
    }
}

impl BatchManifest {
    pub fn new(
        config: &GeneratorConfig,
        customers: usize,
        accounts: usize,
        transactions: usize,
    ) -> Self {
        Self {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            seed: config.seed,
            config: config.clone(),
            tables: vec![
                TableEntry::new(store::CUSTOMER_FILE, customers),
                TableEntry::new(store::ACCOUNT_FILE, accounts),
                TableEntry::new(store::TRANSACTION_FILE, transactions),
            ],
        }
    }

    /// Row count recorded for `file`, if the manifest lists it.
    pub fn rows_for(&self, file: &str) -> Option<usize> {
        self.tables.iter().find(|t| t.file == file).map(|t| t.rows)
    }
}
