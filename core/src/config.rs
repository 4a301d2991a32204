use crate::{
    calendar::{default_transaction_start, DateRange},
    error::{BatchError, BatchResult},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the batch home; source data lives in
/// `$BANKDATA_HOME/source_data`.
pub const HOME_ENV: &str = "BANKDATA_HOME";

pub const SOURCE_DATA_DIR: &str = "source_data";
pub const FACT_DATA_DIR: &str = "fact_data";

// ── Generator ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub num_customers: usize,
    pub num_accounts: usize,
    pub days_of_transactions: u32,
    pub start_date: NaiveDate,
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_customers: 10_000,
            num_accounts: 15_000,
            days_of_transactions: 30,
            start_date: default_transaction_start(),
            output_dir: PathBuf::from(SOURCE_DATA_DIR),
        }
    }
}

impl GeneratorConfig {
    /// Load a generator config from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> BatchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Small population used by tests: 50 customers, 75 accounts, 5 days.
    pub fn default_test() -> Self {
        Self {
            seed: 7,
            num_customers: 50,
            num_accounts: 75,
            days_of_transactions: 5,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> BatchResult<()> {
        if self.num_customers == 0 {
            return Err(BatchError::invalid_config(
                "num_customers must be at least 1",
            ));
        }
        Ok(())
    }

    /// Accounts generated beyond the one-per-customer baseline.
    /// A target at or below the customer count means none.
    pub fn extra_accounts(&self) -> usize {
        self.num_accounts.saturating_sub(self.num_customers)
    }

    pub fn transaction_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.days_of_transactions)
    }
}

// ── Transformer ────────────────────────────────────────────────────

/// Which columns the fact table carries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FactProjection {
    /// The six staging columns only.
    Staging,
    /// Staging columns plus `signed_amount` and `cumulative_balance_change`.
    #[default]
    Enriched,
}

impl FromStr for FactProjection {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(Self::Staging),
            "enriched" => Ok(Self::Enriched),
            other => Err(BatchError::invalid_config(format!(
                "unknown projection '{other}', expected 'staging' or 'enriched'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransformerConfig {
    pub env: String,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub projection: FactProjection,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            env: "local".into(),
            source_dir: PathBuf::from(SOURCE_DATA_DIR),
            output_dir: PathBuf::from(FACT_DATA_DIR),
            projection: FactProjection::default(),
        }
    }
}

impl TransformerConfig {
    /// Resolve directories from `BANKDATA_HOME` when it is set.
    pub fn from_env() -> Self {
        match std::env::var_os(HOME_ENV) {
            Some(home) => Self::with_home(Path::new(&home)),
            None => Self::default(),
        }
    }

    /// Source and output directories under a batch home.
    pub fn with_home(home: &Path) -> Self {
        Self {
            source_dir: home.join(SOURCE_DATA_DIR),
            output_dir: home.join(FACT_DATA_DIR),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> BatchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BatchResult<()> {
        if self.source_dir == self.output_dir {
            return Err(BatchError::invalid_config(
                "output_dir must differ from source_dir",
            ));
        }
        Ok(())
    }
}
