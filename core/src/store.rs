//! CSV persistence layer.
//!
//! RULE: Only store.rs touches the filesystem.
//! Generators and the transformer hand rows to store methods;
//! they never open files directly.

use crate::{
    config::FactProjection,
    error::{BatchError, BatchResult},
    manifest::BatchManifest,
    transform::{fact_schema, FactTransaction, StagingFact},
};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CUSTOMER_FILE: &str = "customer_master.csv";
pub const ACCOUNT_FILE: &str = "account_balances.csv";
pub const TRANSACTION_FILE: &str = "transaction_data.csv";
pub const FACT_FILE: &str = "fact_transaction.csv";
pub const MANIFEST_FILE: &str = "batch_manifest.json";

pub const CUSTOMER_COLUMNS: [&str; 5] =
    ["customer_id", "gender", "region", "joining_date", "is_premium"];
pub const ACCOUNT_COLUMNS: [&str; 4] =
    ["account_id", "customer_id", "account_type", "current_balance"];
pub const TRANSACTION_COLUMNS: [&str; 6] = [
    "transaction_id",
    "account_id",
    "transaction_date",
    "amount",
    "type",
    "source_channel",
];

/// A directory holding one batch's flat files.
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    /// Point at an existing directory. Nothing is touched until a read or write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Point at a directory, creating it (and parents) if needed.
    pub fn create(root: impl Into<PathBuf>) -> BatchResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    // ── Writers ────────────────────────────────────────────────

    /// Start a table. The header row is written immediately so an empty
    /// table is still a valid file.
    pub fn table_writer<'h>(
        &self,
        file: &str,
        columns: impl IntoIterator<Item = &'h str>,
    ) -> BatchResult<TableWriter> {
        let path = self.path_of(file);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(columns)?;
        Ok(TableWriter {
            writer,
            path,
            rows: 0,
        })
    }

    /// Write a whole table in one call. Returns the data row count.
    pub fn write_table<'h, T: Serialize>(
        &self,
        file: &str,
        columns: impl IntoIterator<Item = &'h str>,
        rows: &[T],
    ) -> BatchResult<usize> {
        let mut writer = self.table_writer(file, columns)?;
        writer.append(rows)?;
        writer.finish()
    }

    pub fn write_facts(
        &self,
        facts: &[FactTransaction],
        projection: FactProjection,
    ) -> BatchResult<PathBuf> {
        let columns = fact_schema(projection).iter().map(|(name, _)| *name);
        let mut writer = self.table_writer(FACT_FILE, columns)?;
        match projection {
            FactProjection::Enriched => writer.append(facts)?,
            FactProjection::Staging => {
                let staged: Vec<StagingFact<'_>> = facts.iter().map(StagingFact::from).collect();
                writer.append(&staged)?
            }
        }
        let path = writer.path().to_path_buf();
        writer.finish()?;
        Ok(path)
    }

    pub fn write_manifest(&self, manifest: &BatchManifest) -> BatchResult<PathBuf> {
        let path = self.path_of(MANIFEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
        Ok(path)
    }

    // ── Readers ────────────────────────────────────────────────

    /// Open the raw transaction table for loading.
    pub fn open_transactions(&self) -> BatchResult<File> {
        let path = self.path_of(TRANSACTION_FILE);
        File::open(&path).map_err(|cause| BatchError::SourceUnreadable { path, cause })
    }

    pub fn read_manifest(&self) -> BatchResult<BatchManifest> {
        let content = fs::read_to_string(self.path_of(MANIFEST_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Streaming writer for one table; rows can be appended in batches.
pub struct TableWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl TableWriter {
    pub fn append<T: Serialize>(&mut self, rows: &[T]) -> BatchResult<()> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.rows += rows.len();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush to disk and return the number of data rows written.
    pub fn finish(mut self) -> BatchResult<usize> {
        self.writer.flush()?;
        Ok(self.rows)
    }
}
