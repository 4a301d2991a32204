//! Transformer stage: raw transaction table in, fact table out.

use crate::{
    config::{FactProjection, TransformerConfig},
    error::BatchResult,
    store::{CsvStore, TRANSACTION_FILE},
    transform::{self, FactTransaction, RawTransaction, TransformReport, Transformed},
};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub facts: Vec<FactTransaction>,
    pub report: TransformReport,
    pub projection: FactProjection,
    pub output_path: PathBuf,
}

pub struct TransactionTransformer {
    config: TransformerConfig,
    source: CsvStore,
}

impl TransactionTransformer {
    pub fn new(config: TransformerConfig) -> BatchResult<Self> {
        config.validate()?;
        log::info!("transformer: initialized in {} mode", config.env);
        Ok(Self {
            source: CsvStore::open(&config.source_dir),
            config,
        })
    }

    /// Read and type the raw transaction table. Any read or parse failure
    /// aborts the batch.
    pub fn load_raw_transactions(&self) -> BatchResult<Vec<RawTransaction>> {
        let file = self.source.open_transactions()?;
        let source_name = self.source.path_of(TRANSACTION_FILE).display().to_string();
        transform::load_raw_transactions(file, &source_name)
    }

    /// Load, transform and write the fact table.
    pub fn run_pipeline(&self) -> BatchResult<TransformOutcome> {
        let raw = self.load_raw_transactions()?;
        let Transformed { facts, report } = transform::transform_transactions(raw);

        let sink = CsvStore::create(&self.config.output_dir)?;
        let output_path = sink.write_facts(&facts, self.config.projection)?;
        log::info!(
            "transformer: wrote {} fact rows for {} accounts to {}",
            report.retained,
            report.accounts,
            output_path.display()
        );

        Ok(TransformOutcome {
            facts,
            report,
            projection: self.config.projection,
            output_path,
        })
    }
}
