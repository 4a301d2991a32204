//! bankdata-runner: batch entry points for the synthetic banking dataset.
//!
//! Usage:
//!   bankdata-runner generate --seed 42 --customers 10000 --accounts 15000 \
//!       --days 30 --start-date 2025-01-01 --out source_data
//!   bankdata-runner transform --source source_data --out fact_data --projection enriched
//!
//! Both commands accept `--config <file.json>`; flags override the file.
//! `transform` falls back to `$BANKDATA_HOME/source_data` when no source is given.

use anyhow::{bail, Context, Result};
use bankdata_core::{
    config::{FactProjection, GeneratorConfig, TransformerConfig},
    engine::{BatchEngine, GenerationSummary},
    transform::{fact_schema, FactTransaction},
    transformer::{TransactionTransformer, TransformOutcome},
};
use chrono::NaiveDate;
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const PREVIEW_ROWS: usize = 5;

const USAGE: &str = "usage: bankdata-runner <generate|transform> [flags]";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, flags)) = args.split_first() else {
        bail!("{USAGE}");
    };

    match command.as_str() {
        "generate" => run_generate(flags),
        "transform" => run_transform(flags),
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }
}

fn run_generate(flags: &[String]) -> Result<()> {
    let mut config = match flag_value(flags, "--config") {
        Some(path) => GeneratorConfig::load(Path::new(path))
            .with_context(|| format!("loading generator config {path}"))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = parse_flag::<u64>(flags, "--seed")? {
        config.seed = seed;
    }
    if let Some(customers) = parse_flag::<usize>(flags, "--customers")? {
        config.num_customers = customers;
    }
    if let Some(accounts) = parse_flag::<usize>(flags, "--accounts")? {
        config.num_accounts = accounts;
    }
    if let Some(days) = parse_flag::<u32>(flags, "--days")? {
        config.days_of_transactions = days;
    }
    if let Some(start) = parse_flag::<NaiveDate>(flags, "--start-date")? {
        config.start_date = start;
    }
    if let Some(out) = flag_value(flags, "--out") {
        config.output_dir = PathBuf::from(out);
    }

    println!("bankdata-runner generate");
    println!("  seed:       {}", config.seed);
    println!("  customers:  {}", config.num_customers);
    println!("  accounts:   {}", config.num_accounts);
    println!("  days:       {} from {}", config.days_of_transactions, config.start_date);
    println!("  out:        {}", config.output_dir.display());
    println!();

    let engine = BatchEngine::new(config).context("preparing generator")?;
    let summary = engine.generate().context("generating batch")?;
    print_generation_summary(&summary);
    Ok(())
}

fn run_transform(flags: &[String]) -> Result<()> {
    let mut config = match flag_value(flags, "--config") {
        Some(path) => TransformerConfig::load(Path::new(path))
            .with_context(|| format!("loading transformer config {path}"))?,
        None => TransformerConfig::from_env(),
    };
    if let Some(source) = flag_value(flags, "--source") {
        config.source_dir = PathBuf::from(source);
    }
    if let Some(out) = flag_value(flags, "--out") {
        config.output_dir = PathBuf::from(out);
    }
    if let Some(projection) = parse_flag::<FactProjection>(flags, "--projection")? {
        config.projection = projection;
    }

    let transformer = TransactionTransformer::new(config).context("preparing transformer")?;
    let outcome = transformer.run_pipeline().context("transforming transactions")?;
    print_transform_summary(&outcome);
    Ok(())
}

fn print_generation_summary(summary: &GenerationSummary) {
    println!("=== GENERATION SUMMARY ===");
    println!("  customers:     {}", summary.customers);
    println!("  accounts:      {}", summary.accounts);
    match summary.last_day {
        Some(last) => println!(
            "  transactions:  {} over {} days, {} to {}",
            summary.transactions, summary.days, summary.first_day, last
        ),
        None => println!("  transactions:  none, empty date range"),
    }
    println!("  files in:      {}", summary.output_dir.display());
}

fn print_transform_summary(outcome: &TransformOutcome) {
    let report = &outcome.report;
    println!("=== TRANSFORM SUMMARY ===");
    println!("  loaded:    {}", report.loaded);
    println!("  retained:  {}", report.retained);
    println!("  dropped:   {}", report.dropped);
    println!("  accounts:  {}", report.accounts);
    println!("  output:    {}", outcome.output_path.display());

    println!();
    println!("--- FACT TRANSACTION SCHEMA ---");
    let schema = fact_schema(outcome.projection);
    for (column, kind) in schema {
        println!("  |-- {column}: {kind}");
    }

    println!();
    println!("--- FACT TRANSACTION SAMPLE ({PREVIEW_ROWS} rows) ---");
    let header: Vec<String> = schema.iter().map(|(column, _)| column.to_string()).collect();
    let rows: Vec<Vec<String>> = outcome
        .facts
        .iter()
        .take(PREVIEW_ROWS)
        .map(|fact| preview_cells(fact, schema.len()))
        .collect();
    print_table(&header, &rows);
}

/// Cell text for a fact row, truncated to the projection's column count.
fn preview_cells(fact: &FactTransaction, columns: usize) -> Vec<String> {
    let mut cells = vec![
        fact.transaction_id.clone(),
        fact.account_id.clone(),
        fact.transaction_date.to_string(),
        fact.transaction_amount.to_string(),
        fact.transaction_type.clone(),
        fact.source_channel.clone(),
        fact.signed_amount.to_string(),
        fact.cumulative_balance_change.to_string(),
    ];
    cells.truncate(columns);
    cells
}

fn print_table(header: &[String], rows: &[Vec<String>]) {
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(String::len)
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<width$}", width = *w))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let rule = format!(
        "+{}+",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("+")
    );
    println!("{rule}");
    println!("{}", line(header));
    println!("{rule}");
    for row in rows {
        println!("{}", line(row.as_slice()));
    }
    println!("{rule}");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    flag_value(args, flag)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid value '{raw}' for {flag}: {e}"))
        })
        .transpose()
}
