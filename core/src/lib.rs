//! Synthetic banking batch: customer, account and transaction generation,
//! and the fact-transaction transform with per-account running balances.

pub mod account_generator;
pub mod calendar;
pub mod config;
pub mod customer_generator;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod records;
pub mod rng;
pub mod store;
pub mod transaction_generator;
pub mod transform;
pub mod transformer;
pub mod types;
