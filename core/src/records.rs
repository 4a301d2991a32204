//! Generated table rows and their categorical columns.
//!
//! Each categorical carries its sampling weights next to its variants so a
//! generator never has to keep a separate table in sync.

use crate::types::{AccountId, CustomerId, Money, TransactionId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    O,
}

impl Gender {
    pub const WEIGHTS: [(Self, f64); 3] = [(Self::M, 0.45), (Self::F, 0.50), (Self::O, 0.05)];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub const WEIGHTS: [(Self, f64); 4] = [
        (Self::North, 0.3),
        (Self::South, 0.3),
        (Self::East, 0.2),
        (Self::West, 0.2),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Checking,
    Loan,
}

impl AccountType {
    pub const WEIGHTS: [(Self, f64); 3] = [
        (Self::Savings, 0.6),
        (Self::Checking, 0.3),
        (Self::Loan, 0.1),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Purchase,
}

impl TransactionType {
    pub const WEIGHTS: [(Self, f64); 4] = [
        (Self::Deposit, 0.25),
        (Self::Withdrawal, 0.35),
        (Self::Transfer, 0.20),
        (Self::Purchase, 0.20),
    ];

    /// CSV spelling of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Transfer => "TRANSFER",
            Self::Purchase => "PURCHASE",
        }
    }

    /// Parse the CSV spelling. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DEPOSIT" => Some(Self::Deposit),
            "WITHDRAWAL" => Some(Self::Withdrawal),
            "TRANSFER" => Some(Self::Transfer),
            "PURCHASE" => Some(Self::Purchase),
            _ => None,
        }
    }

    /// Deposits and transfers add to the balance; everything else draws it down.
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Deposit | Self::Transfer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Web,
    Mobile,
    Atm,
    Branch,
}

impl Channel {
    pub const WEIGHTS: [(Self, f64); 4] = [
        (Self::Web, 0.4),
        (Self::Mobile, 0.3),
        (Self::Atm, 0.2),
        (Self::Branch, 0.1),
    ];
}

/// One row of `customer_master.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub gender: Gender,
    pub region: Region,
    pub joining_date: NaiveDate,
    pub is_premium: bool,
}

/// One row of `account_balances.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub customer_id: CustomerId,
    pub account_type: AccountType,
    pub current_balance: Money,
}

/// One row of `transaction_data.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub transaction_date: NaiveDate,
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub source_channel: Channel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum<T>(table: &[(T, f64)]) -> f64 {
        table.iter().map(|(_, w)| w).sum()
    }

    #[test]
    fn every_weight_table_sums_to_one() {
        for (name, sum) in [
            ("gender", weight_sum(&Gender::WEIGHTS)),
            ("region", weight_sum(&Region::WEIGHTS)),
            ("account_type", weight_sum(&AccountType::WEIGHTS)),
            ("transaction_type", weight_sum(&TransactionType::WEIGHTS)),
            ("channel", weight_sum(&Channel::WEIGHTS)),
        ] {
            assert!((sum - 1.0).abs() < 1e-9, "{name} weights sum to {sum}");
        }
    }

    #[test]
    fn transaction_type_spelling_round_trips() {
        for (kind, _) in TransactionType::WEIGHTS {
            assert_eq!(TransactionType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionType::parse("deposit"), None);
    }

    #[test]
    fn only_deposits_and_transfers_are_credits() {
        assert!(TransactionType::Deposit.is_credit());
        assert!(TransactionType::Transfer.is_credit());
        assert!(!TransactionType::Withdrawal.is_credit());
        assert!(!TransactionType::Purchase.is_credit());
    }
}
