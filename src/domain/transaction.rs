use super::account::AccountKey;
use super::settlement::SettlementDecision;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Pay,
    Collect,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Declined,
}

/// An immutable ledger entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub account: AccountKey,
    /// Globally unique reference, e.g. `UPI1718000000000000000`.
    pub txn_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "from_vpa")]
    pub from_address: String,
    #[serde(rename = "to_vpa")]
    pub to_address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub note: String,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Applies a settlement decision to the record's status fields.
    pub fn settle(&mut self, decision: SettlementDecision) {
        let (status, reason) = match decision {
            SettlementDecision::Approved => (TransactionStatus::Success, None),
            SettlementDecision::Declined { reason } => (TransactionStatus::Declined, Some(reason)),
            SettlementDecision::Failed { reason } => (TransactionStatus::Failed, Some(reason)),
        };
        self.status = status;
        self.failure_reason = reason;
    }
}

/// Normalized pagination window for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Clamps caller input: `page < 1` becomes 1, a limit outside
    /// `[1, max_limit]` becomes `default_limit`.
    pub fn normalize(page: i64, limit: i64, default_limit: u64, max_limit: u64) -> Self {
        let page = if page < 1 { 1 } else { page as u64 };
        let limit = if limit < 1 || limit as u64 > max_limit {
            default_limit
        } else {
            limit as u64
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of an account's history, most recent first.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct TransactionHistory {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}
