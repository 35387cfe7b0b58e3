use super::account::AccountKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How often a mandate may be debited.
///
/// Frequencies are accepted as supplied. A value outside the known set is kept
/// verbatim as [`MandateFrequency::Unrecognized`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MandateFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    AsPresented,
    Unrecognized(String),
}

impl MandateFrequency {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::AsPresented => "as_presented",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for MandateFrequency {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            "as_presented" => Self::AsPresented,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<&str> for MandateFrequency {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<MandateFrequency> for String {
    fn from(frequency: MandateFrequency) -> Self {
        match frequency {
            MandateFrequency::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MandateFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MandateStatus {
    Active,
    Paused,
    Revoked,
    Expired,
}

/// A standing authorization for recurring debits from `payer_address`.
///
/// Neither the amount, the frequency nor the date window is checked on
/// creation: `end_date` may precede `start_date`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Mandate {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub account: AccountKey,
    pub mandate_id: String,
    #[serde(rename = "payer_vpa")]
    pub payer_address: String,
    #[serde(rename = "payee_vpa")]
    pub payee_address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub frequency: MandateFrequency,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub purpose: String,
    pub status: MandateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
