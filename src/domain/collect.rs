use super::account::AccountKey;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CollectStatus {
    Pending,
    Approved,
    Declined,
    Expired,
}

/// A pull-payment request asking `from_address` to pay `to_address`.
///
/// Nothing in-process moves a request out of `pending`. Once `expires_at` has
/// passed the record is eligible for removal by the store's retention sweep.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CollectRequest {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub account: AccountKey,
    #[serde(rename = "from_vpa")]
    pub from_address: String,
    #[serde(rename = "to_vpa")]
    pub to_address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub note: String,
    pub status: CollectStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CollectRequest {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let request = CollectRequest {
            id: Uuid::new_v4(),
            account: AccountKey::resolve("65a1b2c3d4e5f60718293a4b").unwrap(),
            from_address: "b@digitalbank".into(),
            to_address: "a@digitalbank".into(),
            amount: dec!(50),
            note: String::new(),
            status: CollectStatus::Pending,
            expires_at: now + Duration::hours(24),
            created_at: now,
        };
        assert!(!request.is_expired(now));
        assert!(request.is_expired(now + Duration::hours(24)));
    }
}
