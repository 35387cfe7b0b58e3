use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of an account key (rendered as 24 hex characters).
pub const ACCOUNT_KEY_LEN: usize = 12;

/// Internal identifier of the user an entity belongs to.
///
/// Callers hand us an opaque identity string. Only the storage layer's native
/// id format is accepted: exactly 24 hexadecimal characters. Anything else is
/// treated as an invalid caller identity, never as an unknown account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountKey([u8; ACCOUNT_KEY_LEN]);

impl AccountKey {
    /// Resolves a caller-supplied identifier into an account key.
    pub fn resolve(raw_id: &str) -> Result<Self, PaymentError> {
        if raw_id.len() != ACCOUNT_KEY_LEN * 2 {
            return Err(PaymentError::Unauthorized);
        }
        let mut bytes = [0u8; ACCOUNT_KEY_LEN];
        hex::decode_to_slice(raw_id, &mut bytes).map_err(|_| PaymentError::Unauthorized)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; ACCOUNT_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_KEY_LEN] {
        &self.0
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for AccountKey {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl TryFrom<String> for AccountKey {
    type Error = PaymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::resolve(&value)
    }
}

impl From<AccountKey> for String {
    fn from(key: AccountKey) -> Self {
        key.to_string()
    }
}

/// A strictly positive monetary amount for pay and collect.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidAmount)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
