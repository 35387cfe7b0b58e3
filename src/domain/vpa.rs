use super::account::AccountKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A virtual payment address (`name@bank`) linked to an underlying account.
///
/// Addresses are immutable once created. A VPA is never deleted, only
/// deactivated; uniqueness of `address` is enforced among active records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpa {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub account: AccountKey,
    pub address: String,
    /// Reference to the bank account this address pays out of / into.
    #[serde(rename = "account_id")]
    pub linked_account: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vpa {
    /// Builds a new active VPA for `prefix`.
    ///
    /// Every new VPA is flagged as default, even when the account already has
    /// one. Several default-flagged records per account are therefore normal;
    /// see [`select_acting`] for how the acting address is chosen.
    pub fn new(
        account: AccountKey,
        prefix: &str,
        bank_suffix: &str,
        linked_account: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account,
            address: format_address(prefix, bank_suffix),
            linked_account,
            is_default: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lower-cases the prefix and appends the bank handle.
pub fn format_address(prefix: &str, bank_suffix: &str) -> String {
    format!("{}@{}", prefix.to_lowercase(), bank_suffix)
}

/// Picks the address an account acts from.
///
/// The first default-flagged VPA wins; with none flagged, the first VPA in the
/// set's natural (creation) order. `None` when the account has no VPA.
pub fn select_acting(vpas: &[Vpa]) -> Option<&Vpa> {
    vpas.iter().find(|v| v.is_default).or_else(|| vpas.first())
}

/// Outcome of resolving an address against the active registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpaValidation {
    #[serde(rename = "vpa")]
    pub address: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "valid")]
    pub is_valid: bool,
}
