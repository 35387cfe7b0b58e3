use chrono::Duration;

pub const DEFAULT_BANK_SUFFIX: &str = "digitalbank";

/// Tunables for the UPI workflows.
#[derive(Debug, Clone)]
pub struct UpiConfig {
    /// Bank handle appended to every VPA prefix (`<prefix>@<bank_suffix>`).
    pub bank_suffix: String,
    /// How long a collect request stays pending before it expires.
    pub collect_expiry: Duration,
    /// Page size used when the caller's limit is out of range.
    pub default_page_size: u64,
    /// Largest page size a caller may ask for.
    pub max_page_size: u64,
    /// Name reported for a resolvable VPA until a profile lookup exists.
    pub verified_display_name: String,
    /// Period of the expired collect request sweep.
    pub retention_interval: std::time::Duration,
}

impl Default for UpiConfig {
    fn default() -> Self {
        Self {
            bank_suffix: DEFAULT_BANK_SUFFIX.to_string(),
            collect_expiry: Duration::hours(24),
            default_page_size: 20,
            max_page_size: 100,
            verified_display_name: "Verified User".to_string(),
            retention_interval: std::time::Duration::from_secs(60),
        }
    }
}

impl UpiConfig {
    pub fn with_bank_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.bank_suffix = suffix.into().trim_start_matches('@').to_lowercase();
        self
    }
}
