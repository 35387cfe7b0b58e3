use super::account::AccountKey;
use super::collect::CollectRequest;
use super::mandate::Mandate;
use super::transaction::{PageRequest, Transaction};
use super::vpa::Vpa;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage for payment addresses.
///
/// `insert` must fail with `AlreadyExists` when another active VPA holds the
/// same address. The check and the write are one atomic step inside the store.
#[async_trait]
pub trait VpaStore: Send + Sync {
    async fn insert(&self, vpa: Vpa) -> Result<()>;
    async fn find_active_by_address(&self, address: &str) -> Result<Option<Vpa>>;
    /// Active VPAs of `account` in creation order.
    async fn find_active_by_account(&self, account: AccountKey) -> Result<Vec<Vpa>>;
    /// Marks the account's active VPA for `address` inactive and returns it.
    async fn deactivate(
        &self,
        account: AccountKey,
        address: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Vpa>>;
}

/// Append-only ledger. `txn_id` is unique across the store.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn insert(&self, tx: Transaction) -> Result<()>;
    /// One page ordered by `transaction_date` descending, plus the account total.
    async fn find_page_by_account(
        &self,
        account: AccountKey,
        page: PageRequest,
    ) -> Result<(Vec<Transaction>, u64)>;
}

/// `mandate_id` is unique across the store.
#[async_trait]
pub trait MandateStore: Send + Sync {
    async fn insert(&self, mandate: Mandate) -> Result<()>;
    async fn find_by_account(&self, account: AccountKey) -> Result<Vec<Mandate>>;
}

/// Collect requests live until `expires_at`; after that they are treated as
/// removed and `purge_expired` reclaims them.
#[async_trait]
pub trait CollectStore: Send + Sync {
    async fn insert(&self, request: CollectRequest) -> Result<()>;
    async fn find_by_account(
        &self,
        account: AccountKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<CollectRequest>>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}

pub type VpaStoreBox = Box<dyn VpaStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type MandateStoreBox = Box<dyn MandateStore>;
pub type CollectStoreBox = Box<dyn CollectStore>;
