use crate::domain::account::AccountKey;
use crate::domain::collect::CollectRequest;
use crate::domain::mandate::Mandate;
use crate::domain::ports::{CollectStore, MandateStore, TransactionStore, VpaStore};
use crate::domain::transaction::{PageRequest, Transaction};
use crate::domain::vpa::Vpa;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct VpaTable {
    /// Every VPA ever created, in creation order.
    rows: Vec<Vpa>,
    /// Active address -> index into `rows`.
    active: HashMap<String, usize>,
}

/// A thread-safe in-memory VPA registry.
///
/// The uniqueness check and the insert run under the same write lock, so two
/// racing inserts for one address cannot both succeed.
#[derive(Default, Clone)]
pub struct InMemoryVpaStore {
    table: Arc<RwLock<VpaTable>>,
}

impl InMemoryVpaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VpaStore for InMemoryVpaStore {
    async fn insert(&self, vpa: Vpa) -> Result<()> {
        let mut table = self.table.write().await;
        if vpa.is_active {
            if table.active.contains_key(&vpa.address) {
                return Err(PaymentError::AlreadyExists {
                    entity: "vpa",
                    key: vpa.address,
                });
            }
            let index = table.rows.len();
            table.active.insert(vpa.address.clone(), index);
        }
        table.rows.push(vpa);
        Ok(())
    }

    async fn find_active_by_address(&self, address: &str) -> Result<Option<Vpa>> {
        let table = self.table.read().await;
        Ok(table.active.get(address).map(|&i| table.rows[i].clone()))
    }

    async fn find_active_by_account(&self, account: AccountKey) -> Result<Vec<Vpa>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|v| v.is_active && v.account == account)
            .cloned()
            .collect())
    }

    async fn deactivate(
        &self,
        account: AccountKey,
        address: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Vpa>> {
        let mut table = self.table.write().await;
        let Some(&index) = table.active.get(address) else {
            return Ok(None);
        };
        if table.rows[index].account != account {
            return Ok(None);
        }
        table.active.remove(address);
        let vpa = &mut table.rows[index];
        vpa.is_active = false;
        vpa.updated_at = at;
        Ok(Some(vpa.clone()))
    }
}

#[derive(Default)]
struct TransactionTable {
    rows: Vec<Transaction>,
    txn_ids: HashSet<String>,
}

/// A thread-safe in-memory ledger.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    table: Arc<RwLock<TransactionTable>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded transactions across all accounts.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, tx: Transaction) -> Result<()> {
        let mut table = self.table.write().await;
        if !table.txn_ids.insert(tx.txn_id.clone()) {
            return Err(PaymentError::AlreadyExists {
                entity: "transaction",
                key: tx.txn_id,
            });
        }
        table.rows.push(tx);
        Ok(())
    }

    async fn find_page_by_account(
        &self,
        account: AccountKey,
        page: PageRequest,
    ) -> Result<(Vec<Transaction>, u64)> {
        let table = self.table.read().await;
        // Newest first; among equal dates the later insert comes first.
        let mut owned: Vec<(usize, &Transaction)> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.account == account)
            .collect();
        owned.sort_by_key(|(seq, tx)| Reverse((tx.transaction_date, *seq)));

        let total = owned.len() as u64;
        let items = owned
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|(_, tx)| tx.clone())
            .collect();
        Ok((items, total))
    }
}

#[derive(Default)]
struct MandateTable {
    rows: Vec<Mandate>,
    mandate_ids: HashSet<String>,
}

/// A thread-safe in-memory mandate store.
#[derive(Default, Clone)]
pub struct InMemoryMandateStore {
    table: Arc<RwLock<MandateTable>>,
}

impl InMemoryMandateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MandateStore for InMemoryMandateStore {
    async fn insert(&self, mandate: Mandate) -> Result<()> {
        let mut table = self.table.write().await;
        if !table.mandate_ids.insert(mandate.mandate_id.clone()) {
            return Err(PaymentError::AlreadyExists {
                entity: "mandate",
                key: mandate.mandate_id,
            });
        }
        table.rows.push(mandate);
        Ok(())
    }

    async fn find_by_account(&self, account: AccountKey) -> Result<Vec<Mandate>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|m| m.account == account)
            .cloned()
            .collect())
    }
}

/// A thread-safe in-memory collect request store with expiry.
#[derive(Default, Clone)]
pub struct InMemoryCollectStore {
    rows: Arc<RwLock<Vec<CollectRequest>>>,
}

impl InMemoryCollectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl CollectStore for InMemoryCollectStore {
    async fn insert(&self, request: CollectRequest) -> Result<()> {
        self.rows.write().await.push(request);
        Ok(())
    }

    async fn find_by_account(
        &self,
        account: AccountKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<CollectRequest>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.account == account && !r.is_expired(now))
            .cloned()
            .collect())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !r.is_expired(now));
        Ok(before - rows.len())
    }
}
