use crate::domain::account::{ACCOUNT_KEY_LEN, AccountKey};
use crate::domain::collect::CollectRequest;
use crate::domain::mandate::Mandate;
use crate::domain::ports::{CollectStore, MandateStore, TransactionStore, VpaStore};
use crate::domain::transaction::{PageRequest, Transaction};
use crate::domain::vpa::Vpa;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// VPA records keyed by id.
pub const CF_VPAS: &str = "vpas";
/// Unique index: active address -> VPA id.
pub const CF_VPA_ADDRESSES: &str = "vpa_addresses";
/// account | created_at | id -> ()
pub const CF_VPA_BY_ACCOUNT: &str = "vpa_by_account";
/// Transactions keyed by txn_id (the unique constraint).
pub const CF_TRANSACTIONS: &str = "upi_transactions";
/// account | !transaction_date | !txn_id -> ()
pub const CF_TXN_BY_ACCOUNT: &str = "txn_by_account";
/// Mandates keyed by mandate_id (the unique constraint).
pub const CF_MANDATES: &str = "mandates";
/// account | created_at | mandate_id -> ()
pub const CF_MANDATE_BY_ACCOUNT: &str = "mandate_by_account";
/// Collect requests keyed by id.
pub const CF_COLLECTS: &str = "collect_requests";
/// account | !created_at | id -> ()
pub const CF_COLLECT_BY_ACCOUNT: &str = "collect_by_account";
/// expires_at | id -> (), scanned by the retention sweep.
pub const CF_COLLECT_BY_EXPIRY: &str = "collect_by_expiry";

const COLUMN_FAMILIES: [&str; 10] = [
    CF_VPAS,
    CF_VPA_ADDRESSES,
    CF_VPA_BY_ACCOUNT,
    CF_TRANSACTIONS,
    CF_TXN_BY_ACCOUNT,
    CF_MANDATES,
    CF_MANDATE_BY_ACCOUNT,
    CF_COLLECTS,
    CF_COLLECT_BY_ACCOUNT,
    CF_COLLECT_BY_EXPIRY,
];

/// A persistent store implementation using RocksDB.
///
/// Implements all four storage ports on one database, one column family per
/// record type plus index column families. Unique constraints are checked and
/// written in a single `WriteBatch` while holding `write_lock`, which makes
/// the check-and-insert atomic for every writer sharing this handle.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path`, creating any missing
    /// column family.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()));
        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::storage(format!("{name} column family not found")))
    }

    fn get_json<T: DeserializeOwned>(&self, cf: &'static str, key: &[u8]) -> Result<Option<T>> {
        match self.db.get_cf(&self.cf(cf)?, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Keys of `cf` starting with `prefix`, in key order.
    fn keys_with_prefix(&self, cf: &'static str, prefix: &[u8]) -> Result<Vec<Box<[u8]>>> {
        let handle = self.cf(cf)?;
        let mut keys = Vec::new();
        for item in self
            .db
            .iterator_cf(&handle, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            keys.push(key);
        }
        Ok(keys)
    }
}

fn nanos(at: DateTime<Utc>) -> u64 {
    at.timestamp_nanos_opt().unwrap_or_default().max(0) as u64
}

fn index_key(account: &AccountKey, stamp: u64, suffix: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(ACCOUNT_KEY_LEN + 8 + suffix.len());
    key.extend_from_slice(account.as_bytes());
    key.extend_from_slice(&stamp.to_be_bytes());
    key.extend_from_slice(suffix);
    key
}

/// Everything after `account | stamp` in an index key.
fn index_suffix(key: &[u8]) -> &[u8] {
    &key[ACCOUNT_KEY_LEN + 8..]
}

/// Bitwise complement, used to invert key order for newest-first scans.
fn invert(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| !b).collect()
}

fn uuid_from(bytes: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(bytes).map_err(|e| PaymentError::storage(format!("corrupt record id: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

#[async_trait]
impl VpaStore for RocksDBStore {
    async fn insert(&self, vpa: Vpa) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let addresses = self.cf(CF_VPA_ADDRESSES)?;

        let mut batch = WriteBatch::default();
        if vpa.is_active {
            if self.db.get_pinned_cf(&addresses, vpa.address.as_bytes())?.is_some() {
                return Err(PaymentError::AlreadyExists {
                    entity: "vpa",
                    key: vpa.address,
                });
            }
            batch.put_cf(&addresses, vpa.address.as_bytes(), vpa.id.as_bytes());
        }
        batch.put_cf(&self.cf(CF_VPAS)?, vpa.id.as_bytes(), to_json(&vpa)?);
        batch.put_cf(
            &self.cf(CF_VPA_BY_ACCOUNT)?,
            index_key(&vpa.account, nanos(vpa.created_at), vpa.id.as_bytes()),
            b"",
        );
        self.db.write(batch)?;
        Ok(())
    }

    async fn find_active_by_address(&self, address: &str) -> Result<Option<Vpa>> {
        let Some(id) = self.db.get_cf(&self.cf(CF_VPA_ADDRESSES)?, address.as_bytes())? else {
            return Ok(None);
        };
        self.get_json(CF_VPAS, &id)
    }

    async fn find_active_by_account(&self, account: AccountKey) -> Result<Vec<Vpa>> {
        let mut vpas = Vec::new();
        for key in self.keys_with_prefix(CF_VPA_BY_ACCOUNT, account.as_bytes())? {
            let id = uuid_from(index_suffix(&key))?;
            if let Some(vpa) = self.get_json::<Vpa>(CF_VPAS, id.as_bytes())?
                && vpa.is_active
            {
                vpas.push(vpa);
            }
        }
        Ok(vpas)
    }

    async fn deactivate(
        &self,
        account: AccountKey,
        address: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Vpa>> {
        let _guard = self.write_lock.lock().await;
        let addresses = self.cf(CF_VPA_ADDRESSES)?;

        let Some(id) = self.db.get_cf(&addresses, address.as_bytes())? else {
            return Ok(None);
        };
        let Some(mut vpa) = self.get_json::<Vpa>(CF_VPAS, &id)? else {
            return Ok(None);
        };
        if vpa.account != account {
            return Ok(None);
        }
        vpa.is_active = false;
        vpa.updated_at = at;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&addresses, address.as_bytes());
        batch.put_cf(&self.cf(CF_VPAS)?, vpa.id.as_bytes(), to_json(&vpa)?);
        self.db.write(batch)?;
        Ok(Some(vpa))
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn insert(&self, tx: Transaction) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let transactions = self.cf(CF_TRANSACTIONS)?;

        if self.db.get_pinned_cf(&transactions, tx.txn_id.as_bytes())?.is_some() {
            return Err(PaymentError::AlreadyExists {
                entity: "transaction",
                key: tx.txn_id,
            });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&transactions, tx.txn_id.as_bytes(), to_json(&tx)?);
        batch.put_cf(
            &self.cf(CF_TXN_BY_ACCOUNT)?,
            index_key(
                &tx.account,
                u64::MAX - nanos(tx.transaction_date),
                &invert(tx.txn_id.as_bytes()),
            ),
            b"",
        );
        self.db.write(batch)?;
        Ok(())
    }

    async fn find_page_by_account(
        &self,
        account: AccountKey,
        page: PageRequest,
    ) -> Result<(Vec<Transaction>, u64)> {
        let index = self.cf(CF_TXN_BY_ACCOUNT)?;
        let prefix = account.as_bytes();
        let window = page.offset()..page.offset().saturating_add(page.limit);

        // Count every entry but keep only the keys inside the page window.
        let mut total = 0u64;
        let mut keys = Vec::new();
        for item in self
            .db
            .iterator_cf(&index, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            if window.contains(&total) {
                keys.push(key);
            }
            total += 1;
        }

        let mut items = Vec::with_capacity(keys.len());
        for key in &keys {
            let txn_id = invert(index_suffix(key));
            let tx = self
                .get_json::<Transaction>(CF_TRANSACTIONS, &txn_id)?
                .ok_or_else(|| PaymentError::storage("transaction index points at missing record"))?;
            items.push(tx);
        }
        Ok((items, total))
    }
}

#[async_trait]
impl MandateStore for RocksDBStore {
    async fn insert(&self, mandate: Mandate) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mandates = self.cf(CF_MANDATES)?;

        if self.db.get_pinned_cf(&mandates, mandate.mandate_id.as_bytes())?.is_some() {
            return Err(PaymentError::AlreadyExists {
                entity: "mandate",
                key: mandate.mandate_id,
            });
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&mandates, mandate.mandate_id.as_bytes(), to_json(&mandate)?);
        batch.put_cf(
            &self.cf(CF_MANDATE_BY_ACCOUNT)?,
            index_key(
                &mandate.account,
                nanos(mandate.created_at),
                mandate.mandate_id.as_bytes(),
            ),
            b"",
        );
        self.db.write(batch)?;
        Ok(())
    }

    async fn find_by_account(&self, account: AccountKey) -> Result<Vec<Mandate>> {
        let mut mandates = Vec::new();
        for key in self.keys_with_prefix(CF_MANDATE_BY_ACCOUNT, account.as_bytes())? {
            if let Some(mandate) = self.get_json::<Mandate>(CF_MANDATES, index_suffix(&key))? {
                mandates.push(mandate);
            }
        }
        Ok(mandates)
    }
}

#[async_trait]
impl CollectStore for RocksDBStore {
    async fn insert(&self, request: CollectRequest) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let id = request.id.as_bytes();

        let mut expiry_key = nanos(request.expires_at).to_be_bytes().to_vec();
        expiry_key.extend_from_slice(id);

        let mut batch = WriteBatch::default();
        batch.put_cf(&self.cf(CF_COLLECTS)?, id, to_json(&request)?);
        batch.put_cf(
            &self.cf(CF_COLLECT_BY_ACCOUNT)?,
            index_key(&request.account, u64::MAX - nanos(request.created_at), id),
            b"",
        );
        batch.put_cf(&self.cf(CF_COLLECT_BY_EXPIRY)?, expiry_key, b"");
        self.db.write(batch)?;
        Ok(())
    }

    async fn find_by_account(
        &self,
        account: AccountKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<CollectRequest>> {
        let mut requests = Vec::new();
        for key in self.keys_with_prefix(CF_COLLECT_BY_ACCOUNT, account.as_bytes())? {
            if let Some(request) = self.get_json::<CollectRequest>(CF_COLLECTS, index_suffix(&key))?
                && !request.is_expired(now)
            {
                requests.push(request);
            }
        }
        Ok(requests)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let expiry = self.cf(CF_COLLECT_BY_EXPIRY)?;
        let cutoff = nanos(now);

        let mut batch = WriteBatch::default();
        let mut purged = 0;
        for item in self.db.iterator_cf(&expiry, IteratorMode::Start) {
            let (key, _) = item?;
            let mut stamp = [0u8; 8];
            stamp.copy_from_slice(&key[..8]);
            if u64::from_be_bytes(stamp) > cutoff {
                break;
            }

            let id = &key[8..];
            if let Some(request) = self.get_json::<CollectRequest>(CF_COLLECTS, id)? {
                batch.delete_cf(
                    &self.cf(CF_COLLECT_BY_ACCOUNT)?,
                    index_key(&request.account, u64::MAX - nanos(request.created_at), id),
                );
            }
            batch.delete_cf(&self.cf(CF_COLLECTS)?, id);
            batch.delete_cf(&expiry, &key);
            purged += 1;
        }
        self.db.write(batch)?;
        Ok(purged)
    }
}
