use crate::config::UpiConfig;
use crate::domain::account::AccountKey;
use crate::domain::ports::{CollectStoreBox, MandateStoreBox, TransactionStoreBox, VpaStoreBox};
use crate::domain::reference::{MANDATE_PREFIX, ReferenceGenerator, TXN_PREFIX};
use crate::domain::settlement::{AutoApproveSwitch, SettlementSwitchBox};
use crate::domain::vpa::{Vpa, select_acting};
use crate::error::{PaymentError, Result};

/// Entry point for every UPI operation.
///
/// `UpiService` owns the storage backends and the settlement switch. Each call
/// resolves the caller identity, runs the workflow's checks and writes at most
/// one record. It holds no mutable state of its own apart from the reference
/// generators, so it can be shared behind an `Arc` across tasks.
pub struct UpiService {
    pub(super) config: UpiConfig,
    pub(super) vpa_store: VpaStoreBox,
    pub(super) transaction_store: TransactionStoreBox,
    pub(super) mandate_store: MandateStoreBox,
    pub(super) collect_store: CollectStoreBox,
    pub(super) settlement: SettlementSwitchBox,
    pub(super) txn_ids: ReferenceGenerator,
    pub(super) mandate_ids: ReferenceGenerator,
}

impl UpiService {
    /// Creates a service with the default configuration and an auto-approving
    /// settlement switch.
    pub fn new(
        vpa_store: VpaStoreBox,
        transaction_store: TransactionStoreBox,
        mandate_store: MandateStoreBox,
        collect_store: CollectStoreBox,
    ) -> Self {
        Self {
            config: UpiConfig::default(),
            vpa_store,
            transaction_store,
            mandate_store,
            collect_store,
            settlement: Box::new(AutoApproveSwitch),
            txn_ids: ReferenceGenerator::new(TXN_PREFIX),
            mandate_ids: ReferenceGenerator::new(MANDATE_PREFIX),
        }
    }

    pub fn with_config(mut self, config: UpiConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the settlement switch consulted by `pay`.
    pub fn with_settlement(mut self, settlement: SettlementSwitchBox) -> Self {
        self.settlement = settlement;
        self
    }

    pub fn config(&self) -> &UpiConfig {
        &self.config
    }

    /// Loads the account's active VPAs and picks the one it acts from.
    pub(super) async fn acting_vpa(&self, account: AccountKey) -> Result<Vpa> {
        let vpas = self.vpa_store.find_active_by_account(account).await?;
        select_acting(&vpas).cloned().ok_or(PaymentError::NoVpa)
    }
}
