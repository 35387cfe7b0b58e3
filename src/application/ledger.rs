use super::service::UpiService;
use crate::domain::account::{AccountKey, Amount};
use crate::domain::settlement::SettlementInstruction;
use crate::domain::transaction::{
    PageRequest, Transaction, TransactionHistory, TransactionKind, TransactionStatus,
};
use crate::error::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

impl UpiService {
    /// Pays `amount` from the caller's acting VPA to `to_address`.
    ///
    /// The amount is checked before any storage access. The resulting status
    /// is whatever the settlement switch decides; the record is written for
    /// approvals, declines and failures alike.
    pub async fn pay(
        &self,
        user_id: &str,
        to_address: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<Transaction> {
        let amount = Amount::new(amount)?;
        let account = AccountKey::resolve(user_id)?;
        let from = self.acting_vpa(account).await?;

        let now = Utc::now();
        let mut tx = Transaction {
            id: Uuid::new_v4(),
            account,
            txn_id: self.txn_ids.next_reference(),
            kind: TransactionKind::Pay,
            from_address: from.address,
            to_address: to_address.to_string(),
            amount: amount.value(),
            note: note.to_string(),
            status: TransactionStatus::Pending,
            failure_reason: None,
            transaction_date: now,
            created_at: now,
        };

        let decision = self
            .settlement
            .settle(&SettlementInstruction {
                txn_id: tx.txn_id.clone(),
                from_address: tx.from_address.clone(),
                to_address: tx.to_address.clone(),
                amount: tx.amount,
            })
            .await?;
        tx.settle(decision);

        self.transaction_store.insert(tx.clone()).await?;

        info!(
            %account,
            txn_id = %tx.txn_id,
            status = ?tx.status,
            "payment recorded"
        );
        Ok(tx)
    }

    /// One page of the caller's ledger, most recent first.
    pub async fn transaction_history(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<TransactionHistory> {
        let account = AccountKey::resolve(user_id)?;
        let request = PageRequest::normalize(
            page,
            limit,
            self.config.default_page_size,
            self.config.max_page_size,
        );

        let (transactions, total) = self
            .transaction_store
            .find_page_by_account(account, request)
            .await?;
        debug!(%account, page = request.page, limit = request.limit, total, "history read");

        Ok(TransactionHistory {
            transactions,
            total,
            page: request.page,
            limit: request.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::application::service::UpiService;
    use crate::domain::settlement::{
        SettlementDecision, SettlementInstruction, SettlementSwitch,
    };
    use crate::domain::transaction::TransactionStatus;
    use crate::error::{PaymentError, Result};
    use crate::infrastructure::in_memory::{
        InMemoryCollectStore, InMemoryMandateStore, InMemoryTransactionStore, InMemoryVpaStore,
    };
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    const USER_A: &str = "65a1b2c3d4e5f60718293a4b";

    struct DecliningSwitch;

    #[async_trait]
    impl SettlementSwitch for DecliningSwitch {
        async fn settle(&self, _instruction: &SettlementInstruction) -> Result<SettlementDecision> {
            Ok(SettlementDecision::Declined {
                reason: "risk limit".into(),
            })
        }
    }

    struct UnreachableSwitch;

    #[async_trait]
    impl SettlementSwitch for UnreachableSwitch {
        async fn settle(&self, _instruction: &SettlementInstruction) -> Result<SettlementDecision> {
            Err(PaymentError::storage("switch unreachable"))
        }
    }

    fn service_with(transactions: InMemoryTransactionStore) -> UpiService {
        UpiService::new(
            Box::new(InMemoryVpaStore::new()),
            Box::new(transactions),
            Box::new(InMemoryMandateStore::new()),
            Box::new(InMemoryCollectStore::new()),
        )
    }

    #[tokio::test]
    async fn test_pay_from_default_vpa() {
        let service = service_with(InMemoryTransactionStore::new());
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();

        let tx = service
            .pay(USER_A, "x@bank", dec!(100), "rent")
            .await
            .unwrap();
        assert_eq!(tx.from_address, "a@digitalbank");
        assert_eq!(tx.to_address, "x@bank");
        assert_eq!(tx.amount, dec!(100));
        assert_eq!(tx.note, "rent");
        assert_eq!(tx.status, TransactionStatus::Success);
        assert!(tx.txn_id.starts_with("UPI"));
    }

    #[tokio::test]
    async fn test_pay_rejects_non_positive_before_storage() {
        let store = InMemoryTransactionStore::new();
        let service = service_with(store.clone());
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();

        for amount in [dec!(0), dec!(-1), dec!(-0.01)] {
            let err = service.pay(USER_A, "x@bank", amount, "").await.unwrap_err();
            assert!(matches!(err, PaymentError::InvalidAmount));
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_wins_over_bad_identity() {
        let service = service_with(InMemoryTransactionStore::new());
        let err = service.pay("bogus", "x@bank", dec!(0), "").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount));
    }

    #[tokio::test]
    async fn test_pay_without_vpa() {
        let store = InMemoryTransactionStore::new();
        let service = service_with(store.clone());
        let err = service.pay(USER_A, "x@bank", dec!(5), "").await.unwrap_err();
        assert!(matches!(err, PaymentError::NoVpa));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_declined_settlement_is_recorded() {
        let service = service_with(InMemoryTransactionStore::new())
            .with_settlement(Box::new(DecliningSwitch));
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();

        let tx = service.pay(USER_A, "x@bank", dec!(5), "").await.unwrap();
        assert_eq!(tx.status, TransactionStatus::Declined);
        assert_eq!(tx.failure_reason.as_deref(), Some("risk limit"));

        let history = service.transaction_history(USER_A, 1, 20).await.unwrap();
        assert_eq!(history.total, 1);
    }

    #[tokio::test]
    async fn test_switch_error_writes_nothing() {
        let store = InMemoryTransactionStore::new();
        let service = service_with(store.clone()).with_settlement(Box::new(UnreachableSwitch));
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();

        let err = service.pay(USER_A, "x@bank", dec!(5), "").await.unwrap_err();
        assert!(matches!(err, PaymentError::Storage(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_history_pagination() {
        let service = service_with(InMemoryTransactionStore::new());
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();
        for i in 1..=25 {
            service
                .pay(USER_A, "x@bank", rust_decimal::Decimal::from(i), "")
                .await
                .unwrap();
        }

        let first = service.transaction_history(USER_A, 0, 500).await.unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(first.limit, 20);
        assert_eq!(first.total, 25);
        assert_eq!(first.transactions.len(), 20);
        assert_eq!(first.transactions[0].amount, dec!(25));
        assert!(
            first
                .transactions
                .windows(2)
                .all(|w| w[0].transaction_date >= w[1].transaction_date)
        );

        let second = service.transaction_history(USER_A, 2, 20).await.unwrap();
        assert_eq!(second.transactions.len(), 5);
        assert_eq!(second.total, 25);
        assert_eq!(second.transactions[4].amount, dec!(1));

        let beyond = service.transaction_history(USER_A, 9, 20).await.unwrap();
        assert!(beyond.transactions.is_empty());
        assert_eq!(beyond.total, 25);
    }
}
