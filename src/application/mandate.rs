use super::service::UpiService;
use crate::domain::account::AccountKey;
use crate::domain::mandate::{Mandate, MandateFrequency, MandateStatus};
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

/// Caller-supplied terms of a new mandate.
#[derive(Debug, Clone, PartialEq)]
pub struct MandateTerms {
    pub payee_address: String,
    pub amount: Decimal,
    pub frequency: MandateFrequency,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub purpose: String,
}

impl UpiService {
    /// Registers a recurring debit from the caller's acting VPA.
    ///
    /// Terms are stored as given. An unknown frequency or an end date before
    /// the start date is logged and accepted.
    pub async fn create_mandate(&self, user_id: &str, terms: MandateTerms) -> Result<Mandate> {
        let account = AccountKey::resolve(user_id)?;
        let payer = self.acting_vpa(account).await?;

        if !terms.frequency.is_recognized() || terms.end_date < terms.start_date {
            warn!(
                %account,
                frequency = %terms.frequency,
                start = %terms.start_date,
                end = %terms.end_date,
                "mandate terms accepted without validation"
            );
        }

        let now = Utc::now();
        let mandate = Mandate {
            id: Uuid::new_v4(),
            account,
            mandate_id: self.mandate_ids.next_reference(),
            payer_address: payer.address,
            payee_address: terms.payee_address,
            amount: terms.amount,
            frequency: terms.frequency,
            start_date: terms.start_date,
            end_date: terms.end_date,
            purpose: terms.purpose,
            status: MandateStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.mandate_store.insert(mandate.clone()).await?;

        info!(%account, mandate_id = %mandate.mandate_id, "mandate created");
        Ok(mandate)
    }

    /// Every mandate of the caller, whatever its status.
    pub async fn list_mandates(&self, user_id: &str) -> Result<Vec<Mandate>> {
        let account = AccountKey::resolve(user_id)?;
        self.mandate_store.find_by_account(account).await
    }
}

#[cfg(test)]
mod tests {
    use super::MandateTerms;
    use crate::application::service::UpiService;
    use crate::domain::mandate::{MandateFrequency, MandateStatus};
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::{
        InMemoryCollectStore, InMemoryMandateStore, InMemoryTransactionStore, InMemoryVpaStore,
    };
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    const USER_A: &str = "65a1b2c3d4e5f60718293a4b";

    fn service() -> UpiService {
        UpiService::new(
            Box::new(InMemoryVpaStore::new()),
            Box::new(InMemoryTransactionStore::new()),
            Box::new(InMemoryMandateStore::new()),
            Box::new(InMemoryCollectStore::new()),
        )
    }

    fn terms(frequency: &str) -> MandateTerms {
        let start = Utc::now();
        MandateTerms {
            payee_address: "netflix@digitalbank".into(),
            amount: dec!(499),
            frequency: frequency.into(),
            start_date: start,
            end_date: start + Duration::days(365),
            purpose: "subscription".into(),
        }
    }

    #[tokio::test]
    async fn test_create_mandate_round_trip() {
        let service = service();
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();

        let terms = terms("monthly");
        let mandate = service.create_mandate(USER_A, terms.clone()).await.unwrap();
        assert!(mandate.mandate_id.starts_with("MND"));
        assert_eq!(mandate.payer_address, "a@digitalbank");
        assert_eq!(mandate.payee_address, terms.payee_address);
        assert_eq!(mandate.amount, terms.amount);
        assert_eq!(mandate.frequency, MandateFrequency::Monthly);
        assert_eq!(mandate.start_date, terms.start_date);
        assert_eq!(mandate.end_date, terms.end_date);
        assert_eq!(mandate.purpose, terms.purpose);
        assert_eq!(mandate.status, MandateStatus::Active);
    }

    #[tokio::test]
    async fn test_mandate_terms_are_not_validated() {
        let service = service();
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();

        let mut odd = terms("fortnightly");
        std::mem::swap(&mut odd.start_date, &mut odd.end_date);
        let mandate = service.create_mandate(USER_A, odd).await.unwrap();
        assert_eq!(mandate.frequency.as_str(), "fortnightly");
        assert!(mandate.end_date < mandate.start_date);
    }

    #[tokio::test]
    async fn test_mandate_without_vpa() {
        let service = service();
        let err = service
            .create_mandate(USER_A, terms("daily"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NoVpa));
        assert!(service.list_mandates(USER_A).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_mandates_unique_ids() {
        let service = service();
        service.create_vpa(USER_A, "a", "ACC1").await.unwrap();
        for _ in 0..5 {
            service.create_mandate(USER_A, terms("weekly")).await.unwrap();
        }

        let mandates = service.list_mandates(USER_A).await.unwrap();
        assert_eq!(mandates.len(), 5);
        let ids: std::collections::HashSet<_> =
            mandates.iter().map(|m| m.mandate_id.clone()).collect();
        assert_eq!(ids.len(), 5);
    }
}
