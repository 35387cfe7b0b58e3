use super::service::UpiService;
use crate::domain::account::{AccountKey, Amount};
use crate::domain::collect::{CollectRequest, CollectStatus};
use crate::error::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

impl UpiService {
    /// Asks `from_address` to pay the caller's acting VPA.
    ///
    /// `from_address` is taken as given; it is not resolved against the
    /// registry. The request starts pending and expires after the configured
    /// window (24h by default).
    pub async fn collect(
        &self,
        user_id: &str,
        from_address: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<CollectRequest> {
        let amount = Amount::new(amount)?;
        let account = AccountKey::resolve(user_id)?;
        let to = self.acting_vpa(account).await?;

        let now = Utc::now();
        let request = CollectRequest {
            id: Uuid::new_v4(),
            account,
            from_address: from_address.to_string(),
            to_address: to.address,
            amount: amount.value(),
            note: note.to_string(),
            status: CollectStatus::Pending,
            expires_at: now + self.config.collect_expiry,
            created_at: now,
        };
        self.collect_store.insert(request.clone()).await?;

        info!(%account, from = %request.from_address, to = %request.to_address, "collect request created");
        Ok(request)
    }

    /// Unexpired collect requests raised by the caller, newest first.
    pub async fn list_collect_requests(&self, user_id: &str) -> Result<Vec<CollectRequest>> {
        let account = AccountKey::resolve(user_id)?;
        self.collect_store.find_by_account(account, Utc::now()).await
    }
}
