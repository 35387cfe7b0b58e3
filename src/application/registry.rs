use super::service::UpiService;
use crate::domain::account::AccountKey;
use crate::domain::vpa::{Vpa, VpaValidation};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use tracing::{debug, info};

impl UpiService {
    /// Creates `<prefix>@<bank>` for the caller.
    ///
    /// The new VPA is always flagged default. Address collisions are detected
    /// by the store on insert and come back as `AlreadyExists`.
    pub async fn create_vpa(&self, user_id: &str, prefix: &str, linked_account: &str) -> Result<Vpa> {
        let account = AccountKey::resolve(user_id)?;
        let vpa = Vpa::new(
            account,
            prefix,
            &self.config.bank_suffix,
            linked_account.to_string(),
            Utc::now(),
        );
        self.vpa_store.insert(vpa.clone()).await?;

        info!(%account, address = %vpa.address, "vpa created");
        Ok(vpa)
    }

    /// Active VPAs of the caller, in creation order.
    pub async fn list_vpas(&self, user_id: &str) -> Result<Vec<Vpa>> {
        let account = AccountKey::resolve(user_id)?;
        self.vpa_store.find_active_by_account(account).await
    }

    /// Reports whether `address` resolves to an active VPA.
    ///
    /// An unknown address is a negative answer, not an error.
    pub async fn validate_vpa(&self, address: &str) -> Result<VpaValidation> {
        match self.vpa_store.find_active_by_address(address).await? {
            Some(vpa) => Ok(VpaValidation {
                address: vpa.address,
                display_name: self.config.verified_display_name.clone(),
                is_valid: true,
            }),
            None => {
                debug!(address, "vpa not resolvable");
                Ok(VpaValidation {
                    address: address.to_string(),
                    display_name: String::new(),
                    is_valid: false,
                })
            }
        }
    }

    /// Deactivates one of the caller's VPAs, releasing its address.
    pub async fn deactivate_vpa(&self, user_id: &str, address: &str) -> Result<Vpa> {
        let account = AccountKey::resolve(user_id)?;
        let vpa = self
            .vpa_store
            .deactivate(account, address, Utc::now())
            .await?
            .ok_or_else(|| PaymentError::NotFound(address.to_string()))?;

        info!(%account, address = %vpa.address, "vpa deactivated");
        Ok(vpa)
    }
}
