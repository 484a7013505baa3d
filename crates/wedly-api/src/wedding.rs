// Wedding config and invitation endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ConfigEnvelope, InvitationData, WeddingConfig};

impl ApiClient {
    /// Fetch the wedding-details record.
    ///
    /// `GET /config`
    pub async fn wedding_config(&self) -> Result<WeddingConfig, Error> {
        let envelope: ConfigEnvelope = self.get(&["config"]).await?;
        Ok(envelope.config)
    }

    /// Replace the wedding-details record.
    ///
    /// `PUT /config`
    pub async fn update_wedding_config(
        &self,
        config: &WeddingConfig,
    ) -> Result<WeddingConfig, Error> {
        debug!(bride = %config.bride, groom = %config.groom, "updating wedding config");
        let envelope: ConfigEnvelope = self.put(&["config"], config).await?;
        Ok(envelope.config)
    }

    /// Everything a personalized invitation page needs for one guest.
    ///
    /// `GET /invitation/{guest_id}` (public, no token required)
    pub async fn invitation(&self, guest_id: &str) -> Result<InvitationData, Error> {
        debug!(guest_id, "fetching invitation");
        self.get(&["invitation", guest_id]).await
    }
}
