use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::storage::IdentityStore;
use crate::shared::AppError;

/// Key used in the fast volatile store.
pub const FAST_STORE_KEY: &str = "userUuid";
/// Key used in the durable store.
pub const DURABLE_STORE_KEY: &str = "titanUserUuid";

/// Derives the default display name for a device identity.
/// Example: `Player_a3f2b`.
pub fn default_display_name(uuid: &str) -> String {
    let short_id: String = uuid.replace('-', "").chars().take(5).collect();
    format!("Player_{short_id}")
}

/// Owns the per-device anonymous identity.
///
/// The identifier doubles as the remote User primary key, so clearing it
/// orphans every row the device has written.
pub struct IdentityProvider {
    fast: Arc<dyn IdentityStore>,
    durable: Arc<dyn IdentityStore>,
}

impl IdentityProvider {
    pub fn new(fast: Arc<dyn IdentityStore>, durable: Arc<dyn IdentityStore>) -> Self {
        Self { fast, durable }
    }

    /// Returns the stable identifier for this installation, generating and
    /// persisting a fresh v4 UUID on first use. Lookup order: fast store,
    /// then durable store (backfilling the fast store on a hit). Never
    /// touches the network.
    #[instrument(skip(self))]
    pub async fn get_or_create_uuid(&self) -> Result<String, AppError> {
        if let Some(uuid) = self.fast.get(FAST_STORE_KEY).await? {
            return Ok(uuid);
        }

        if let Some(uuid) = self.durable.get(DURABLE_STORE_KEY).await? {
            self.fast.set(FAST_STORE_KEY, &uuid).await?;
            return Ok(uuid);
        }

        let uuid = Uuid::new_v4().to_string();
        futures::try_join!(
            self.durable.set(DURABLE_STORE_KEY, &uuid),
            self.fast.set(FAST_STORE_KEY, &uuid),
        )?;

        info!(uuid = %uuid, "Generated new device identity");
        Ok(uuid)
    }

    /// Same lookup as `get_or_create_uuid` but never generates.
    #[instrument(skip(self))]
    pub async fn stored_uuid(&self) -> Result<Option<String>, AppError> {
        if let Some(uuid) = self.fast.get(FAST_STORE_KEY).await? {
            return Ok(Some(uuid));
        }

        if let Some(uuid) = self.durable.get(DURABLE_STORE_KEY).await? {
            self.fast.set(FAST_STORE_KEY, &uuid).await?;
            return Ok(Some(uuid));
        }

        Ok(None)
    }

    /// Removes the identity from both stores. Remote rows keyed by the
    /// removed UUID become unreachable.
    #[instrument(skip(self))]
    pub async fn clear_uuid(&self) -> Result<(), AppError> {
        warn!("Clearing device identity; prior remote data is orphaned");

        futures::try_join!(
            self.durable.remove(DURABLE_STORE_KEY),
            self.fast.remove(FAST_STORE_KEY),
        )?;

        Ok(())
    }
}
