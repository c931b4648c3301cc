//! # Settings Commands

use tally_core::validation::{validate_access_code, validate_name};
use tally_core::Settings;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{AdminGate, StoreState};

pub async fn get_settings(store: &StoreState) -> Settings {
    debug!("get_settings command");
    store.inner().settings().settings().await
}

/// Replaces the shop settings. The admin code must stay a 4-digit code so
/// the gate can still be opened afterwards.
pub async fn save_settings(
    store: &StoreState,
    admin: &AdminGate,
    settings: Settings,
) -> Result<Settings, ApiError> {
    debug!("save_settings command");
    admin.require()?;

    validate_name("shop_name", &settings.shop_name)?;
    validate_access_code(&settings.admin_code)?;

    if !store.inner().settings().set_settings(&settings).await.is_persisted() {
        warn!("Settings change was not persisted; kept for this session");
    }

    info!(auto_print = settings.auto_print, "Settings saved");
    Ok(settings)
}

/// Wipes every record. The next reads return the seed catalog, roster and
/// settings with an empty ledger.
pub async fn reset_all_data(store: &StoreState, admin: &AdminGate) -> Result<(), ApiError> {
    debug!("reset_all_data command");
    admin.require()?;

    if store.inner().clear_all_data().await.is_persisted() {
        warn!("All register data reset to defaults");
    } else {
        warn!("Data reset was only partly applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::register;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_save_settings() {
        let (reg, _) = register().await;
        let mut settings = get_settings(&reg.store).await;
        settings.shop_name = "Corner Kiosk".to_string();
        settings.admin_code = "4321".to_string();

        let err = save_settings(&reg.store, &reg.admin, settings.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        reg.admin.unlock();
        save_settings(&reg.store, &reg.admin, settings).await.unwrap();

        let stored = get_settings(&reg.store).await;
        assert_eq!(stored.shop_name, "Corner Kiosk");
        assert_eq!(stored.admin_code, "4321");
    }

    #[tokio::test]
    async fn test_bad_admin_code_rejected() {
        let (reg, _) = register().await;
        reg.admin.unlock();
        let mut settings = get_settings(&reg.store).await;
        settings.admin_code = "12".to_string();

        let err = save_settings(&reg.store, &reg.admin, settings).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_settings(&reg.store).await.admin_code, "0000");
    }

    #[tokio::test]
    async fn test_reset_all_data() {
        let (reg, _) = register().await;
        reg.admin.unlock();
        let mut settings = get_settings(&reg.store).await;
        settings.shop_name = "Corner Kiosk".to_string();
        save_settings(&reg.store, &reg.admin, settings).await.unwrap();

        reset_all_data(&reg.store, &reg.admin).await.unwrap();

        assert_eq!(get_settings(&reg.store).await, Settings::default());
    }
}
