use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;

pub fn get_config(state: &AppState) -> Result<AppConfig, AppError> {
    state.config_snapshot()
}

/// Replaces the configuration after validation; an invalid one leaves the
/// current configuration in place.
pub fn update_config(state: &AppState, config: AppConfig) -> Result<(), AppError> {
    config.validate()?;
    let mut current = state
        .config
        .lock()
        .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))?;
    *current = config;
    log::info!("Configuration updated");
    Ok(())
}
