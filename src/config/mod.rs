//! Configuration management for request lists.
//!
//! Configuration is loaded from a settings object under the `"request-lists"`
//! key, merged with defaults and held in a process-wide singleton.

pub mod schema;

pub use schema::ListConfig;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::RwLock;
use tracing::warn;

/// Settings key holding list configuration.
pub const SETTINGS_KEY: &str = "request-lists";

/// Global configuration instance.
///
/// Lazily initialized on first access and replaced when settings change.
static CONFIG: Lazy<RwLock<ListConfig>> = Lazy::new(|| RwLock::new(ListConfig::default()));

/// Loads configuration from a settings object.
///
/// Reads the `"request-lists"` settings, merges them with defaults, validates
/// the result and updates the global configuration.
///
/// # Arguments
///
/// * `settings_json` - Optional settings object containing the `"request-lists"` key
///
/// # Returns
///
/// `Ok(ListConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```no_run
/// use request_lists::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "request-lists": {
///         "pageLimit": 50,
///         "selectable": true
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.page_limit, 50);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<ListConfig, String> {
    let mut config = ListConfig::default();

    if let Some(list_settings) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        match serde_json::from_value::<ListConfig>(list_settings.clone()) {
            Ok(user_config) => {
                config = config.merge(&user_config);
            }
            Err(e) => {
                warn!(error = %e, "failed to parse request-lists settings; using defaults");
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets the current global configuration.
///
/// Returns the defaults if configuration has not been loaded yet.
pub fn get_config() -> ListConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| ListConfig::default())
}

/// Updates the global configuration in place.
///
/// Reverts to defaults if the updated configuration fails validation.
///
/// # Example
///
/// ```no_run
/// use request_lists::config::update_config;
///
/// update_config(|config| {
///     config.page_limit = 25;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut ListConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            warn!(error = %e, "configuration invalid after update; reverting to defaults");
            *config = ListConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = ListConfig::default();
    }
}
