//! Reads the settings file from a workspace.

use std::path::Path;

use super::{
    CatalogSettings,
    ConfigError,
};

/// Settings file looked up at the workspace root.
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

/// Loads settings from the workspace root.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: no settings file
///
/// # Errors
/// - The file cannot be read
/// - The file is not valid JSON for [`CatalogSettings`]
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<CatalogSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: CatalogSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
