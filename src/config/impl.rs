use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults if nothing has been
/// initialized yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// Loads `path` (or `config.toml` in the current directory when `None`),
/// then applies `MA__*` environment overrides.
pub fn init_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    let config = StaticConfig::load(path)?;
    Ok(init_config_with(config))
}

/// Install an already-built configuration, replacing any previous one.
pub fn init_config_with(config: StaticConfig) -> Arc<StaticConfig> {
    let config = Arc::new(config);
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .store(config.clone());
    config
}
