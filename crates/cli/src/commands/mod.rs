pub mod chat;
pub mod config_cmd;
pub mod doctor;
pub mod onboard;

use shellwright_config::AppConfig;
use shellwright_core::Error;

/// Load the effective configuration; failures surface as [`Error::Config`].
pub fn load_config() -> Result<AppConfig, Error> {
    AppConfig::load().map_err(Error::from)
}
