//! Chat-completion provider implementations for shellwright.
//!
//! All providers implement the `shellwright_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use shellwright_config::AppConfig;
use shellwright_core::Error;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider.
///
/// Fails fast with [`Error::CredentialMissing`] when no API key is available,
/// before any request is attempted.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn shellwright_core::Provider>, Error> {
    let credential = config.credential().ok_or(Error::CredentialMissing)?;

    let name = if config.api_url.contains("openrouter.ai") {
        "openrouter"
    } else {
        "openai_compat"
    };

    let provider = OpenAiCompatProvider::new(
        name,
        &config.api_url,
        credential,
        Duration::from_secs(config.request_timeout_secs),
    )?
    .with_attribution(&config.referer, &config.app_title);

    tracing::debug!(provider = name, url = %config.api_url, "Provider configured");
    Ok(Arc::new(provider))
}
