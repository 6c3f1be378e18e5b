//! Client for the OpenAI-compatible chat completions gateway.

use crate::config::ModelSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a chat client for the configured gateway and key.
pub fn create_client(settings: &ModelSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(
        settings,
        api_key,
        Duration::from_secs(settings.request_timeout_secs),
    )
}

/// Create a chat client with a custom HTTP timeout.
pub fn create_client_with_timeout(
    settings: &ModelSettings,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    // async-openai appends "/chat/completions" itself
    let config = OpenAIConfig::new()
        .with_api_base(settings.base_url.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::config::Config;

    #[test]
    fn test_trailing_slash_trimmed() {
        let settings = ModelSettings::default();
        let client = create_client(&settings, "key").unwrap();
        assert_eq!(
            client.config().api_base(),
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
    }
}
