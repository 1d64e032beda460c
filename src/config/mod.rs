mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(&config_path).await?;
    let mut config: Config = serde_yaml::from_str(&config_str)?;

    // API credentials never live in the config file; they come from the
    // process environment and their absence is fatal at startup.
    config.generation.api_key = require_env("OPENAI_API_KEY")?;
    config.extraction.api_key = require_env("GEMINI_API_KEY")?;

    Ok(config)
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::config(format!("{} is not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let yaml = r#"
server: {}
generation: {}
extraction: {}
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.logs.level, "info");
        assert_eq!(config.server.prompts_dir, "prompts");
        assert_eq!(config.generation.model, "gpt-4.1-nano");
        assert_eq!(config.extraction.model, "gemini-2.0-flash");
        assert_eq!(
            config.extraction.base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert!(config.generation.api_key.is_empty());
    }

    #[test]
    fn missing_credential_is_a_config_error() {
        let err = require_env("SOMMELIER_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(
            err.to_string()
                .contains("SOMMELIER_TEST_UNSET_VARIABLE is not set")
        );
    }
}
