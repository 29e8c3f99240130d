use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Candidates fetched from the index before brand filtering
pub const DEFAULT_OVER_FETCH: usize = 30;

pub const DEFAULT_TOP_N: usize = 5;

/// Configuration for a match engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Nearest neighbors retrieved per query. Fixed width, not a
    /// guarantee that `top_n` cross-brand matches exist inside it.
    #[serde(default = "default_over_fetch")]
    pub over_fetch: usize,

    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    #[serde(default)]
    pub narrative: Option<NarrativeConfig>,
}

fn default_over_fetch() -> usize {
    DEFAULT_OVER_FETCH
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            over_fetch: DEFAULT_OVER_FETCH,
            default_top_n: DEFAULT_TOP_N,
            narrative: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.over_fetch == 0 {
            return Err(EngineError::InvalidConfig("over_fetch must be at least 1".into()));
        }
        if self.default_top_n == 0 {
            return Err(EngineError::InvalidConfig("default_top_n must be at least 1".into()));
        }
        if let Some(narrative) = &self.narrative {
            narrative.validate()?;
        }
        Ok(())
    }
}

/// Chat-completions deployment used for narrative explanations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Base URL, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    pub deployment: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default, skip_serializing)]
    pub api_key: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl NarrativeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(EngineError::InvalidConfig(
                "narrative endpoint must start with http:// or https://".into(),
            ));
        }
        if self.deployment.trim().is_empty() {
            return Err(EngineError::InvalidConfig("narrative deployment cannot be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(EngineError::InvalidConfig("narrative timeout must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.over_fetch, 30);
        assert_eq!(config.default_top_n, 5);
        assert!(config.narrative.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_over_fetch_rejected() {
        let config = EngineConfig {
            over_fetch: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_narrative_defaults_and_key_not_serialized() {
        let config: NarrativeConfig = serde_json::from_str(
            r#"{"endpoint": "https://example.openai.azure.com", "deployment": "gpt-4o", "api_key": "secret"}"#,
        )
        .unwrap();
        assert_eq!(config.api_version, "2024-02-01");
        assert_eq!(config.timeout(), Duration::from_secs(20));
        assert_eq!(config.temperature, 0.0);

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_narrative_endpoint_validation() {
        let config = NarrativeConfig {
            endpoint: "example.com".into(),
            deployment: "gpt".into(),
            api_version: default_api_version(),
            api_key: String::new(),
            temperature: 0.0,
            timeout_secs: 5,
        };
        assert!(config.validate().is_err());
    }
}
