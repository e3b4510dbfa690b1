//! YAML-backed settings
//!
//! All fields are optional in the file; missing fields (or a missing file)
//! fall back to defaults. Settings are loaded once at startup and passed
//! into components explicitly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Top-level application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Chat-completion endpoint settings
    pub llm: LlmSettings,

    /// Agent behavior settings
    pub agents: AgentSettings,

    /// Directory HTML reports are written to
    pub reports_dir: String,
}

/// Chat-completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier
    pub model: String,

    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,

    /// OpenAI-compatible base URL; `None` uses the official endpoint
    pub api_base: Option<String>,

    /// API key; `None` falls back to the `OPENAI_API_KEY` environment variable
    pub api_key: Option<String>,

    /// Maximum tokens per completion
    pub max_tokens: usize,
}

/// Agent behavior settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Log full agent transcripts at info level
    pub verbose: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            api_base: None,
            api_key: None,
            max_tokens: 1024,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    ///
    /// A missing file yields defaults; a present but invalid file is an
    /// error. Out-of-range values are rejected here rather than at use sites.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let settings: Self = serde_yaml::from_str(&raw)?;
        settings.validate()?;
        debug!(path = %path.display(), model = %settings.llm.model, "Settings loaded");
        Ok(settings)
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "temperature must be in [0.0, 2.0], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".to_string()));
        }
        Ok(())
    }

    /// Resolve the API key: explicit setting first, then environment
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.llm.api_key {
            return Ok(key.clone());
        }
        std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config(
                "no API key configured and OPENAI_API_KEY environment variable not set"
                    .to_string(),
            )
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            agents: AgentSettings::default(),
            reports_dir: "reports".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert!((settings.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(settings.llm.max_tokens, 1024);
        assert!(!settings.agents.verbose);
        assert_eq!(settings.reports_dir, "reports");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::load("/nonexistent/tickerlens.yaml").unwrap();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_yaml_defaults_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "llm:\n  model: local-model\n  api_base: http://localhost:1234/v1").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.llm.model, "local-model");
        assert_eq!(
            settings.llm.api_base.as_deref(),
            Some("http://localhost:1234/v1")
        );
        // Untouched fields keep their defaults
        assert_eq!(settings.llm.max_tokens, 1024);
        assert_eq!(settings.reports_dir, "reports");
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "llm:\n  temperature: 3.5").unwrap();

        let result = Settings::load(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "llm: [not a mapping").unwrap();

        assert!(matches!(Settings::load(file.path()), Err(Error::Yaml(_))));
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("sk-test".to_string());
        assert_eq!(settings.resolve_api_key().unwrap(), "sk-test");
    }
}
