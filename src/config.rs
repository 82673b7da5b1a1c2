use crate::paginate::PaginationConfig;
use crate::rule::{Join, MAX_RULES, Rule, RuleKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config file '{path}': {message}")]
    Invalid { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub pagination: PaginationConfig,
    /// Rules applied before any given on the command line
    pub rules: Vec<RuleConfig>,
}

/// A rule as written in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub kind: RuleKind,
    pub pattern: String,
    pub case_sensitive: bool,
    /// Ignored on the first rule
    pub join: Join,
}

impl From<&RuleConfig> for Rule {
    fn from(cfg: &RuleConfig) -> Self {
        Rule::new(cfg.kind, cfg.pattern.clone())
            .joined(cfg.join)
            .case_sensitive(cfg.case_sensitive)
    }
}

impl ViewerConfig {
    pub fn initial_rules(&self) -> Vec<Rule> {
        self.rules.iter().map(Rule::from).collect()
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path_display.clone(),
        source,
    })?;

    if config.rules.len() > MAX_RULES {
        return Err(ConfigError::Invalid {
            path: path_display,
            message: format!(
                "{} rules defined, at most {} are allowed",
                config.rules.len(),
                MAX_RULES
            ),
        });
    }

    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<ViewerConfig, toml::de::Error> {
    toml::from_str::<ViewerConfig>(raw)
}

pub fn default_config() -> &'static ViewerConfig {
    static DEFAULT_CONFIG: LazyLock<ViewerConfig> = LazyLock::new(ViewerConfig::default);
    &DEFAULT_CONFIG
}
