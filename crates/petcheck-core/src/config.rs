//! Run configuration for contract checks

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Public pet-store instance used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// Files probed by [`Config::load_default`], in order.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = [".petcheck.toml", ".petcheck.json", "petcheck.toml"];

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the service under test, without trailing slash
    pub base_url: String,

    /// Extra HTTP headers sent with every request
    pub headers: BTreeMap<String, String>,

    /// Value of the `api_key` header sent on deletes
    pub api_key: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Run only scenarios whose name contains one of these substrings
    pub scenarios: Vec<String>,

    /// Stop after the first failing scenario
    pub stop_on_failure: bool,

    /// Save a report for every run
    pub save_reports: bool,

    /// Report directory (default: ~/.petcheck/reports)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: BTreeMap::new(),
            api_key: "12".to_string(),
            timeout_secs: 10,
            scenarios: Vec::new(),
            stop_on_failure: false,
            save_reports: true,
            report_dir: None,
        }
    }
}

impl Config {
    /// Load config from file; `.json` files are JSON, everything else TOML.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        let mut config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
        };
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Load the first of [`DEFAULT_CONFIG_FILES`] found in `dir`, or defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        for name in DEFAULT_CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load from the current directory
    ///
    /// # Errors
    ///
    /// See [`Config::load_from_dir`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."))
    }

    /// Whether the scenario filter admits `name`. An empty filter admits all.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        self.scenarios.is_empty() || self.scenarios.iter().any(|s| name.contains(s.as_str()))
    }

    /// Host part of `base_url`, for labelling reports.
    #[must_use]
    pub fn host(&self) -> &str {
        let rest = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest);
        rest.split(['/', ':']).next().unwrap_or(rest)
    }

    /// Example config file written by `petcheck init`
    #[must_use]
    pub fn example() -> &'static str {
        r#"# petcheck configuration

# Service under test
base_url = "https://petstore.swagger.io/v2"

# api_key header sent on DELETE requests
api_key = "12"

# Per-request timeout in seconds
timeout_secs = 10

# Run only scenarios whose name contains one of these (empty = all)
# scenarios = ["pet::", "store::place_order"]

# Stop after the first failing scenario
# stop_on_failure = true

# Save summary.json + config.toml per run (default: ~/.petcheck/reports)
save_reports = true
# report_dir = "./petcheck-reports"

# Extra headers sent with every request
[headers]
# Authorization = "Bearer your-token-here"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
