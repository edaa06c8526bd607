use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::HarnessError;
use crate::model::thresholds::ThresholdSweep;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PER_CLASS_LIMIT: usize = 25;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
}

impl EndpointConfig {
    /// Parses `NAME=URL`; a bare URL is named after itself.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (name, url) = match raw.split_once('=') {
            Some((name, url)) => (name.trim(), url.trim()),
            None => (raw.trim(), raw.trim()),
        };
        if name.is_empty() || url.is_empty() {
            return Err(format!("invalid endpoint '{raw}' (use NAME=URL)"));
        }
        check_url(url)?;
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

fn check_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!(
            "endpoint URL must start with http:// or https://: {url}"
        ))
    }
}

/// File-level configuration. Every field is optional so a partial file
/// only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
    pub thresholds: Option<Vec<f64>>,
    pub timeout_secs: Option<u64>,
    pub per_class_limit: Option<usize>,
    pub seed: Option<u64>,
    pub health_check: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let text = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| HarnessError::Config(format!("{}: {e}", path.display())))
    }
}

/// Command-line values; `None`/empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoints: Vec<EndpointConfig>,
    pub thresholds: Option<Vec<f64>>,
    pub timeout_secs: Option<u64>,
    pub per_class_limit: Option<usize>,
    pub seed: Option<u64>,
    pub skip_health_check: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub endpoints: Vec<EndpointConfig>,
    pub sweep: ThresholdSweep,
    pub timeout: Duration,
    pub per_class_limit: usize,
    /// Seeds archive subsampling.
    pub seed: u64,
    pub health_check: bool,
}

impl HarnessConfig {
    /// Command-line values win over the file, the file over built-in defaults.
    pub fn resolve(file: ConfigFile, cli: Overrides) -> Result<Self, HarnessError> {
        let endpoints = if cli.endpoints.is_empty() {
            file.endpoints
        } else {
            cli.endpoints
        };
        let sweep = match cli.thresholds.or(file.thresholds) {
            Some(values) => ThresholdSweep::from_values(values)?,
            None => ThresholdSweep::default_v1(),
        };
        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let per_class_limit = cli
            .per_class_limit
            .or(file.per_class_limit)
            .unwrap_or(DEFAULT_PER_CLASS_LIMIT);
        let seed = cli.seed.or(file.seed).unwrap_or(DEFAULT_SAMPLE_SEED);
        let health_check = !cli.skip_health_check && file.health_check.unwrap_or(true);

        let config = Self {
            endpoints,
            sweep,
            timeout: Duration::from_secs(timeout_secs),
            per_class_limit,
            seed,
            health_check,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.endpoints.is_empty() {
            return Err(HarnessError::Config(
                "at least one endpoint is required".to_string(),
            ));
        }
        let mut names = std::collections::HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.name.trim().is_empty() {
                return Err(HarnessError::Config("endpoint name is empty".to_string()));
            }
            check_url(&endpoint.url).map_err(HarnessError::Config)?;
            if !names.insert(endpoint.name.as_str()) {
                return Err(HarnessError::Config(format!(
                    "duplicate endpoint name: {}",
                    endpoint.name
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(HarnessError::Config(
                "timeout must be positive".to_string(),
            ));
        }
        if self.per_class_limit == 0 {
            return Err(HarnessError::Config(
                "per-class limit must be positive".to_string(),
            ));
        }
        self.sweep.validate()
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config/tests.rs"]
mod tests;
