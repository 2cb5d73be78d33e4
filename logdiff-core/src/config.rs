//! YAML configuration.
//!
//! # Lookup order
//!
//! 1. an explicit `--config <path>` (must exist)
//! 2. `./logdiff.yaml`
//! 3. `<config_dir>/logdiff/config.yaml`
//!
//! A missing file falls back to [`Config::default`]. Every field has a
//! default, so partial files are fine; unknown fields are ignored.
//!
//! # API pattern
//!
//! - `load_at(path)`: explicit file; used in tests with `TempDir`
//! - `load(explicit)`: discovery, delegates to `load_at`

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const LOCAL_CONFIG_FILE: &str = "logdiff.yaml";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Root of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pairing: PairingConfig,
    pub loading: LoadingConfig,
    pub report: ReportConfig,
    pub scan: ScanConfig,
}

/// How pre/post files are recognised as belonging together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Regex with a named `key` group, matched against the file-name stem
    /// (the part before the suffix).
    pub key_pattern: String,
    pub pre_suffix: String,
    pub post_suffix: String,
    /// Descend into sub-directories.
    pub recursive: bool,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            key_pattern: r"(?P<key>\d{1,3}(?:\.\d{1,3}){3})".to_string(),
            pre_suffix: "_preCheck.log".to_string(),
            post_suffix: "_postCheck.log".to_string(),
            recursive: true,
        }
    }
}

impl PairingConfig {
    /// Compile [`Self::key_pattern`], anchored to the end of the stem.
    ///
    /// Anything before the key (a hostname prefix, say) is allowed; the key
    /// must sit directly in front of the suffix.
    pub fn key_regex(&self) -> Result<Regex, ConfigError> {
        let anchored = format!("(?:{})$", self.key_pattern);
        let re = compile(&anchored)?;
        if re.capture_names().flatten().all(|name| name != "key") {
            return Err(ConfigError::MissingKeyGroup {
                pattern: self.key_pattern.clone(),
            });
        }
        Ok(re)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadingConfig {
    /// Replace invalid UTF-8 with U+FFFD instead of failing the task.
    pub lossy_utf8: bool,
}

/// Output format of a batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Omit identical rows from HTML diff pages.
    pub changes_only: bool,
}

/// Patterns used by the log health scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub error_pattern: String,
    pub invalid_pattern: String,
    pub command_pattern: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            error_pattern: r"(?i)\b(error|fail(?:ed)?)\b".to_string(),
            invalid_pattern: r"(?i)invalid token".to_string(),
            command_pattern: r"^(?:\s*[#$>]\s+|(?:[A-Za-z]:)?[/\\]).+".to_string(),
        }
    }
}

/// Compiled form of [`ScanConfig`].
#[derive(Debug, Clone)]
pub struct ScanPatterns {
    pub error: Regex,
    pub invalid: Regex,
    pub command: Regex,
}

impl ScanConfig {
    pub fn compile(&self) -> Result<ScanPatterns, ConfigError> {
        Ok(ScanPatterns {
            error: compile(&self.error_pattern)?,
            invalid: compile(&self.invalid_pattern)?,
            command: compile(&self.command_pattern)?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// `<config_dir>/logdiff/config.yaml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logdiff").join("config.yaml"))
}

/// Load and validate the config file at `path`.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = if contents.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };
    config.validate()?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Resolve the config using the lookup order in the module docs.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_at(path);
    }
    let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)).chain(user_config_path());
    for candidate in candidates {
        if candidate.is_file() {
            return load_at(&candidate);
        }
    }
    tracing::debug!("no config file found; using defaults");
    Ok(Config::default())
}

impl Config {
    /// Compile every pattern once so bad configs fail before any work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pairing.key_regex()?;
        self.scan.compile()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_key_pattern_matches_ipv4() {
        let re = PairingConfig::default().key_regex().expect("compile");
        let caps = re.captures("192.168.0.1").expect("match");
        assert_eq!(&caps["key"], "192.168.0.1");
        assert!(re.captures("router-1").is_none());
    }

    #[test]
    fn key_may_follow_a_prefix_but_must_end_the_stem() {
        let re = PairingConfig::default().key_regex().expect("compile");
        let caps = re.captures("router-10.0.0.1").expect("match");
        assert_eq!(&caps["key"], "10.0.0.1");
        assert!(re.captures("10.0.0.1-old").is_none());
    }

    #[test]
    fn key_pattern_without_group_is_rejected() {
        let pairing = PairingConfig {
            key_pattern: r"\w+".to_string(),
            ..PairingConfig::default()
        };
        let err = pairing.key_regex().unwrap_err();
        assert!(matches!(err, ConfigError::MissingKeyGroup { .. }), "got: {err}");
    }

    #[test]
    fn default_scan_patterns_compile() {
        let patterns = ScanConfig::default().compile().expect("compile");
        assert!(patterns.error.is_match("Link FAILED on port 3"));
        assert!(patterns.command.is_match("# show version"));
        assert!(!patterns.command.is_match("plain output"));
    }
}
