use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::language_utils;
use crate::providers::google::DEFAULT_ENDPOINT;

/// Application configuration module
/// This module handles the application configuration including loading and
/// validating configuration settings. Every field has a default, so a partial
/// (or missing) configuration file is always usable.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO, optional region)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO, optional region)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Proxy for the translation requests
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Root of the default job layout
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Delay between strings sent to the translator, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Input/output directory pairs; empty means the layout below `base_dir`
    #[serde(default)]
    pub jobs: Vec<JobConfig>,

    /// Catalog file extensions
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Locations of dictionaries, cache, review lists and error log
    #[serde(default)]
    pub stores: StoreConfig,

    /// Translation endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// One input tree and where its rewritten catalogs go
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct JobConfig {
    // @field: Catalog file or directory to read
    pub input: PathBuf,

    // @field: Directory receiving the rewritten catalogs
    pub output: PathBuf,
}

impl JobConfig {
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(input: P1, output: P2) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Key-value store locations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    // @field: word -> target phrase
    #[serde(default = "default_words_dictionary")]
    pub words_dictionary: PathBuf,

    // @field: phrase -> target phrase
    #[serde(default = "default_phrases_dictionary")]
    pub phrases_dictionary: PathBuf,

    // @field: source string -> translation
    #[serde(default = "default_cache")]
    pub cache: PathBuf,

    // @field: translations identical to their source
    #[serde(default = "default_unchanged")]
    pub unchanged: PathBuf,

    // @field: sources with characters outside the safe set
    #[serde(default = "default_needs_review")]
    pub needs_review: PathBuf,

    // @field: append-only failure log
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            words_dictionary: default_words_dictionary(),
            phrases_dictionary: default_phrases_dictionary(),
            cache: default_cache(),
            unchanged: default_unchanged(),
            needs_review: default_needs_review(),
            error_log: default_error_log(),
        }
    }
}

/// Translation endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retries for transient failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the `log` facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

// Implement FromStr trait for LogLevel
impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "pt".to_string()
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./Hercules")
}

fn default_delay_ms() -> u64 {
    500 // 500ms default delay between requests
}

fn default_extensions() -> Vec<String> {
    vec!["pot".to_string()]
}

fn default_words_dictionary() -> PathBuf {
    PathBuf::from("dictionary_words.json")
}

fn default_phrases_dictionary() -> PathBuf {
    PathBuf::from("dictionary_phrases.json")
}

fn default_cache() -> PathBuf {
    PathBuf::from("translation_cache.json")
}

fn default_unchanged() -> PathBuf {
    PathBuf::from("review_unchanged.json")
}

fn default_needs_review() -> PathBuf {
    PathBuf::from("review_needed.json")
}

fn default_error_log() -> PathBuf {
    PathBuf::from("translation_errors.log")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

impl Config {
    /// Load a configuration file. A missing file yields the defaults and is not created.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Jobs to run: the configured list, or the two default trees below `base_dir`
    pub fn effective_jobs(&self) -> Vec<JobConfig> {
        if !self.jobs.is_empty() {
            return self.jobs.clone();
        }

        let target_root = self.base_dir.join(&self.target_language);
        vec![
            JobConfig::new(self.base_dir.join("translations_pre"), target_root.join("pre")),
            JobConfig::new(self.base_dir.join("translations_re"), target_root.join("re")),
        ]
    }

    /// Delay between translated strings
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .with_context(|| "Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .with_context(|| "Invalid target language")?;

        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language are the same: {}",
                self.source_language
            ));
        }

        if let Some(proxy) = &self.proxy_url {
            let url = Url::parse(proxy).with_context(|| format!("Invalid proxy URL: {}", proxy))?;
            if !matches!(url.scheme(), "http" | "https" | "socks5" | "socks5h") {
                return Err(anyhow!("Unsupported proxy scheme: {}", url.scheme()));
            }
        }

        Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid translation endpoint: {}", self.provider.endpoint))?;

        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(anyhow!("At least one catalog extension is required"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            proxy_url: None,
            base_dir: default_base_dir(),
            delay_ms: default_delay_ms(),
            jobs: Vec::new(),
            extensions: default_extensions(),
            stores: StoreConfig::default(),
            provider: ProviderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
