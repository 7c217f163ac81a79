/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::PathBuf;

use pot_translate::app_config::{Config, JobConfig, LogLevel};

use crate::common;

#[test]
fn test_default_shouldMatchDocumentedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt");
    assert_eq!(config.proxy_url, None);
    assert_eq!(config.base_dir, PathBuf::from("./Hercules"));
    assert_eq!(config.delay_ms, 500);
    assert_eq!(config.extensions, vec!["pot".to_string()]);
    assert_eq!(config.stores.cache, PathBuf::from("translation_cache.json"));
    assert_eq!(config.provider.retry_count, 2);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_withMissingFile_shouldUseDefaultsWithoutCreatingIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("pot-translate.json");

    let config = Config::load(&path)?;

    assert_eq!(config.target_language, "pt");
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "pot-translate.json",
        r#"{
            "target_language": "es",
            "delay_ms": 0,
            "stores": { "cache": "cache/es.json" },
            "jobs": [{ "input": "in", "output": "out" }],
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "es");
    assert_eq!(config.delay_ms, 0);
    assert_eq!(config.stores.cache, PathBuf::from("cache/es.json"));
    assert_eq!(config.stores.error_log, PathBuf::from("translation_errors.log"));
    assert_eq!(config.effective_jobs(), vec![JobConfig::new("in", "out")]);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_load_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "pot-translate.json", "{ nope")?;

    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn test_effectiveJobs_shouldFollowTargetLanguage() {
    let config = Config {
        base_dir: PathBuf::from("/srv/ro"),
        target_language: "es".to_string(),
        ..Config::default()
    };

    assert_eq!(
        config.effective_jobs(),
        vec![
            JobConfig::new("/srv/ro/translations_pre", "/srv/ro/es/pre"),
            JobConfig::new("/srv/ro/translations_re", "/srv/ro/es/re"),
        ]
    );
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let config = Config {
        target_language: "klingon".to_string(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withRegionalTarget_shouldSucceed() {
    let config = Config {
        target_language: "pt-BR".to_string(),
        ..Config::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withoutExtensions_shouldFail() {
    let config = Config {
        extensions: vec![".".to_string()],
        ..Config::default()
    };

    assert!(config.validate().is_err());
}
