use anyhow::{Context, Result};
use cheonma_classify::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_cheonma_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub locale: LocaleSection,
    pub ai: AiSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocaleSection {
    /// IANA name; the injected `now` is read in this zone
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiSection {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Used when the server reports no confidence of its own.
    pub hint_confidence: f64,
}

impl Default for LocaleSection {
    fn default() -> Self {
        Self {
            timezone: "Asia/Seoul".to_string(),
        }
    }
}

impl Default for AiSection {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 5,
            hint_confidence: 0.8,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cheonma_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.locale.timezone, "Asia/Seoul");
        assert!(!cfg.ai.enabled);
        assert!(!cfg.classifier.clock_time_evidence);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let cfg = parse_config(
            r#"
[ai]
enabled = true
base_url = "http://10.0.0.5:8000"

[classifier]
clock_time_evidence = true
"#,
        )
        .unwrap();
        assert!(cfg.ai.enabled);
        assert_eq!(cfg.ai.base_url, "http://10.0.0.5:8000");
        assert_eq!(cfg.ai.timeout_secs, 5);
        assert_eq!(cfg.ai.hint_confidence, 0.8);
        assert!(cfg.classifier.clock_time_evidence);
        assert_eq!(cfg.locale.timezone, "Asia/Seoul");
    }

    #[test]
    fn test_default_serializes_and_reads_back() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(s.contains("[locale]"));
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(parse_config("[ai\nenabled = ").is_err());
    }
}
