use serde::{Deserialize, Serialize};

/// Classifier tuning, read from the `[classifier]` config section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Let time-of-day evidence use the injected clock when the utterance
    /// states no time.
    pub clock_time_evidence: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let cfg: ClassifierConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ClassifierConfig::default());

        let cfg: ClassifierConfig = toml::from_str("clock_time_evidence = true").unwrap();
        assert!(cfg.clock_time_evidence);
    }
}
