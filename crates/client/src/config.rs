//! Client configuration read from `PALLADIUM_*` environment variables.
//!
//! A `.env` file in the working directory is loaded first, so every key can
//! also live there.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use palladium_core::RulesConfig;
use palladium_runtime::RuntimeConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// RON roster with the actors that join the skirmish.
    pub roster: PathBuf,
    /// Optional TOML rules overrides.
    pub rules: Option<PathBuf>,
    /// Fixed dice seed; entropy when unset.
    pub seed: Option<u64>,
    /// Write logs to a file as well as stderr.
    pub log_to_file: bool,
    /// Log directory; the platform cache dir when unset.
    pub log_dir: Option<PathBuf>,
    pub settle_timeout: Duration,
    pub max_turns: usize,
}

impl ClientConfig {
    pub const DEFAULT_MAX_TURNS: usize = 40;

    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        fn parse_with<T: FromStr>(read: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            read(key).and_then(|value| parse_value(key, &value))
        }

        Self {
            roster: read("PALLADIUM_ROSTER")
                .map(PathBuf::from)
                .unwrap_or_else(default_roster),
            rules: read("PALLADIUM_RULES").map(PathBuf::from),
            seed: parse_with(&read, "PALLADIUM_SEED"),
            log_to_file: parse_with(&read, "PALLADIUM_LOG_FILE").unwrap_or(false)
                || read("PALLADIUM_LOG_DIR").is_some(),
            log_dir: read("PALLADIUM_LOG_DIR").map(PathBuf::from),
            settle_timeout: parse_with(&read, "PALLADIUM_SETTLE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(
                    RuntimeConfig::DEFAULT_SETTLE_TIMEOUT_MS,
                )),
            max_turns: parse_with(&read, "PALLADIUM_MAX_TURNS").unwrap_or(Self::DEFAULT_MAX_TURNS),
        }
    }

    pub fn runtime_config(&self, rules: RulesConfig) -> RuntimeConfig {
        RuntimeConfig::default()
            .with_rules(rules)
            .with_settle_timeout(self.settle_timeout)
    }
}

fn default_roster() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("roster.ron")
}

/// Malformed values are ignored with a warning instead of failing startup.
fn parse_value<T: FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        eprintln!("ignoring {key}={value:?}: not a valid value");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert!(config.roster.ends_with("assets/roster.ron"));
        assert_eq!(config.rules, None);
        assert_eq!(config.seed, None);
        assert!(!config.log_to_file);
        assert_eq!(
            config.settle_timeout,
            Duration::from_millis(RuntimeConfig::DEFAULT_SETTLE_TIMEOUT_MS)
        );
        assert_eq!(config.max_turns, ClientConfig::DEFAULT_MAX_TURNS);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PALLADIUM_ROSTER", "/tmp/table.ron"),
            ("PALLADIUM_RULES", "/tmp/rules.toml"),
            ("PALLADIUM_SEED", "42"),
            ("PALLADIUM_LOG_DIR", "/tmp/logs"),
            ("PALLADIUM_SETTLE_TIMEOUT_MS", "10"),
            ("PALLADIUM_MAX_TURNS", "3"),
        ]);
        assert_eq!(config.roster, PathBuf::from("/tmp/table.ron"));
        assert_eq!(config.rules, Some(PathBuf::from("/tmp/rules.toml")));
        assert_eq!(config.seed, Some(42));
        assert!(config.log_to_file);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.settle_timeout, Duration::from_millis(10));
        assert_eq!(config.max_turns, 3);

        let runtime = config.runtime_config(RulesConfig::default());
        assert_eq!(runtime.settle_timeout, Duration::from_millis(10));
    }

    #[test]
    fn malformed_and_blank_values_fall_back() {
        let config = config(&[
            ("PALLADIUM_SEED", "forty-two"),
            ("PALLADIUM_RULES", "  "),
            ("PALLADIUM_LOG_FILE", "true"),
        ]);
        assert_eq!(config.seed, None);
        assert_eq!(config.rules, None);
        assert!(config.log_to_file);
        assert_eq!(config.log_dir, None);
    }
}
