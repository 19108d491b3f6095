//! Rules configuration loader.

use std::path::Path;

use palladium_core::{Formula, RulesConfig};

use crate::loaders::{LoadResult, read_file};

/// Loader for rules configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load rules config from a TOML file.
    ///
    /// Missing keys fall back to [`RulesConfig::default`]. The initiative
    /// formula is parsed eagerly so a typo fails at startup rather than at the
    /// first round change.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules config TOML: {}", e))?;

        Formula::parse(&config.initiative_formula).map_err(|e| {
            anyhow::anyhow!(
                "Invalid initiative formula '{}': {}",
                config.initiative_formula,
                e
            )
        })?;

        if config.skill_cap <= 0 {
            anyhow::bail!("skill_cap must be positive, got {}", config.skill_cap);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ranged_minimum_roll = 10\nskill_cap = 95").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.ranged_minimum_roll, 10);
        assert_eq!(config.skill_cap, 95);
        assert_eq!(config.melee_minimum_roll, RulesConfig::DEFAULT_MELEE_MINIMUM_ROLL);
        assert_eq!(config.initiative_formula, RulesConfig::DEFAULT_INITIATIVE_FORMULA);
    }

    #[test]
    fn bad_initiative_formula_is_rejected() {
        let err = ConfigLoader::parse("initiative_formula = \"1d20 +\"").unwrap_err();
        assert!(err.to_string().contains("Invalid initiative formula"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/rules.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rules.toml"));
    }
}
