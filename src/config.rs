use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Display/output formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places between minor and major units (2 for cents).
    ///
    /// Only affects `*_display` fields; stored amounts are always minor units.
    pub currency_decimals: u32,

    /// Optional currency symbol (e.g. "$") prefixed to display values.
    pub currency_symbol: Option<String>,

    /// When true, render display values with thousands separators.
    pub currency_grouping: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_decimals: 2,
            currency_symbol: None,
            currency_grouping: false,
        }
    }
}

/// Ledger behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Pre-seed new accounts with zeroed months from January through the
    /// current month.
    pub seed_months: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { seed_months: true }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file location.
    /// If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    pub display: DisplayConfig,

    pub ledger: LedgerConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory against the directory holding the config.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub display: DisplayConfig,
    pub ledger: LedgerConfig,
}

impl ResolvedConfig {
    /// Load and resolve config from a file path.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        Ok(Self::from_config(config, config_dir))
    }

    /// Like [`ResolvedConfig::load`], but a missing file yields defaults with
    /// the intended config directory as data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };
        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        Ok(Self::from_config(Config::default(), config_dir))
    }

    fn from_config(config: Config, config_dir: &Path) -> Self {
        Self {
            data_dir: config.resolve_data_dir(config_dir),
            display: config.display,
            ledger: config.ledger,
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./tallybook.toml` if it exists in current directory
/// 2. `tallybook/tallybook.toml` under the platform data directory
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("tallybook.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("tallybook").join("tallybook.toml");
    }

    local_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_relative_and_absolute_data_dir() {
        let config_dir = Path::new("/srv/ledger");
        let relative = Config {
            data_dir: Some(PathBuf::from("data")),
            ..Default::default()
        };
        assert_eq!(
            relative.resolve_data_dir(config_dir),
            PathBuf::from("/srv/ledger/data")
        );

        let absolute = Config {
            data_dir: Some(PathBuf::from("/var/lib/tallybook")),
            ..Default::default()
        };
        assert_eq!(
            absolute.resolve_data_dir(config_dir),
            PathBuf::from("/var/lib/tallybook")
        );
        assert_eq!(
            Config::default().resolve_data_dir(config_dir),
            PathBuf::from("/srv/ledger")
        );
    }

    #[test]
    fn test_load_empty_config_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");
        std::fs::File::create(&config_path)?;

        let config = Config::load(&config_path)?;
        assert_eq!(config, Config::default());
        assert_eq!(config.display.currency_decimals, 2);
        assert!(config.ledger.seed_months);
        Ok(())
    }

    #[test]
    fn test_load_sections() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "data_dir = \"./ledgers\"")?;
        writeln!(file, "[display]")?;
        writeln!(file, "currency_decimals = 0")?;
        writeln!(file, "currency_symbol = \"¥\"")?;
        writeln!(file, "[ledger]")?;
        writeln!(file, "seed_months = false")?;

        let config = Config::load(&config_path)?;
        assert_eq!(config.data_dir, Some(PathBuf::from("./ledgers")));
        assert_eq!(config.display.currency_decimals, 0);
        assert_eq!(config.display.currency_symbol.as_deref(), Some("¥"));
        assert!(!config.display.currency_grouping);
        assert!(!config.ledger.seed_months);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_reported_with_path() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");
        std::fs::write(&config_path, "[display\ncurrency_decimals = ")?;

        let err = Config::load(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_resolved_config_missing_file_uses_config_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");

        let resolved = ResolvedConfig::load_or_default(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path());
        assert_eq!(resolved.display, DisplayConfig::default());
        Ok(())
    }

    #[test]
    fn test_resolved_config_resolves_relative_data_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("tallybook.toml");
        std::fs::write(&config_path, "data_dir = \"./data\"\n")?;

        let resolved = ResolvedConfig::load(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path().canonicalize()?.join("data"));
        Ok(())
    }
}
