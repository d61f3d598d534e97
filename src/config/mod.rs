pub mod defaults;
pub mod types;

pub use defaults::{default_relays, default_targets, ALLORIGINS_RELAY, CORSPROXY_RELAY};
pub use types::{Config, ConfigError, RuleConfig, TargetConfig};

use std::path::{Path, PathBuf};

impl Config {
    /// `~/.statusprobe/config.toml`
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(home.join(".statusprobe").join("config.toml"))
    }

    /// Load from the default path; a missing file yields the built-in catalog
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the built-in configuration unless a file already exists
    ///
    /// Returns the path and whether a new file was written.
    pub fn init() -> Result<(PathBuf, bool), ConfigError> {
        let path = Self::config_path()?;
        let created = Self::init_at(&path)?;
        Ok((path, created))
    }

    /// Returns `false` when the file was already present
    pub fn init_at(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Config::default().to_toml()?)?;
        Ok(true)
    }

    pub fn print(&self) -> Result<(), ConfigError> {
        println!("{}", self.to_toml()?);
        Ok(())
    }

    /// Full validation, same as resolving every target
    pub fn check(&self) -> Result<(), ConfigError> {
        self.resolve_targets().map(|_| ())
    }
}
