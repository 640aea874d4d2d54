use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV: &str = "ICONIC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {field} character {value:?}: must be ASCII punctuation other than '-' or '_'")]
    InvalidCharacter { field: &'static str, value: char },

    #[error("The {first} and {second} characters are both {value:?}")]
    DuplicateCharacter {
        first: &'static str,
        second: &'static str,
        value: char,
    },
}

/// Characters that make up shortcode syntax: `:icon|#color:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub delimiter: char,
    pub separator: char,
    pub color_prefix: char,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            delimiter: ':',
            separator: '|',
            color_prefix: '#',
        }
    }
}

impl ScanConfig {
    /// Load and validate a config file. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: ScanConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the user's config, falling back to the defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        self.validate()?;
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `$ICONIC_CONFIG` if set, otherwise `~/.config/iconic/config.toml`.
    pub fn config_path() -> PathBuf {
        Self::resolve_config_path(std::env::var(CONFIG_ENV).ok().as_deref())
    }

    fn resolve_config_path(override_path: Option<&str>) -> PathBuf {
        if let Some(path) = override_path.filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            return Self::expand_path(&path).unwrap_or(path);
        }
        let config_dir = shellexpand::tilde("~/.config/iconic");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    /// Check that the three characters can't be confused with each other or
    /// with the characters allowed inside an icon name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("delimiter", self.delimiter),
            ("separator", self.separator),
            ("color_prefix", self.color_prefix),
        ];

        for (field, value) in fields {
            if !value.is_ascii_punctuation() || is_name_char(value) {
                return Err(ConfigError::InvalidCharacter { field, value });
            }
        }

        for (i, &(first, value)) in fields.iter().enumerate() {
            if let Some(&(second, _)) = fields[i + 1..].iter().find(|&&(_, b)| b == value) {
                return Err(ConfigError::DuplicateCharacter {
                    first,
                    second,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Characters allowed in an icon name or colour besides ASCII alphanumerics.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
