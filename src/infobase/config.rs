use crate::error::{InfobaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "information_database.json";

/// How new records get their ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// `collection size + 1`. After a delete this can hand out an id that
    /// is still held by another record.
    #[default]
    Compact,
    /// One past the highest id seen by this store; ids are never reused
    /// while the store is open.
    Monotonic,
}

/// How a search query is matched when counting occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// The lower-cased query is used as a regular expression.
    #[default]
    Regex,
    /// The query is matched as plain text.
    Literal,
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::Compact => f.write_str("compact"),
            IdPolicy::Monotonic => f.write_str("monotonic"),
        }
    }
}

impl FromStr for IdPolicy {
    type Err = InfobaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(IdPolicy::Compact),
            "monotonic" => Ok(IdPolicy::Monotonic),
            other => Err(InfobaseError::Config(format!(
                "Invalid id policy '{}' (expected compact or monotonic)",
                other
            ))),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Regex => f.write_str("regex"),
            QueryMode::Literal => f.write_str("literal"),
        }
    }
}

impl FromStr for QueryMode {
    type Err = InfobaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "regex" => Ok(QueryMode::Regex),
            "literal" => Ok(QueryMode::Literal),
            other => Err(InfobaseError::Config(format!(
                "Invalid query mode '{}' (expected regex or literal)",
                other
            ))),
        }
    }
}

/// Configuration for an information store, stored in `<home>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfobaseConfig {
    /// Data file name, relative to the home directory unless absolute
    #[serde(default = "default_data_file")]
    pub data_file: String,

    #[serde(default)]
    pub id_policy: IdPolicy,

    #[serde(default)]
    pub query_mode: QueryMode,

    /// Apply the creation checks (title, article content) to updates as well
    #[serde(default)]
    pub validate_updates: bool,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

impl Default for InfobaseConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            id_policy: IdPolicy::default(),
            query_mode: QueryMode::default(),
            validate_updates: false,
        }
    }
}

impl InfobaseConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(InfobaseError::Io)?;
        let config: InfobaseConfig =
            serde_json::from_str(&content).map_err(InfobaseError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(InfobaseError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(InfobaseError::Serialization)?;
        fs::write(config_path, content).map_err(InfobaseError::Io)?;
        Ok(())
    }

    /// Resolves the data file against the home directory.
    pub fn data_path(&self, home: &Path) -> PathBuf {
        let file = Path::new(&self.data_file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            home.join(file)
        }
    }

    /// Sets a key by its CLI name (`data-file`, `id-policy`, `query-mode`,
    /// `validate-updates`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data-file" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(InfobaseError::Config("data-file cannot be empty".into()));
                }
                self.data_file = value.to_string();
            }
            "id-policy" => self.id_policy = value.parse()?,
            "query-mode" => self.query_mode = value.parse()?,
            "validate-updates" => {
                self.validate_updates = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(InfobaseError::Config(format!(
                            "Invalid boolean '{}' for validate-updates",
                            other
                        )))
                    }
                };
            }
            other => return Err(InfobaseError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "data-file" => Ok(self.data_file.clone()),
            "id-policy" => Ok(self.id_policy.to_string()),
            "query-mode" => Ok(self.query_mode.to_string()),
            "validate-updates" => Ok(self.validate_updates.to_string()),
            other => Err(InfobaseError::Config(format!("Unknown config key: {}", other))),
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["data-file", "id-policy", "query-mode", "validate-updates"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = InfobaseConfig::default();
        assert_eq!(config.data_file, "information_database.json");
        assert_eq!(config.id_policy, IdPolicy::Compact);
        assert_eq!(config.query_mode, QueryMode::Regex);
        assert!(!config.validate_updates);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = InfobaseConfig::load(dir.path()).unwrap();
        assert_eq!(config, InfobaseConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");

        let mut config = InfobaseConfig::default();
        config.set("id-policy", "monotonic").unwrap();
        config.set("query-mode", "LITERAL").unwrap();
        config.save(&nested).unwrap();

        let loaded = InfobaseConfig::load(&nested).unwrap();
        assert_eq!(loaded.id_policy, IdPolicy::Monotonic);
        assert_eq!(loaded.query_mode, QueryMode::Literal);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"query_mode": "literal"}"#,
        )
        .unwrap();

        let config = InfobaseConfig::load(dir.path()).unwrap();
        assert_eq!(config.query_mode, QueryMode::Literal);
        assert_eq!(config.data_file, "information_database.json");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = InfobaseConfig::default();
        assert!(config.set("id-policy", "random").is_err());
        assert!(config.set("validate-updates", "maybe").is_err());
        assert!(config.set("colour", "red").is_err());
        assert!(config.set("data-file", " ").is_err());

        config.set("validate-updates", "yes").unwrap();
        assert_eq!(config.get("validate-updates").unwrap(), "true");
    }

    #[test]
    fn test_data_path_resolution() {
        let home = Path::new("/tmp/infobase-home");
        let mut config = InfobaseConfig::default();
        assert_eq!(
            config.data_path(home),
            home.join("information_database.json")
        );

        let absolute = std::env::temp_dir().join("elsewhere.json");
        config.data_file = absolute.to_string_lossy().into_owned();
        assert_eq!(config.data_path(home), absolute);
    }
}
