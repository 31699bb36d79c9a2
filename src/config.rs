//! Configuration loading
//!
//! Sources, later ones win:
//! 1. Built-in defaults
//! 2. `~/.recordbook/config.yaml` (or the file given with `--config`)
//! 3. Overrides from the command line / `RECORDBOOK_URL`

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigError;
use crate::models::ApiDialect;

/// Resolved runtime configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Server root, e.g. `http://localhost:3000`
    pub base_url: String,
    pub dialect: ApiDialect,
    pub timeout_secs: u64,
    /// Ask before deleting a record
    pub confirm_delete: bool,
    /// Directory the log file is written to
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: String::from(DEFAULT_BASE_URL),
            dialect: ApiDialect::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            confirm_delete: true,
            log_dir: config_dir(),
        }
    }
}

/// On-disk shape; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    base_url: Option<String>,
    dialect: Option<ApiDialect>,
    timeout_secs: Option<u64>,
    confirm_delete: Option<bool>,
    log_dir: Option<PathBuf>,
}

/// Values supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub dialect: Option<ApiDialect>,
    pub timeout_secs: Option<u64>,
    pub no_confirm: bool,
}

/// `~/.recordbook`, falling back to the working directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

impl Config {
    /// Load the layered configuration.
    ///
    /// An explicitly given `path` must exist; the default file may be missing.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        let file = match path {
            Some(p) => Some(load_file(p)?),
            None => {
                let default_path = config_dir().join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Some(load_file(&default_path)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            config.apply_file(file);
        }
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(dialect) = file.dialect {
            self.dialect = dialect;
        }
        if let Some(timeout) = file.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(confirm) = file.confirm_delete {
            self.confirm_delete = confirm;
        }
        if let Some(dir) = file.log_dir {
            self.log_dir = dir;
        }
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.base_url {
            self.base_url = url.clone();
        }
        if let Some(dialect) = overrides.dialect {
            self.dialect = dialect;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if overrides.no_confirm {
            self.confirm_delete = false;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                message: format!("base_url must start with http:// or https://, got '{}'", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: String::from("timeout_secs must be greater than zero"),
            });
        }
        Ok(())
    }

    /// Join an API path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_file_then_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "base_url: http://10.0.0.5:8000/").unwrap();
        writeln!(file, "dialect: todos").unwrap();
        writeln!(file, "timeout_secs: 5").unwrap();

        let config = Config::load(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.dialect, ApiDialect::Todos);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.confirm_delete);
        assert_eq!(config.url("/api/list"), "http://10.0.0.5:8000/api/list");

        let overrides = Overrides {
            base_url: Some("https://records.example.com".into()),
            no_confirm: true,
            ..Default::default()
        };
        let config = Config::load(Some(&path), &overrides).unwrap();
        assert_eq!(config.base_url, "https://records.example.com");
        assert_eq!(config.dialect, ApiDialect::Todos);
        assert!(!config.confirm_delete);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.yaml")), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "base_uri: http://x\n").unwrap();
        let result = Config::load(Some(&path), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_url = Overrides {
            base_url: Some("localhost:3000".into()),
            ..Default::default()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "{}\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), &bad_url),
            Err(ConfigError::Invalid { .. })
        ));

        let zero_timeout = Overrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::load(Some(&path), &zero_timeout),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
