//! Store configuration
//!
//! Where the CIB lives and how to log, resolved from (highest first) the
//! `-f/--file` flag, `CIBCTL_CIB_FILE`, a `cibctl.toml` file and built-in
//! defaults. The config file is `CIBCTL_CONFIG` when set, otherwise
//! `cibctl.toml` in the working directory if present.
//!
//! ```
//! use cibctl_store::StoreConfig;
//!
//! let config = StoreConfig::from_toml_str(r#"
//!     cib_file = "/tmp/cib.xml"
//!     log_profile = "production"
//! "#).unwrap();
//!
//! assert_eq!(config.cib_path().to_str(), Some("/tmp/cib.xml"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use cibctl_core::logging_facility::Profile;

use crate::errors::{config_error, io_error, Result};

/// Pacemaker's live CIB
pub const DEFAULT_CIB_FILE: &str = "/var/lib/pacemaker/cib/cib.xml";

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "cibctl.toml";

pub const ENV_CIB_FILE: &str = "CIBCTL_CIB_FILE";
pub const ENV_CONFIG: &str = "CIBCTL_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// CIB document to read and write
    #[serde(default)]
    pub cib_file: Option<PathBuf>,

    /// `development`, `production` or `test`
    #[serde(default)]
    pub log_profile: Option<String>,
}

impl StoreConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// `InvalidInput` on malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| config_error("<string>", e))
    }

    /// Read and parse a config file
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, `InvalidInput` when it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
        toml::from_str(&contents).map_err(|e| config_error(&path.display().to_string(), e))
    }

    /// Apply the precedence rules
    ///
    /// `env` looks up environment variables; `cwd` is where `cibctl.toml`
    /// is searched.
    ///
    /// # Errors
    ///
    /// As for [`StoreConfig::load`]. An explicit `CIBCTL_CONFIG` must exist;
    /// a missing `cibctl.toml` is not an error.
    pub fn resolve(
        file_flag: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self> {
        let mut config = match env(ENV_CONFIG) {
            Some(path) => Self::load(path)?,
            None => {
                let local = cwd.join(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::load(local)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(path) = env(ENV_CIB_FILE).filter(|p| !p.is_empty()) {
            config.cib_file = Some(PathBuf::from(path));
        }
        if let Some(path) = file_flag {
            config.cib_file = Some(path.to_path_buf());
        }

        tracing::debug!(cib_file = %config.cib_path().display(), "store config resolved");
        Ok(config)
    }

    /// Resolve against the process environment and working directory
    ///
    /// # Errors
    ///
    /// As for [`StoreConfig::resolve`], plus `Io` if the working directory
    /// is unavailable.
    pub fn from_env(file_flag: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| io_error("load_config", e))?;
        Self::resolve(file_flag, |key| std::env::var(key).ok(), &cwd)
    }

    pub fn cib_path(&self) -> PathBuf {
        self.cib_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CIB_FILE))
    }

    /// Logging profile, development unless configured
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an unknown profile name.
    pub fn log_profile(&self) -> Result<Profile> {
        match &self.log_profile {
            Some(name) => name
                .parse::<Profile>()
                .map_err(|e| config_error("log_profile", e)),
            None => Ok(Profile::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config.cib_path(), PathBuf::from(DEFAULT_CIB_FILE));
        assert_eq!(config.log_profile().unwrap(), Profile::Development);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = StoreConfig::from_toml_str("cib = \"x\"").unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_INPUT");
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let config = StoreConfig::from_toml_str("log_profile = \"loud\"").unwrap();
        assert!(config.log_profile().is_err());
    }
}
