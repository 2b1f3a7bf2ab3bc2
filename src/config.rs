use crate::command::Controls;
use crate::options::Options;
use crate::store::{FileStore, LoadError, MemoryStore, Store};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Default options when no options have been saved yet
    #[serde(default)]
    pub(crate) options: Options,

    /// Settings about the data file
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Extra keys for steering
    #[serde(default)]
    pub(crate) controls: Controls,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snakeduel").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                tracing::debug!(path = %path.display(), "no configuration file; using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the path of the data file: the file given in the
    /// configuration or, if that is not set, `data.json` in the local data
    /// directory
    pub(crate) fn data_file(&self) -> Option<PathBuf> {
        self.files.data_file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("snakeduel").join("data.json"))
        })
    }

    /// Open the store that settings and records are kept in.  If saving is
    /// disabled, the store only lasts as long as the program.
    pub(crate) fn open_store(&self) -> Result<Box<dyn Store>, LoadError> {
        if !self.files.save_data {
            tracing::info!("saving disabled; keeping data in memory");
            return Ok(Box::new(MemoryStore::default()));
        }
        let path = self.data_file().ok_or_else(LoadError::no_path)?;
        Ok(Box::new(FileStore::open(path)?))
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which settings, high scores, and statistics are stored
    data_file: Option<PathBuf>,

    /// Whether to load & save data in a file
    save_data: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            data_file: None,
            save_data: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    data_file: Option<String>,
    save_data: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            data_file: None,
            save_data: true,
        }
    }
}

impl From<RawFileConfig> for FileConfig {
    fn from(value: RawFileConfig) -> FileConfig {
        FileConfig {
            data_file: value.data_file.map(|p| expand_home(&p)),
            save_data: value.save_data,
        }
    }
}

/// Expand a leading `~` in a path to the user's home directory, if known
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => Some(""),
        Some(rest) => rest.strip_prefix(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR),
        None => None,
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
