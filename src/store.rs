use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Key under which the last-used gameplay options are stored
pub(crate) const SETTINGS: &str = "settings";

/// Key under which the high score table is stored
pub(crate) const HIGH_SCORES: &str = "high-scores";

/// Key under which lifetime statistics are stored
pub(crate) const STATISTICS: &str = "statistics";

/// A key-value store for data that outlives a single run of the program
pub(crate) trait Store: fmt::Debug {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), SaveError>;

    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// Fetch and deserialize the value stored under `key`, if any
pub(crate) fn load<T: DeserializeOwned>(
    store: &dyn Store,
    key: &'static str,
) -> Result<Option<T>, LoadError> {
    store
        .get(key)
        .map(|v| T::deserialize(v).map_err(|e| LoadError::deserialize(key, e)))
        .transpose()
}

/// Serialize `value` and store it under `key`
pub(crate) fn save<T: Serialize>(
    store: &mut dyn Store,
    key: &'static str,
    value: &T,
) -> Result<(), SaveError> {
    let value = serde_json::to_value(value).map_err(|e| SaveError::serialize(key, e))?;
    store.set(key, value)
}

/// A store kept as a single JSON object in a file on disk.  The whole file
/// is rewritten on every change.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FileStore {
    path: PathBuf,
    data: Map<String, Value>,
}

impl FileStore {
    /// Open the store at `path`.  A missing file is an empty store; it is
    /// not created until something is written.
    pub(crate) fn open(path: PathBuf) -> Result<FileStore, LoadError> {
        let data = match fs_err::read(&path) {
            Ok(src) => serde_json::from_slice(&src).map_err(LoadError::parse)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(LoadError::read(e)),
        };
        tracing::debug!(path = %path.display(), keys = data.len(), "opened data file");
        Ok(FileStore { path, data })
    }

    fn flush(&self) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src =
            serde_json::to_string_pretty(&self.data).map_err(|e| SaveError::serialize("data", e))?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SaveError> {
        self.data.insert(key.to_owned(), value);
        self.flush()?;
        tracing::debug!(key, path = %self.path.display(), "saved data");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        if self.data.remove(key).is_some() {
            self.flush()?;
            tracing::debug!(key, path = %self.path.display(), "removed data");
        }
        Ok(())
    }
}

/// A store that forgets everything when the program exits
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MemoryStore(Map<String, Value>);

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SaveError> {
        self.0.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.0.remove(key);
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Failed to save game data to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(key: &'static str, e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(key, e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize {0}")]
    Serialize(&'static str, #[source] serde_json::Error),
    #[error("failed to write data file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read game data from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    pub(crate) fn no_path() -> Self {
        LoadError(LoadErrorSource::NoPath)
    }

    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn parse(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Parse(e))
    }

    fn deserialize(key: &'static str, e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(key, e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read data file")]
    Read(#[source] std::io::Error),
    #[error("data file is not a JSON object")]
    Parse(#[source] serde_json::Error),
    #[error("failed to deserialize {0}")]
    Deserialize(&'static str, #[source] serde_json::Error),
}
