//! JSON helpers shared by the network files.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::NetworkError;

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, NetworkError> {
    let contents = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| NetworkError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize to pretty JSON, creating parent directories if needed.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), NetworkError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| NetworkError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| NetworkError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::write(path, json).map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })
}
