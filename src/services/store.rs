//! JSON file persistence for the destination catalog and derived data.
use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{error::StoreError, models::Destination};

/// Loads the destination catalog from a JSON array
///
/// Fails on a missing file, unreadable file, or any record without a
/// string `name`, string `iata` and array `categories`.
pub fn load_destinations(path: impl AsRef<Path>) -> Result<Vec<Destination>, StoreError> {
    let destinations: Vec<Destination> = load_json(path.as_ref())?;

    tracing::info!(
        path = %path.as_ref().display(),
        count = destinations.len(),
        "Loaded destinations"
    );

    Ok(destinations)
}

/// Loads a JSON array of preference tags
pub fn load_preferences(path: impl AsRef<Path>) -> Result<Vec<String>, StoreError> {
    load_json(path.as_ref())
}

/// Writes `value` as UTF-8 JSON with 4-space indentation
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), StoreError> {
    let path = path.as_ref();

    // Serialize first; an existing file is untouched if this fails
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|source| StoreError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(&buf).map_err(io_err)?;

    tracing::debug!(path = %path.display(), bytes = buf.len(), "Saved JSON file");

    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
