//! Capability-based helpers for reading the JSON files the CLI accepts.
#![forbid(unsafe_code)]

use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while loading a JSON document from disk.
#[derive(Debug, Error)]
pub enum JsonFileError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The contents were not the expected JSON shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve the parent directory of `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_string();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Read the whole file at `path` as UTF-8 text.
pub fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Read and deserialise the JSON document at `path`.
///
/// # Errors
///
/// Returns [`JsonFileError::Io`] when the file cannot be read and
/// [`JsonFileError::Parse`] when it does not decode as `T`.
pub fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, JsonFileError> {
    let contents = read_utf8(path).map_err(|source| JsonFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        (dir, root)
    }

    #[rstest]
    fn reads_json_documents(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let path = root.join("relocations.json");
        std::fs::write(&path, r#"{ "1": "Leopoldstraße 1" }"#).expect("write fixture");

        let decoded: BTreeMap<u32, String> = read_json(&path).expect("json decodes");

        assert_eq!(decoded.get(&1).map(String::as_str), Some("Leopoldstraße 1"));
    }

    #[rstest]
    fn reports_missing_files_with_their_path(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let path = root.join("absent.json");

        let err = read_json::<serde_json::Value>(&path).expect_err("file is missing");

        match err {
            JsonFileError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Io error, found {other:?}"),
        }
    }

    #[rstest]
    fn reports_malformed_json(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let path = root.join("broken.json");
        std::fs::write(&path, "{ not json").expect("write fixture");

        let err = read_json::<serde_json::Value>(&path).expect_err("invalid json");

        assert!(matches!(err, JsonFileError::Parse { .. }));
    }

    #[rstest]
    fn distinguishes_files_from_directories(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let path = root.join("roster.json");
        std::fs::write(&path, "[]").expect("write fixture");

        assert!(file_is_file(&path).expect("metadata"));
        assert!(!file_is_file(&root).unwrap_or(false));
    }
}
