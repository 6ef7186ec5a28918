//! File-backed implementation of the preference store.
//!
//! The whole store is a single CBOR-encoded string map on disk. Every write
//! rewrites the file through a temporary sibling followed by a rename, so a
//! crash mid-write leaves the previous contents intact. A missing file reads
//! as an empty store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{PreferenceStore, StoreError, StoreResult};

/// Suffix appended to the store path for the temporary write target.
const TMP_SUFFIX: &str = ".tmp";

/// A [`PreferenceStore`] persisted as a CBOR map at a fixed path.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes load-modify-store cycles across threads.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not created until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<HashMap<String, String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(err) => {
                return Err(StoreError::io(
                    format!("reading {}", self.path.display()),
                    err,
                ));
            }
        };
        ciborium::de::from_reader(bytes.as_slice()).map_err(|err| {
            StoreError::deserialization(format!(
                "decoding {}: {err}",
                self.path.display()
            ))
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    StoreError::io(format!("creating {}", parent.display()), err)
                })?;
            }
        }

        let mut encoded = Vec::new();
        ciborium::ser::into_writer(entries, &mut encoded).map_err(|err| {
            StoreError::serialization(format!("encoding preference map: {err}"))
        })?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &encoded)
            .map_err(|err| StoreError::io(format!("writing {}", tmp.display()), err))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            StoreError::io(
                format!("renaming {} over {}", tmp.display(), self.path.display()),
                err,
            )
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.load()?.contains_key(key))
    }

    fn clear_all(&self) -> StoreResult<()> {
        let _guard = self.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::io(
                format!("removing {}", self.path.display()),
                err,
            )),
        }
    }
}
