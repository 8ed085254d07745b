use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection {0} not found")]
    NotFound(String),
    #[error("failed to parse collection {name}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("i/o error on collection {name}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Flat-file record store: one JSON array per collection, stored as
/// `<data_dir>/<collection>.json`, UTF-8, pretty-printed. Writes are full
/// overwrites with no locking; two concurrent writers to the same collection
/// are last-write-wins. Accepted for the target scale.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }

    /// Strict read: the caller decides what each failure mode means.
    pub fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        self.load_document(collection)
    }

    /// Strict read of a collection file with an arbitrary top-level shape.
    /// Most collections are flat arrays; the exam catalog files carry an
    /// object wrapper.
    pub fn load_document<T: DeserializeOwned>(&self, collection: &str) -> Result<T, StoreError> {
        let path = self.collection_path(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(collection.to_string()));
            }
            Err(err) => {
                return Err(StoreError::Io {
                    name: collection.to_string(),
                    source: err,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|err| StoreError::Parse {
            name: collection.to_string(),
            source: err,
        })
    }

    /// Lenient read: an absent collection is empty; an unreadable or
    /// unparsable one is logged and read as empty instead of failing the
    /// request that triggered the load.
    pub fn load_or_default<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        match self.load(collection) {
            Ok(records) => records,
            Err(StoreError::NotFound(_)) => Vec::new(),
            Err(err) => {
                tracing::warn!("Treating collection {} as empty: {:#}", collection, err);
                Vec::new()
            }
        }
    }

    /// Full overwrite of the collection, creating the data directory on
    /// first use.
    pub fn save<T: Serialize>(&self, collection: &str, records: &[T]) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| StoreError::Io {
                name: collection.to_string(),
                source: err,
            })?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|err| StoreError::Parse {
            name: collection.to_string(),
            source: err,
        })?;

        fs::write(&path, json).map_err(|err| StoreError::Io {
            name: collection.to_string(),
            source: err,
        })
    }

    pub fn ensure_data_dir(&self) -> Result<(), io::Error> {
        fs::create_dir_all(&self.data_dir)
    }
}
