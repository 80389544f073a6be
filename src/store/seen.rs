use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read seen-set {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write seen-set {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("seen-set {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
}

/// Durable set of job ids already reported as new.
///
/// The set only grows. Callers are expected to run one check at a time.
pub trait SeenStore: Send {
    fn contains(&self, id: &str) -> bool;

    /// Add `ids` and persist before returning. Ids already present are
    /// ignored. Returns how many ids were actually added.
    fn mark_seen(&mut self, ids: &[String]) -> Result<usize, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable location of the backing record
    fn location(&self) -> String;
}

/// On-disk layout: `{"seen_ids": [...]}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    #[serde(default)]
    seen_ids: BTreeSet<String>,
}

/// [`SeenStore`] backed by a single JSON file that is rewritten in full on
/// every mutation. Sized for hundreds to low thousands of ids.
#[derive(Debug)]
pub struct FileSeenStore {
    path: PathBuf,
    ids: BTreeSet<String>,
}

impl FileSeenStore {
    /// Load the store from `path`. A missing file is an empty store; an
    /// unreadable or unparsable one is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            info!("Seen-set {} not found, starting empty", path.display());
            return Ok(Self {
                path,
                ids: BTreeSet::new(),
            });
        }

        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let file: SeenFile = if raw.trim().is_empty() {
            SeenFile::default()
        } else {
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: path.display().to_string(),
                source,
            })?
        };

        info!("Loaded {} seen job ids from {}", file.seen_ids.len(), path.display());
        Ok(Self {
            path,
            ids: file.seen_ids,
        })
    }

    /// Write the whole set: temp file in the same directory, synced to disk,
    /// then renamed over the old record.
    fn save(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let body = serde_json::to_string_pretty(&SeenFileRef { seen_ids: &self.ids })
            .map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = File::create(&tmp).map_err(write_err)?;
        file.write_all(body.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(write_err)?;

        debug!("Saved {} seen job ids to {}", self.ids.len(), self.path.display());
        Ok(())
    }
}

#[derive(Serialize)]
struct SeenFileRef<'a> {
    seen_ids: &'a BTreeSet<String>,
}

impl SeenStore for FileSeenStore {
    fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark_seen(&mut self, ids: &[String]) -> Result<usize, StoreError> {
        let added: Vec<String> = ids
            .iter()
            .filter(|id| self.ids.insert((*id).clone()))
            .cloned()
            .collect();

        if added.is_empty() {
            return Ok(0);
        }

        // Keep memory and disk in agreement if the write fails
        if let Err(e) = self.save() {
            for id in &added {
                self.ids.remove(id);
            }
            return Err(e);
        }

        info!("Added {} new job ids to seen-set", added.len());
        Ok(added.len())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
