/// File-backed record store
///
/// Every record set is persisted as one pretty-printed JSON array. Reads load
/// and decode the whole file; writes serialize the whole collection and
/// replace the file contents.
///
/// # Consistency
///
/// There is no locking and no atomic rename. Two overlapping read-modify-write
/// cycles on the same set race and the later write wins. Callers always get
/// owned copies of the records, so nothing they mutate reaches disk until they
/// call [`RecordStore::write_all`].
///
/// # Read leniency
///
/// A missing, unreadable or unparseable file is logged and read back as an
/// empty set. A single record that parses but does not fit its model is
/// skipped on read and carried through writes by [`RecordStore::load`] and
/// [`RecordStore::save`]. Only write failures surface as [`StoreError`].
///
/// # Example
///
/// ```no_run
/// use toolbox_shared::db::{RecordSet, RecordStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RecordStore::new("/var/lib/ai-toolbox");
/// store.init().await?;
///
/// let mut favorites: Vec<serde_json::Value> = store.read_all(RecordSet::Favorites).await;
/// favorites.clear();
/// store.write_all(RecordSet::Favorites, &favorites).await?;
/// # Ok(())
/// # }
/// ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One of the independent JSON-backed collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSet {
    /// Registered user accounts
    Users,

    /// Per-user, per-tool usage counters
    ToolUsage,

    /// Per-user favorite tools
    Favorites,

    /// Tool feedback (declared, never written by handlers)
    Feedback,
}

impl RecordSet {
    /// Every record set, in initialization order
    pub const ALL: [RecordSet; 4] = [
        RecordSet::Users,
        RecordSet::ToolUsage,
        RecordSet::Favorites,
        RecordSet::Feedback,
    ];

    /// File name of the set inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            RecordSet::Users => "users.json",
            RecordSet::ToolUsage => "tool_usage.json",
            RecordSet::Favorites => "favorites.json",
            RecordSet::Feedback => "feedback.json",
        }
    }

    /// Short name used in logs and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSet::Users => "users",
            RecordSet::ToolUsage => "tool_usage",
            RecordSet::Favorites => "favorites",
            RecordSet::Feedback => "feedback",
        }
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for store writes and initialization
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The data directory could not be created
    #[error("Failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be serialized
    #[error("Failed to encode {set} records: {source}")]
    Encode {
        set: RecordSet,
        #[source]
        source: serde_json::Error,
    },

    /// The set file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Contents of a set read for modification
///
/// `records` holds what decoded; entries that did not are kept aside so
/// [`RecordStore::save`] never drops them.
#[derive(Debug)]
pub struct Loaded<T> {
    /// Decoded records, in file order
    pub records: Vec<T>,

    undecoded: Vec<Value>,
}

impl<T> Loaded<T> {
    /// Number of entries that failed to decode
    pub fn undecoded_len(&self) -> usize {
        self.undecoded.len()
    }
}

/// Handle to the on-disk record sets
///
/// Cheap to clone; construct once at startup and hand it to every consumer.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: Arc<PathBuf>,
}

impl RecordStore {
    /// Creates a store rooted at `data_dir`
    ///
    /// Nothing touches the file system until [`RecordStore::init`] or the
    /// first read/write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Arc::new(data_dir.into()),
        }
    }

    /// Directory holding the set files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a set's file
    pub fn path_for(&self, set: RecordSet) -> PathBuf {
        self.data_dir.join(set.file_name())
    }

    /// Ensures the data directory and every set file exist
    ///
    /// Missing files are created holding an empty array; existing files are
    /// left untouched. Safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a missing file
    /// cannot be written.
    pub async fn init(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(self.data_dir.as_path())
            .await
            .map_err(|source| StoreError::CreateDir {
                path: self.data_dir.to_path_buf(),
                source,
            })?;

        for set in RecordSet::ALL {
            let path = self.path_for(set);
            if tokio::fs::metadata(&path).await.is_ok() {
                continue;
            }

            self.write_all::<serde_json::Value>(set, &[]).await?;
            debug!(set = %set, path = %path.display(), "Created empty record set");
        }

        info!(data_dir = %self.data_dir.display(), "Record store initialized");
        Ok(())
    }

    /// Reads every record of a set
    ///
    /// Never fails: an unreadable or unparseable file is logged at WARN and
    /// yields an empty vector. Records that parse as JSON but do not decode
    /// into `T` are logged and skipped.
    pub async fn read_all<T>(&self, set: RecordSet) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        self.load(set).await.records
    }

    /// Reads a set for a read-modify-write cycle
    ///
    /// Pass the result back to [`RecordStore::save`] so records that did not
    /// decode are written back untouched.
    pub async fn load<T>(&self, set: RecordSet) -> Loaded<T>
    where
        T: DeserializeOwned,
    {
        let mut loaded = Loaded {
            records: Vec::new(),
            undecoded: Vec::new(),
        };

        for (index, value) in self.read_values(set).await.into_iter().enumerate() {
            match T::deserialize(&value) {
                Ok(record) => loaded.records.push(record),
                Err(error) => {
                    warn!(set = %set, index, error = %error, "Skipping undecodable record");
                    loaded.undecoded.push(value);
                }
            }
        }

        loaded
    }

    /// Writes back a set obtained from [`RecordStore::load`]
    ///
    /// Undecoded records follow the decoded ones.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::write_all`].
    pub async fn save<T>(&self, set: RecordSet, loaded: &Loaded<T>) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let mut values = loaded
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|source| StoreError::Encode { set, source })?;
        values.extend(loaded.undecoded.iter().cloned());

        self.write_all(set, &values).await
    }

    async fn read_values(&self, set: RecordSet) -> Vec<Value> {
        let path = self.path_for(set);

        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(
                    set = %set,
                    path = %path.display(),
                    error = %error,
                    "Failed to read record set; treating as empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Value>>(&raw) {
            Ok(values) => values,
            Err(error) => {
                warn!(
                    set = %set,
                    path = %path.display(),
                    error = %error,
                    "Failed to parse record set; treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replaces the entire contents of a set
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be encoded or the file cannot
    /// be written.
    pub async fn write_all<T>(&self, set: RecordSet, records: &[T]) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let path = self.path_for(set);

        let payload = serde_json::to_vec_pretty(records)
            .map_err(|source| StoreError::Encode { set, source })?;

        if let Err(source) = tokio::fs::write(&path, payload).await {
            error!(set = %set, path = %path.display(), error = %source, "Failed to write record set");
            return Err(StoreError::Write { path, source });
        }

        debug!(set = %set, count = records.len(), "Wrote record set");
        Ok(())
    }
}
