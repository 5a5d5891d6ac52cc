use serde_json::Value;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::api::job::Job;
use crate::store::models::StoreDocument;

/// Store-level errors
#[derive(Debug)]
pub enum StoreError {
    /// The store file could not be read
    Read(io::Error),

    /// The store file does not hold a job list
    Parse(serde_json::Error),

    /// The document could not be serialized
    Serialize(serde_json::Error),

    /// The store file could not be written
    Write(io::Error),

    /// No job with this id exists
    NotFound(String),

    /// The store writer is no longer running
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Read(e) => write!(f, "Failed to read store file: {}", e),
            StoreError::Parse(e) => write!(f, "Invalid JSON in store file: {}", e),
            StoreError::Serialize(e) => write!(f, "Failed to serialize store: {}", e),
            StoreError::Write(e) => write!(f, "Failed to write store file: {}", e),
            StoreError::NotFound(id) => write!(f, "Job not found: {}", id),
            StoreError::Unavailable => write!(f, "Store writer is not running"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Read(e) | StoreError::Write(e) => Some(e),
            StoreError::Parse(e) | StoreError::Serialize(e) => Some(e),
            StoreError::NotFound(_) | StoreError::Unavailable => None,
        }
    }
}

/// Repository for the JSON file backing all jobs
///
/// Every call reads or writes the whole file. Mutations must go through
/// [`StoreWriter`](crate::worker::store_writer::StoreWriter) so that read-modify-write
/// cycles never interleave.
#[derive(Clone, Debug)]
pub struct JobRepository {
    path: PathBuf,
}

impl JobRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<String, StoreError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(StoreError::Read)
    }

    /// Read the whole store file as untyped JSON
    ///
    /// Only fails when the file is unreadable or not JSON at all.
    pub async fn load_raw(&self) -> Result<Value, StoreError> {
        let data = self.read().await?;
        serde_json::from_str(&data).map_err(StoreError::Parse)
    }

    /// Read and parse the whole store file as a job list
    pub async fn load(&self) -> Result<StoreDocument, StoreError> {
        let data = self.read().await?;

        let document: StoreDocument = serde_json::from_str(&data).map_err(StoreError::Parse)?;
        debug!("Loaded {} jobs from {}", document.jobs().len(), self.path.display());
        Ok(document)
    }

    /// Find a job by id
    pub async fn find(&self, id: &str) -> Result<Option<Job>, StoreError> {
        let document = self.load().await?;
        Ok(document.find(id).cloned())
    }

    /// Replace the store file with `document`
    ///
    /// The document is written to a sibling `.tmp` file which is then renamed
    /// over the store, so readers see either the old or the new contents.
    pub async fn save(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(document).map_err(StoreError::Serialize)?;
        let temp_path = self.temp_path();

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(StoreError::Write)?;
        file.write_all(&body).await.map_err(StoreError::Write)?;
        file.sync_all().await.map_err(StoreError::Write)?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(StoreError::Write)?;

        debug!("Saved {} jobs to {}", document.jobs().len(), self.path.display());
        Ok(())
    }

    /// Create an empty store if the file does not exist yet
    ///
    /// Returns `true` when a new file was created.
    pub async fn ensure_exists(&self) -> Result<bool, StoreError> {
        if tokio::fs::try_exists(&self.path).await.map_err(StoreError::Read)? {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::Write)?;
        }

        self.save(&StoreDocument::default()).await?;
        info!("Created empty job store at {}", self.path.display());
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
