use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::Value;
use std::fmt;
use tracing::{error, info, warn};

use crate::api::errors::ErrorResponse;
use crate::store::{JobRepository, StoreError};
use crate::worker::StoreHandle;
use super::models::Job;

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// The job store could not be read or written
    Store(StoreError),

    /// Job not found
    NotFound(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Store(e) => write!(f, "Store error: {}", e),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn public_message(&self) -> &'static str {
        match self {
            ServiceError::Store(StoreError::Read(_)) => "Failed to read jobs file",
            ServiceError::Store(StoreError::Parse(_)) => "Invalid JSON format in jobs file",
            ServiceError::Store(StoreError::Serialize(_) | StoreError::Write(_)) => {
                "Failed to save jobs file"
            }
            ServiceError::Store(StoreError::Unavailable) => "Job store unavailable",
            ServiceError::Store(StoreError::NotFound(_)) | ServiceError::NotFound(_) => {
                "Job not found"
            }
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Store(StoreError::NotFound(_)) | ServiceError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::NotFound(id) => warn!("Job not found: {}", id),
            ServiceError::Store(e) => error!("Store error: {}", e),
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message().to_string(),
        })
    }
}

/// Job service containing business logic
///
/// Reads go straight to the repository. Writes are handed to the store
/// writer so that only one read-modify-write cycle runs at a time.
pub struct JobService {
    repository: JobRepository,
    store: StoreHandle,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(repository: JobRepository, store: StoreHandle) -> Self {
        Self { repository, store }
    }

    /// The store file's JSON, returned as-is whatever its shape
    pub async fn list_jobs(&self) -> Result<Value, ServiceError> {
        let document = self.repository.load_raw().await?;
        match document.as_array() {
            Some(jobs) => info!("Service: Listed {} jobs", jobs.len()),
            None => info!("Service: Listed jobs store"),
        }
        Ok(document)
    }

    /// Fetch a single job by id
    pub async fn get_job(&self, id: &str) -> Result<Job, ServiceError> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Create a job
    ///
    /// # Business Logic
    /// - Any caller-supplied `id` is replaced by a generated one
    /// - The job is appended to the end of the store
    pub async fn create_job(&self, job: Job) -> Result<Job, ServiceError> {
        info!("Service: Creating job with {} fields", job.fields().len());

        let created = self.store.create(job).await?;

        info!(
            "Service: Job created successfully with id={}",
            created.id().unwrap_or_default()
        );
        Ok(created)
    }

    /// Replace the job stored under `id`, keeping its id
    pub async fn update_job(&self, id: String, job: Job) -> Result<Job, ServiceError> {
        info!("Service: Updating job id={}", id);

        let updated = self.store.update(id, job).await?;

        info!(
            "Service: Job updated successfully with id={}",
            updated.id().unwrap_or_default()
        );
        Ok(updated)
    }

    /// Check that the store file can be read and parsed
    pub async fn check_store(&self) -> Result<(), ServiceError> {
        self.repository.load().await?;
        Ok(())
    }
}
