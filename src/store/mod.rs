pub mod job_repository;
pub mod models;

pub use job_repository::{JobRepository, StoreError};
pub use models::StoreDocument;
