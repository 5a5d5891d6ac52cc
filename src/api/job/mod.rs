pub mod models;
pub mod handlers;
pub mod service;

// Re-export commonly used types
pub use models::Job;
pub use service::JobService;
