pub mod cors;
pub mod errors;
pub mod health;
pub mod job;
