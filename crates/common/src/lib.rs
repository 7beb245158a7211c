//! Common types and errors shared across `devcamper-api` crates.

pub mod error;
pub mod protocol;

pub use error::ApiError;
