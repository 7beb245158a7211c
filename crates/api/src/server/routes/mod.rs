//! Resource routers mounted under `/api/v1/*`.
//!
//! The handlers here are thin placeholders for the domain collaborators that
//! own the business logic. They echo the sanitized request context so the
//! pipeline guarantees (stripped operator keys, escaped HTML, collapsed
//! query parameters, extracted uploads) are observable end to end.

pub mod auth;
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod users;
