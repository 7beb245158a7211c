//! Axum HTTP server: routing, the middleware pipeline, and the terminal
//! error stage.
//!
//! # Responsibilities
//! - Assemble the ordered middleware stack applied to every request.
//! - Mount the five resource routers under `/api/v1/*`.
//! - Serve static assets from the configured public directory.
//! - Render every propagated failure as one JSON error envelope.

pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
