//! DevCamper REST backend library: configuration, database wiring, and the
//! HTTP middleware pipeline in front of the resource routers.

pub mod config;
pub mod db;
pub mod server;
pub mod telemetry;
