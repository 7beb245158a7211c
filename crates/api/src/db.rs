//! MongoDB connection establishment.

use anyhow::{Context, Result};
use mongodb::bson::doc;
use mongodb::{Client, Database};
use tracing::{error, info};

/// Database name used when the connection URI does not carry one.
const DEFAULT_DATABASE: &str = "devcamper";

/// Connect to MongoDB and return a [`Database`] handle.
///
/// The driver connects lazily, so this returns quickly even when the server
/// is unreachable. A `ping` is issued in a background task so connectivity
/// failures surface in the logs instead of silently deferring to the first
/// query. The listener is allowed to come up either way.
///
/// # Errors
///
/// Returns an error only if the URI itself is invalid.
pub async fn connect(mongo_uri: &str) -> Result<Database> {
    let client = Client::with_uri_str(mongo_uri)
        .await
        .context("invalid MongoDB connection URI")?;

    let db = client
        .default_database()
        .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

    let probe = db.clone();
    tokio::spawn(async move {
        match probe.run_command(doc! { "ping": 1 }).await {
            Ok(_) => info!(db = %probe.name(), "MongoDB connected"),
            Err(e) => error!(error = %e, "MongoDB connection failed"),
        }
    });

    Ok(db)
}
