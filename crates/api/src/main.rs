//! `devcamper-api` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the tracing subscriber.
//! 3. Install the fatal-failure safety net (panic hook).
//! 4. Connect to MongoDB (reachability failures are logged, not fatal).
//! 5. Build [`AppState`] and spawn the rate-limit prune task.
//! 6. Build the Axum router with the full middleware stack.
//! 7. Bind the listener and serve.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use devcamper_api::config::Config;
use devcamper_api::server::middleware::rate_limit::{self, RateLimitConfig, RateLimiter};
use devcamper_api::server::state::AppState;
use devcamper_api::{db, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level, cfg.is_development())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %cfg.run_mode,
        "devcamper-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. Fatal-failure safety net
    // -----------------------------------------------------------------------
    install_panic_hook(cfg.exit_on_fatal);

    // -----------------------------------------------------------------------
    // 4. Database
    // -----------------------------------------------------------------------
    let db = db::connect(&cfg.mongo_uri).await?;

    // -----------------------------------------------------------------------
    // 5. State + background tasks
    // -----------------------------------------------------------------------
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: cfg.rate_limit_max,
        window: Duration::from_secs(cfg.rate_limit_window_secs),
    }));
    let _prune = rate_limit::prune_task(limiter.clone());

    let state = AppState::new(Some(db), limiter, &cfg);

    // -----------------------------------------------------------------------
    // 6. Router
    // -----------------------------------------------------------------------
    let router = server::router::build(state, &cfg);

    // -----------------------------------------------------------------------
    // 7. Listener
    // -----------------------------------------------------------------------
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(addr = %addr, mode = %cfg.run_mode, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Log any panic that escapes a task through tracing. When `exit_on_fatal`
/// is set the process terminates instead of continuing in a possibly
/// corrupted state; it defaults to off, matching the observed behaviour of
/// the system this replaces (its shutdown call existed but was disabled).
fn install_panic_hook(exit_on_fatal: bool) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(panic = %info, "unhandled failure");
        previous(info);
        if exit_on_fatal {
            std::process::exit(1);
        }
    }));
}
