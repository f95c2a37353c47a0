//! Countdown Timer - A countdown with a local HTTP control surface
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={:?}s",
          config.host, config.port, config.duration);

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone()));

    if let Some(seconds) = config.duration {
        state.set_duration(Some(seconds)).map_err(anyhow::Error::msg)?;
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /set    - Set the duration in seconds");
    info!("  POST /start  - Start or resume the countdown");
    info!("  POST /pause  - Pause the countdown");
    info!("  POST /reset  - Reset to the configured duration");
    info!("  GET  /status - Current display and run state");
    info!("  GET  /events - Live timer updates (server-sent events)");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
