//! Exam Clock - countdown timers and helpers for timed mock exams
//!
//! This is the main entry point for the exam-clock server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use exam_clock::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{alert_relay_task, sweep_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("exam_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting exam-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, duration={}min, progress_ttl={}h",
        config.host, config.port, config.duration, config.progress_ttl_hours
    );

    if config.duration == 0 {
        anyhow::bail!("Default exam duration must be at least one minute");
    }
    let sweep_every = config.sweep_interval()?;
    let timer_retention = config.timer_retention()?;

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.duration,
        config.progress_ttl_hours,
    ));

    tokio::spawn(alert_relay_task(state.alerts.subscribe()));

    let sweep_state = Arc::clone(&state);
    tokio::spawn(async move {
        sweep_task(sweep_state, sweep_every, timer_retention).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timers/:attempt_id/start - Create and start an exam timer");
    info!("  POST   /timers/:attempt_id/stop  - Stop an exam timer");
    info!("  GET    /timers/:attempt_id       - Remaining time");
    info!("  DELETE /timers/:attempt_id       - Stop and forget an exam timer");
    info!("  GET    /progress/:attempt_id     - Load cached answers");
    info!("  PUT    /progress/:attempt_id     - Save answers");
    info!("  DELETE /progress/:attempt_id     - Clear cached answers");
    info!("  POST   /validate                 - Validate a registration form");
    info!("  POST   /questions/shuffle        - Shuffle a question list");
    info!("  GET    /alerts                   - Active alerts");
    info!("  DELETE /alerts/:id               - Dismiss an alert");
    info!("  GET    /status                   - Server status");
    info!("  GET    /health                   - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    state.stop_all_timers();
    info!("Server shutdown complete");
    Ok(())
}
