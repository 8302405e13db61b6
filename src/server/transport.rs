//! HTTP transport.
//!
//! Binds the router to a TCP listener and serves until Ctrl-C.

use tracing::info;

use super::routes::router;
use super::state::AppState;

/// Serves the HTTP API and dashboard on `host:port`.
///
/// # Errors
///
/// Returns an error if the server fails to bind or encounters a runtime error.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let tcp_listener = tokio::net::TcpListener::bind(&addr).await?;

    // Log to stderr; stdout carries command output only
    #[allow(clippy::print_stderr)]
    {
        eprintln!("fanout-rs listening on http://{addr}");
    }
    info!(%addr, "http server started");

    axum::serve(tcp_listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
