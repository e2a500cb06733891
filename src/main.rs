use dotenvy::dotenv;
use scholarstream::logging::init_tracing;
use scholarstream::metrics::{init_metrics, metrics_app};
use scholarstream::router::init_router;
use scholarstream::state::init_app_state;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    let metrics_handle = init_metrics();

    let state = init_app_state().await;
    let server_config = state.server_config.clone();
    let app = init_router(state);

    // Metrics listen on their own port so the scrape endpoint stays off the
    // public API surface.
    if let Some(handle) = metrics_handle {
        let metrics_port = server_config.metrics_port;
        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{metrics_port}"))
                .await
                .expect("Failed to bind metrics listener");
            info!("Metrics available at http://localhost:{metrics_port}/metrics");
            axum::serve(listener, metrics_app(handle))
                .await
                .expect("Metrics server failed");
        });
    }

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    info!("Server running on http://localhost:{}", server_config.port);
    info!(
        "API docs at http://localhost:{}/docs and /scalar",
        server_config.port
    );
    axum::serve(listener, app).await.expect("Server failed");
}
