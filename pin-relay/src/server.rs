/// Axum HTTP server setup and routing

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use flower_mint::MAX_UPLOAD_BYTES;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::pinata::Pinner;

pub fn create_router<P: Pinner + 'static>(state: Arc<RelayState<P>>) -> Router {
    // The claim page uploads from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Registry
        .route("/flowers", get(list_flowers::<P>))

        // Owner uploads
        .route("/upload-image", post(upload_image::<P>))

        // Shared state
        .with_state(state)

        // Middleware; oversize files get a JSON rejection instead of a bare 413
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES as usize * 2))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server<P: Pinner + 'static>(
    state: Arc<RelayState<P>>,
    host: String,
    port: u16,
) -> anyhow::Result<()> {
    let registry_path = state.store.path().to_path_buf();
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Pin relay listening on http://{}", addr);
    log::info!("📤 Upload endpoint: POST /upload-image");
    log::info!("📚 Registry: GET /flowers ({:?})", registry_path);

    axum::serve(listener, app).await?;

    Ok(())
}
