//! HTTP surface of the gateway

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::{GatewayError, ItineraryService, TripPayload};
use crate::config::Config;
use crate::domain::Itinerary;
use crate::llm::LlmClient;
use crate::prompts::PromptLoader;

/// Liveness text served at `GET /`
pub const ROOT_MESSAGE: &str = "Travel Planner API is running";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ItineraryService>,
}

/// Build the gateway router
///
/// `cors_origin` of None or "*" allows any origin.
pub fn create_router(service: Arc<ItineraryService>, cors_origin: Option<&str>) -> Result<Router> {
    debug!(?cors_origin, "create_router: called");
    let state = AppState { service };

    Ok(Router::new()
        .route("/", get(root))
        .route("/api/itinerary", post(create_itinerary))
        .layer(cors_layer(cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    match origin.map(str::trim) {
        None | Some("") | Some("*") => {
            debug!("cors_layer: permissive");
            Ok(CorsLayer::permissive())
        }
        Some(origin) => {
            debug!(%origin, "cors_layer: restricted to single origin");
            let value = HeaderValue::from_str(origin).context(format!("Invalid CORS origin '{}'", origin))?;
            Ok(CorsLayer::new()
                .allow_origin(AllowOrigin::exact(value))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]))
        }
    }
}

async fn root() -> &'static str {
    ROOT_MESSAGE
}

async fn create_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Itinerary>, GatewayError> {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let params = TripPayload::from_body(content_type, &body)?.validate()?;
    info!(destination = %params.destination, "create_itinerary: generating");

    let itinerary = state.service.generate(&params).await?;
    Ok(Json(itinerary))
}

/// Run the gateway until ctrl-c
pub async fn serve(config: &Config, llm: Arc<dyn LlmClient>) -> Result<()> {
    let prompts = Arc::new(PromptLoader::new(config.prompts.dir.as_deref()));
    let service = Arc::new(ItineraryService::new(llm, prompts, config.llm.max_tokens));
    let app = create_router(service, config.server.cors_origin.as_deref())?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!("Server running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
