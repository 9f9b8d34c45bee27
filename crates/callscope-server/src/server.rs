use axum::{
    Json, Router,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

use callscope_core::AnalysisRequest;
use callscope_engine::Analyzer;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

const DOWNLOAD_NAME: &str = "call_analysis.csv";

#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    transcript: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

pub fn router(analyzer: Arc<Analyzer>) -> Router {
    // Add CORS layer to allow connections from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_info))
        .route("/api/analyze", post(api_analyze))
        .route("/api/history", get(api_history))
        .route("/download", get(download_log))
        .layer(cors)
        .with_state(AppState { analyzer })
}

pub async fn serve(analyzer: Arc<Analyzer>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(analyzer);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    info!("callscope listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// GET / - server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "callscope",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["POST /api/analyze", "GET /api/history", "GET /download"]
    }))
}

/// POST /api/analyze - Analyze one transcript
///
/// An unreadable body counts as an empty transcript so the caller still gets
/// the structured error reply.
async fn api_analyze(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let transcript = body
        .ok()
        .and_then(|Json(req)| req.transcript)
        .unwrap_or_default();
    let client_key = peer.map(|ConnectInfo(addr)| addr.ip().to_string());

    let reply = state
        .analyzer
        .reply(&AnalysisRequest::new(transcript, client_key))
        .await;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply)).into_response()
}

/// GET /api/history - Every persisted analysis
async fn api_history(State(state): State<AppState>) -> Response {
    match state.analyzer.log().read_all().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!("Failed to read history: {}", e);
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read history: {}", e),
            )
        }
    }
}

/// GET /download - The raw CSV log as an attachment
async fn download_log(State(state): State<AppState>) -> Response {
    match state.analyzer.log().raw().await {
        Ok(Some(bytes)) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(None) => failure(StatusCode::NOT_FOUND, "No CSV available yet.".to_string()),
        Err(e) => {
            error!("Failed to read log for download: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(serde_json::json!({ "ok": false, "error": message })),
    )
        .into_response()
}
