#![forbid(unsafe_code)]

//! Axum backend serving the ranked video feed.
//!
//! Routing only: ranking, normalization and the data-source lifecycle live in
//! the `rankup` library. Uploaded mocks stay in this process's memory and are
//! gone after a restart.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use rankup::{
    config::{RuntimeOverrides, resolve_runtime_settings},
    error::{ErrorClass, SourceError},
    videos::{RankedVideo, VideoDataSource, VideoRankingPipeline, source::SourceState},
};
use serde::Serialize;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const SERVICE_NAME: &str = "rankup-api";
const UPLOAD_FIELD: &str = "file";
const UPLOAD_SUCCESS_MESSAGE: &str = "Mock uploaded successfully.";
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_LOG_DIRECTIVES: &str = "rankup=info,backend=info";

#[derive(Debug, Parser)]
#[command(name = "backend", about = "Serves the hype-ranked video feed")]
struct BackendArgs {
    /// JSON file with a top-level `items` array (overrides MOCK_YOUTUBE_FILE_PATH).
    #[arg(long, value_name = "PATH")]
    mock_file: Option<PathBuf>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    host: Option<String>,
    /// Alternate `.env` file to read defaults from.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

impl BackendArgs {
    fn into_overrides(self) -> RuntimeOverrides {
        RuntimeOverrides {
            mock_file_path: self.mock_file,
            port: self.port,
            host: self.host,
            env_path: self.env_file,
        }
    }
}

fn parse_host_arg(value: &str) -> Result<IpAddr> {
    value
        .parse::<IpAddr>()
        .context("expected a valid IPv4 or IPv6 address for --host/HOST")
}

/// Shared state injected into every handler. The data source is built once
/// per process and shared with the pipeline.
#[derive(Clone)]
struct AppState {
    source: Arc<VideoDataSource>,
    pipeline: VideoRankingPipeline,
}

impl AppState {
    fn new(source: VideoDataSource) -> Self {
        let source = Arc::new(source);
        Self {
            pipeline: VideoRankingPipeline::new(source.clone()),
            source,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadMockResponse {
    message: String,
    items_count: usize,
}

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    status: &'static str,
    videos: &'static str,
    /// `"file"` until an upload replaces the mock, `"upload"` afterwards.
    source: &'static str,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err.class() {
            ErrorClass::Caller => Self::bad_request(err.to_string()),
            ErrorClass::Internal => {
                error!(error = ?err, "video source failed");
                Self::internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, headers, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = resolve_runtime_settings(BackendArgs::parse().into_overrides())?;
    let host = parse_host_arg(&settings.host)?;

    let source = VideoDataSource::new(settings.mock_file_path);
    info!(path = %source.mock_file_path().display(), "using mock video file");
    let app = router(AppState::new(source));

    let addr = SocketAddr::new(host, settings.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    let use_json = std::env::var("LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(service_info))
        .route("/api/health", get(health))
        .route("/api/videos", get(list_videos))
        .route("/api/videos/mock", post(upload_mock))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", err);
    }
}

async fn fallback() -> ApiError {
    ApiError::not_found("endpoint not found")
}

async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let source = match state.source.state() {
        SourceState::FileBacked => "file",
        SourceState::OverrideActive => "upload",
    };
    Json(ServiceInfo {
        name: SERVICE_NAME,
        status: "ok",
        videos: "/api/videos",
        source,
    })
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<Vec<RankedVideo>>> {
    let videos = state.pipeline.execute().await?;
    Ok(Json(videos))
}

/// Accepts a multipart form whose `file` part holds a `{ "items": [...] }`
/// document. Anything without that part is rejected as a missing file.
async fn upload_mock(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadMockResponse>)> {
    let Ok(mut multipart) = multipart else {
        return Err(SourceError::UploadMissingFile.into());
    };

    let mut file: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| ApiError::bad_request(err.body_text()))?;
            file = Some(bytes);
        }
    }

    store_upload(&state, file.as_deref())
}

fn store_upload(
    state: &AppState,
    file: Option<&[u8]>,
) -> ApiResult<(StatusCode, Json<UploadMockResponse>)> {
    let file = file.ok_or(SourceError::UploadMissingFile)?;
    let items_count = state.source.set_from_raw_bytes(file)?;
    Ok((
        StatusCode::CREATED,
        Json(UploadMockResponse {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            items_count,
        }),
    ))
}
