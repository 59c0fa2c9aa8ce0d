use analysis_core::AnalysisError;
use analysis_orchestrator::PipelineOrchestrator;
use anyhow::Context;
use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod request_id;
pub mod routes;


pub use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PipelineOrchestrator>,
}

/// Envelope for the JSON API endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Handler error carrying the HTTP status to answer with
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Map a pipeline failure onto the status a client should see.
    pub fn from_analysis(err: AnalysisError) -> Self {
        let status = match &err {
            AnalysisError::UnknownCompany(_) => StatusCode::NOT_FOUND,
            AnalysisError::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::ExtractionFailure { .. } | AnalysisError::NarrationFailure(_) => {
                StatusCode::BAD_GATEWAY
            }
            AnalysisError::FetchFailure { .. } | AnalysisError::TaskFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match err {
            AnalysisError::UnknownCompany(company) => {
                tracing::warn!("Rejected unknown company '{}'", company);
                Self::with_status(status, anyhow::anyhow!("Invalid company selection"))
            }
            other => Self::with_status(status, other.into()),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.error.to_string()),
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    routes::analysis_routes()
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(cors)
                .layer(middleware::from_fn(request_id::request_id_middleware)),
        )
        .with_state(state)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        "Starting news sentiment API (fetch width {}, analysis width {}, failure policy {})",
        config.pipeline.fetch_concurrency,
        config.pipeline.analysis_concurrency,
        config.pipeline.failure_policy
    );

    let orchestrator = Arc::new(PipelineOrchestrator::from_ml_config(
        config.ml.clone(),
        config.fetch_timeout,
        config.pipeline.clone(),
    ));
    orchestrator
        .initialize()
        .await
        .context("Model services are not ready")?;

    let app = build_router(AppState {
        orchestrator: Arc::clone(&orchestrator),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    orchestrator.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}
