use std::{any::Any, sync::Arc};

use anyhow::{Error, Result};
use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{Method, Response, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::{CatchPanicLayer, ResponseForPanic},
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    config::Config,
    models::{
        health::{HealthCheckResponse, ServiceIndex},
        response::ApiResponse,
        status::PipelineOutcome,
    },
    pipeline::IntakePipeline,
};

pub const WEBHOOK_PATH: &str = "/appointment-created";

pub struct AppState {
    pipeline: IntakePipeline,
    expose_error_detail: bool,
}

impl AppState {
    pub fn new(pipeline: IntakePipeline, expose_error_detail: bool) -> Self {
        Self {
            pipeline,
            expose_error_detail,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let expose_error_detail = state.expose_error_detail;

    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(cors::Any);

    Router::new()
        .route("/", get(service_index))
        .route("/health", get(health_check))
        .route(
            WEBHOOK_PATH,
            post(appointment_created).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(PanicResponder {
            expose_error_detail,
        }))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn run_api_server(config: &Config, pipeline: IntakePipeline) -> Result<(), Error> {
    let app = router(AppState::new(pipeline, config.is_development()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(
        address = %addr,
        webhook = WEBHOOK_PATH,
        health = "/health",
        "Appointment webhook service started"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn appointment_created(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    match state.pipeline.process_payload(&body).await {
        PipelineOutcome::Rejected(e) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())))
        }
        PipelineOutcome::Ignored => (StatusCode::OK, Json(ApiResponse::message("ignored"))),
        PipelineOutcome::Dispatched(_) => (StatusCode::OK, Json(ApiResponse::message("sent"))),
        PipelineOutcome::Failed(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::internal_error(
                e.to_string(),
                state.expose_error_detail,
            )),
        ),
    }
}

async fn method_not_allowed(method: Method) -> impl IntoResponse {
    info!(%method, path = WEBHOOK_PATH, "Webhook called with unsupported method");

    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(
            ApiResponse::error("Method not allowed")
                .with_message("This endpoint only accepts POST requests")
                .with_correct_usage(format!("POST {} with JSON payload", WEBHOOK_PATH)),
        ),
    )
}

async fn service_index() -> impl IntoResponse {
    (StatusCode::OK, Json(ServiceIndex::new(Utc::now())))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthCheckResponse::healthy(Utc::now())))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Endpoint not found")),
    )
}

/// Maps a handler panic to the standard 500 body.
#[derive(Debug, Clone, Copy)]
struct PanicResponder {
    expose_error_detail: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic".to_string()
        };

        error!(error = %detail, "Unhandled error while serving request");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::internal_error(detail, self.expose_error_detail)),
        )
            .into_response()
    }
}
