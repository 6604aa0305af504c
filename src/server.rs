//! HTTP binding for the derivation pipeline.
//!
//! Frontends that hold raw records (e.g. a dashboard that already fetched a
//! page of applicants) post them here together with their criteria and get
//! back the derived view, with badges resolved.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/statuses/{kind}` | Status catalogue (plus interview overrides) for `applicants` or `sessions` |
//! | `POST` | `/derive/{kind}` | Filter, search, and sort posted records |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "unknown record kind: 'jobs'" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser clients can
//! call the server directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use talent_lens_core::criteria::{FilterCriteria, SortKey};
use talent_lens_core::mapper::{ApplicantMapper, Counterpart, RecordMapper, SessionMapper};
use talent_lens_core::models::RecordKind;
use talent_lens_core::pipeline::derive;

use crate::config::Config;
use crate::list::RenderedRecord;
use crate::statuses::StatusCatalogue;

#[derive(Clone)]
struct AppState {
    counterpart: Counterpart,
    default_sort: SortKey,
}

/// Builds the router with every route and the CORS layer.
pub fn router(config: &Config) -> Router {
    let state = Arc::new(AppState {
        counterpart: config.source.counterpart(),
        default_sort: config.view.default_sort,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/statuses/{kind}", get(handle_statuses))
        .route("/derive/{kind}", post(handle_derive))
        .layer(cors)
        .with_state(state)
}

/// Binds to `[server].bind` and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

fn parse_kind(kind: &str) -> Result<RecordKind, AppError> {
    kind.parse().map_err(|e: talent_lens_core::error::ParseError| bad_request(e.to_string()))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /statuses/{kind} ============

async fn handle_statuses(Path(kind): Path<String>) -> Result<Json<StatusCatalogue>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(StatusCatalogue::for_kind(kind)))
}

// ============ POST /derive/{kind} ============

/// Request body for `POST /derive/{kind}`. `criteria` is decoded per kind.
#[derive(Deserialize)]
struct DeriveRequest {
    records: Vec<Value>,
    #[serde(default)]
    criteria: Option<Value>,
    #[serde(default)]
    sort: Option<SortKey>,
    #[serde(default)]
    query: String,
}

/// Handler for `POST /derive/{kind}`.
///
/// Returns the derived items with `total` (records posted) and `matched`
/// (records kept). Unknown kinds, malformed bodies, and criteria naming a
/// status of another kind are `400`.
async fn handle_derive(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let kind = parse_kind(&kind)?;
    let req: DeriveRequest =
        serde_json::from_value(body).map_err(|e| bad_request(format!("invalid body: {}", e)))?;
    let sort = req.sort.unwrap_or(state.default_sort);

    match kind {
        RecordKind::Applicants => derive_response(&ApplicantMapper, req, sort),
        RecordKind::Sessions => {
            derive_response(&SessionMapper::new(state.counterpart), req, sort)
        }
    }
}

fn derive_response<M: RecordMapper>(
    mapper: &M,
    req: DeriveRequest,
    sort: SortKey,
) -> Result<Json<Value>, AppError> {
    let criteria: FilterCriteria<M::Status> = match req.criteria {
        Some(raw) => serde_json::from_value(raw)
            .map_err(|e| bad_request(format!("invalid criteria: {}", e)))?,
        None => FilterCriteria::default(),
    };

    let items = derive(mapper, &req.records, &criteria, sort, &req.query);
    let rendered: Vec<RenderedRecord<'_, M::Status>> = items.iter().map(RenderedRecord::new).collect();

    let body = serde_json::json!({
        "items": serde_json::to_value(&rendered).map_err(|e| internal(e.to_string()))?,
        "total": req.records.len(),
        "matched": items.len(),
    });
    Ok(Json(body))
}
