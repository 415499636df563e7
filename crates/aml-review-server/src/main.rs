use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use aml_review_client::{ClientError, EngineClient, EngineConfig};
use aml_review_core::catalog::{self, RuleCheckMeta};
use aml_review_core::review::ReviewRecord;
use aml_review_core::{derive, AnnotatedGraph, ReviewState};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineClient>,
}

// API types
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data: Some(data), error: None })
    }
}

/// An error status with the message in the envelope. The upstream
/// message always reaches the caller; no blank 4xx/5xx bodies.
type ApiError = (StatusCode, Json<ApiResponse<()>>);

fn api_error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ApiResponse { success: false, data: None, error: Some(message) }))
}

/// Everything the review UI needs for one transaction in a single
/// response: the annotated graph snapshot, the review gate, and the
/// raw variables for the inspector panel.
#[derive(Serialize)]
pub struct TransactionView {
    pub instance: serde_json::Value,
    pub graph: AnnotatedGraph,
    pub review_state: ReviewState,
    pub variables: aml_review_core::VariableBag,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "aml_review_server=info,tower_http=debug".to_string()),
        )
        .init();

    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let engine = Arc::new(EngineClient::new(config).map_err(|e| anyhow::anyhow!("{e}"))?);

    let app = create_router(AppState { engine });

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rules", get(list_rules))
        .route("/api/rules/:rule_id", get(get_rule))
        .route("/api/transactions/:transaction_id", get(get_transaction))
        .route("/api/transactions/:transaction_id/review", post(submit_review))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

fn engine_error(err: &ClientError) -> ApiError {
    let status = match err {
        ClientError::NotFound(_) => StatusCode::NOT_FOUND,
        ClientError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        ClientError::Config(_) | ClientError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.to_string())
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<String>> {
    ApiResponse::ok("OK".to_string())
}

// Full rule catalog, for the UI's reference drawer
async fn list_rules() -> Json<ApiResponse<&'static [RuleCheckMeta]>> {
    ApiResponse::ok(catalog::CATALOG)
}

async fn get_rule(
    Path(rule_id): Path<String>,
) -> Result<Json<ApiResponse<&'static RuleCheckMeta>>, ApiError> {
    match catalog::rule(&rule_id) {
        Some(meta) => Ok(ApiResponse::ok(meta)),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("unknown rule-check {rule_id}"),
        )),
    }
}

// Fetch a transaction and derive its graph snapshot and review state
async fn get_transaction(
    Path(transaction_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionView>>, ApiError> {
    let instance = state
        .engine
        .process_instance(&transaction_id)
        .await
        .map_err(|e| {
            warn!("Failed to fetch transaction {}: {}", transaction_id, e);
            engine_error(&e)
        })?;

    let variables = state
        .engine
        .variable_bag(&transaction_id)
        .await
        .map_err(|e| {
            warn!("Failed to fetch variables for {}: {}", transaction_id, e);
            engine_error(&e)
        })?;

    let (graph, review_state) = derive(&variables);

    Ok(ApiResponse::ok(TransactionView {
        instance,
        graph,
        review_state,
        variables,
    }))
}

// Submit the reviewer's decision, completing the pending review task
async fn submit_review(
    Path(transaction_id): Path<String>,
    State(state): State<AppState>,
    Json(review): Json<ReviewRecord>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match state.engine.submit_review(&transaction_id, &review).await {
        Ok(task_key) => {
            info!("Review submitted for transaction {}", transaction_id);
            Ok(ApiResponse::ok(task_key))
        }
        Err(e) => {
            warn!("Failed to submit review for {}: {}", transaction_id, e);
            Err(engine_error(&e))
        }
    }
}
