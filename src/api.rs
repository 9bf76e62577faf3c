//! REST API server for the research agent
//!
//! Each query gets its own agent run; the model gateway and tool registry are
//! shared across requests.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::ModelGateway;
use crate::models::{RunOutcome, Task};
use crate::presentation::{AgentEvent, EventRecorder};
use crate::tools::ToolRegistry;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QueryRequest {
    pub query: String,
    pub max_steps: Option<u32>,
    pub max_steps_per_task: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SettingsRequest {
    pub model_name: Option<String>,
    pub api_key: Option<String>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub run_id: uuid::Uuid,
    pub outcome: &'static str,
    pub answer: Option<String>,
    pub steps: u32,
    pub tasks: Vec<Task>,
    pub events: Vec<AgentEvent>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub gateway: Arc<ModelGateway>,
    pub tools: Arc<ToolRegistry>,
    pub config: AgentConfig,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Query Endpoint
/// =============================

async fn run_query(
    State(state): State<ApiState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let query = req.query.trim();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Query must not be empty".to_string())),
        );
    }

    if req.max_steps_per_task == Some(0) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "max_steps_per_task must be at least 1".to_string(),
            )),
        );
    }

    info!(query = %query, "Received research query");

    let mut config = state.config.clone();
    if let Some(max_steps) = req.max_steps {
        config = config.with_max_steps(max_steps);
    }
    if let Some(max_steps_per_task) = req.max_steps_per_task {
        config = config.with_max_steps_per_task(max_steps_per_task);
    }

    let recorder = Arc::new(EventRecorder::new());
    let agent = Agent::new(state.gateway.clone(), state.tools.clone(), config)
        .with_observer(recorder.clone());

    match agent.run_with_report(query).await {
        Ok(report) => {
            let answer = match &report.outcome {
                RunOutcome::Answered { answer } => Some(answer.clone()),
                _ => None,
            };
            let result = QueryResult {
                run_id: report.run_id,
                outcome: report.outcome.kind(),
                answer,
                steps: report.steps,
                tasks: report.tasks,
                events: recorder.events(),
            };
            (StatusCode::OK, Json(ApiResponse::success(result)))
        }
        Err(e @ AgentError::AnswerSynthesisError(_)) => {
            error!(error = %e, "Answer synthesis failed");
            (StatusCode::BAD_GATEWAY, Json(ApiResponse::error(e.to_string())))
        }
        Err(e) => {
            error!(error = %e, "Research run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}

/// =============================
/// Settings Endpoint
/// =============================

async fn update_settings(
    State(state): State<ApiState>,
    Json(req): Json<SettingsRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    state.gateway.configure(req.api_key, req.model_name).await;
    let model_name = state.gateway.active_model().await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "model_name": model_name,
        }))),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/query", post(run_query))
        .route("/api/settings", post(update_settings))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
