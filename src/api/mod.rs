use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::engine::{analyze_with_seed, EngineError, EngineResult};
use crate::records::{records_from_values, RawMatchRecord, ScrapedTable};

#[derive(Clone)]
pub struct AppState {
    /// Simulation seed applied to every request when set.
    pub seed: Option<u64>,
}

/// Team reference as sent by the front end.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    /// Site-specific team id, echoed by clients but not needed for analysis.
    #[allow(dead_code)]
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub host_team: Option<TeamRef>,
    #[serde(default)]
    pub guest_team: Option<TeamRef>,
    /// Pre-parsed match records, decoded one by one so a malformed element
    /// is rejected by the validator instead of failing the request.
    #[serde(default)]
    pub matches: Option<Vec<Value>>,
    /// Raw scraped table, used when `matches` is absent.
    #[serde(default)]
    pub table: Option<ScrapedTable>,
}

impl AnalyzeRequest {
    fn into_records(self) -> Option<Vec<RawMatchRecord>> {
        match (self.matches, self.table) {
            (Some(matches), _) => Some(records_from_values(matches)),
            (None, Some(table)) => Some(table.into_records()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSuccess {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_team: Option<String>,
    #[serde(flatten)]
    pub result: EngineResult,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFailure {
    pub success: bool,
    pub error: String,
}

impl AnalysisFailure {
    fn new(reason: impl Into<String>) -> Self {
        AnalysisFailure {
            success: false,
            error: reason.into(),
        }
    }
}

/// Success or InsufficientData body, shared by the API and one-shot mode.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Success(AnalysisSuccess),
    Failure(AnalysisFailure),
}

impl AnalysisResponse {
    pub fn from_outcome(
        outcome: Result<EngineResult, EngineError>,
        host_team: Option<String>,
        guest_team: Option<String>,
    ) -> Self {
        match outcome {
            Ok(result) => AnalysisResponse::Success(AnalysisSuccess {
                success: true,
                host_team,
                guest_team,
                result,
                message: "Calculation completed successfully.".to_string(),
            }),
            Err(e) => AnalysisResponse::Failure(AnalysisFailure::new(e.reason())),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResponse::Success(_))
    }
}

fn failure(status: StatusCode, reason: &str) -> Response {
    (status, Json(AnalysisFailure::new(reason))).into_response()
}

/// Build the Axum router for the analysis API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/analyze", post(analyze_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/analyze
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected analyze payload: {}", rejection.body_text());
            return failure(rejection.status(), &rejection.body_text());
        }
    };
    let host = req.host_team.as_ref().map(|t| t.name.clone());
    let guest = req.guest_team.as_ref().map(|t| t.name.clone());

    let Some(records) = req.into_records() else {
        return failure(
            StatusCode::BAD_REQUEST,
            "Missing required field: matches or table",
        );
    };
    info!(
        "Analyze request: {} vs {} ({} rows)",
        host.as_deref().unwrap_or("host"),
        guest.as_deref().unwrap_or("guest"),
        records.len()
    );

    let seed = state.seed;
    let outcome = match tokio::task::spawn_blocking(move || analyze_with_seed(&records, seed)).await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Analysis task failed: {}", e);
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "internal analysis failure");
        }
    };

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("Insufficient data: {}", e);
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    (
        status,
        Json(AnalysisResponse::from_outcome(outcome, host, guest)),
    )
        .into_response()
}
