//! # REST Front End
//!
//! One request per user action. The model client is built once at startup;
//! when no credential could be resolved, model-backed routes answer 503 and
//! `/template` keeps working.

use crate::error::{ConfigError, LambdaForgeError};
use crate::generator::{self, FunctionConfiguration};
use crate::llm::LanguageModel;
use crate::workflow::{self, GeneratedFunction};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<dyn LanguageModel>>,
    credential_error: Option<String>,
}

impl AppState {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model: Some(model),
            credential_error: None,
        }
    }

    /// State for a server started without a usable credential
    pub fn without_model(reason: String) -> Self {
        Self {
            model: None,
            credential_error: Some(reason),
        }
    }

    fn model(&self) -> Result<&dyn LanguageModel, ApiError> {
        self.model.as_deref().ok_or_else(|| ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: self
                .credential_error
                .clone()
                .unwrap_or_else(|| "Language model is not configured".to_string()),
        })
    }
}

/// Error body returned as `{ "error": message }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<LambdaForgeError> for ApiError {
    fn from(err: LambdaForgeError) -> Self {
        let status = match &err {
            LambdaForgeError::Generation(_) => StatusCode::BAD_REQUEST,
            LambdaForgeError::Config(ConfigError::MissingCredential { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            LambdaForgeError::Llm(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(%status, error = %err, "request failed");
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Serialize)]
struct TemplateResponse {
    template: String,
}

#[derive(Deserialize)]
struct GenerateRequest {
    config: FunctionConfiguration,
    description: String,
    #[serde(default = "default_review")]
    review: bool,
}

fn default_review() -> bool {
    true
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    handler_code: String,
    #[serde(default)]
    template: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    analysis: String,
}

#[derive(Deserialize)]
struct ImproveRequest {
    handler_code: String,
}

#[derive(Serialize)]
struct ImproveResponse {
    code: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/template", post(template))
        .route("/generate", post(generate))
        .route("/analyze", post(analyze))
        .route("/improve", post(improve))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn template(
    Json(config): Json<FunctionConfiguration>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template = generator::generate_sam_template(&config)?;
    Ok(Json(TemplateResponse { template }))
}

async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratedFunction>, ApiError> {
    let model = state.model()?;
    let generated =
        workflow::generate_function(model, &req.config, &req.description, req.review).await?;
    Ok(Json(generated))
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let model = state.model()?;
    let analysis =
        workflow::analyze_function(model, &req.handler_code, req.template.as_deref()).await?;
    Ok(Json(AnalyzeResponse { analysis }))
}

async fn improve(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, ApiError> {
    let model = state.model()?;
    let code = workflow::improve_function(model, &req.handler_code).await?;
    Ok(Json(ImproveResponse { code }))
}
