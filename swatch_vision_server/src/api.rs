// THEORY:
// The HTTP surface of the picker. Three endpoints matter:
//
//   POST /api/colors    save one picked color
//   GET  /api/getColor  newest saved color (RGB channels + lightness)
//   POST /api/extract   upload a still frame, get the six sampled colors back
//
// Request bodies are parsed into explicit schema types and validated before anything
// reaches the store. Every route answers an unsupported verb with a JSON 405 instead of
// axum's empty default, so clients get the same `{ "message": ... }` shape everywhere.
//
// Store calls are blocking (file IO) and run on the blocking pool. A failed save is
// reported once as a 500; nothing is retried or queued.

use crate::record::{NewColorRecord, StoredColorRecord, ValidationError};
use crate::store::{ColorStore, StoreError};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swatch_vision::{FrameColorExtractor, FrameColorResult, Hsl, RasterBuffer, SwatchError};
use thiserror::Error;
use tracing::{error, info, warn};

/// Largest still frame `/api/extract` accepts.
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ColorStore>,
    pub extractor: FrameColorExtractor,
}

impl AppState {
    pub fn new(store: Arc<dyn ColorStore>, extractor: FrameColorExtractor) -> Self {
        Self { store, extractor }
    }
}

#[derive(Debug, Deserialize)]
pub struct RgbBody {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

#[derive(Debug, Deserialize)]
pub struct HslBody {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// Body of `POST /api/colors`.
#[derive(Debug, Deserialize)]
pub struct SaveColorRequest {
    #[serde(default)]
    pub uuid: Option<String>,
    pub hex: String,
    pub rgb: RgbBody,
    pub hsl: HslBody,
}

impl SaveColorRequest {
    pub fn validate(self) -> Result<NewColorRecord, ValidationError> {
        NewColorRecord::validated(
            self.uuid,
            &self.hex,
            (self.rgb.r, self.rgb.g, self.rgb.b),
            Hsl {
                hue: self.hsl.hue,
                saturation: self.hsl.saturation,
                lightness: self.hsl.lightness,
            },
        )
    }
}

/// Body of a successful `GET /api/getColor`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LatestColorResponse {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub lightness: f64,
}

impl From<StoredColorRecord> for LatestColorResponse {
    fn from(record: StoredColorRecord) -> Self {
        Self {
            red: record.rgb.r,
            green: record.rgb.g,
            blue: record.rgb.b,
            lightness: record.hsl.lightness,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("invalid color: {0}")]
    Validation(#[from] ValidationError),

    #[error("No color data found")]
    NotFound,

    #[error("failed to save color: {0}")]
    Save(StoreError),

    #[error("failed to fetch color: {0}")]
    Fetch(StoreError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] SwatchError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            ApiError::Malformed(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Save(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error saving color".to_string(),
            ),
            ApiError::Fetch(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching color".to_string(),
            ),
            ApiError::Extraction(SwatchError::Input(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::Extraction(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(Message::new(message))).into_response()
    }
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn save_color(
    State(state): State<AppState>,
    payload: Result<Json<SaveColorRequest>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Malformed(e.body_text()))?;
    let record = request.validate()?;

    let store = state.store.clone();
    let saved = tokio::task::spawn_blocking(move || store.save(record))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::Save)?;

    info!(uuid = %saved.uuid, hex = %saved.hex, created_at = saved.created_at, "Saved color");
    Ok(Json(Message::new("Color saved successfully")))
}

async fn get_latest_color(
    State(state): State<AppState>,
) -> Result<Json<LatestColorResponse>, ApiError> {
    let store = state.store.clone();
    let latest = tokio::task::spawn_blocking(move || store.fetch_latest())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::Fetch)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(latest.into()))
}

async fn extract_colors(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FrameColorResult>, ApiError> {
    let frame = RasterBuffer::decode(&body)?;
    let colors = state.extractor.extract(&frame).await?;
    Ok(Json(colors))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/colors",
            post(save_color).fallback(method_not_allowed),
        )
        .route(
            "/api/getColor",
            get(get_latest_color).fallback(method_not_allowed),
        )
        .route(
            "/api/extract",
            post(extract_colors)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(MAX_FRAME_BYTES)),
        )
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}
