//! Route handlers for the chat API.
//!
//! Endpoints:
//! - `GET /`: embedded chat page
//! - `GET /health`: liveness and model status
//! - `GET /api/history`: full conversation log
//! - `POST /api/history/clear`: wholesale clear
//! - `GET /api/settings`: frontend settings
//! - `POST /api/message/text`: classify a text message
//! - `POST /api/message/audio`: classify an uploaded audio file
//!
//! Inference runs on blocking worker threads so a slow model call never
//! stalls the request loop. Classification failures still produce a normal
//! bot message (with a degraded result); the HTTP layer only errors on
//! malformed requests.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::engine::EmotionEngine;
use crate::history::{ChatHistory, ChatMessage};
use crate::models;
use crate::result::EmotionResult;

use super::ui::INDEX_HTML;

/// Shared state for the chat server
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<EmotionEngine>>,
    pub history: Arc<Mutex<ChatHistory>>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(engine: EmotionEngine, settings: Settings) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            history: Arc::new(Mutex::new(ChatHistory::new())),
            settings,
        }
    }
}

/// Build the router with all chat routes.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.settings.max_upload_mb as usize * 1024 * 1024;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/history", get(get_history))
        .route("/api/history/clear", post(clear_history))
        .route("/api/settings", get(get_settings))
        .route("/api/message/text", post(post_text_message))
        .route("/api/message/audio", post(post_audio_message))
        .with_state(state)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind and serve until ctrl-c.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    info!("Chat server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let healthy = state.engine.lock().is_ok();
    let model_dir = models::text_model_dir().unwrap_or_default();
    Json(serde_json::json!({
        "healthy": healthy,
        "app": "emoverse",
        "models": models::get_model_info(&model_dir),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let history = state.history.lock().map_err(|_| ApiError::state_poisoned())?;
    Ok(Json(history.messages().to_vec()))
}

async fn clear_history(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut history = state.history.lock().map_err(|_| ApiError::state_poisoned())?;
    history.clear();
    Ok(StatusCode::NO_CONTENT)
}

async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.clone())
}

#[derive(Debug, Deserialize)]
struct TextMessageRequest {
    text: String,
}

async fn post_text_message(
    State(state): State<AppState>,
    Json(request): Json<TextMessageRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    let text = request.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::bad_request("message text is empty"));
    }

    {
        let mut history = state.history.lock().map_err(|_| ApiError::state_poisoned())?;
        history.push(ChatMessage::user_text(text.as_str()));
    }

    let result = run_classification(&state, {
        let text = text.clone();
        move |engine| engine.classify_text(&text)
    })
    .await?;

    let bot = ChatMessage::bot_text(text.as_str(), result);
    {
        let mut history = state.history.lock().map_err(|_| ApiError::state_poisoned())?;
        history.push(bot.clone());
    }

    Ok(Json(bot))
}

async fn post_audio_message(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ChatMessage>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload.wav")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {}", e)))?;
            upload = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("missing 'file' field"))?;
    if data.is_empty() {
        return Err(ApiError::bad_request("uploaded file is empty"));
    }

    {
        let mut history = state.history.lock().map_err(|_| ApiError::state_poisoned())?;
        history.push(ChatMessage::user_audio(filename.as_str()));
    }

    let suffix = std::path::Path::new(&filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| ".wav".to_string());

    // The temp file lives only for the duration of the classification call;
    // NamedTempFile removes it on every exit path, including errors.
    let result = run_classification(&state, move |engine| {
        let mut write_and_classify = || -> std::io::Result<EmotionResult> {
            let mut tmp = tempfile::Builder::new().suffix(&suffix).tempfile()?;
            tmp.write_all(&data)?;
            tmp.flush()?;
            Ok(engine.classify_audio(tmp.path()))
        };
        write_and_classify()
            .unwrap_or_else(|e| EmotionResult::degraded(format!("failed to stage upload: {}", e)))
    })
    .await?;

    let bot = ChatMessage::bot_audio(filename.as_str(), result);
    {
        let mut history = state.history.lock().map_err(|_| ApiError::state_poisoned())?;
        history.push(bot.clone());
    }

    Ok(Json(bot))
}

/// Run a classification closure on a blocking worker thread.
async fn run_classification<F>(state: &AppState, f: F) -> Result<EmotionResult, ApiError>
where
    F: FnOnce(&mut EmotionEngine) -> EmotionResult + Send + 'static,
{
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || {
        let mut engine = match engine.lock() {
            Ok(engine) => engine,
            Err(_) => return EmotionResult::degraded("classifier state poisoned"),
        };
        f(&mut *engine)
    })
    .await
    .map_err(|e| {
        warn!("Classification task failed to join: {}", e);
        ApiError::internal("classification task failed")
    })
}

/// API error that renders as a status code plus plain-text message.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
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

    fn state_poisoned() -> Self {
        Self::internal("server state poisoned")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
