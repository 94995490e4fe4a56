//! HTTP routes for the control API.
//!
//! Handlers never touch the live panel directly: reads come from the
//! latest snapshot, writes are queued as commands and answered with
//! the snapshot the render loop is about to converge on.

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::shared::{PanelCommand, SharedState};
use super::stream::camera_feed;
use super::websocket::ws_handler;
use crate::panel::state::alarm_label;
use crate::panel::StatePatch;

/// Embedded control page.
const INDEX_HTML: &str = include_str!("index.html");

pub fn create_router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/state", get(get_state).post(update_state))
        .route("/api/recording/toggle", post(toggle_recording))
        .route("/api/alarm/set", post(set_alarm))
        .route("/camera_feed", get(camera_feed))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_state(State(state): State<Arc<SharedState>>) -> Json<Value> {
    Json(json!(state.get_snapshot()))
}

async fn update_state(
    State(state): State<Arc<SharedState>>,
    Json(patch): Json<StatePatch>,
) -> Json<Value> {
    let merged = state.get_snapshot().merged(&patch);
    state.send_command(PanelCommand::Patch(patch));
    Json(json!({ "success": true, "state": merged }))
}

async fn toggle_recording(State(state): State<Arc<SharedState>>) -> Json<Value> {
    let is_recording = !state.get_snapshot().is_recording;
    state.send_command(PanelCommand::ToggleRecording);
    Json(json!({ "success": true, "is_recording": is_recording }))
}

#[derive(Debug, Deserialize)]
struct SetAlarmRequest {
    hour: Option<i32>,
    minute: Option<i32>,
}

async fn set_alarm(
    State(state): State<Arc<SharedState>>,
    Json(request): Json<SetAlarmRequest>,
) -> Json<Value> {
    let snapshot = state.get_snapshot();
    let hour = request.hour.unwrap_or(snapshot.alarm_hour);
    let minute = request.minute.unwrap_or(snapshot.alarm_minute);
    let label = alarm_label(hour, minute);
    state.send_command(PanelCommand::SetAlarm { hour, minute });
    Json(json!({ "success": true, "alarm_time": label }))
}
