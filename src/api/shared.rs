//! State shared between the render loop and the web server.
//!
//! The render loop owns the real `PanelState`; the server only ever
//! sees point-in-time snapshots and funnels mutations back through a
//! command channel, so the two sides never lock each other up.

use crate::camera::CameraStatus;
use crate::panel::{Page, PanelState, StatePatch};
use bytes::Bytes;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::{broadcast, mpsc};

/// Point-in-time copy of the panel, published once per frame.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    pub current_page: Page,
    pub is_recording: bool,
    pub brightness: i32,
    pub volume: i32,
    pub alarm_hour: i32,
    pub alarm_minute: i32,
    pub alarm_set_time: Option<String>,
    pub temperature: f32,
    pub camera_status: CameraStatus,
}

impl PanelSnapshot {
    pub fn from_state(state: &PanelState, camera_status: CameraStatus) -> Self {
        Self {
            current_page: state.current_page,
            is_recording: state.is_recording,
            brightness: state.brightness,
            volume: state.volume,
            alarm_hour: state.alarm_hour,
            alarm_minute: state.alarm_minute,
            alarm_set_time: state.alarm_set_time.clone(),
            temperature: state.temperature,
            camera_status,
        }
    }

    /// Copy with `patch` folded in, used to answer a patch request
    /// before the render loop has applied it.
    pub fn merged(&self, patch: &StatePatch) -> PanelSnapshot {
        let mut next = self.clone();
        if let Some(page) = patch.current_page {
            next.current_page = page;
        }
        if let Some(recording) = patch.is_recording {
            next.is_recording = recording;
        }
        if let Some(brightness) = patch.brightness {
            next.brightness = brightness;
        }
        if let Some(volume) = patch.volume {
            next.volume = volume;
        }
        if let Some(hour) = patch.alarm_hour {
            next.alarm_hour = hour;
        }
        if let Some(minute) = patch.alarm_minute {
            next.alarm_minute = minute;
        }
        if let Some(ref label) = patch.alarm_set_time {
            next.alarm_set_time = Some(label.clone());
        }
        if let Some(temperature) = patch.temperature {
            next.temperature = temperature;
        }
        next
    }
}

/// Mutations requested by web clients, applied by the render loop.
#[derive(Debug, Clone)]
pub enum PanelCommand {
    Patch(StatePatch),
    ToggleRecording,
    SetAlarm { hour: i32, minute: i32 },
}

/// Events pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WsEvent {
    Snapshot(PanelSnapshot),
    StateChanged(PanelSnapshot),
    TemperatureUpdate { temperature: f32 },
    RecordingChanged { is_recording: bool },
}

pub struct SharedState {
    snapshot: RwLock<PanelSnapshot>,
    latest_jpeg: RwLock<Option<Bytes>>,
    command_tx: mpsc::UnboundedSender<PanelCommand>,
    ws_tx: broadcast::Sender<WsEvent>,
}

impl SharedState {
    pub fn get_snapshot(&self) -> PanelSnapshot {
        self.snapshot.read().unwrap().clone()
    }

    pub fn update_snapshot(&self, snapshot: PanelSnapshot) {
        // If the lock is busy a handler is mid-read; skip this update,
        // the next frame will catch up.
        if let Ok(mut guard) = self.snapshot.try_write() {
            *guard = snapshot;
        }
    }

    /// Most recent encoded camera frame, if the recorder has produced one.
    pub fn latest_jpeg(&self) -> Option<Bytes> {
        self.latest_jpeg.read().unwrap().clone()
    }

    pub fn publish_jpeg(&self, jpeg: Bytes) {
        if let Ok(mut guard) = self.latest_jpeg.try_write() {
            *guard = Some(jpeg);
        }
    }

    pub fn send_command(&self, command: PanelCommand) {
        let _ = self.command_tx.send(command);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.ws_tx.subscribe()
    }

    pub fn broadcast(&self, event: WsEvent) {
        // Nobody listening is fine.
        let _ = self.ws_tx.send(event);
    }
}

/// Builds the shared hub and hands the command receiver to the caller,
/// which drains it once per frame.
pub fn create_shared_state(
    initial: PanelSnapshot,
) -> (Arc<SharedState>, mpsc::UnboundedReceiver<PanelCommand>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (ws_tx, _) = broadcast::channel(64);
    let state = Arc::new(SharedState {
        snapshot: RwLock::new(initial),
        latest_jpeg: RwLock::new(None),
        command_tx,
        ws_tx,
    });
    (state, command_rx)
}
