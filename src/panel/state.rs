//! Panel state and partial updates.
//!
//! `PanelState` is the single source of truth for the kiosk. It is owned
//! by the app, mutated only on the main thread (by the input dispatcher,
//! the periodic drivers, or commands drained from the web API), and read
//! by the geometry builder every frame. Nothing here persists.

use serde::{Deserialize, Serialize};

/// The three kiosk pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Camera,
    Alarm,
    Video,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Camera, Page::Alarm, Page::Video];

    /// Caption on the page button in the bottom bar.
    pub fn title(&self) -> &'static str {
        match self {
            Page::Camera => "Camera",
            Page::Alarm => "Alarm",
            Page::Video => "Video",
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Camera
    }
}

/// Full panel state. Nominal ranges are documented, not enforced: the
/// web API merges patch values verbatim and the UI paths only ever
/// produce in-range values themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelState {
    pub current_page: Page,
    pub is_recording: bool,
    /// 0..=100 nominal.
    pub brightness: i32,
    /// 0..=100 nominal.
    pub volume: i32,
    /// 0..=23 nominal.
    pub alarm_hour: i32,
    /// 0..=59 nominal.
    pub alarm_minute: i32,
    /// `"HH:MM"` once the alarm has been confirmed.
    pub alarm_set_time: Option<String>,
    /// Simulated, degrees C.
    pub temperature: f32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            current_page: Page::Camera,
            is_recording: false,
            brightness: 50,
            volume: 50,
            alarm_hour: 7,
            alarm_minute: 0,
            alarm_set_time: None,
            temperature: 20.0,
        }
    }
}

impl PanelState {
    /// Defaults with the alarm spinboxes preloaded. The app seeds them
    /// from the wall clock at startup.
    pub fn with_alarm(hour: i32, minute: i32) -> Self {
        Self {
            alarm_hour: hour,
            alarm_minute: minute,
            ..Self::default()
        }
    }

    /// Flips the recording flag and returns the new value.
    pub fn toggle_recording(&mut self) -> bool {
        self.is_recording = !self.is_recording;
        self.is_recording
    }

    /// Steps the alarm hour, wrapping within 0..24 in both directions.
    pub fn step_hour(&mut self, delta: i32) {
        self.alarm_hour = (self.alarm_hour + delta).rem_euclid(24);
    }

    /// Steps the alarm minute, wrapping within 0..60 in both directions.
    pub fn step_minute(&mut self, delta: i32) {
        self.alarm_minute = (self.alarm_minute + delta).rem_euclid(60);
    }

    /// Freezes the current spinbox values as the set alarm time. The
    /// spinboxes themselves are left untouched.
    pub fn confirm_alarm(&mut self) {
        self.alarm_set_time = Some(alarm_label(self.alarm_hour, self.alarm_minute));
    }

    /// Stores an alarm time directly (the web API path).
    pub fn set_alarm(&mut self, hour: i32, minute: i32) {
        self.alarm_hour = hour;
        self.alarm_minute = minute;
        self.confirm_alarm();
    }
}

/// Zero-padded `"HH:MM"`.
pub fn alarm_label(hour: i32, minute: i32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// A partial state update, merged key by key. Unknown JSON keys are
/// ignored; present keys are assigned verbatim with no range
/// validation (the client is trusted, matching the HTTP contract).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatePatch {
    pub current_page: Option<Page>,
    pub is_recording: Option<bool>,
    pub brightness: Option<i32>,
    pub volume: Option<i32>,
    pub alarm_hour: Option<i32>,
    pub alarm_minute: Option<i32>,
    /// Set-only: a patch can set or replace the label, not clear it.
    pub alarm_set_time: Option<String>,
    pub temperature: Option<f32>,
}

impl StatePatch {
    pub fn apply(&self, state: &mut PanelState) {
        if let Some(page) = self.current_page {
            state.current_page = page;
        }
        if let Some(recording) = self.is_recording {
            state.is_recording = recording;
        }
        if let Some(brightness) = self.brightness {
            state.brightness = brightness;
        }
        if let Some(volume) = self.volume {
            state.volume = volume;
        }
        if let Some(hour) = self.alarm_hour {
            state.alarm_hour = hour;
        }
        if let Some(minute) = self.alarm_minute {
            state.alarm_minute = minute;
        }
        if let Some(label) = &self.alarm_set_time {
            state.alarm_set_time = Some(label.clone());
        }
        if let Some(temperature) = self.temperature {
            state.temperature = temperature;
        }
    }

    /// True when no field is present (an empty merge is a no-op).
    pub fn is_empty(&self) -> bool {
        self.current_page.is_none()
            && self.is_recording.is_none()
            && self.brightness.is_none()
            && self.volume.is_none()
            && self.alarm_hour.is_none()
            && self.alarm_minute.is_none()
            && self.alarm_set_time.is_none()
            && self.temperature.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = PanelState::default();
        assert_eq!(state.current_page, Page::Camera);
        assert!(!state.is_recording);
        assert_eq!(state.brightness, 50);
        assert_eq!(state.volume, 50);
        assert_eq!(state.alarm_hour, 7);
        assert_eq!(state.alarm_minute, 0);
        assert_eq!(state.alarm_set_time, None);
        assert_eq!(state.temperature, 20.0);
    }

    #[test]
    fn test_hour_wraps_both_directions() {
        let mut state = PanelState::default();
        state.alarm_hour = 23;
        state.step_hour(1);
        assert_eq!(state.alarm_hour, 0);
        state.step_hour(-1);
        assert_eq!(state.alarm_hour, 23);

        state.alarm_hour = 0;
        state.step_hour(-1);
        assert_eq!(state.alarm_hour, 23);
    }

    #[test]
    fn test_minute_wraps_both_directions() {
        let mut state = PanelState::default();
        state.alarm_minute = 59;
        state.step_minute(1);
        assert_eq!(state.alarm_minute, 0);

        state.alarm_minute = 0;
        state.step_minute(-1);
        assert_eq!(state.alarm_minute, 59);
    }

    #[test]
    fn test_stepping_stays_in_range() {
        let mut state = PanelState::default();
        for _ in 0..100 {
            state.step_hour(1);
            assert!((0..24).contains(&state.alarm_hour));
        }
        for _ in 0..200 {
            state.step_minute(-1);
            assert!((0..60).contains(&state.alarm_minute));
        }
    }

    #[test]
    fn test_double_toggle_restores_recording() {
        let mut state = PanelState::default();
        assert!(state.toggle_recording());
        assert!(!state.toggle_recording());
        assert_eq!(state, PanelState::default());
    }

    #[test]
    fn test_confirm_alarm_zero_pads() {
        let mut state = PanelState::default();
        state.alarm_hour = 7;
        state.alarm_minute = 5;
        state.confirm_alarm();
        assert_eq!(state.alarm_set_time.as_deref(), Some("07:05"));
        // The spinboxes are not reset by confirming.
        assert_eq!(state.alarm_hour, 7);
        assert_eq!(state.alarm_minute, 5);
    }

    #[test]
    fn test_patch_ignores_unknown_keys() {
        let patch: StatePatch =
            serde_json::from_str(r#"{"brightness": 80, "bogus_key": true, "another": "x"}"#)
                .unwrap();
        let mut state = PanelState::default();
        patch.apply(&mut state);
        assert_eq!(state.brightness, 80);
        assert_eq!(state.volume, 50);
    }

    #[test]
    fn test_patch_out_of_range_passes_through() {
        // No server-side clamping: 150 is stored as-is.
        let patch: StatePatch = serde_json::from_str(r#"{"brightness": 150}"#).unwrap();
        let mut state = PanelState::default();
        patch.apply(&mut state);
        assert_eq!(state.brightness, 150);
    }

    #[test]
    fn test_patch_rejects_unknown_page() {
        let result = serde_json::from_str::<StatePatch>(r#"{"current_page": "settings"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_merges_page_and_recording() {
        let patch: StatePatch =
            serde_json::from_str(r#"{"current_page": "video", "is_recording": true}"#).unwrap();
        let mut state = PanelState::default();
        patch.apply(&mut state);
        assert_eq!(state.current_page, Page::Video);
        assert!(state.is_recording);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let patch: StatePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        let mut state = PanelState::default();
        let before = state.clone();
        patch.apply(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_page_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Page::Camera).unwrap(), r#""camera""#);
        assert_eq!(serde_json::to_string(&Page::Alarm).unwrap(), r#""alarm""#);
        assert_eq!(serde_json::to_string(&Page::Video).unwrap(), r#""video""#);
    }
}
