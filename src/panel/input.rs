//! Pointer dispatch.
//!
//! Both entry points are stateless: every event is hit-tested against
//! the geometry computed for the frame currently on screen, never a
//! cached hit from an earlier frame. Exactly one mutation per event.

use crate::panel::geometry::{FrameGeometry, Track, WidgetId};
use crate::panel::state::PanelState;

/// Applies a press. Buttons resolve on press only; a press inside a
/// scrollbar band applies the bar position immediately. Returns the
/// widget that consumed the event, `None` for the bare backdrop.
pub fn press(
    state: &mut PanelState,
    geometry: &FrameGeometry,
    x: f32,
    y: f32,
) -> Option<WidgetId> {
    let id = geometry.hit(x, y)?;
    match id {
        WidgetId::CameraButton => {
            state.toggle_recording();
        }
        WidgetId::HourUp => state.step_hour(1),
        WidgetId::HourDown => state.step_hour(-1),
        WidgetId::MinuteUp => state.step_minute(1),
        WidgetId::MinuteDown => state.step_minute(-1),
        WidgetId::DoneButton => state.confirm_alarm(),
        WidgetId::PageButton(page) => state.current_page = page,
        WidgetId::BrightnessBar => {
            state.brightness = bar_value_at(&geometry.brightness_track, y);
        }
        WidgetId::VolumeBar => {
            state.volume = bar_value_at(&geometry.volume_track, y);
        }
    }
    Some(id)
}

/// Applies pointer motion with the button held. Only the scrollbar
/// bands respond to motion; motion over anything else (or outside the
/// ±20 px band) leaves the state untouched.
pub fn drag(state: &mut PanelState, geometry: &FrameGeometry, x: f32, y: f32) -> Option<WidgetId> {
    match geometry.hit(x, y)? {
        WidgetId::BrightnessBar => {
            state.brightness = bar_value_at(&geometry.brightness_track, y);
            Some(WidgetId::BrightnessBar)
        }
        WidgetId::VolumeBar => {
            state.volume = bar_value_at(&geometry.volume_track, y);
            Some(WidgetId::VolumeBar)
        }
        _ => None,
    }
}

/// Inverts a pointer y into a bar value: the track top maps to 100,
/// the bottom to 0.
pub fn bar_value_at(track: &Track, y: f32) -> i32 {
    let progress = (y - track.top) / track.height;
    (((1.0 - progress) * 100.0).round() as i32).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::geometry::layout;
    use crate::panel::state::Page;

    const W: f32 = 1024.0;
    const H: f32 = 600.0;

    fn press_center(state: &mut PanelState, geometry: &FrameGeometry, id: WidgetId) {
        let (cx, cy) = geometry.rect(id).unwrap().center();
        assert_eq!(press(state, geometry, cx, cy), Some(id));
    }

    #[test]
    fn test_camera_button_toggles_recording() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        press_center(&mut state, &geometry, WidgetId::CameraButton);
        assert!(state.is_recording);
        press_center(&mut state, &geometry, WidgetId::CameraButton);
        assert!(!state.is_recording);
    }

    #[test]
    fn test_spinbox_zones_step_with_wraparound() {
        let mut state = PanelState::default();
        state.current_page = Page::Alarm;
        state.alarm_hour = 23;
        state.alarm_minute = 0;
        let geometry = layout(&state, W, H);

        press_center(&mut state, &geometry, WidgetId::HourUp);
        assert_eq!(state.alarm_hour, 0);
        press_center(&mut state, &geometry, WidgetId::HourDown);
        assert_eq!(state.alarm_hour, 23);
        press_center(&mut state, &geometry, WidgetId::MinuteDown);
        assert_eq!(state.alarm_minute, 59);
        press_center(&mut state, &geometry, WidgetId::MinuteUp);
        assert_eq!(state.alarm_minute, 0);
    }

    #[test]
    fn test_done_press_formats_label() {
        let mut state = PanelState::default();
        state.current_page = Page::Alarm;
        state.alarm_hour = 7;
        state.alarm_minute = 5;
        let geometry = layout(&state, W, H);
        press_center(&mut state, &geometry, WidgetId::DoneButton);
        assert_eq!(state.alarm_set_time.as_deref(), Some("07:05"));
        assert_eq!(state.alarm_hour, 7);
        assert_eq!(state.alarm_minute, 5);
    }

    #[test]
    fn test_page_button_switches_page() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        press_center(&mut state, &geometry, WidgetId::PageButton(Page::Video));
        assert_eq!(state.current_page, Page::Video);
    }

    #[test]
    fn test_press_on_backdrop_is_noop() {
        let mut state = PanelState::default();
        let before = state.clone();
        let geometry = layout(&state, W, H);
        assert_eq!(press(&mut state, &geometry, 512.0, 200.0), None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_bar_round_trip_every_value() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        let track = geometry.brightness_track;
        for value in 0..=100 {
            let y = track.top + (1.0 - value as f32 / 100.0) * track.height;
            assert_eq!(
                press(&mut state, &geometry, track.x, y),
                Some(WidgetId::BrightnessBar)
            );
            assert_eq!(state.brightness, value);
        }
    }

    #[test]
    fn test_volume_drag_round_trip() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        let track = geometry.volume_track;
        for value in [0, 1, 37, 50, 99, 100] {
            let y = track.top + (1.0 - value as f32 / 100.0) * track.height;
            assert_eq!(
                drag(&mut state, &geometry, track.x, y),
                Some(WidgetId::VolumeBar)
            );
            assert_eq!(state.volume, value);
        }
    }

    #[test]
    fn test_bar_value_clamps_outside_track() {
        let track = Track {
            x: 40.0,
            top: 100.0,
            height: 200.0,
        };
        assert_eq!(bar_value_at(&track, 50.0), 100);
        assert_eq!(bar_value_at(&track, 400.0), 0);
        assert_eq!(bar_value_at(&track, 100.0), 100);
        assert_eq!(bar_value_at(&track, 300.0), 0);
        assert_eq!(bar_value_at(&track, 200.0), 50);
    }

    #[test]
    fn test_drag_outside_band_holds_value() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        let track = geometry.brightness_track;
        let y80 = track.top + 0.2 * track.height;
        drag(&mut state, &geometry, track.x, y80);
        let held = state.brightness;

        // Wandering out of the ±20 px band stops updates.
        assert_eq!(drag(&mut state, &geometry, track.x + 30.0, track.top), None);
        assert_eq!(state.brightness, held);
        // Re-entering resumes.
        assert_eq!(
            drag(&mut state, &geometry, track.x, track.bottom()),
            Some(WidgetId::BrightnessBar)
        );
        assert_eq!(state.brightness, 0);
    }

    #[test]
    fn test_buttons_ignore_motion() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        let (cx, cy) = geometry.rect(WidgetId::CameraButton).unwrap().center();
        assert_eq!(drag(&mut state, &geometry, cx, cy), None);
        assert!(!state.is_recording);
    }

    #[test]
    fn test_page_switch_mid_drag_uses_new_geometry() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        let track = geometry.brightness_track;
        assert_eq!(
            drag(&mut state, &geometry, track.x, track.top + 10.0),
            Some(WidgetId::BrightnessBar)
        );

        // A command switches the page between pointer events; the next
        // motion must resolve against the alarm page's map.
        state.current_page = Page::Alarm;
        let geometry = layout(&state, W, H);

        let (cx, cy) = geometry.rect(WidgetId::HourUp).unwrap().center();
        let hour = state.alarm_hour;
        let brightness = state.brightness;
        assert_eq!(drag(&mut state, &geometry, cx, cy), None);
        assert_eq!(state.alarm_hour, hour);
        assert_eq!(state.brightness, brightness);
    }

    #[test]
    fn test_stale_coordinates_resolve_on_current_map_only() {
        let mut state = PanelState::default();
        let camera_map = layout(&state, W, H);
        let (bx, by) = camera_map.rect(WidgetId::CameraButton).unwrap().center();

        state.current_page = Page::Alarm;
        let alarm_map = layout(&state, W, H);
        let before = state.clone();
        assert_eq!(press(&mut state, &alarm_map, bx, by), None);
        assert_eq!(state, before);
    }
}
