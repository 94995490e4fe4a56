//! Simulated clock and temperature.
//!
//! The temperature is a pure sawtooth over the wall clock, not a
//! thermal model; the clock strings feed the info bar.

use chrono::{Local, Timelike};

/// Sawtooth ramping 20.0 °C to 20.8 °C over each wall-clock minute.
pub fn temperature_at(unix_seconds: u64) -> f32 {
    20.0 + 0.8 * (unix_seconds % 60) as f32 / 60.0
}

/// The sawtooth sampled at the current wall clock.
pub fn current_temperature() -> f32 {
    let seconds = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    temperature_at(seconds)
}

/// Formatted wall-clock strings, refreshed by the 1 Hz driver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClockInfo {
    /// `MM/DD/YYYY` for the info bar.
    pub date: String,
    /// `HH:MM` for the info bar.
    pub time: String,
    /// `DD/MM/YYYY` for the video page title.
    pub video_date: String,
}

impl ClockInfo {
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            date: now.format("%m/%d/%Y").to_string(),
            time: now.format("%H:%M").to_string(),
            video_date: now.format("%d/%m/%Y").to_string(),
        }
    }
}

/// Hour and minute for preloading the alarm spinboxes at startup.
pub fn wall_clock_alarm() -> (i32, i32) {
    let now = Local::now();
    (now.hour() as i32, now.minute() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_sawtooth_endpoints() {
        assert_eq!(temperature_at(0), 20.0);
        assert!((temperature_at(30) - 20.4).abs() < 1e-5);
        assert!((temperature_at(59) - (20.0 + 0.8 * 59.0 / 60.0)).abs() < 1e-5);
        // Wraps back to the base each minute.
        assert_eq!(temperature_at(60), 20.0);
        assert_eq!(temperature_at(61), temperature_at(1));
    }

    #[test]
    fn test_temperature_stays_in_band() {
        for seconds in 0..600 {
            let temperature = temperature_at(seconds);
            assert!((20.0..20.8).contains(&temperature));
        }
    }

    #[test]
    fn test_clock_info_shapes() {
        let clock = ClockInfo::now();
        assert_eq!(clock.date.len(), 10);
        assert_eq!(clock.time.len(), 5);
        assert_eq!(clock.video_date.len(), 10);
        assert!(clock.time.contains(':'));
    }

    #[test]
    fn test_wall_clock_alarm_in_range() {
        let (hour, minute) = wall_clock_alarm();
        assert!((0..24).contains(&hour));
        assert!((0..60).contains(&minute));
    }
}
