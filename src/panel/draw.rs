//! Display list for the panel.
//!
//! `draw` is a pure function of state, the frame's geometry, and the
//! clock strings. It emits backend-agnostic paint commands that the
//! desktop front-end replays against the egui painter. Interactive
//! widgets are painted from the same rects the dispatcher hit-tests,
//! so pixels and regions cannot drift apart.

use crate::panel::geometry::{FrameGeometry, Rect, Track, WidgetId, THUMB_H};
use crate::panel::sim::ClockInfo;
use crate::panel::state::{Page, PanelState};

/// RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The kiosk palette.
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0x42, 0x42, 0x42);
    pub const TRACK: Color = Color::rgb(0x5A, 0x5A, 0x5A);
    pub const THUMB: Color = Color::rgb(0x9A, 0x9A, 0x9A);
    pub const ACCENT: Color = Color::rgb(0xFF, 0x3B, 0x30);
    pub const ACCENT_BLUE: Color = Color::rgb(0x00, 0x7A, 0xFF);
    pub const RECORD_GREEN: Color = Color::rgb(0x34, 0xC7, 0x59);
    pub const TEXT: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const TEXT_DARK: Color = Color::rgb(0x2C, 0x2C, 0x2C);
    pub const TEXT_DIM: Color = Color::rgb(0xA0, 0xA0, 0xA0);
    pub const PANEL_LIGHT: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BUTTON_FACE: Color = Color::rgb(0xF0, 0xF0, 0xF0);
    pub const BUTTON_BG: Color = Color::rgb(0xF5, 0xF5, 0xF5);
    pub const BORDER: Color = Color::rgb(0xD0, 0xD0, 0xD0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One paint instruction. Text positions anchor the vertical center of
/// the line; `align` picks the horizontal anchor.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// The camera frame or placeholder, letterboxed into `rect`.
    Backdrop { rect: Rect },
    Fill { rect: Rect, color: Color },
    Stroke { rect: Rect, color: Color, width: f32 },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        color: Color,
    },
    Triangle {
        points: [(f32, f32); 3],
        color: Color,
    },
    Text {
        pos: (f32, f32),
        text: String,
        size: f32,
        color: Color,
        align: Align,
    },
}

/// Builds the frame's display list.
pub fn draw(state: &PanelState, geometry: &FrameGeometry, clock: &ClockInfo) -> Vec<DrawCmd> {
    let mut commands = Vec::with_capacity(48);

    commands.push(DrawCmd::Backdrop {
        rect: geometry.content,
    });

    match state.current_page {
        Page::Camera => camera_overlay(state, geometry, &mut commands),
        Page::Alarm => alarm_overlay(state, geometry, &mut commands),
        Page::Video => video_overlay(geometry, clock, &mut commands),
    }

    // The confirmed alarm shows in the top-right corner of every page.
    if let Some(label) = &state.alarm_set_time {
        commands.push(DrawCmd::Text {
            pos: (geometry.content.w - 30.0, 30.0),
            text: format!("Alarm: {label}"),
            size: 20.0,
            color: palette::TEXT,
            align: Align::Right,
        });
    }

    scrollbars(state, geometry, &mut commands);
    bottom_bar(state, geometry, clock, &mut commands);

    commands
}

fn camera_overlay(state: &PanelState, geometry: &FrameGeometry, commands: &mut Vec<DrawCmd>) {
    if state.is_recording {
        commands.push(DrawCmd::Circle {
            center: (95.0, 75.0),
            radius: 15.0,
            color: palette::ACCENT,
        });
        commands.push(DrawCmd::Text {
            pos: (130.0, 75.0),
            text: "REC".to_string(),
            size: 28.0,
            color: palette::TEXT,
            align: Align::Left,
        });
    }

    if let Some(button) = geometry.rect(WidgetId::CameraButton) {
        let (color, label) = if state.is_recording {
            (palette::ACCENT, "Stop")
        } else {
            (palette::RECORD_GREEN, "Record")
        };
        commands.push(DrawCmd::Fill {
            rect: button,
            color,
        });
        commands.push(DrawCmd::Text {
            pos: button.center(),
            text: label.to_string(),
            size: 20.0,
            color: palette::TEXT,
            align: Align::Center,
        });
    }
}

fn alarm_overlay(state: &PanelState, geometry: &FrameGeometry, commands: &mut Vec<DrawCmd>) {
    commands.push(DrawCmd::Text {
        pos: (30.0, 30.0),
        text: "ALARM".to_string(),
        size: 28.0,
        color: palette::TEXT,
        align: Align::Left,
    });

    let panels = [
        (
            geometry.hour_box,
            state.alarm_hour,
            WidgetId::HourUp,
            WidgetId::HourDown,
            "HOUR",
        ),
        (
            geometry.minute_box,
            state.alarm_minute,
            WidgetId::MinuteUp,
            WidgetId::MinuteDown,
            "MINUTE",
        ),
    ];

    for (panel, value, up_id, down_id, caption) in panels {
        let Some(panel) = panel else { continue };

        commands.push(DrawCmd::Fill {
            rect: panel,
            color: palette::PANEL_LIGHT,
        });

        if let (Some(up), Some(down)) = (geometry.rect(up_id), geometry.rect(down_id)) {
            commands.push(DrawCmd::Fill {
                rect: up,
                color: palette::BUTTON_FACE,
            });
            commands.push(DrawCmd::Fill {
                rect: down,
                color: palette::BUTTON_FACE,
            });
            commands.push(DrawCmd::Line {
                from: (up.x, up.bottom()),
                to: (panel.right(), up.bottom()),
                color: palette::BORDER,
                width: 2.0,
            });

            let (ux, uy) = up.center();
            commands.push(DrawCmd::Triangle {
                points: [(ux, uy - 15.0), (ux - 12.0, uy + 12.0), (ux + 12.0, uy + 12.0)],
                color: palette::TEXT_DARK,
            });
            let (dx, dy) = down.center();
            commands.push(DrawCmd::Triangle {
                points: [(dx, dy + 15.0), (dx - 12.0, dy - 12.0), (dx + 12.0, dy - 12.0)],
                color: palette::TEXT_DARK,
            });
        }

        commands.push(DrawCmd::Stroke {
            rect: panel,
            color: palette::BORDER,
            width: 2.0,
        });

        // Display zone sits left of the 60 px button column.
        let display = Rect::new(panel.x, panel.y, panel.w - 60.0, panel.h);
        commands.push(DrawCmd::Text {
            pos: display.center(),
            text: format!("{value:02}"),
            size: 60.0,
            color: palette::TEXT_DARK,
            align: Align::Center,
        });
        commands.push(DrawCmd::Text {
            pos: (panel.center().0, panel.bottom() + 30.0),
            text: caption.to_string(),
            size: 16.0,
            color: palette::TEXT_DIM,
            align: Align::Center,
        });
    }

    // Colon dots between the panels.
    if let Some(hours) = geometry.hour_box {
        let mid_x = geometry.content.w / 2.0;
        let cy = hours.center().1;
        for offset in [-15.0, 15.0] {
            commands.push(DrawCmd::Circle {
                center: (mid_x, cy + offset),
                radius: 8.0,
                color: palette::TEXT,
            });
        }
    }

    if let Some(done) = geometry.rect(WidgetId::DoneButton) {
        let shadow = Rect::new(done.x + 4.0, done.y + 4.0, done.w, done.h);
        commands.push(DrawCmd::Fill {
            rect: shadow,
            color: Color::rgba(0, 0, 0, 48),
        });
        commands.push(DrawCmd::Fill {
            rect: done,
            color: palette::ACCENT_BLUE,
        });
        commands.push(DrawCmd::Stroke {
            rect: Rect::new(done.x + 2.0, done.y + 2.0, done.w - 4.0, done.h - 4.0),
            color: Color::rgb(0xCC, 0xCC, 0xCC),
            width: 1.0,
        });
        commands.push(DrawCmd::Text {
            pos: done.center(),
            text: "Done".to_string(),
            size: 22.0,
            color: palette::TEXT,
            align: Align::Center,
        });
    }
}

fn video_overlay(geometry: &FrameGeometry, clock: &ClockInfo, commands: &mut Vec<DrawCmd>) {
    let content = geometry.content;

    commands.push(DrawCmd::Text {
        pos: (30.0, 30.0),
        text: format!("VIDEO : {}", clock.video_date),
        size: 28.0,
        color: palette::TEXT,
        align: Align::Left,
    });

    let bar_y = content.h * 0.88;
    let margin = 150.0;
    commands.push(DrawCmd::Line {
        from: (margin, bar_y),
        to: (content.w - margin, bar_y),
        color: palette::TEXT,
        width: 4.0,
    });
    commands.push(DrawCmd::Text {
        pos: (margin - 35.0, bar_y),
        text: "6:15".to_string(),
        size: 16.0,
        color: palette::TEXT,
        align: Align::Right,
    });
    commands.push(DrawCmd::Text {
        pos: (content.w - margin + 35.0, bar_y),
        text: "8:34".to_string(),
        size: 16.0,
        color: palette::TEXT,
        align: Align::Left,
    });

    // Fixed scrub position, not state-driven.
    let scrub_x = margin + 0.7 * (content.w - 2.0 * margin);
    commands.push(DrawCmd::Circle {
        center: (scrub_x, bar_y),
        radius: 10.0,
        color: palette::TEXT,
    });

    let icons_y = bar_y - 50.0;
    for (i, icon) in ["<<", ">", "||"].iter().enumerate() {
        commands.push(DrawCmd::Text {
            pos: (margin + 60.0 * i as f32, icons_y),
            text: (*icon).to_string(),
            size: 32.0,
            color: palette::TEXT,
            align: Align::Center,
        });
    }
}

fn scrollbars(state: &PanelState, geometry: &FrameGeometry, commands: &mut Vec<DrawCmd>) {
    let bars: [(&Track, i32, &str); 2] = [
        (&geometry.brightness_track, state.brightness, "BRT"),
        (&geometry.volume_track, state.volume, "VOL"),
    ];
    for (track, value, caption) in bars {
        commands.push(DrawCmd::Fill {
            rect: Rect::new(track.x - 4.0, track.top, 8.0, track.height),
            color: palette::TRACK,
        });
        commands.push(DrawCmd::Fill {
            rect: Rect::new(track.x - 6.0, track.thumb_top(value), 12.0, THUMB_H),
            color: palette::THUMB,
        });
        commands.push(DrawCmd::Text {
            pos: (track.x, track.top - 20.0),
            text: caption.to_string(),
            size: 14.0,
            color: palette::TEXT,
            align: Align::Center,
        });
    }
}

fn bottom_bar(
    state: &PanelState,
    geometry: &FrameGeometry,
    clock: &ClockInfo,
    commands: &mut Vec<DrawCmd>,
) {
    let bar = geometry.bottom_bar;
    commands.push(DrawCmd::Fill {
        rect: bar,
        color: palette::BACKGROUND,
    });

    for page in Page::ALL {
        if let Some(rect) = geometry.rect(WidgetId::PageButton(page)) {
            let active = page == state.current_page;
            commands.push(DrawCmd::Fill {
                rect,
                color: if active {
                    palette::PANEL_LIGHT
                } else {
                    palette::BUTTON_BG
                },
            });
            if active {
                commands.push(DrawCmd::Stroke {
                    rect,
                    color: palette::ACCENT_BLUE,
                    width: 3.0,
                });
            }
            commands.push(DrawCmd::Text {
                pos: rect.center(),
                text: page.title().to_string(),
                size: 20.0,
                color: palette::TEXT_DARK,
                align: Align::Center,
            });
        }
    }

    let right = bar.right() - 44.0;
    let (_, cy) = bar.center();
    commands.push(DrawCmd::Text {
        pos: (right, cy - 14.0),
        text: clock.date.clone(),
        size: 20.0,
        color: palette::TEXT,
        align: Align::Right,
    });
    commands.push(DrawCmd::Text {
        pos: (right, cy + 14.0),
        text: format!("{}  {:.1}°C", clock.time, state.temperature),
        size: 20.0,
        color: palette::TEXT,
        align: Align::Right,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::geometry::layout;

    const W: f32 = 1024.0;
    const H: f32 = 600.0;

    fn clock() -> ClockInfo {
        ClockInfo {
            date: "08/25/2026".to_string(),
            time: "14:30".to_string(),
            video_date: "25/08/2026".to_string(),
        }
    }

    fn texts(commands: &[DrawCmd]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_backdrop_comes_first_and_fills_content() {
        let state = PanelState::default();
        let geometry = layout(&state, W, H);
        let commands = draw(&state, &geometry, &clock());
        assert_eq!(
            commands[0],
            DrawCmd::Backdrop {
                rect: geometry.content
            }
        );
    }

    #[test]
    fn test_camera_button_painted_from_hit_rect() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        let button = geometry.rect(WidgetId::CameraButton).unwrap();

        let commands = draw(&state, &geometry, &clock());
        assert!(commands.iter().any(|cmd| matches!(
            cmd,
            DrawCmd::Fill { rect, color } if *rect == button && *color == palette::RECORD_GREEN
        )));
        assert!(texts(&commands).contains(&"Record"));

        state.is_recording = true;
        let commands = draw(&state, &geometry, &clock());
        assert!(commands.iter().any(|cmd| matches!(
            cmd,
            DrawCmd::Fill { rect, color } if *rect == button && *color == palette::ACCENT
        )));
        assert!(texts(&commands).contains(&"Stop"));
    }

    #[test]
    fn test_rec_indicator_only_while_recording() {
        let mut state = PanelState::default();
        let geometry = layout(&state, W, H);
        assert!(!texts(&draw(&state, &geometry, &clock())).contains(&"REC"));
        state.is_recording = true;
        assert!(texts(&draw(&state, &geometry, &clock())).contains(&"REC"));
    }

    #[test]
    fn test_alarm_caption_appears_on_every_page() {
        let mut state = PanelState::default();
        state.alarm_set_time = Some("07:05".to_string());
        for page in Page::ALL {
            state.current_page = page;
            let geometry = layout(&state, W, H);
            let commands = draw(&state, &geometry, &clock());
            assert!(
                texts(&commands).contains(&"Alarm: 07:05"),
                "missing caption on {page:?}"
            );
        }
    }

    #[test]
    fn test_thumb_rect_tracks_value() {
        let mut state = PanelState::default();
        for value in [0, 25, 100] {
            state.brightness = value;
            let geometry = layout(&state, W, H);
            let expected = geometry.brightness_track.thumb_top(value);
            let commands = draw(&state, &geometry, &clock());
            assert!(commands.iter().any(|cmd| matches!(
                cmd,
                DrawCmd::Fill { rect, color }
                    if *color == palette::THUMB && (rect.y - expected).abs() < 1e-3
                        && rect.x < 100.0
            )));
        }
    }

    #[test]
    fn test_spinbox_values_zero_padded() {
        let mut state = PanelState::default();
        state.current_page = Page::Alarm;
        state.alarm_hour = 7;
        state.alarm_minute = 5;
        let geometry = layout(&state, W, H);
        let commands = draw(&state, &geometry, &clock());
        let labels = texts(&commands);
        assert!(labels.contains(&"07"));
        assert!(labels.contains(&"05"));
        assert!(labels.contains(&"HOUR"));
        assert!(labels.contains(&"MINUTE"));
        assert!(labels.contains(&"Done"));
    }

    #[test]
    fn test_video_hud_contents() {
        let mut state = PanelState::default();
        state.current_page = Page::Video;
        let geometry = layout(&state, W, H);
        let commands = draw(&state, &geometry, &clock());
        let labels = texts(&commands);
        assert!(labels.contains(&"6:15"));
        assert!(labels.contains(&"8:34"));
        assert!(labels.contains(&"VIDEO : 25/08/2026"));

        let content = geometry.content;
        let scrub_x = 150.0 + 0.7 * (content.w - 300.0);
        assert!(commands.iter().any(|cmd| matches!(
            cmd,
            DrawCmd::Circle { center, radius, .. }
                if (center.0 - scrub_x).abs() < 1e-3 && *radius == 10.0
        )));
    }

    #[test]
    fn test_active_page_button_is_highlighted() {
        let mut state = PanelState::default();
        state.current_page = Page::Alarm;
        let geometry = layout(&state, W, H);
        let active = geometry.rect(WidgetId::PageButton(Page::Alarm)).unwrap();
        let idle = geometry.rect(WidgetId::PageButton(Page::Video)).unwrap();
        let commands = draw(&state, &geometry, &clock());

        assert!(commands.iter().any(|cmd| matches!(
            cmd,
            DrawCmd::Stroke { rect, color, .. }
                if *rect == active && *color == palette::ACCENT_BLUE
        )));
        assert!(!commands.iter().any(|cmd| matches!(
            cmd,
            DrawCmd::Stroke { rect, .. } if *rect == idle
        )));
    }

    #[test]
    fn test_info_bar_formats_temperature() {
        let mut state = PanelState::default();
        state.temperature = 20.4;
        let geometry = layout(&state, W, H);
        let commands = draw(&state, &geometry, &clock());
        assert!(texts(&commands).contains(&"14:30  20.4°C"));
    }
}
