//! Smart Panel Library
//!
//! A kiosk-style control panel: camera view with recording, alarm clock,
//! brightness and volume scrollbars, and an embedded web API for remote
//! control and MJPEG streaming.

pub mod api;
pub mod app;
pub mod camera;
pub mod panel;
pub mod settings;
pub mod telemetry;
pub mod ui;

pub use app::App;
pub use api::{PanelCommand, PanelSnapshot, SharedState, WsEvent};
pub use camera::{CameraCapture, CameraFrame, CameraStatus};
pub use panel::{draw, layout, DrawCmd, FrameGeometry, Page, PanelState, StatePatch, WidgetId};
pub use settings::PanelSettings;
