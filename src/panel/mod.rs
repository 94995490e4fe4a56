//! The pure panel core.
//!
//! State, per-frame geometry, input dispatch, the display list, and the
//! simulated sensors. Nothing in here touches a window, a camera, or a
//! socket, which is what keeps the whole layer unit-testable.

pub mod draw;
pub mod geometry;
pub mod input;
pub mod sim;
pub mod state;

pub use draw::{draw, DrawCmd};
pub use geometry::{layout, FrameGeometry, Rect, WidgetId};
pub use state::{Page, PanelState, StatePatch};
