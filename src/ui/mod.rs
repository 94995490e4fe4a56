//! egui-side rendering.

pub mod render;
pub mod widgets;

pub use render::{paint_scene, Backdrop};
