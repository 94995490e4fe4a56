//! Embedded web control API.
//!
//! A small axum app exposing the panel over HTTP: a control page, a
//! JSON state API, an MJPEG camera stream, and a WebSocket that pushes
//! state changes. The server runs on its own runtime thread and talks
//! to the render loop only through [`shared::SharedState`].

pub mod routes;
pub mod server;
pub mod shared;
pub mod stream;
pub mod websocket;

pub use routes::create_router;
pub use server::run_server;
pub use shared::{create_shared_state, PanelCommand, PanelSnapshot, SharedState, WsEvent};
