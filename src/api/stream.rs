//! MJPEG camera stream.
//!
//! Serves `multipart/x-mixed-replace` parts from the latest-JPEG slot.
//! The stream only carries frames while recording is on; otherwise it
//! naps and sends nothing, keeping the connection open so the viewer
//! picks up the moment recording resumes.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use bytes::{Bytes, BytesMut};
use futures_util::stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use super::shared::SharedState;

const BOUNDARY: &str = "frame";
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const IDLE_NAP: Duration = Duration::from_millis(100);

pub async fn camera_feed(State(state): State<Arc<SharedState>>) -> impl IntoResponse {
    let frames = stream::unfold((state, false), |(state, started)| async move {
        if started {
            tokio::time::sleep(FRAME_INTERVAL).await;
        }
        loop {
            if state.get_snapshot().is_recording {
                if let Some(jpeg) = state.latest_jpeg() {
                    let part = frame_part(&jpeg);
                    return Some((Ok::<Bytes, Infallible>(part), (state, true)));
                }
            }
            tokio::time::sleep(IDLE_NAP).await;
        }
    });

    (
        [
            (
                header::CONTENT_TYPE,
                "multipart/x-mixed-replace; boundary=frame",
            ),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
}

fn frame_part(jpeg: &Bytes) -> Bytes {
    let mut part = BytesMut::with_capacity(jpeg.len() + 96);
    part.extend_from_slice(b"--");
    part.extend_from_slice(BOUNDARY.as_bytes());
    part.extend_from_slice(b"\r\nContent-Type: image/jpeg\r\n");
    part.extend_from_slice(format!("Content-Length: {}\r\n\r\n", jpeg.len()).as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    part.freeze()
}
