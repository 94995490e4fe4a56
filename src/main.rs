//! Smart Panel - Main Entry Point
//!
//! A kiosk-style control panel: camera view with recording, alarm clock,
//! brightness and volume scrollbars, and an embedded web API for remote
//! control and MJPEG streaming.

use std::sync::Arc;
use std::time::{Duration, Instant};

use smart_panel::camera::list_cameras;
use smart_panel::settings::PanelSettings;
use smart_panel::App;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

const WINDOW_TITLE: &str = "Smart Panel";

/// Below this the layout collapses, so the window cannot shrink past it.
const MIN_WINDOW_WIDTH: f64 = 900.0;
const MIN_WINDOW_HEIGHT: f64 = 520.0;

enum AppState {
    /// Initial state before the window is created
    Uninitialized { initial_settings: PanelSettings },
    /// Window and graphics context are ready
    Running { window: Arc<Window>, app: App },
}

/// Main application handler implementing winit's ApplicationHandler trait
struct SmartPanelApp {
    state: AppState,
    next_redraw_at: Instant,
}

impl SmartPanelApp {
    fn new(settings: PanelSettings) -> Self {
        Self {
            state: AppState::Uninitialized {
                initial_settings: settings,
            },
            next_redraw_at: Instant::now(),
        }
    }
}

impl ApplicationHandler for SmartPanelApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only initialize if we haven't already
        if let AppState::Uninitialized { initial_settings } = &self.state {
            tracing::info!("Creating window...");

            let settings = initial_settings.clone();

            let window_attributes = WindowAttributes::default()
                .with_title(WINDOW_TITLE)
                .with_inner_size(LogicalSize::new(
                    settings.window_width,
                    settings.window_height,
                ))
                .with_min_inner_size(LogicalSize::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT));

            let window = Arc::new(
                event_loop
                    .create_window(window_attributes)
                    .expect("Failed to create window"),
            );

            window.focus_window();

            tracing::info!(
                "Window created: {}x{}",
                window.inner_size().width,
                window.inner_size().height
            );

            tracing::info!("Initializing wgpu and egui...");
            let mut app = pollster::block_on(App::new(window.clone(), settings));

            if app.settings.web_enabled {
                app.start_api_server();
            }

            tracing::info!("Smart Panel ready!");
            tracing::info!("Press ESC to exit, F11 for fullscreen");

            self.state = AppState::Running { window, app };
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running { window, app } = &mut self.state else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        // Keep egui's input state fed. The scene is custom-painted, so the
        // panel does its own hit-testing and ignores egui's consumed flag.
        let _ = app.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                app.shutdown();
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => {
                    tracing::info!("Escape pressed, exiting...");
                    app.shutdown();
                    event_loop.exit();
                }
                KeyCode::F11 => {
                    if window.fullscreen().is_some() {
                        window.set_fullscreen(None);
                        tracing::info!("Exiting fullscreen");
                    } else {
                        window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
                        tracing::info!("Entering fullscreen");
                    }
                }
                _ => {}
            },

            WindowEvent::Resized(physical_size) => {
                app.resize(physical_size);
            }

            WindowEvent::CursorMoved { position, .. } => {
                app.on_mouse_move(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => app.on_mouse_down(),
                ElementState::Released => app.on_mouse_up(),
            },

            WindowEvent::RedrawRequested => match app.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    tracing::warn!("Surface lost, reconfiguring...");
                    app.resize(app.size());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("Out of GPU memory!");
                    event_loop.exit();
                }
                Err(e) => {
                    tracing::warn!("Surface error: {:?}", e);
                }
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Running { window, app } = &mut self.state else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        let target_fps = app.target_fps().max(1);

        // Integer nanoseconds to eliminate floating-point drift
        let frame_nanos = 1_000_000_000u64 / target_fps as u64;
        let frame_duration = Duration::from_nanos(frame_nanos);

        let now = Instant::now();

        // Check if we're within 2ms of target - if so, spin-wait for precision
        let spin_threshold = Duration::from_micros(2000);
        if now < self.next_redraw_at {
            if self.next_redraw_at.duration_since(now) <= spin_threshold {
                // Spin-wait the final microseconds
                while Instant::now() < self.next_redraw_at {
                    std::hint::spin_loop();
                }
            } else {
                // Still waiting - wake 1ms early next time
                let wake_at = self
                    .next_redraw_at
                    .checked_sub(Duration::from_micros(1000))
                    .unwrap_or(self.next_redraw_at);
                event_loop.set_control_flow(ControlFlow::WaitUntil(wake_at));
                return;
            }
        }

        // Time to render
        window.request_redraw();

        self.next_redraw_at += frame_duration;

        // Reset if more than 2 frames behind
        if Instant::now() > self.next_redraw_at + frame_duration * 2 {
            self.next_redraw_at = Instant::now() + frame_duration;
        }

        // Schedule next wake 1ms early
        let wake_at = self
            .next_redraw_at
            .checked_sub(Duration::from_micros(1000))
            .unwrap_or(self.next_redraw_at);
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake_at));
    }
}

fn main() {
    // Initialize logging with tracing
    use smart_panel::telemetry::{init_logging, LogConfig};
    let log_config = LogConfig {
        console_enabled: true,
        file_enabled: false,
        file_path: None,
        json_format: false,
        default_level: "info".to_string(),
    };
    // Keep the guard alive for the program duration
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("Smart Panel v0.1.0");

    let settings = PanelSettings::load();
    tracing::info!("Target FPS: {}", settings.target_fps);
    if settings.web_enabled {
        tracing::info!("Web control enabled on port {}", settings.web_port);
    }

    for camera in list_cameras() {
        tracing::info!("Found camera {}: {}", camera.index, camera.name);
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");

    // Default to sleeping; we explicitly schedule redraws in `about_to_wait`.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SmartPanelApp::new(settings);

    event_loop.run_app(&mut app).expect("Event loop error");
}
