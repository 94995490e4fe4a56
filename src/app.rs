//! Application state holding the wgpu graphics context and the panel.
//!
//! Each frame runs the same cycle: drain web commands, advance the 1 Hz
//! clock, pick up the newest camera frame, rebuild the hit map and draw
//! list from current state, paint, then publish a snapshot for the API.
//! Frame pacing is driven by the winit event loop (see `main.rs`).

use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use bytes::Bytes;
use tokio::sync::{mpsc, watch};

use crate::api::{
    create_shared_state, run_server, PanelCommand, PanelSnapshot, SharedState, WsEvent,
};
use crate::camera::placeholder::{placeholder_image, PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
use crate::camera::{CameraCapture, CameraFrame, CameraStatus};
use crate::panel::sim::{self, ClockInfo};
use crate::panel::{draw, input, layout, FrameGeometry, PanelState, WidgetId};
use crate::settings::PanelSettings;
use crate::ui::{paint_scene, Backdrop};

/// A camera frame older than this is treated as a lost feed and the
/// placeholder comes back.
const FRAME_FRESHNESS: Duration = Duration::from_secs(1);

/// Helper function to render the egui pass straight onto the surface.
fn render_egui_pass(
    renderer: &egui_wgpu::Renderer,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    paint_jobs: &[egui::ClippedPrimitive],
    screen_descriptor: &egui_wgpu::ScreenDescriptor,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Panel Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    // SAFETY: The render_pass is used only within this function and dropped
    // before the encoder is finished.
    let render_pass_static: &mut wgpu::RenderPass<'static> =
        unsafe { std::mem::transmute(&mut render_pass) };

    renderer.render(render_pass_static, paint_jobs, screen_descriptor);
}

/// Main application state holding all wgpu resources and the panel.
pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    // egui integration
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    pub settings: PanelSettings,

    // Panel state and the hit map for the frame currently on screen
    state: PanelState,
    geometry: FrameGeometry,
    clock: ClockInfo,
    last_sim_tick: Instant,

    // Pointer, in logical points
    cursor: (f32, f32),
    pointer_down: bool,

    // Camera
    camera: Option<CameraCapture>,
    camera_texture: Option<egui::TextureHandle>,
    camera_frame_size: (u32, u32),
    last_frame_at: Option<Instant>,
    last_camera_frame: u64,
    latest_rgba: Option<CameraFrame>,
    placeholder_texture: egui::TextureHandle,

    // Web API bridge
    shared: Arc<SharedState>,
    command_rx: mpsc::UnboundedReceiver<PanelCommand>,
    api_shutdown_tx: Option<watch::Sender<bool>>,
    api_thread: Option<std::thread::JoinHandle<()>>,
    last_encoded_frame: u64,
}

impl App {
    /// Create a new App instance with initialized wgpu context.
    pub async fn new(window: Arc<Window>, settings: PanelSettings) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find suitable GPU adapter");

        log::info!("Using GPU: {}", adapter.get_info().name);
        log::info!("Backend: {:?}", adapter.get_info().backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Smart Panel Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(&adapter);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Surface format: {:?}", surface_format);

        // We pace frames ourselves, so prefer a non-blocking present mode.
        let present_mode = if surface_caps
            .present_modes
            .contains(&wgpu::PresentMode::Immediate)
        {
            wgpu::PresentMode::Immediate
        } else if surface_caps
            .present_modes
            .contains(&wgpu::PresentMode::Mailbox)
        {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };

        log::info!("Present mode: {:?}", present_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };

        surface.configure(&device, &config);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        let fallback = placeholder_image();
        let placeholder_texture = egui_ctx.load_texture(
            "camera-placeholder",
            egui::ColorImage::from_rgba_unmultiplied(
                [PLACEHOLDER_WIDTH as usize, PLACEHOLDER_HEIGHT as usize],
                fallback.as_raw(),
            ),
            egui::TextureOptions::LINEAR,
        );

        let (alarm_hour, alarm_minute) = sim::wall_clock_alarm();
        let mut state = PanelState::with_alarm(alarm_hour, alarm_minute);
        state.temperature = sim::current_temperature();
        let clock = ClockInfo::now();

        let scale = window.scale_factor() as f32;
        let geometry = layout(
            &state,
            size.width.max(1) as f32 / scale,
            size.height.max(1) as f32 / scale,
        );

        let initial = PanelSnapshot::from_state(&state, CameraStatus::Unavailable);
        let (shared, command_rx) = create_shared_state(initial);

        Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            egui_ctx,
            egui_state,
            egui_renderer,
            settings,
            state,
            geometry,
            clock,
            last_sim_tick: Instant::now(),
            cursor: (0.0, 0.0),
            pointer_down: false,
            camera: None,
            camera_texture: None,
            camera_frame_size: (0, 0),
            last_frame_at: None,
            last_camera_frame: 0,
            latest_rgba: None,
            placeholder_texture,
            shared,
            command_rx,
            api_shutdown_tx: None,
            api_thread: None,
            last_encoded_frame: 0,
        }
    }

    /// Spawns the control API on its own runtime thread.
    pub fn start_api_server(&mut self) {
        if self.api_thread.is_some() {
            return;
        }
        let port = self.settings.web_port;
        let shared = self.shared.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = std::thread::Builder::new()
            .name("api-server".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Runtime::new() {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        log::error!("Failed to start API runtime: {}", err);
                        return;
                    }
                };
                if let Err(err) = runtime.block_on(run_server(port, shared, shutdown_rx)) {
                    log::error!("Control API exited: {}", err);
                }
            });

        match handle {
            Ok(handle) => {
                self.api_thread = Some(handle);
                self.api_shutdown_tx = Some(shutdown_tx);
            }
            Err(err) => log::error!("Failed to spawn API thread: {}", err),
        }
    }

    /// Stops the API server and the camera thread.
    pub fn shutdown(&mut self) {
        if let Some(shutdown_tx) = self.api_shutdown_tx.take() {
            let _ = shutdown_tx.send(true);
        }
        if let Some(handle) = self.api_thread.take() {
            let _ = handle.join();
        }
        if let Some(camera) = &mut self.camera {
            camera.stop();
        }
    }

    /// Handle window resize events.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            log::debug!("Resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Handle winit window events for egui.
    pub fn handle_window_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(&self.window, event);
        response.consumed
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn target_fps(&self) -> u32 {
        self.settings.target_fps
    }

    /// Tracks pointer motion and, while the button is held, drags the
    /// scrollbars. Coordinates arrive in physical pixels.
    pub fn on_mouse_move(&mut self, x_px: f32, y_px: f32) {
        let scale = self.window.scale_factor() as f32;
        self.cursor = (x_px / scale, y_px / scale);
        if self.pointer_down {
            let (x, y) = self.cursor;
            if input::drag(&mut self.state, &self.geometry, x, y).is_some() {
                self.broadcast_state_changed();
            }
        }
    }

    pub fn on_mouse_down(&mut self) {
        self.pointer_down = true;
        let (x, y) = self.cursor;
        if let Some(id) = input::press(&mut self.state, &self.geometry, x, y) {
            if id == WidgetId::CameraButton {
                self.on_recording_changed();
            }
            self.broadcast_state_changed();
        }
    }

    pub fn on_mouse_up(&mut self) {
        self.pointer_down = false;
    }

    fn on_recording_changed(&mut self) {
        if self.state.is_recording {
            self.ensure_camera();
        }
        self.shared.broadcast(WsEvent::RecordingChanged {
            is_recording: self.state.is_recording,
        });
    }

    fn ensure_camera(&mut self) {
        if self.camera.is_some() {
            return;
        }
        match CameraCapture::new(
            self.settings.camera_index,
            self.settings.camera_width,
            self.settings.camera_height,
        ) {
            Ok(camera) => self.camera = Some(camera),
            Err(err) => log::warn!("Failed to start camera capture: {}", err),
        }
    }

    fn camera_status(&self) -> CameraStatus {
        self.camera
            .as_ref()
            .map(|camera| camera.status())
            .unwrap_or(CameraStatus::Unavailable)
    }

    fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot::from_state(&self.state, self.camera_status())
    }

    fn broadcast_state_changed(&self) {
        self.shared.broadcast(WsEvent::StateChanged(self.snapshot()));
    }

    /// Applies commands queued by web clients since the last frame.
    fn apply_pending_commands(&mut self) {
        let mut changed = false;
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                PanelCommand::Patch(patch) => {
                    if patch.is_empty() {
                        continue;
                    }
                    patch.apply(&mut self.state);
                    changed = true;
                }
                PanelCommand::ToggleRecording => {
                    self.state.toggle_recording();
                    self.on_recording_changed();
                    changed = true;
                }
                PanelCommand::SetAlarm { hour, minute } => {
                    self.state.set_alarm(hour, minute);
                    changed = true;
                }
            }
        }
        if changed {
            self.broadcast_state_changed();
        }
    }

    /// Advances the 1 Hz simulation: temperature and clock labels.
    fn tick_sim(&mut self) {
        if self.last_sim_tick.elapsed() < Duration::from_secs(1) {
            return;
        }
        self.last_sim_tick = Instant::now();
        self.state.temperature = sim::current_temperature();
        self.clock = ClockInfo::now();
        self.shared.broadcast(WsEvent::TemperatureUpdate {
            temperature: self.state.temperature,
        });
    }

    /// Uploads the newest camera frame to the backdrop texture. Recording
    /// gates consumption, not the device: the capture thread keeps running
    /// while stopped and the backdrop falls back to the placeholder.
    fn poll_camera(&mut self) {
        if !self.state.is_recording {
            return;
        }
        let Some(camera) = &self.camera else {
            return;
        };
        let Some(frame) = camera.latest_frame() else {
            return;
        };
        if frame.frame_number == self.last_camera_frame {
            return;
        }
        self.last_camera_frame = frame.frame_number;
        self.camera_frame_size = (frame.width, frame.height);
        self.last_frame_at = Some(Instant::now());

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.camera_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.camera_texture = Some(self.egui_ctx.load_texture(
                    "camera-frame",
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
        self.latest_rgba = Some(frame);
    }

    /// Encodes the newest camera frame into the shared JPEG slot for
    /// the MJPEG stream. Only runs while recording with the web API on.
    fn encode_stream_frame(&mut self) {
        if !self.state.is_recording || !self.settings.web_enabled {
            return;
        }
        let Some(frame) = &self.latest_rgba else {
            return;
        };
        if frame.frame_number == self.last_encoded_frame {
            return;
        }
        self.last_encoded_frame = frame.frame_number;

        let mut rgb = Vec::with_capacity((frame.width * frame.height * 3) as usize);
        for pixel in frame.data.chunks_exact(4) {
            rgb.extend_from_slice(&pixel[..3]);
        }

        let mut jpeg = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut jpeg,
            self.settings.jpeg_quality,
        );
        if let Err(err) = encoder.encode(
            &rgb,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        ) {
            log::warn!("Failed to encode stream frame: {}", err);
            return;
        }
        self.shared.publish_jpeg(Bytes::from(jpeg));
    }

    fn backdrop(&self) -> Backdrop {
        let fresh = self.state.is_recording
            && self
                .last_frame_at
                .map(|at| at.elapsed() < FRAME_FRESHNESS)
                .unwrap_or(false);
        let live = if fresh {
            self.camera_texture.as_ref().map(|texture| {
                let (w, h) = self.camera_frame_size;
                (texture.id(), w as f32 / h.max(1) as f32)
            })
        } else {
            None
        };
        Backdrop {
            live,
            placeholder: Some((
                self.placeholder_texture.id(),
                PLACEHOLDER_WIDTH as f32 / PLACEHOLDER_HEIGHT as f32,
            )),
        }
    }

    /// Render one frame.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(());
        }

        self.apply_pending_commands();
        self.tick_sim();
        self.poll_camera();
        self.encode_stream_frame();

        let scale = self.window.scale_factor() as f32;
        self.geometry = layout(
            &self.state,
            self.size.width as f32 / scale,
            self.size.height as f32 / scale,
        );
        let commands = draw(&self.state, &self.geometry, &self.clock);
        let backdrop = self.backdrop();

        self.shared.update_snapshot(self.snapshot());

        let raw_input = self.egui_state.take_egui_input(&self.window);
        self.egui_ctx.begin_pass(raw_input);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(&self.egui_ctx, |ui| {
                let origin = ui.max_rect().min;
                paint_scene(ui, origin, &commands, &backdrop);
            });

        let full_output = self.egui_ctx.end_pass();

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let output = self.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        render_egui_pass(
            &self.egui_renderer,
            &mut encoder,
            &surface_view,
            &paint_jobs,
            &screen_descriptor,
        );

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
