use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use ripple_common::ViewerConfig;
use ripple_input::{CameraAction, PointerTracker};
use ripple_render::{Frame, FreeCamera, GridMesh};
use ripple_render_wgpu::{GpuContext, GridRenderer, ShaderSources};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "ripple-desktop", about = "Ripple grid viewer with a free-flying camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// WGSL vertex shader, overrides the config
    #[arg(long)]
    vertex_shader: Option<PathBuf>,

    /// WGSL fragment shader, overrides the config
    #[arg(long)]
    fragment_shader: Option<PathBuf>,
}

/// Default key bindings for the six camera movements.
fn camera_action(key: KeyCode) -> Option<CameraAction> {
    match key {
        KeyCode::KeyW => Some(CameraAction::Forward),
        KeyCode::KeyS => Some(CameraAction::Backward),
        KeyCode::KeyA => Some(CameraAction::StrafeLeft),
        KeyCode::KeyD => Some(CameraAction::StrafeRight),
        KeyCode::KeyQ => Some(CameraAction::LiftUp),
        KeyCode::KeyZ => Some(CameraAction::LiftDown),
        _ => None,
    }
}

/// Whether an event still reaches the viewer after egui has seen it.
/// A left release always does, so a drag that ends over the overlay stops.
fn reaches_viewer(event: &WindowEvent, egui_consumed: bool) -> bool {
    !egui_consumed
        || matches!(
            event,
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Released,
                ..
            }
        )
}

/// Application state.
struct AppState {
    config: ViewerConfig,
    camera: FreeCamera,
    pointer: PointerTracker,
    show_overlay: bool,
    adapter_summary: String,
}

impl AppState {
    fn new(config: ViewerConfig) -> Self {
        let mut state = Self {
            camera: FreeCamera::from_config(&config.camera),
            pointer: PointerTracker::new(),
            show_overlay: true,
            adapter_summary: String::new(),
            config,
        };
        state.resize(state.config.window.width, state.config.window.height);
        state
    }

    fn resize(&mut self, width: u32, height: u32) {
        let cam = &self.config.camera;
        let aspect = width as f32 / height.max(1) as f32;
        self.camera
            .set_perspective_with_clip(cam.fov_degrees, aspect, cam.near, cam.far);
    }

    /// Returns whether the key changed anything on screen.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if !pressed {
            return false;
        }

        if let Some(action) = camera_action(key) {
            self.camera.apply(action);
            tracing::trace!(%action, "camera moved");
            return true;
        }

        match key {
            KeyCode::F1 => {
                self.show_overlay = !self.show_overlay;
                true
            }
            _ => false,
        }
    }

    fn handle_cursor(&mut self, position: Vec2) {
        let sample = self.pointer.moved(position);
        self.camera.update_pointer(sample);
    }

    fn handle_button(&mut self, button: MouseButton, pressed: bool) {
        if button != MouseButton::Left {
            return;
        }
        let sample = if pressed {
            self.pointer.pressed()
        } else {
            self.pointer.released()
        };
        self.camera.update_pointer(sample);
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_overlay {
            return;
        }

        let pos = self.camera.position;
        let dir = self.camera.view_direction();
        egui::Window::new("Ripple Deformer")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Adapter: {}", self.adapter_summary));
                ui.separator();
                ui.label(format!("Camera: ({:.1}, {:.1}, {:.1})", pos.x, pos.y, pos.z));
                ui.label(format!("Direction: ({:.2}, {:.2}, {:.2})", dir.x, dir.y, dir.z));
                ui.separator();
                ui.small("LMB drag: Look | W/S: Move | A/D: Strafe | Q/Z: Lift | F1: Toggle");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<GridRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    failure: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let config = &self.state.config;
        let attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)?;

        let shaders = ShaderSources::with_overrides(
            config.shaders.vertex.as_deref(),
            config.shaders.fragment.as_deref(),
        )?;
        let grid = GridMesh::from_config(&config.grid)?;
        let (width, height) = gpu.size();
        let renderer = GridRenderer::new(
            &gpu.device,
            gpu.surface_format(),
            width,
            height,
            &shaders,
            &grid,
        )?
        .with_clear_color(config.window.clear_color);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.surface_format(), None, 1, false);

        self.state.resize(width, height);
        self.state.adapter_summary = gpu.adapter_summary();

        tracing::info!("initialization successful");
        tracing::info!("adapter: {}", self.state.adapter_summary);

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(gpu), Some(renderer)) = (&self.window, &self.gpu, &self.renderer)
        else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                window.request_redraw();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = Frame::capture(&self.state.camera);
        renderer.render(&gpu.device, &gpu.queue, &view, &frame);

        let (Some(egui_winit), Some(egui_renderer)) =
            (&mut self.egui_winit, &mut self.egui_renderer)
        else {
            output.present();
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.repaint {
                window.request_redraw();
            }
            if !reaches_viewer(&event, response.consumed) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.size();
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, width, height);
                    }
                    self.state.resize(width, height);
                }
                self.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed)
                {
                    self.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .handle_cursor(Vec2::new(position.x as f32, position.y as f32));
                self.request_redraw();
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                self.state
                    .handle_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(path) = &cli.vertex_shader {
        config.shaders.vertex = Some(path.clone());
    }
    if let Some(path) = &cli.fragment_shader {
        config.shaders.fragment = Some(path.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("ripple-desktop starting");

    let config = load_config(&cli)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use winit::dpi::PhysicalPosition;
    use winit::event::DeviceId;

    fn state() -> AppState {
        AppState::new(ViewerConfig::default())
    }

    fn mouse_input(button: MouseButton, state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            // never handed to a platform backend
            device_id: unsafe { DeviceId::dummy() },
            state,
            button,
        }
    }

    #[test]
    fn startup_pose_and_projection() {
        let s = state();
        assert_eq!(s.camera.position, Vec3::new(0.0, 2.0, 45.0));
        assert_eq!(s.camera.rotation, Vec3::new(30.0, 30.0, 0.0));
        let mut expected = FreeCamera::default();
        expected.set_perspective(45.0, 640.0 / 480.0);
        assert!(s.camera.projection().abs_diff_eq(expected.projection(), 1e-6));
    }

    #[test]
    fn bound_keys_step_the_camera() {
        let mut s = state();
        assert!(s.handle_key(KeyCode::KeyW, true));
        assert_eq!(s.camera.position, Vec3::new(0.0, 2.0, 44.0));
        assert!(s.handle_key(KeyCode::KeyQ, true));
        assert_eq!(s.camera.position, Vec3::new(0.0, 3.0, 44.0));
        assert!(s.handle_key(KeyCode::KeyD, true));
        assert_eq!(s.camera.position, Vec3::new(1.0, 3.0, 44.0));
    }

    #[test]
    fn key_release_and_unbound_keys_do_nothing() {
        let mut s = state();
        assert!(!s.handle_key(KeyCode::KeyW, false));
        assert!(!s.handle_key(KeyCode::KeyX, true));
        assert_eq!(s.camera.position, Vec3::new(0.0, 2.0, 45.0));
    }

    #[test]
    fn f1_toggles_overlay() {
        let mut s = state();
        assert!(s.show_overlay);
        assert!(s.handle_key(KeyCode::F1, true));
        assert!(!s.show_overlay);
    }

    #[test]
    fn every_action_has_a_key() {
        let keys = [
            KeyCode::KeyW,
            KeyCode::KeyS,
            KeyCode::KeyA,
            KeyCode::KeyD,
            KeyCode::KeyQ,
            KeyCode::KeyZ,
        ];
        for action in CameraAction::ALL {
            assert!(keys.iter().any(|&k| camera_action(k) == Some(action)));
        }
    }

    #[test]
    fn moving_without_button_does_not_rotate() {
        let mut s = state();
        s.handle_cursor(Vec2::new(100.0, 100.0));
        s.handle_cursor(Vec2::new(180.0, 40.0));
        assert_eq!(s.camera.view_direction(), Vec3::NEG_Z);
        assert_eq!(s.camera.last_mouse_position(), Vec2::new(180.0, 40.0));
    }

    #[test]
    fn left_drag_rotates_from_press_position() {
        let mut s = state();
        s.handle_cursor(Vec2::new(100.0, 100.0));
        s.handle_button(MouseButton::Left, true);
        assert_eq!(s.camera.view_direction(), Vec3::NEG_Z);

        s.handle_cursor(Vec2::new(110.0, 100.0));
        let dir = s.camera.view_direction();
        assert!(dir.x > 0.0);
        assert!(dir.y.abs() < 1e-6);

        s.handle_button(MouseButton::Left, false);
        s.handle_cursor(Vec2::new(300.0, 300.0));
        assert_eq!(s.camera.view_direction(), dir);
    }

    #[test]
    fn other_buttons_do_not_drag() {
        let mut s = state();
        s.handle_button(MouseButton::Right, true);
        s.handle_cursor(Vec2::new(50.0, 50.0));
        assert_eq!(s.camera.view_direction(), Vec3::NEG_Z);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut s = state();
        s.resize(1920, 1080);
        let mut expected = FreeCamera::default();
        expected.set_perspective(45.0, 1920.0 / 1080.0);
        assert!(s.camera.projection().abs_diff_eq(expected.projection(), 1e-6));
    }

    #[test]
    fn cli_shader_flags_override_config() {
        let cli = Cli::parse_from(["ripple-desktop", "--vertex-shader", "wave.wgsl"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.shaders.vertex, Some(PathBuf::from("wave.wgsl")));
        assert_eq!(config.shaders.fragment, None);
    }

    #[test]
    fn egui_only_swallows_presses_and_moves() {
        let press = mouse_input(MouseButton::Left, ElementState::Pressed);
        let release = mouse_input(MouseButton::Left, ElementState::Released);
        let right_release = mouse_input(MouseButton::Right, ElementState::Released);
        let moved = WindowEvent::CursorMoved {
            device_id: unsafe { DeviceId::dummy() },
            position: PhysicalPosition::new(20.0, 20.0),
        };

        assert!(!reaches_viewer(&press, true));
        assert!(!reaches_viewer(&moved, true));
        assert!(!reaches_viewer(&right_release, true));
        assert!(reaches_viewer(&release, true));
        assert!(reaches_viewer(&press, false));
        assert!(reaches_viewer(&moved, false));
    }

    #[test]
    fn release_over_overlay_ends_drag() {
        let mut s = state();
        s.handle_cursor(Vec2::new(300.0, 300.0));
        s.handle_button(MouseButton::Left, true);
        s.handle_cursor(Vec2::new(20.0, 20.0));
        let dir = s.camera.view_direction();
        assert_ne!(dir, Vec3::NEG_Z);

        let release = mouse_input(MouseButton::Left, ElementState::Released);
        if reaches_viewer(&release, true) {
            s.handle_button(MouseButton::Left, false);
        }
        assert!(!s.pointer.is_dragging());

        s.handle_cursor(Vec2::new(400.0, 200.0));
        assert_eq!(s.camera.view_direction(), dir);
    }
}
