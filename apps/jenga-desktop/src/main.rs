use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use jenga_common::BlockId;
use jenga_input::{ControlAction, InputEvent, Key};
use jenga_kernel::{JengaConfig, JengaWorld, WorldEvent};
use jenga_render::pointer_ndc;
use jenga_render_wgpu::{OrbitCamera, WgpuRenderer};
use jenga_tools::TowerInspector;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "jenga-desktop", about = "Interactive Jenga tower")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of blocks in the tower
    #[arg(long, default_value = "54")]
    blocks: usize,

    /// Seed for the wood colours
    #[arg(long, default_value = "0")]
    seed: u64,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::Space => Key::Space,
        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::Enter => Key::Enter,
        _ => Key::Other,
    }
}

/// Application state.
struct AppState {
    world: JengaWorld,
    camera: OrbitCamera,
    cursor: Vec2,
    size: PhysicalSize<u32>,
    orbiting: bool,
    show_panel: bool,
}

impl AppState {
    fn new(config: JengaConfig) -> Self {
        let camera = OrbitCamera::default();
        let mut world = JengaWorld::new(config);
        world.set_view(camera.view());
        Self {
            world,
            camera,
            cursor: Vec2::ZERO,
            size: PhysicalSize::new(1280, 720),
            orbiting: false,
            show_panel: true,
        }
    }

    fn pointer(&self) -> Vec2 {
        pointer_ndc(
            self.cursor.x,
            self.cursor.y,
            self.size.width as f32,
            self.size.height as f32,
        )
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        self.camera.set_aspect(size.width, size.height);
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if code == KeyCode::F1 {
            if pressed {
                self.show_panel = !self.show_panel;
            }
            return;
        }
        let key = map_key(code);
        self.world.push_input(if pressed {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        });
    }

    fn update(&mut self) {
        self.world.set_view(self.camera.view());
        let report = self.world.frame();
        tracing::trace!(frame = report.frame, "frame done");

        for event in self.world.drain_events() {
            match event {
                WorldEvent::FrameStepped { .. } => {}
                other => tracing::debug!(?other, "world event"),
            }
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let summary = TowerInspector::summary(&self.world);

        egui::SidePanel::left("inspector")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Jenga");
                ui.separator();
                ui.label(format!("Frame: {}", summary.frame));
                ui.label(format!("Blocks: {}", summary.block_count));
                ui.label(format!("Displaced: {}", summary.displaced));
                ui.label(format!(
                    "Hovered: {}",
                    summary.hovered.map_or("-".to_string(), |id| id.to_string())
                ));
                ui.label(format!(
                    "Key: {}",
                    summary.active_key.map_or("-", |k| k.name())
                ));
                ui.separator();

                ui.heading("Controlled");
                match summary.controlled {
                    Some(id) => self.controlled_ui(ui, id),
                    None => {
                        ui.label("Click a block to take control of it.");
                    }
                }

                ui.separator();
                if ui.button("Rebuild Tower").clicked() {
                    self.world.reset();
                }

                ui.separator();
                ui.heading("Keys");
                for action in ControlAction::ALL {
                    let keys: Vec<&str> = self
                        .world
                        .bindings()
                        .keys_for(action)
                        .iter()
                        .map(|k| k.name())
                        .collect();
                    ui.small(format!("{}: {}", action.label(), keys.join(" / ")));
                }
                ui.separator();
                ui.small("F1: Toggle Panel | RMB drag: Orbit | Wheel: Zoom");
            });
    }

    fn controlled_ui(&mut self, ui: &mut egui::Ui, id: BlockId) {
        if let Some(info) = TowerInspector::inspect_block(&self.world, id) {
            let p = info.visual.position;
            ui.label(format!("{} ({})", info.id, info.grain));
            ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            ui.label(format!("Drift: {:.3}", info.drift));
        }
        if ui.button("Release (Enter)").clicked() {
            self.world.release();
        }
    }
}

/// Window, surface and everything created against the device.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Jenga")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("jenga_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Draw the scene, then the egui panel on top of it.
    fn redraw(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
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

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            state.world.scene(),
            state.world.view(),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: JengaConfig) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.resize(gpu.window.inner_size());
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to start renderer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.state.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
                let ndc = self.state.pointer();
                self.state.world.push_input(InputEvent::PointerMoved(ndc));
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                let ndc = self.state.pointer();
                self.state.world.push_input(InputEvent::PointerClicked(ndc));
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.orbiting = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                gpu.redraw(&mut self.state, &self.egui_ctx);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.orbiting {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(blocks = cli.blocks, seed = cli.seed, "jenga-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let config = JengaConfig::default()
        .with_blocks(cli.blocks)
        .with_seed(cli.seed);
    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_keys_map_through() {
        assert_eq!(map_key(KeyCode::KeyW), Key::W);
        assert_eq!(map_key(KeyCode::Enter), Key::Enter);
        assert_eq!(map_key(KeyCode::ControlLeft), Key::ControlLeft);
        assert_eq!(map_key(KeyCode::KeyZ), Key::Other);
    }

    #[test]
    fn keys_reach_the_world_queue() {
        let mut state = AppState::new(JengaConfig::default().with_blocks(3));
        state.handle_key(KeyCode::KeyD, true);
        state.handle_key(KeyCode::KeyD, false);
        assert_eq!(state.world.pending_inputs(), 2);
    }

    #[test]
    fn panel_toggle_stays_out_of_the_world() {
        let mut state = AppState::new(JengaConfig::default().with_blocks(3));
        state.handle_key(KeyCode::F1, true);
        state.handle_key(KeyCode::F1, false);
        assert!(!state.show_panel);
        assert_eq!(state.world.pending_inputs(), 0);
    }

    #[test]
    fn update_runs_one_frame_and_drains_events() {
        let mut state = AppState::new(JengaConfig::default().with_blocks(3));
        state.update();
        assert_eq!(state.world.frame_count(), 1);
        assert!(state.world.events().is_empty());
    }
}
