use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use elastic::gui::elastic_control_panel;
use elastic::path::DEFAULT_TOLERANCE;
use elastic::{
    AnalyticSpringRunner, Bounds, ElasticConfig, ElasticSurface, ElasticTextField, ElasticView,
    FrameTicker, ShapeParams, ShapeRenderer,
};
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

const PANEL_WIDTH: f32 = 280.0;
const FIELD_SIZE: Vec2 = Vec2::new(320.0, 48.0);
const SCREEN_COLOR: wgpu::Color = wgpu::Color {
    r: 0.16,
    g: 0.18,
    b: 0.22,
    a: 1.0,
};

/// Keeps redraws coming while the elastic view animates.
struct RedrawTicker {
    window: Arc<Window>,
    running: bool,
}

impl FrameTicker for RedrawTicker {
    fn start(&mut self) {
        self.running = true;
        self.window.request_redraw();
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

type DemoField = ElasticTextField<AnalyticSpringRunner, RedrawTicker>;

struct App {
    config_path: Option<PathBuf>,
    state: Option<AppState>,
}

struct AppState {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: ShapeRenderer,
    field: DemoField,
    config: ElasticConfig,
    cursor: Option<Vec2>,
    last_frame: Instant,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl AppState {
    fn scale(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    /// Centre the field in the area left of the control panel.
    fn layout_field(&mut self) {
        let logical = Vec2::new(
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        ) / self.scale();
        let area = Vec2::new((logical.x - PANEL_WIDTH).max(FIELD_SIZE.x), logical.y);
        let origin = (area - FIELD_SIZE) * 0.5;
        self.field
            .layout(Bounds::new(origin.x, origin.y, FIELD_SIZE.x, FIELD_SIZE.y));
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Elastic")
                        .with_inner_size(winit::dpi::LogicalSize::new(960, 540)),
                )
                .unwrap(),
        );

        let config = match &self.config_path {
            Some(path) if path.exists() => ElasticConfig::load(path).unwrap_or_else(|err| {
                log::warn!("ignoring {}: {err}", path.display());
                ElasticConfig::default()
            }),
            _ => ElasticConfig {
                fill_color: Some([0.95, 0.95, 0.97, 1.0]),
                ..ElasticConfig::default()
            },
        };

        let mut state = pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let surface = instance.create_surface(window.clone()).unwrap();

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .unwrap();

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("elastic_device"),
                        ..Default::default()
                    },
                    None,
                )
                .await
                .unwrap();

            let size = window.inner_size();
            let caps = surface.get_capabilities(&adapter);
            let format = caps.formats[0];

            let surface_config = wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width.max(1),
                height: size.height.max(1),
                present_mode: wgpu::PresentMode::AutoVsync,
                alpha_mode: caps.alpha_modes[0],
                view_formats: vec![],
                desired_maximum_frame_latency: 2,
            };
            surface.configure(&device, &surface_config);

            let renderer = ShapeRenderer::new(&device, format);

            let ticker = RedrawTicker {
                window: window.clone(),
                running: false,
            };
            let bounds = Bounds::from_size(FIELD_SIZE.x, FIELD_SIZE.y);
            let view = ElasticView::with_parts(bounds, AnalyticSpringRunner::new(), ticker);
            let mut field = ElasticTextField::with_view(view, bounds);
            field.set_placeholder("Tap me");
            config.apply_to_field(&mut field);

            // egui setup
            let egui_ctx = egui::Context::default();
            let egui_state = egui_winit::State::new(
                egui_ctx.clone(),
                egui_ctx.viewport_id(),
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

            AppState {
                window,
                device,
                queue,
                surface,
                surface_config,
                renderer,
                field,
                config,
                cursor: None,
                last_frame: Instant::now(),
                egui_ctx,
                egui_state,
                egui_renderer,
            }
        });

        state.layout_field();
        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Touches on the field reach the elastic view even when egui takes them.
        if let WindowEvent::MouseInput {
            state: ElementState::Pressed,
            button: MouseButton::Left,
            ..
        } = event
        {
            if let Some(cursor) = state.cursor {
                if state.field.hit_test(cursor) && state.field.touch_down() {
                    state.last_frame = Instant::now();
                }
            }
        }

        // Pass events to egui first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        if egui_response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(path) = &self.config_path {
                    if let Err(err) = state.config.save(path) {
                        log::error!("failed to save {}: {err}", path.display());
                    }
                }
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.surface_config.width = new_size.width.max(1);
                state.surface_config.height = new_size.height.max(1);
                state
                    .surface
                    .configure(&state.device, &state.surface_config);
                state.layout_field();
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = state.scale();
                state.cursor = Some(Vec2::new(position.x as f32, position.y as f32) / scale);
            }
            WindowEvent::CursorLeft { .. } => {
                state.cursor = None;
            }
            WindowEvent::RedrawRequested => {
                let output = match state.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state
                            .surface
                            .configure(&state.device, &state.surface_config);
                        return;
                    }
                    Err(e) => {
                        log::error!("surface error: {e:?}");
                        return;
                    }
                };

                let now = Instant::now();
                let dt = (now - state.last_frame).as_secs_f32();
                state.last_frame = now;
                state.field.frame(dt);

                // Tessellate the current outline for the shape renderer
                let scale = state.scale();
                let fill = state.field.elastic().fill_color().unwrap_or([0.0; 4]);
                let params = ShapeParams::new(
                    state.field.bounds().origin,
                    (state.surface_config.width, state.surface_config.height),
                    scale,
                    fill,
                );
                match state.field.elastic().path().tessellate(DEFAULT_TOLERANCE / scale) {
                    Ok(mesh) => {
                        state
                            .renderer
                            .prepare(&state.device, &state.queue, &mesh, &params)
                    }
                    Err(err) => log::warn!("{err}"),
                }

                // --- egui frame ---
                let preview = state.field.elastic().path().clone();
                let field_bounds = state.field.bounds();
                let placeholder = state.field.placeholder().to_owned();
                let raw_input = state.egui_state.take_egui_input(&state.window);
                let mut config_changed = false;
                let full_output = state.egui_ctx.run(raw_input, |ctx| {
                    config_changed =
                        elastic_control_panel(ctx, &mut state.config, Some(&preview));

                    egui::Area::new(egui::Id::new("elastic_field"))
                        .fixed_pos(egui::pos2(
                            field_bounds.min_x() + 12.0,
                            field_bounds.min_y(),
                        ))
                        .show(ctx, |ui| {
                            ui.add_sized(
                                [field_bounds.size.x - 24.0, field_bounds.size.y],
                                egui::TextEdit::singleline(state.field.text_mut())
                                    .hint_text(placeholder.as_str())
                                    .text_color(egui::Color32::from_gray(30))
                                    .frame(false),
                            );
                        });
                });

                if config_changed {
                    state.config.apply_to_field(&mut state.field);
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, full_output.platform_output);

                let paint_jobs = state
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                // Update egui textures
                for (id, delta) in &full_output.textures_delta.set {
                    state
                        .egui_renderer
                        .update_texture(&state.device, &state.queue, *id, delta);
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.surface_config.width, state.surface_config.height],
                    pixels_per_point: scale,
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder =
                    state
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("elastic_encoder"),
                        });

                // Update egui buffers
                state.egui_renderer.update_buffers(
                    &state.device,
                    &state.queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );

                // Render screen, elastic field and egui overlay in one pass
                {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("elastic_screen_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(SCREEN_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    state.renderer.draw(&mut pass);

                    state.egui_renderer.render(
                        &mut pass.forget_lifetime(),
                        &paint_jobs,
                        &screen_descriptor,
                    );
                }

                // Free egui textures
                for id in &full_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }

                state.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Idle fields only redraw on input
                if state.field.elastic().ticker().is_running() {
                    state.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    let mut app = App {
        config_path: std::env::args().nth(1).map(PathBuf::from),
        state: None,
    };
    event_loop.run_app(&mut app).unwrap();
}
