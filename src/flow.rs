//! Application event loop.
//!
//! [`run`] opens the demo window and drives it with winit's
//! [`ApplicationHandler`]. Each redraw advances the simulation by one tick,
//! renders the scene and requests the next redraw, so the animation runs at
//! the display rate with a fixed time step per frame.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the GPU [`Context`]
//! 2. keyboard, pointer and wheel events become [`Command`]s or view changes
//! 3. `RedrawRequested` advances, renders and presents

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{ModifiersState, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::Settings,
    context::{Context, SurfaceErrorAction},
    controls::{Command, DemoState, Effect, command_for_key},
};

/// Pixels of a touchpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    settings: Settings,
    ctx: Option<Context>,
    demo: DemoState,
    modifiers: ModifiersState,
    cursor: PhysicalPosition<f64>,
    last_report: Instant,
    frames: u32,
}

impl App {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        let demo = DemoState::new(&settings);
        Ok(Self {
            async_runtime,
            settings,
            ctx: None,
            demo,
            modifiers: ModifiersState::empty(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            last_report: Instant::now(),
            frames: 0,
        })
    }

    pub fn demo(&self) -> &DemoState {
        &self.demo
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        match self.demo.apply(command) {
            Effect::None => {}
            Effect::Remesh(res) => {
                if let Some(ctx) = &mut self.ctx {
                    ctx.renderer.remesh(&ctx.device, &ctx.queue, res);
                }
            }
            Effect::Wireframe(enabled) => {
                let supported = self
                    .ctx
                    .as_ref()
                    .is_some_and(|ctx| ctx.renderer.pipelines.supports_wireframe());
                if enabled && !supported {
                    log::warn!("wireframe requested but POLYGON_MODE_LINE is unavailable; ignoring");
                } else {
                    log::info!("wireframe {}", if enabled { "on" } else { "off" });
                }
            }
            Effect::Exit => event_loop.exit(),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        if let Some(command) = command_for_key(key, self.modifiers.shift_key()) {
            log::debug!("{:?} -> {:?}", key, command);
            self.apply(event_loop, command);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = &mut self.ctx else {
            return;
        };
        self.demo.simulation.advance();
        match ctx.render(&self.demo) {
            Ok(()) => self.frames += 1,
            Err(error) => {
                if ctx.handle_surface_error(error) == SurfaceErrorAction::Fatal {
                    event_loop.exit();
                    return;
                }
            }
        }
        let elapsed = self.last_report.elapsed();
        if elapsed >= FPS_LOG_INTERVAL {
            log::debug!(
                "{:.1} frames/s, t = {:.2}",
                self.frames as f64 / elapsed.as_secs_f64(),
                self.demo.simulation.current_time
            );
            self.frames = 0;
            self.last_report = Instant::now();
        }
        ctx.window().request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create the window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init = Context::new(window, &self.settings, &self.demo);
        match self.async_runtime.block_on(init) {
            Ok(ctx) => {
                ctx.window().request_redraw();
                self.ctx = Some(ctx);
            }
            Err(e) => {
                log::error!("initialization failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(ctx) = &mut self.ctx {
                    ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                if self.demo.toggles.test_info {
                    log::info!("mouse at ({}, {})", position.x as i32, position.y as i32);
                }
                self.demo.view.drag_to(position);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                if self.demo.toggles.test_info {
                    log::info!("left button {:?} at ({}, {})", state, self.cursor.x as i32, self.cursor.y as i32);
                }
                match state {
                    ElementState::Pressed => self.demo.view.begin_drag(self.cursor),
                    ElementState::Released => self.demo.view.end_drag(),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_LINE,
                };
                if self.demo.toggles.test_info {
                    log::info!("scroll by {:.2} lines", lines);
                }
                self.demo.view.scroll(lines);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the demo window and run until it is closed.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
