use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::engine::{Engine, EngineConfig, InputProvider, Key, StepOutcome};
use gridcaster::renderer::ColumnRenderer;
use gridcaster::scaler::{StretchLut, blit_stretch, build_stretch_lut};

// Internal framebuffer; the fan is cast at one ray per column.
const FB_W: usize = 640;
const FB_H: usize = 480;

// Map table carried over from the prototype builds.
const MAP: [&str; 9] = [
    "111111111111111111111",
    "100000000010000000001",
    "101111010010101111101",
    "101000010000100000101",
    "101011110111101110101",
    "101000000000000000101",
    "101111011111101111101",
    "100000000010000000001",
    "111111111111111111111",
];

struct HeldKeys<'a>(&'a HashSet<KeyCode>);

impl InputProvider for HeldKeys<'_> {
    fn is_key_down(&self, key: Key) -> bool {
        let code = match key {
            Key::Forward => KeyCode::KeyW,
            Key::Backward => KeyCode::KeyS,
            Key::StrafeLeft => KeyCode::KeyA,
            Key::StrafeRight => KeyCode::KeyD,
            Key::TurnLeft => KeyCode::KeyQ,
            Key::TurnRight => KeyCode::KeyE,
            Key::Quit => KeyCode::Escape,
        };
        self.0.contains(&code)
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    engine: Engine,
    renderer: ColumnRenderer,
    scale_lut: StretchLut,

    keys_down: HashSet<KeyCode>,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
}

impl App {
    fn new(engine: Engine, renderer: ColumnRenderer) -> Self {
        Self {
            window: None,
            surface: None,
            engine,
            renderer,
            scale_lut: StretchLut::empty(),
            keys_down: HashSet::new(),
            frame_counter: 0,
            last_fps_print: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Gridcaster")
            .with_inner_size(LogicalSize::new(800.0, 600.0));

        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        self.surface = Some(surface);
        self.window = Some(window);

        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    match state {
                        ElementState::Pressed => {
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let outcome = self.engine.step(&HeldKeys(&self.keys_down), &mut self.renderer);
                if outcome == StepOutcome::Quit {
                    log::info!("quit key pressed, stopping");
                    event_loop.exit();
                    return;
                }

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // Minimized window, skip drawing
                }

                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .unwrap();

                if !self.scale_lut.matches(dw, dh) {
                    self.scale_lut = build_stretch_lut(dw, dh, FB_W, FB_H);
                }

                let mut buf = surface.buffer_mut().expect("buffer_mut");
                blit_stretch(&mut buf, dw, &self.renderer.fb, self.renderer.width, &self.scale_lut);
                buf.present().unwrap();

                self.frame_counter += 1;
                let now = Instant::now();
                if now.duration_since(self.last_fps_print).as_secs_f32() >= 1.0 {
                    let fps = self.frame_counter as f32
                        / now.duration_since(self.last_fps_print).as_secs_f32();
                    log::debug!("FPS: {fps:.1}");
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                self.window.as_ref().unwrap().request_redraw();
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting gridcaster v{}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig { ray_count: FB_W, ..EngineConfig::default() };
    let engine = Engine::new(&MAP, (5, 1), 0.0, config)?;

    let mut renderer = ColumnRenderer::new(FB_W, FB_H);
    engine.start(&mut renderer);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(engine, renderer);
    event_loop.run_app(&mut app)?;

    log::info!("shut down cleanly");
    Ok(())
}
