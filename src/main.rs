mod animation;
mod camera;
mod color;
mod config;
mod controller;
mod figure;
mod geometry;
mod lighting;
mod renderer;
mod scene;
mod stage;
mod vertex;

use anyhow::Context;
use config::Config;
use controller::Gesture;
use renderer::State;
use stage::Stage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const CONFIG_PATH: &str = "config.toml";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,wgpu=warn"))
        .format_timestamp_millis()
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("PANIC: {}", panic_info);
        eprintln!("PANIC: {}", panic_info);
    }));

    log::info!("Starting Bouncy Figure...");

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::load_or_create(Path::new(CONFIG_PATH));

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let stage = Stage::new(&config.motion, &mut rand::thread_rng());
    let mut app = App {
        config,
        stage,
        state: None,
        window: None,
        startup_error: None,
    };
    event_loop.run_app(&mut app).context("Event loop error")?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    config: Config,
    stage: Stage,
    state: Option<State>,
    window: Option<Arc<Window>>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );
        let state = pollster::block_on(State::new(window.clone(), &self.config))?;
        self.window = Some(window);
        self.state = Some(state);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_graphics(event_loop) {
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if let Some(gesture) = Gesture::from_key(code, repeat) {
                    self.stage.handle_gesture(gesture);
                }
            }
            WindowEvent::Resized(physical_size) => {
                state.resize(physical_size);
            }
            WindowEvent::RedrawRequested => match self.stage.frame(Instant::now(), state) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.resize(state.size)
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory, exiting");
                    event_loop.exit()
                }
                Err(e) => log::warn!("Surface error: {:?}", e),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Shutting down");
    }
}
