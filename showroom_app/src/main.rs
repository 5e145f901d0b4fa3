//! Desktop host for the showroom
//!
//! Opens a GLFW window, forwards pointer and resize events to a
//! [`Session`] and ticks it once per loop iteration. Frames go to the
//! headless renderer, so the window shows nothing and only hosts input
//! until a GPU [`RenderBackend`] is plugged in. Keys stand in for the
//! control panel:
//!
//! | Key | Control |
//! |---|---|
//! | `Up` / `Down` | speed ± one step |
//! | `A` / `D` | x ± ten steps |
//! | `W` / `S` | y ± ten steps |
//! | `Q` / `E` | z ± ten steps |
//! | `C` | cycle sphere colour |
//! | `F` | toggle wireframe |

mod window;

use glfw::{Action, Key, MouseButton, WindowEvent};
use showroom::foundation::logging;
use showroom::prelude::*;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};
use thiserror::Error;
use window::{Window, WindowError};

const CONFIG_PATH: &str = "showroom.toml";

/// Host refresh interval (60 Hz)
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Steps per key press for position controls
const POSITION_NUDGE: i32 = 10;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn load_config() -> ShowroomConfig {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        log::info!("No {} found, using defaults", CONFIG_PATH);
        return ShowroomConfig::default();
    }
    match ShowroomConfig::load_from_file(path) {
        Ok(config) => {
            log::info!("Loaded configuration from {}", CONFIG_PATH);
            config
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", CONFIG_PATH, e);
            ShowroomConfig::default()
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Button1 => Some(PointerButton::Primary),
        MouseButton::Button2 => Some(PointerButton::Secondary),
        MouseButton::Button3 => Some(PointerButton::Middle),
        _ => None,
    }
}

fn handle_key(session: &mut Session, key: Key) -> Result<(), SessionError> {
    let nudge = match key {
        Key::Up => Some((OptionName::Speed, 1)),
        Key::Down => Some((OptionName::Speed, -1)),
        Key::D => Some((OptionName::X, POSITION_NUDGE)),
        Key::A => Some((OptionName::X, -POSITION_NUDGE)),
        Key::W => Some((OptionName::Y, POSITION_NUDGE)),
        Key::S => Some((OptionName::Y, -POSITION_NUDGE)),
        Key::E => Some((OptionName::Z, POSITION_NUDGE)),
        Key::Q => Some((OptionName::Z, -POSITION_NUDGE)),
        Key::C => {
            log::info!("sphereColor = {}", session.cycle_sphere_color());
            None
        }
        Key::F => {
            log::info!("wireframe = {}", session.toggle_wireframe());
            None
        }
        _ => None,
    };

    if let Some((name, steps)) = nudge {
        let value = session.nudge_option(name, steps)?;
        log::info!("{} = {:.2}", name, value);
    }
    Ok(())
}

fn run() -> Result<(), AppError> {
    let config = load_config();
    let mut window = Window::new(&config.window.title, config.window.width, config.window.height)?;

    let source = Rc::new(FileSource::new(&config.assets.root));
    let renderer = Box::new(HeadlessRenderer::new(config.window.width, config.window.height));
    let mut session = Session::new(config, source, renderer)?;

    let (width, height) = window.framebuffer_size();
    session.resized(width, height)?;
    session.start_loading()?;

    let start = Instant::now();
    log::info!("Starting main loop...");

    while !window.should_close() {
        let frame_start = Instant::now();
        for event in window.poll_events() {
            let now = start.elapsed();
            match event {
                WindowEvent::Key(Key::Escape, _, Action::Press, _) | WindowEvent::Close => {
                    window.set_should_close(true);
                }
                WindowEvent::Key(key, _, Action::Press | Action::Repeat, _) => handle_key(&mut session, key)?,
                WindowEvent::CursorPos(x, y) => session.pointer_moved(x, y),
                WindowEvent::MouseButton(button, action, _) => {
                    let Some(button) = pointer_button(button) else {
                        continue;
                    };
                    match action {
                        Action::Press => {
                            let outcome = session.pointer_pressed(button, now);
                            log::trace!("Press: {:?}", outcome);
                        }
                        Action::Release => session.pointer_released(button),
                        Action::Repeat => {}
                    }
                }
                #[allow(clippy::cast_possible_truncation)]
                WindowEvent::Scroll(_, dy) => session.scrolled(dy as f32),
                #[allow(clippy::cast_sign_loss)]
                WindowEvent::FramebufferSize(width, height) if width > 0 && height > 0 => {
                    session.resized(width as u32, height as u32)?;
                }
                _ => {}
            }
        }

        session.frame(start.elapsed())?;
        if let Some(rest) = FRAME_INTERVAL.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    log::info!(
        "Showroom closed after {:.1}s; {} logos spawned",
        start.elapsed().as_secs_f32(),
        session.spawner().created()
    );
    Ok(())
}

fn main() {
    logging::init(log::LevelFilter::Info);
    log::info!("Starting Showroom");

    if let Err(e) = run() {
        log::error!("Showroom failed: {}", e);
        std::process::exit(1);
    }
}
