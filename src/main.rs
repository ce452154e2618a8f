use clap::Parser;
use pollo_loco::frontend::input::{self, InputContext};
use pollo_loco::frontend::{CanvasSink, FrontAction, InputSystem, SCREEN_HEIGHT, SCREEN_WIDTH, StatusBars, TextureCache};
use pollo_loco::sinks::{LogAudio, SignalLog, UiSignal};
use pollo_loco::{GameConfig, LevelLayout, Outcome, Services, Session, SystemClock};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sdl2::pixels::Color;
use std::path::PathBuf;
use std::time::Duration;

const START_SCREEN: &str = "img/9_intro_outro_screens/start/startscreen_1.png";
const GAME_OVER_SCREEN: &str = "img/9_intro_outro_screens/game_over/game over.png";
const WIN_SCREEN: &str = "img/9_intro_outro_screens/win/win_2.png";

#[derive(Parser, Debug)]
#[command(name = "pollo_loco", about = "A 2D side-scroller: run, stomp, throw salsa.")]
struct Args {
    /// Game configuration (JSON). Defaults to ~/.pollo_loco/config.json when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level layout (JSON). Defaults to the built-in first level
    #[arg(long)]
    level: Option<PathBuf>,

    /// Seed for level generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Window scale; fitted to the monitor when omitted
    #[arg(long)]
    scale: Option<u32>,

    /// Directory the image paths are relative to
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

/// What the screen shows besides the world itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    Playing,
    Ended(Outcome),
}

/// Calculate the best window scale based on monitor size
fn calculate_window_scale(video_subsystem: &sdl2::VideoSubsystem) -> u32 {
    match video_subsystem.desktop_display_mode(0) {
        Ok(display_mode) => {
            // Leave 10% margin for taskbars/decorations
            let usable_w = (display_mode.w as f32 * 0.9) as i32;
            let usable_h = (display_mode.h as f32 * 0.9) as i32;
            let scale = (usable_w / SCREEN_WIDTH as i32).min(usable_h / SCREEN_HEIGHT as i32);
            scale.clamp(1, 3) as u32
        }
        Err(e) => {
            log::warn!("Could not detect monitor size ({}), using 1x scale", e);
            1
        }
    }
}

fn load_config(args: &Args) -> Result<GameConfig, String> {
    match &args.config {
        Some(path) => GameConfig::load_from_file(path).map_err(|e| format!("Failed to load {}: {}", path.display(), e)),
        None => Ok(GameConfig::load_or_default(GameConfig::default_path())),
    }
}

fn load_layout(args: &Args) -> Result<LevelLayout, String> {
    match &args.level {
        Some(path) => LevelLayout::load_from_file(path).map_err(|e| format!("Failed to load {}: {}", path.display(), e)),
        None => Ok(LevelLayout::level_one()),
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;
    let layout = load_layout(&args)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    let scale = args.scale.unwrap_or_else(|| calculate_window_scale(&video_subsystem));
    log::info!("Window scale: {}x", scale);

    let window = video_subsystem
        .window("El Pollo Loco", SCREEN_WIDTH * scale, SCREEN_HEIGHT * scale)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    // Logical size gives pixel-perfect scaling for free
    canvas.set_logical_size(SCREEN_WIDTH, SCREEN_HEIGHT).map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut textures = TextureCache::new(&texture_creator, &args.assets);
    let loaded = textures.preload(StatusBars::images());
    log::debug!("Preloaded {} status bar images", loaded);
    let mut sink = CanvasSink::new(canvas, textures);
    let mut event_pump = sdl_context.event_pump()?;

    let audio = LogAudio::default();
    let signals = SignalLog::new();
    let services = Services::new(
        Box::new(SystemClock::new()),
        Box::new(audio.clone()),
        Box::new(signals.clone()),
    );
    let mut session = Session::new(config, layout, services, rng);
    let mut input_system = InputSystem::new();
    let mut screen = Screen::Home;

    'running: loop {
        for action in input_system.poll_events(&mut event_pump) {
            match action {
                FrontAction::Quit => break 'running,
                FrontAction::ToggleMute => {
                    log::info!("Muted: {}", audio.toggle_mute());
                }
                FrontAction::Start | FrontAction::Restart => {
                    signals.drain();
                    session.restart();
                    screen = Screen::Playing;
                    input_system.context = InputContext::Playing;
                }
                FrontAction::Home => {
                    session.go_home();
                    screen = Screen::Home;
                    input_system.context = InputContext::Home;
                }
            }
        }

        if let Some(world) = session.world_mut() {
            world.set_input(input::sample(&event_pump.keyboard_state()));
        }
        session.update();

        for signal in signals.drain() {
            match signal {
                UiSignal::GameOver => {
                    screen = Screen::Ended(Outcome::Lost);
                    input_system.context = InputContext::Ended;
                }
                UiSignal::Victory => {
                    screen = Screen::Ended(Outcome::Won);
                    input_system.context = InputContext::Ended;
                }
                UiSignal::RestartControls => input_system.context = InputContext::RestartOffered,
                UiSignal::Status(..) => {}
            }
        }

        match session.world() {
            Some(world) => world.render(&mut sink),
            None => sink.clear(Color::RGB(0, 0, 0)),
        }
        match screen {
            Screen::Home => sink.draw_overlay(START_SCREEN, Color::RGBA(240, 180, 60, 255))?,
            Screen::Ended(Outcome::Lost) => sink.draw_overlay(GAME_OVER_SCREEN, Color::RGBA(0, 0, 0, 160))?,
            Screen::Ended(Outcome::Won) => sink.draw_overlay(WIN_SCREEN, Color::RGBA(255, 255, 255, 120))?,
            Screen::Playing => {}
        }
        sink.present();

        // Cap framerate to ~60 FPS
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }

    session.go_home();
    Ok(())
}
