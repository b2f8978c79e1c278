mod audio;
mod config;
mod control;
mod glyph;
mod render;
mod sim;
mod text;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEventKind,
    },
    execute, terminal,
};

use audio::SoundManager;
use render::{Canvas, ColorMode, RenderMode};
use sim::Simulation;

#[derive(Parser)]
#[command(name = "skyburst", about = "Terminal fireworks display")]
struct Cli {
    /// Title text traced and displayed over the show ('\n' splits lines)
    text: Option<String>,

    /// Render mode
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Color mode
    #[arg(short, long, value_enum)]
    color: Option<ColorMode>,

    /// Target FPS (1-120)
    #[arg(short, long)]
    fps: Option<u32>,

    /// Scale factor for particle counts (0.5-2.0)
    #[arg(short, long)]
    scale: Option<f64>,

    /// Background music file (falls back to a built-in melody)
    #[arg(long)]
    bgm: Option<PathBuf>,

    /// Disable all sound
    #[arg(long)]
    silent: bool,

    /// Start with the automatic launch scheduler off
    #[arg(long)]
    no_auto: bool,

    /// Skip the glyph-tracing intro for the title text
    #[arg(long)]
    no_intro: bool,

    /// Hide the status bar for pure animation mode
    #[arg(long)]
    clean: bool,

    /// JSON-lines control file applied while running
    #[arg(long)]
    control: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

struct Settings {
    text: String,
    render: RenderMode,
    color: ColorMode,
    fps: u32,
    scale: f64,
    auto: bool,
    intro: bool,
    clean: bool,
    control: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if cli.init_config {
        return config::write_default();
    }
    let cfg = config::load_config();

    let settings = Settings {
        text: cli.text.or(cfg.text).unwrap_or_else(|| "2026".to_string()),
        render: cli
            .render
            .or(cfg.render.map(RenderMode::from))
            .unwrap_or(RenderMode::Braille),
        color: cli
            .color
            .or(cfg.color.map(ColorMode::from))
            .unwrap_or(ColorMode::TrueColor),
        fps: cli.fps.or(cfg.fps).unwrap_or(60).clamp(1, 120),
        scale: cli.scale.or(cfg.scale).unwrap_or(1.0).clamp(0.5, 2.0),
        auto: !cli.no_auto && cfg.auto.unwrap_or(true),
        intro: !cli.no_intro && cfg.intro.unwrap_or(true),
        clean: cli.clean || cfg.clean.unwrap_or(false),
        control: cli.control,
    };

    let mut sound = if cli.silent || cfg.silent.unwrap_or(false) {
        SoundManager::disabled()
    } else {
        SoundManager::init()
    };
    sound.start_bgm(cli.bgm.or(cfg.bgm).as_deref());

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        EnableMouseCapture
    )?;

    let mut writer = BufWriter::with_capacity(256 * 1024, stdout);
    let result = run_loop(&mut writer, &settings, sound);

    // Cleanup
    execute!(
        writer,
        DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;

    result
}

const RENDER_MODES: [RenderMode; 3] = [RenderMode::Braille, RenderMode::HalfBlock, RenderMode::Ascii];
const COLOR_MODES: [ColorMode; 4] = [ColorMode::TrueColor, ColorMode::Ansi256, ColorMode::Ansi16, ColorMode::Mono];

fn run_loop(
    stdout: &mut BufWriter<io::Stdout>,
    settings: &Settings,
    sound: SoundManager,
) -> io::Result<()> {
    let (mut cols, mut rows) = terminal::size()?;
    let frame_dur = Duration::from_secs_f64(1.0 / settings.fps as f64);

    let mut render_mode = settings.render;
    let mut color_mode = settings.color;
    let mut hide_status = settings.clean;

    let display_rows =
        |rows: u16, hide: bool| if hide { rows as usize } else { (rows as usize).saturating_sub(1) };

    let mut canvas = Canvas::new(
        cols as usize,
        display_rows(rows, hide_status),
        render_mode,
        color_mode,
    );
    let mut sim = Simulation::new(
        canvas.width,
        canvas.height,
        &settings.text,
        settings.intro,
        settings.scale,
        sound,
    );
    sim.auto_mode = settings.auto;

    let control_rx = settings.control.clone().map(control::watch);

    let start = Instant::now();
    let mut frame_count: u64 = 0;
    let mut actual_fps: f64 = 0.0;
    let mut fps_update = Instant::now();
    let mut rebuild_canvas = false;

    loop {
        let time = start.elapsed().as_secs_f64();

        // Apply control-file messages
        if let Some(rx) = &control_rx {
            while let Ok(msg) = rx.try_recv() {
                if let Some(text) = msg.text {
                    sim.set_text(&text, time);
                }
                if let Some(auto) = msg.auto {
                    sim.auto_mode = auto;
                }
                if let Some(scale) = msg.scale {
                    sim.scale = scale.clamp(0.5, 2.0);
                }
                if let Some(launch) = msg.launch {
                    sim.launch_at(
                        launch.x.clamp(0.0, 1.0) * canvas.width as f64,
                        launch.y.clamp(0.0, 1.0) * canvas.height as f64,
                    );
                }
            }
        }

        // Handle input (non-blocking)
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Resize(w, h) => {
                    if w >= 10 && h >= 5 {
                        cols = w;
                        rows = h;
                        rebuild_canvas = true;
                    }
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        let (px, py) =
                            canvas.pixel_pos(mouse.column as usize, mouse.row as usize);
                        sim.launch_at(px, py);
                    }
                }
                Event::Key(KeyEvent { code, .. }) => match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        sim.sound_mut().stop_bgm();
                        return Ok(());
                    }
                    KeyCode::Char(' ') => {
                        sim.auto_mode = !sim.auto_mode;
                    }
                    KeyCode::Char('r') => {
                        let idx = RENDER_MODES.iter().position(|&m| m == render_mode).unwrap_or(0);
                        render_mode = RENDER_MODES[(idx + 1) % RENDER_MODES.len()];
                        rebuild_canvas = true;
                    }
                    KeyCode::Char('c') => {
                        let idx = COLOR_MODES.iter().position(|&m| m == color_mode).unwrap_or(0);
                        color_mode = COLOR_MODES[(idx + 1) % COLOR_MODES.len()];
                        rebuild_canvas = true;
                    }
                    KeyCode::Char('m') => {
                        sim.sound_mut().toggle_mute();
                    }
                    KeyCode::Char('h') => {
                        hide_status = !hide_status;
                        rebuild_canvas = true;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Rebuild canvas if mode changed or terminal resized
        if rebuild_canvas && cols >= 10 && rows >= 5 {
            // Re-read size to get the settled value
            let (settled_cols, settled_rows) = terminal::size()?;
            if settled_cols >= 10 && settled_rows >= 5 {
                cols = settled_cols;
                rows = settled_rows;
            }
            canvas = Canvas::new(
                cols as usize,
                display_rows(rows, hide_status),
                render_mode,
                color_mode,
            );
            sim.resize(canvas.width, canvas.height);
            // Reset terminal state completely
            write!(stdout, "\x1b[2J\x1b[H")?;
            stdout.flush()?;
            rebuild_canvas = false;
        }

        let frame_start = Instant::now();

        // One simulation tick, then render
        sim.tick(&mut canvas, time);
        let frame = canvas.render();

        // Verify terminal size hasn't changed before writing
        // If it changed, skip this frame to avoid writing wrong-sized data
        let (check_cols, check_rows) = terminal::size()?;
        if check_cols != cols || check_rows != rows {
            cols = check_cols;
            rows = check_rows;
            rebuild_canvas = true;
            // Sleep briefly to let terminal settle
            std::thread::sleep(Duration::from_millis(50));
            continue;
        }

        stdout.write_all(b"\x1b[H")?;
        stdout.write_all(frame.as_bytes())?;

        // Status bar
        frame_count += 1;
        if fps_update.elapsed() >= Duration::from_secs(1) {
            actual_fps = frame_count as f64 / fps_update.elapsed().as_secs_f64();
            frame_count = 0;
            fps_update = Instant::now();
        }
        if !hide_status {
            let auto = if sim.auto_mode { "auto on" } else { "auto off" };
            let audio = if !sim.sound().enabled() {
                "no audio"
            } else if sim.sound().muted() {
                "muted"
            } else {
                "audio on"
            };
            let status = format!(
                " skyburst | {:?} | {:?} | {:.0} fps | {} | {} | {} embers | [click] launch  [space] auto  [r] render  [c] color  [m] mute  [h] hide  [q] quit ",
                render_mode, color_mode, actual_fps, auto, audio, sim.particles.len(),
            );
            let w = cols as usize;
            let truncated: String = status.chars().take(w).collect();
            let padded = format!("{:<width$}", truncated, width = w);
            write!(stdout, "\x1b[{};1H\x1b[7m{}\x1b[0m", rows, padded)?;
        }

        // Single flush per frame
        stdout.flush()?;

        // Sleep to target FPS
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
