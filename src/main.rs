//! Headless egg timer driver
//!
//! Runs one countdown end to end without a window: the program plays the
//! host role, honouring the wake-up requests of the timer and writing
//! frames as PNG files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tiny_skia::ColorU8;
use tracing::{error, info, warn};

use eggtimer::app::{AppError, Dispatch, HostEvent, TimerController};
use eggtimer::config::TimerConfig;
use eggtimer::domain::core::{Constraints, Size};
use eggtimer::domain::timer::TimerStatus;
use eggtimer::logging;
use eggtimer::ui::renderer::{FrameRenderer, load_font};
use eggtimer::ui::surface::CommandList;
use eggtimer::ui::widgets::LabeledBox;
use eggtimer::ui::SplitLayout;

#[derive(Debug, Parser)]
#[command(name = "eggtimer", version, about = "Countdown timer drawn as an egg that turns red")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Countdown length in seconds (as typed into the duration field)
    #[arg(long)]
    duration: Option<String>,

    /// TrueType/OpenType font for labels; text is skipped without one
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory for the PNG frames
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Write every Nth frame (the final frame is always written)
    #[arg(long, default_value_t = 25)]
    every: u64,

    /// Frame width, overriding the config
    #[arg(long)]
    width: Option<i32>,

    /// Frame height, overriding the config
    #[arg(long)]
    height: Option<i32>,

    /// Render the two-pane split showcase instead of running the timer
    #[arg(long)]
    showcase: bool,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("eggtimer: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = match &cli.config {
        Some(path) => TimerConfig::load(path)?,
        None => TimerConfig::default(),
    };
    if let Some(width) = cli.width {
        config.window_width = width;
    }
    if let Some(height) = cli.height {
        config.window_height = height;
    }
    config.validate()?;

    let font = cli.font.as_deref().map(load_font).transpose()?;
    let mut renderer = match &font {
        Some(font) => FrameRenderer::with_font(font.clone()),
        None => FrameRenderer::new(),
    };

    std::fs::create_dir_all(&cli.out)?;
    let size = Size::new(config.window_width, config.window_height);

    if cli.showcase {
        return showcase(&mut renderer, size, config.font_size, &cli.out);
    }

    let mut controller = TimerController::start(&config)?.with_font(font);
    if let Some(duration) = cli.duration {
        controller.dispatch(HostEvent::TextEdited(duration))?;
    }
    controller.dispatch(HostEvent::ToggleClicked)?;

    if controller.state().status() != TimerStatus::Running {
        warn!(input = controller.input_text(), "duration rejected, nothing to run");
        controller.dispatch(HostEvent::ShuttingDown)?;
        return Ok(());
    }
    info!(
        seconds = controller.state().target_duration_seconds(),
        "countdown started"
    );

    let every = cli.every.max(1);
    let mut frame_index: u64 = 0;

    loop {
        let Dispatch::Frame(frame) = controller.dispatch(HostEvent::FrameReady {
            now: Instant::now(),
            size,
        })?
        else {
            continue;
        };

        let last = frame.output.wake_at.is_none();
        if last || frame_index % every == 0 {
            let path = cli.out.join(format!("frame_{frame_index:05}.png"));
            renderer.render_to_png(&frame.commands, size, &path)?;
            info!(
                path = %path.display(),
                label = frame.output.visuals.button_label,
                "frame written"
            );
        }
        frame_index += 1;

        match frame.output.wake_at {
            Some(at) => std::thread::sleep(at.saturating_duration_since(Instant::now())),
            None => break,
        }
    }

    info!(frames = frame_index, "countdown complete");
    controller.dispatch(HostEvent::ShuttingDown)?;
    Ok(())
}

/// Renders two labelled color boxes side by side
fn showcase(
    renderer: &mut FrameRenderer,
    size: Size,
    font_size: f32,
    out: &Path,
) -> Result<(), AppError> {
    let red = ColorU8::from_rgba(0xC0, 0x40, 0x40, 0xFF);
    let blue = ColorU8::from_rgba(0x40, 0x40, 0xC0, 0xFF);
    let white = ColorU8::from_rgba(0xFF, 0xFF, 0xFF, 0xFF);

    let mut surface = CommandList::with_font(renderer.font().cloned());
    let left = LabeledBox {
        text: "Left",
        background: red,
        text_color: white,
        font_size: font_size * 2.0,
    };
    let right = LabeledBox {
        text: "Right",
        background: blue,
        ..left
    };

    let constraints = Constraints::exact(size);
    SplitLayout
        .layout(&mut surface, constraints, left, right)
        .map_err(eggtimer::ui::FrameError::from)?;

    let path = out.join("showcase.png");
    renderer.render_to_png(surface.commands(), size, &path)?;
    info!(path = %path.display(), "showcase written");
    Ok(())
}
