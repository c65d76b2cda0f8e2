//! capgrab: screenshot and screen-recording launcher for X11 desktops.
//!
//! One command, two behaviours: without `-v` it takes a still screenshot
//! (full screen, active window, or selected area); with `-v` it toggles a
//! recording session, starting one when none is active and stopping the
//! active one otherwise.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

mod codec;
mod config;
mod device;
mod notification;
mod output;
mod record;
mod session;
mod still;

use config::Config;
use session::{SessionController, SessionPaths, StartRequest, ToggleOutcome};
use still::StillMode;

#[derive(Parser, Debug)]
#[command(name = "capgrab")]
#[command(version, about = "Screenshot and screen-recording launcher for X11 desktops")]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CAPGRAB_GIT_HASH"),
    ")"
))]
struct Cli {
    /// Record a video instead of taking a screenshot (run again to stop)
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    video: bool,

    /// Capture the active window
    #[arg(long, short = 'w', action = ArgAction::SetTrue)]
    window: bool,

    /// Capture a selected area (stills only)
    #[arg(long, short = 'a', action = ArgAction::SetTrue, conflicts_with = "video")]
    area: bool,

    /// Capture framerate in frames per second
    #[arg(long = "rate", short = 'r', value_name = "FPS")]
    rate: Option<u32>,

    /// Screen index to capture
    #[arg(long, short = 's', value_name = "INDEX")]
    screen: Option<String>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Output file (auto-generated under the capture directory when omitted)
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created default config at {}", path.display());
        return Ok(());
    }

    // Both capture paths drive X11 tools.
    if std::env::var("DISPLAY").is_err() {
        log::error!("DISPLAY not set - this tool captures X11 screens.");
        return Err(anyhow::anyhow!("X11 environment required"));
    }

    let config = Config::load()?;

    if cli.video {
        toggle_recording(&cli, &config)
    } else {
        take_still(&cli, &config)
    }
}

/// Still-capture dispatch: pick the mode, shoot, notify.
fn take_still(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let mode = if cli.window {
        StillMode::ActiveWindow
    } else if cli.area {
        StillMode::Area
    } else {
        StillMode::FullScreen
    };

    let target = output::resolve_still_target(cli.output.as_deref(), &config.directories.pictures)?;
    still::capture_still(mode, &target)?;

    notification::send_notification_blocking(
        "Screenshot saved",
        &format!("Saved to {}", target.display()),
        Some("camera-photo"),
    );
    println!("Capture saved to {}", target.display());

    Ok(())
}

/// Video toggle: probe capabilities, resolve devices, then let the session
/// controller decide between starting and stopping.
fn toggle_recording(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let capabilities = codec::CodecCapabilities::probe()?;
    let codecs = codec::select_codecs(&capabilities, config.recording.quality);

    let screen = cli
        .screen
        .as_deref()
        .unwrap_or(&config.recording.screen);

    // Window bounds only override screen geometry for recorded captures;
    // still window shots are handled by the screenshot tool itself.
    let geometry = if cli.window {
        device::active_window_geometry(screen)?
    } else {
        device::screen_geometry(screen)?
    };
    let audio = device::resolve_audio()?;

    let controller = SessionController::new(SessionPaths::system());
    let request = StartRequest {
        codecs,
        geometry,
        audio,
        explicit_output: cli.output.clone(),
        video_dir: config.directories.videos.clone(),
        framerate: cli.rate.unwrap_or(config.recording.framerate),
        threads: num_cpus::get_physical(),
    };

    match controller.toggle(&request)? {
        ToggleOutcome::Stopped { output_path } => {
            notification::send_notification_blocking(
                "Recording saved",
                &format!("Saved to {}", output_path.display()),
                Some("camera-video"),
            );
            println!("Recording saved to {}", output_path.display());
        }
        ToggleOutcome::Started { output_path } => {
            // Reached once the capture process has exited.
            println!("Recording finished: {}", output_path.display());
        }
    }

    Ok(())
}
