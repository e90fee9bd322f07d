use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use balance_sentinel::canvas::ImageCanvas;
use balance_sentinel::feedback::TerminalFeedback;
use balance_sentinel::overlay::Overlay;
use balance_sentinel::replay::ReplaySource;
use balance_sentinel::{Config, Session};

#[derive(Parser)]
#[command(name = "balance-sentinel", version, about = "Head-drift balance trainer")]
struct Cli {
    /// TOML config file; built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the webcam and coach live.
    Run,
    /// Feed recorded landmark frames (JSON lines) through the monitor.
    Replay {
        file: PathBuf,
        /// Write each rendered overlay frame as PNG into this directory.
        #[arg(long)]
        frames_dir: Option<PathBuf>,
    },
    /// Write the default config to a file.
    InitConfig { path: PathBuf },
}

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "balance_sentinel=info".parse() {
        filter = filter.add_directive(d);
    }

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::InitConfig { path } => {
            Config::default().save(&path)?;
            info!(path = %path.display(), "default config written");
        }
        Commands::Replay { file, frames_dir } => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            let mut canvas = ImageCanvas::new(config.canvas_width, config.canvas_height);
            if let Some(dir) = frames_dir {
                std::fs::create_dir_all(&dir)?;
                canvas = canvas.with_frames_dir(dir);
            }

            let mut session = Session::new(
                ReplaySource::open(&file)?,
                canvas,
                TerminalFeedback::stdout(),
                Overlay::new(config.overlay),
            );
            session.run()?;
        }
        Commands::Run => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            run_live(config)?;
        }
    }

    Ok(())
}

#[cfg(feature = "live")]
fn run_live(config: Config) -> Result<()> {
    use balance_sentinel::camera::Camera;
    use balance_sentinel::inference::PoseDetector;
    use balance_sentinel::live::{LiveSource, WindowSurface};

    info!("Balance Sentinel starting...");

    let detector = PoseDetector::new(&config.model_path, config.model_input_size, config.pose.clone())?;
    let source = LiveSource::new(Camera::new(config.camera_id), detector);
    let surface = WindowSurface::new("Balance Sentinel", config.canvas_width, config.canvas_height)?;

    let mut session = Session::new(
        source,
        surface,
        TerminalFeedback::stdout(),
        Overlay::new(config.overlay),
    );
    session.run()?;
    Ok(())
}

#[cfg(not(feature = "live"))]
fn run_live(_config: Config) -> Result<()> {
    anyhow::bail!("built without the `live` feature; rebuild with `--features live` for webcam mode")
}
