// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use obscura::Config;
use obscura::backends::camera::CameraFacing;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "obscura")]
#[command(about = "Camera capture session with a terminal front-end")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Which panel's radial layout to print
#[derive(Clone, Copy, ValueEnum)]
enum PanelArg {
    Zoom,
    Exposure,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive capture session in the terminal (default)
    Terminal,

    /// List available cameras
    List,

    /// Take a photo
    Photo {
        /// Camera to use: back or front
        #[arg(short, long, default_value = "back")]
        facing: CameraFacing,

        /// Zoom factor (1-128, -1 for the device neutral zoom)
        #[arg(short, long, allow_hyphen_values = true)]
        zoom: Option<f64>,

        /// Exposure value from the platform option set
        #[arg(short, long, allow_hyphen_values = true)]
        exposure: Option<f64>,

        /// Fire the flash
        #[arg(long)]
        flash: bool,

        /// Turn the torch on before capturing
        #[arg(long)]
        torch: bool,

        /// Copy the photo to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the radial button layout of a panel as JSON
    Layout {
        #[arg(short, long, value_enum, default_value = "zoom")]
        panel: PanelArg,

        /// Window width (defaults to the configured window)
        #[arg(long)]
        width: Option<f64>,

        /// Window height (defaults to the configured window)
        #[arg(long)]
        height: Option<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // The terminal UI owns stdout, so it logs to a file instead
    if matches!(cli.command, None | Some(Commands::Terminal)) {
        return obscura::terminal::run(config);
    }

    // Set RUST_LOG to control the log level, e.g. RUST_LOG=obscura=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(&config),
        Some(Commands::Photo {
            facing,
            zoom,
            exposure,
            flash,
            torch,
            output,
        }) => cli::take_photo(
            &config,
            cli::PhotoRequest {
                facing,
                zoom,
                exposure,
                flash,
                torch,
                output,
            },
        ),
        Some(Commands::Layout {
            panel,
            width,
            height,
        }) => {
            let side = match panel {
                PanelArg::Zoom => obscura::app::ArcSide::Left,
                PanelArg::Exposure => obscura::app::ArcSide::Right,
            };
            cli::print_layout(&config, side, width, height)
        }
        None | Some(Commands::Terminal) => Ok(()),
    }
}
