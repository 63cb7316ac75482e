use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skinhealth_cli::backend::{BackendClient, DEFAULT_BACKEND_URL};
use skinhealth_cli::output::OutputFormat;
use skinhealth_cli::terminal::ColorPalette;
use skinhealth_lib::{Coordinate, DEFAULT_RADIUS_METERS};

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "SkinHealth backend utilities")]
struct Cli {
    /// Disable ANSI colors in table output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for hospitals near a location using the configured providers.
    #[command(allow_negative_numbers = true)]
    Nearby {
        /// Latitude of the search origin.
        #[arg(long)]
        lat: f64,
        /// Longitude of the search origin.
        #[arg(long)]
        lng: f64,
        /// Search radius in meters.
        #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
        radius: u32,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Shorthand for `--format json`.
        #[arg(long, conflicts_with = "format")]
        json: bool,
    },
    /// Great-circle distance in kilometres between two points.
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
        /// Also print the local driving estimate.
        #[arg(long)]
        estimate: bool,
    },
    /// Manage the image classifier behind a running backend.
    Model {
        #[command(subcommand)]
        action: ModelCommand,
    },
    /// Chatbot diagnostics against a running backend.
    Chat {
        #[command(subcommand)]
        action: ChatCommand,
    },
}

#[derive(Args, Debug)]
struct BackendArgs {
    /// Base URL of the SkinHealth backend.
    #[arg(long, env = "SKINHEALTH_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend: String,
}

#[derive(Subcommand, Debug)]
enum ModelCommand {
    /// Point the backend at a classifier URL.
    Configure {
        /// Public classifier base URL (for example an ngrok tunnel).
        url: String,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Show whether the backend has a classifier configured.
    Status {
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Upload an image for classification.
    Predict {
        /// Image file to classify.
        image: PathBuf,
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[derive(Subcommand, Debug)]
enum ChatCommand {
    /// Send the fixed test message through the chatbot.
    Test {
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// List the generation models available to the backend.
    Models {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        #[command(flatten)]
        backend: BackendArgs,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let palette = if cli.no_color {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };

    match cli.command {
        Command::Nearby {
            lat,
            lng,
            radius,
            format,
            json,
        } => {
            let format = if json { OutputFormat::Json } else { format };
            commands::nearby::handle_nearby(lat, lng, radius, format, &palette)
        }
        Command::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
            estimate,
        } => {
            commands::distance::handle_distance(
                Coordinate::new(lat1, lng1),
                Coordinate::new(lat2, lng2),
                estimate,
            );
            Ok(())
        }
        Command::Model { action } => match action {
            ModelCommand::Configure { url, backend } => {
                commands::model::handle_configure(&BackendClient::new(&backend.backend)?, &url)
            }
            ModelCommand::Status { backend } => {
                commands::model::handle_status(&BackendClient::new(&backend.backend)?, &palette)
            }
            ModelCommand::Predict { image, backend } => {
                commands::model::handle_predict(&BackendClient::new(&backend.backend)?, &image)
            }
        },
        Command::Chat { action } => match action {
            ChatCommand::Test { backend } => {
                commands::chat::handle_test(&BackendClient::new(&backend.backend)?, &palette)
            }
            ChatCommand::Models { format, backend } => commands::chat::handle_models(
                &BackendClient::new(&backend.backend)?,
                format,
                &palette,
            ),
        },
    }
}

/// Logs go to stderr so `--format json` output stays parseable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
