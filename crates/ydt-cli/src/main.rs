//! YouDefineTube CLI
//!
//! CLI tool for previewing stylesheets and dry-running route handling.

use std::fs;

use clap::{Args, Parser, Subcommand};

use ydt_core::{compile, merge, PartialSettings, Settings};

#[cfg(feature = "e2e")]
mod e2e;
mod plan;

#[derive(Parser)]
#[command(name = "ydt-cli")]
#[command(about = "YouDefineTube stylesheet and route tools")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SettingsArgs {
    /// JSON file with a (partial) settings object
    #[arg(short, long, conflicts_with = "json")]
    settings: Option<String>,

    /// Inline JSON settings object
    #[arg(long)]
    json: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stylesheet injected for the given settings
    Css {
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Dry-run startup handling of a page address
    Route {
        /// Full page URL, e.g. https://www.youtube.com/shorts/abc123
        #[arg(short, long)]
        url: String,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Simulate a video element that is present immediately
        #[arg(long, conflicts_with = "video_after")]
        video: bool,

        /// Simulate a video element that mounts after N lookups
        #[arg(long)]
        video_after: Option<u32>,
    },

    /// Run browser checks against the unpacked extension
    #[cfg(feature = "e2e")]
    E2e {
        /// Unpacked extension directory
        #[arg(short, long)]
        extension: String,

        #[arg(long, default_value = "http://localhost:9515")]
        chromedriver: String,

        /// Shorts video id to open
        #[arg(long, default_value = "jNQXAC9IVRw")]
        video_id: String,

        #[arg(long)]
        headless: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = match cli.command {
        Commands::Css { settings } => cmd_css(&settings),
        Commands::Route {
            url,
            settings,
            video,
            video_after,
        } => cmd_route(url, &settings, if video { Some(0) } else { video_after }),
        #[cfg(feature = "e2e")]
        Commands::E2e {
            extension,
            chromedriver,
            video_id,
            headless,
        } => e2e::run_e2e(e2e::E2eOptions {
            chromedriver_url: chromedriver,
            extension_path: extension,
            headless,
            video_id,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_settings(args: &SettingsArgs) -> Result<Option<PartialSettings>, String> {
    let text = match (&args.settings, &args.json) {
        (Some(path), _) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {}", path, e))?,
        (None, Some(json)) => json.clone(),
        (None, None) => return Ok(None),
    };
    PartialSettings::from_json(&text).map_err(|e| e.to_string())
}

fn cmd_css(args: &SettingsArgs) -> Result<(), String> {
    let partial = load_settings(args)?;
    let settings = merge(&Settings::DEFAULT, partial.as_ref());
    log::debug!("Compiling for {:?}", settings);

    let sheet = compile(&settings);
    if sheet.is_empty() {
        log::info!("All features disabled, stylesheet is empty");
    }
    println!("{}", sheet);
    Ok(())
}

fn cmd_route(url: String, args: &SettingsArgs, video_after: Option<u32>) -> Result<(), String> {
    let settings = load_settings(args)?;
    plan::run_route(plan::RouteOptions {
        url,
        settings,
        video_after,
    })
}
