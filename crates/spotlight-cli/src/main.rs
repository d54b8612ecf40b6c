mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::product::ProductSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "spotlight",
    about = "Daily featured-product rotation: schedule, run and inspect the featured batch",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .spotlight/)
    #[arg(long, global = true, env = "SPOTLIGHT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .spotlight/, write config, and activate the daily schedule
    Init,

    /// Register the daily rotation schedule (no-op if already registered)
    Activate,

    /// Remove the daily rotation schedule
    Deactivate,

    /// Run the rotation once, now
    Run,

    /// Show the schedule and the most recent run result
    Status,

    /// Manage catalog products
    Product {
        #[command(subcommand)]
        subcommand: ProductSubcommand,
    },

    /// Serve the admin page and run the scheduler
    Serve {
        /// Port to listen on (default: server.port from config, 0 = OS-assigned)
        #[arg(long)]
        port: Option<u16>,

        /// Open the admin page in a browser
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let root = root::resolve_root(cli.root.as_deref());

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    let mut filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into());
    let debug = spotlight_core::config::Config::load(&root)
        .map(|c| c.debug)
        .unwrap_or(false);
    if debug {
        if let Ok(directive) = "spotlight=debug".parse::<tracing_subscriber::filter::Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Activate => cmd::schedule::activate(&root, cli.json),
        Commands::Deactivate => cmd::schedule::deactivate(&root, cli.json),
        Commands::Run => cmd::run::run(&root, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Product { subcommand } => cmd::product::run(&root, subcommand, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
