mod cmd;
mod output;
mod prompts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fpm_lib::config::Settings;

use crate::cmd::{ListFilter, Session};
use crate::output::OutputFormat;

/// fpm - Component manager for Flashpoint installations
#[derive(Parser)]
#[command(name = "fpm")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Answer yes to confirmation prompts
  #[arg(short, long, global = true)]
  yes: bool,

  /// Output format for list and info
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List components with their install state
  List {
    /// Only show components in this state
    #[arg(value_enum)]
    filter: Option<ListFilter>,

    /// Show component titles
    #[arg(short, long)]
    long: bool,
  },

  /// Show everything known about a component
  Info {
    /// Component ID
    id: String,
  },

  /// Download components or categories and their dependencies
  Download {
    /// Component IDs or categories (all components if omitted)
    ids: Vec<String>,
  },

  /// Remove installed components or categories
  Remove {
    /// Component IDs or categories
    #[arg(required = true)]
    ids: Vec<String>,
  },

  /// Update installed components
  Update {
    /// Component IDs or categories (everything stale plus missing required components if omitted)
    ids: Vec<String>,
  },

  /// Show or set the install root
  Path {
    /// New install root
    value: Option<String>,
  },

  /// Show or set the manifest source URL
  Source {
    /// New manifest URL
    value: Option<String>,
  },
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let (settings, config_path) = Settings::load_default().context("Failed to load settings")?;

  match cli.command {
    Commands::Path { value } => cmd::cmd_path(settings, &config_path, value),
    Commands::Source { value } => cmd::cmd_source(settings, &config_path, value),
    Commands::List { filter, long } => cmd::cmd_list(&Session::open(&settings)?, filter, long, cli.output),
    Commands::Info { id } => cmd::cmd_info(&Session::open(&settings)?, &id, cli.output),
    Commands::Download { ids } => cmd::cmd_download(&Session::open(&settings)?, &ids, cli.yes),
    Commands::Remove { ids } => cmd::cmd_remove(&Session::open(&settings)?, &ids, cli.yes),
    Commands::Update { ids } => cmd::cmd_update(&Session::open(&settings)?, &ids, cli.yes),
  }
}
