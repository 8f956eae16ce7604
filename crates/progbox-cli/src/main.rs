//! progbox CLI
//!
//! Command-line interface for progbox - bookmarks filed into categories.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use progbox_core::{CategoryPatch, Config, Library};

mod commands;
mod metadata;
mod output;
mod prompt;

use commands::bookmark::{AddArgs, EditArgs};
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "progbox")]
#[command(about = "progbox - Personal bookmark manager")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bookmarks
    #[command(alias = "bm")]
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage categories
    #[command(alias = "cat")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// List all tags
    Tags,
    /// Show storage location and counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Save a new bookmark
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Title (fetched from the page when omitted)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Icon URL (defaults to the site's favicon)
        #[arg(long)]
        icon: Option<String>,
        /// Do not fetch the page title
        #[arg(long)]
        no_fetch: bool,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Only this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show bookmark details
    Show {
        /// Bookmark ID (full UUID or prefix)
        id: String,
    },
    /// Edit a bookmark (prompts when no field flag is given)
    Edit {
        /// Bookmark ID (full UUID or prefix)
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Move to another category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        /// Replace tags
        #[arg(short, long)]
        tag: Option<Vec<String>>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID (full UUID or prefix)
        id: String,
    },
    /// Move a bookmark within its category
    #[command(alias = "mv")]
    Move {
        /// Bookmark ID (full UUID or prefix)
        id: String,
        /// New position, starting at 1
        position: usize,
    },
    /// Open a bookmark in the browser
    Open {
        /// Bookmark ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a new category
    #[command(alias = "create")]
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// List categories
    #[command(alias = "ls")]
    List {
        /// Sort by name instead of position
        #[arg(long)]
        by_name: bool,
    },
    /// Edit a category (prompts when no field flag is given)
    Edit {
        /// Category name or ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete an empty category
    #[command(alias = "rm")]
    Delete {
        /// Category name or ID
        id: String,
    },
    /// Move a category to a new position
    #[command(alias = "mv")]
    Move {
        /// Category name or ID
        id: String,
        /// New position, starting at 1
        position: usize,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, language, log_file, fetch_metadata)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the library
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config, cli.verbose)?;

    let mut library = Library::open_with_config(config)?;
    library.load();
    if let Some(err) = library
        .categories()
        .error()
        .or_else(|| library.bookmarks().error())
    {
        anyhow::bail!("{}", err);
    }

    match cli.command {
        Commands::Bookmark { command } => {
            handle_bookmark_command(command, &mut library, &output).await
        }
        Commands::Category { command } => handle_category_command(command, &mut library, &output),
        Commands::Tags => commands::tag::list(&library, &output),
        Commands::Status => commands::status::show(&library, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_bookmark_command(
    command: BookmarkCommands,
    library: &mut Library,
    output: &Output,
) -> Result<()> {
    match command {
        BookmarkCommands::Add {
            url,
            category,
            title,
            description,
            tag,
            icon,
            no_fetch,
        } => {
            let args = AddArgs {
                url,
                category,
                title,
                description,
                tags: tag,
                icon,
                no_fetch,
            };
            commands::bookmark::add(library, args, output).await
        }
        BookmarkCommands::List { category, tag } => {
            commands::bookmark::list(library, category, tag, output)
        }
        BookmarkCommands::Show { id } => commands::bookmark::show(library, id, output),
        BookmarkCommands::Edit {
            id,
            title,
            url,
            description,
            category,
            tag,
            icon,
        } => {
            let args = EditArgs {
                title,
                url,
                description,
                category,
                tags: tag,
                icon,
            };
            commands::bookmark::edit(library, id, args, output)
        }
        BookmarkCommands::Delete { id } => commands::bookmark::delete(library, id, output),
        BookmarkCommands::Move { id, position } => {
            commands::bookmark::move_to(library, id, position, output)
        }
        BookmarkCommands::Open { id } => commands::bookmark::open(library, id, output),
    }
}

fn handle_category_command(
    command: CategoryCommands,
    library: &mut Library,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::Add {
            name,
            description,
            icon,
        } => commands::category::add(library, name, description, icon, output),
        CategoryCommands::List { by_name } => commands::category::list(library, by_name, output),
        CategoryCommands::Edit {
            id,
            name,
            description,
            icon,
        } => {
            let patch = CategoryPatch {
                name,
                description,
                icon,
            };
            commands::category::edit(library, id, patch, output)
        }
        CategoryCommands::Delete { id } => commands::category::delete(library, id, output),
        CategoryCommands::Move { id, position } => {
            commands::category::move_to(library, id, position, output)
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise progbox crates log at `debug` under
/// `--verbose` and `warn` by default.
fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("progbox_core={0},progbox_cli={0}", level))
    });

    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
