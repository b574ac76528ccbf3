use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod plain;
mod tui;

#[derive(Parser, Debug)]
#[command(
    name = "codepath",
    version,
    about = "Interactive Coding Path presentation for the terminal"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Present a deck interactively
    Present {
        #[arg(long)]
        deck: Option<PathBuf>,
        /// Page index or title to open first
        #[arg(long)]
        page: Option<String>,
        /// Write a session report here on exit
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print pages as plain text
    Show {
        #[arg(long)]
        deck: Option<PathBuf>,
        #[arg(long)]
        page: Option<String>,
    },
    /// List the pages of a deck
    Pages {
        #[arg(long)]
        deck: Option<PathBuf>,
    },
    /// Score a relevance block from the command line
    Score {
        #[arg(long)]
        deck: Option<PathBuf>,
        /// Relevance block id (defaults to the first one)
        #[arg(long)]
        block: Option<String>,
        /// 1-based statement numbers to mark as agreed
        #[arg(long = "check", value_delimiter = ',')]
        checked: Vec<usize>,
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    Validate {
        #[arg(long)]
        deck: Option<PathBuf>,
    },
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "starting");

    match cli.command {
        Commands::Init { path, force } => init_config(path, force),
        Commands::Present { deck, page, report } => {
            commands::present::execute(commands::present::PresentInputs {
                config_path: cli.config,
                deck,
                page,
                report,
            })
        }
        Commands::Show { deck, page } => commands::show::execute(cli.config, deck, page),
        Commands::Pages { deck } => commands::show::list_pages(cli.config, deck),
        Commands::Score {
            deck,
            block,
            checked,
            all,
            json,
        } => commands::score::execute(commands::score::ScoreInputs {
            config_path: cli.config,
            deck,
            block,
            checked,
            all,
            json,
        }),
        Commands::Validate { deck } => commands::validate::execute(cli.config, deck),
        Commands::Report { input, json } => commands::report::execute(&input, json),
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(cli.config)
            } else {
                Ok(())
            }
        }
    }
}

/// Logs go to stderr, filtered by `CODEPATH_LOG` (warnings only by default).
fn init_logging() {
    let filter = EnvFilter::try_from_env("CODEPATH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let paths = codepath_core::config::ConfigPaths::resolve()?;
    let config_path = path.unwrap_or(paths.config_path);
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let config = codepath_core::config::Config::default_config();
    config.save(&config_path)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}
