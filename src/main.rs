//! # Talent Lens CLI (`lens`)
//!
//! ## Usage
//!
//! ```bash
//! lens --config ./config/lens.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lens list` | Fetch records and print the filtered, sorted list |
//! | `lens statuses` | Show the status catalogue of a record kind |
//! | `lens serve` | Start the HTTP server |
//! | `lens completions <shell>` | Print a shell completion script |
//!
//! ## Examples
//!
//! ```bash
//! # Hired applicants, A→Z
//! lens list --status hired --sort name-asc
//!
//! # Upcoming sessions this week from a saved response
//! lens list --kind sessions --input sessions.json --status upcoming --date-range week
//!
//! # Applicants with either skill, as JSON
//! lens list --skill react,figma --format json
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use talent_lens::config;
use talent_lens::list::{self, ListArgs};
use talent_lens::logging;
use talent_lens::server;
use talent_lens::statuses;
use talent_lens_core::models::RecordKind;

/// Talent Lens CLI: filter, sort, and search marketplace listings.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/lens.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "lens",
    about = "Talent Lens: filter, sort, and search applicant and mentorship-session listings",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/lens.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch records and print the derived list.
    ///
    /// Filters combine with AND; several statuses or skills match any of
    /// them. Without `--config` on disk, `--input` must name a JSON file.
    List(ListArgs),

    /// Show every status of a record kind with its label and tone.
    Statuses {
        /// `applicants` or `sessions`.
        #[arg(long, default_value = "applicants")]
        kind: RecordKind,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    // Commands that don't require config
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "lens", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Statuses { kind, json } => {
            statuses::run_statuses(*kind, *json)?;
            return Ok(());
        }
        _ => {}
    }

    let cfg = match &cli.command {
        Commands::List(args) if args.input.is_some() && !cli.config.exists() => {
            config::Config::minimal()
        }
        _ => config::load_config(&cli.config)?,
    };

    match &cli.command {
        Commands::List(args) => {
            list::run_list(&cfg, args).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Statuses { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
