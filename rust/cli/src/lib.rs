//! # Lounge CLI Library
//!
//! Developer front-end for the lounge poker engine.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments, executes a subcommand against injected output
//! streams and returns the process exit code.
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let code = lounge_cli::run(["lounge", "eval", "As", "Ks", "Qs", "Js", "Ts"], &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert!(String::from_utf8(out).unwrap().contains("Royal Flush"));
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Deal a single hand for inspection
//! - `eval`: Rank five to seven cards
//! - `sim`: Run bot simulations and write hand histories
//! - `cfg`: Display current configuration settings

use std::io::Write;

use clap::Parser;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod ui;

use cli::{Commands, LoungeCli};
use commands::sim::SimArgs;
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["deal", "eval", "sim", "cfg"];

/// Main entry point for the CLI application.
///
/// Returns `0` on success and `2` on any error; usage errors print the
/// command list to `err`.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match LoungeCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    match dispatch(cli.cmd, out, err) {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if ui::write_error(err, &e.to_string()).is_err() {
                return 2;
            }
            e.exit_code()
        }
    }
}

fn dispatch(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Eval { cards } => handle_eval_command(&cards, out),
        Commands::Deal {
            variant,
            players,
            seed,
        } => {
            let config = config::load()?;
            handle_deal_command(variant, players, seed, &config, out)
        }
        Commands::Sim {
            hands,
            players,
            variant,
            seed,
            policy,
            output,
        } => {
            let config = config::load()?;
            let args = SimArgs {
                hands,
                players,
                variant,
                seed,
                policy,
                output,
            };
            handle_sim_command(args, &config, out, err)
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // help and version go to stdout with success
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return if write!(out, "{}", e).is_err() { 2 } else { 0 };
    }
    let mut report = || -> std::io::Result<()> {
        writeln!(err, "{}", e)?;
        writeln!(err)?;
        writeln!(err, "Lounge Poker CLI")?;
        writeln!(err, "Usage: lounge <command> [options]\n")?;
        writeln!(err, "Commands:")?;
        for c in COMMANDS {
            writeln!(err, "  {}", c)?;
        }
        writeln!(err, "\nFor full help, run: lounge --help")
    };
    let _ = report();
    2
}

/// Installs the stderr log subscriber. `RUST_LOG` picks the filter,
/// `warn` otherwise. Calling it twice is harmless.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
