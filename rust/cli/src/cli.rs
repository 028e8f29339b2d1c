//! Command-line surface of the `lounge` binary.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "lounge",
    version,
    about = "Lounge poker engine: deal, evaluate and simulate hands"
)]
pub struct LoungeCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deal one hand and show every player's cards and the board
    Deal {
        /// holdem, omaha or stud
        #[arg(long)]
        variant: Option<String>,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate five to seven cards, e.g. `lounge eval As Ks Qs Js Ts`
    Eval {
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
    },
    /// Play many hands with bots on every seat
    Sim {
        #[arg(long)]
        hands: u64,
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        variant: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// baseline or passive
        #[arg(long)]
        policy: Option<String>,
        /// Hand history destination (JSONL)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
