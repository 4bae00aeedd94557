//! # nonogram-sat
//!
//! Solves nonogram puzzles by encoding them as SAT and running a DPLL engine
//! over the result.
//!
//! ## Usage
//!
//! ```sh
//! nonogram-sat [OPTIONS] [PATH] [COMMAND]
//! ```
//!
//! -   `nonogram-sat cross.non` solves one puzzle; a directory solves every
//!     `.non` and `.nng` file beneath it.
//! -   `nonogram-sat estimate --path big.non --lines` prints configuration and
//!     clause counts without encoding anything.
//! -   `nonogram-sat export --path cross.non -o cross.cnf` writes DIMACS.
//! -   `nonogram-sat random --width 15 --height 10 --seed 3 --save puzzles --solve`
//!     generates, stores and solves a random puzzle.
//! -   `nonogram-sat completions bash` prints a completion script.
//!
//! Logging goes through `tracing`; `--debug` or `RUST_LOG=debug` shows one line
//! per encoded row and column. Memory figures in the statistics table come from
//! jemalloc.

use crate::command_line::cli::{
    Cli, Commands, CommonOptions, estimate, export, print_completions, random_puzzle, solve_path,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod command_line;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn debug_requested(cli: &Cli) -> bool {
    let common: &CommonOptions = match &cli.command {
        Some(
            Commands::Solve { common, .. }
            | Commands::Estimate { common, .. }
            | Commands::Export { common, .. }
            | Commands::Random { common, .. },
        ) => common,
        Some(Commands::Completions { .. }) | None => &cli.common,
    };
    common.debug
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Some(Commands::Solve { path, common }) => solve_path(&path, &common),
        Some(Commands::Estimate { path, lines, .. }) => estimate(&path, lines),
        Some(Commands::Export {
            path,
            output,
            common,
        }) => export(&path, output.as_deref(), &common),
        Some(Commands::Random {
            width,
            height,
            density,
            seed,
            name,
            save,
            text,
            solve,
            common,
        }) => random_puzzle(
            &name,
            width,
            height,
            density,
            seed,
            save.as_deref(),
            text,
            solve,
            &common,
        ),
        Some(Commands::Completions { shell }) => {
            print_completions(shell);
            Ok(())
        }
        None => match cli.path {
            Some(path) => solve_path(&path, &cli.common),
            None => Err("no puzzle given; pass a path or a subcommand (see --help)".to_string()),
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(debug_requested(&cli));

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
