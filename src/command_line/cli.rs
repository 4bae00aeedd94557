#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use nonogram_sat::nonogram::complexity::{self, Complexity};
use nonogram_sat::nonogram::encoder::{
    EncodeObserver, Encoder, EncoderConfig, Exclusivity, LogObserver, NoOpObserver,
};
use nonogram_sat::nonogram::model::PuzzleModel;
use nonogram_sat::nonogram::random::{self, DEFAULT_DENSITY};
use nonogram_sat::nonogram::solver::{SolveOptions, SolveOutcome, solve_with};
use nonogram_sat::nonogram::{parser, persist};
use nonogram_sat::sat::cnf::Cnf;
use nonogram_sat::sat::dpll::Dpll;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, warn};

/// Defines the command-line interface of the nonogram solver.
#[derive(Parser, Debug)]
#[command(
    name = "nonogram-sat",
    version,
    about = "Solves nonograms by reduction to SAT",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// A puzzle file (`.non` or `.nng`) or a directory of them, solved when no
    /// subcommand is given.
    pub path: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonOptions,
}

/// The available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file, or every puzzle under a directory.
    Solve {
        /// Path to a `.non`/`.nng` file or a directory.
        #[arg(long)]
        path: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Print the configuration and clause counts a puzzle would need, without encoding it.
    Estimate {
        /// Path to a `.non` or `.nng` file.
        #[arg(long)]
        path: PathBuf,

        /// List every line, not only the totals.
        #[arg(long, default_value_t = false)]
        lines: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Write the encoding of a puzzle in DIMACS CNF format.
    Export {
        /// Path to a `.non` or `.nng` file.
        #[arg(long)]
        path: PathBuf,

        /// Destination file. Printed to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a random puzzle, optionally saving and solving it.
    Random {
        #[arg(long, default_value_t = 10)]
        width: usize,

        #[arg(long, default_value_t = 10)]
        height: usize,

        /// Probability that a cell is filled.
        #[arg(long, default_value_t = DEFAULT_DENSITY)]
        density: f64,

        /// Seed for a reproducible puzzle.
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value = "random")]
        name: String,

        /// Directory to save the puzzle into as `.nng`.
        #[arg(long)]
        save: Option<PathBuf>,

        /// Also write the puzzle as `.non` next to the saved record.
        #[arg(long, default_value_t = false, requires = "save")]
        text: bool,

        /// Solve the generated puzzle.
        #[arg(long, default_value_t = false)]
        solve: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging, including one line per encoded row or column.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the decoded grid against the clues and the model against the formula.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print encoding and search statistics after solving.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the raw satisfying assignment.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// How strictly each line is tied to one configuration.
    #[arg(long, value_enum, default_value_t = Exclusivity::AtLeastOne)]
    pub(crate) exclusivity: Exclusivity,

    /// Encode lines on all cores.
    #[arg(long, default_value_t = false)]
    pub(crate) parallel: bool,

    /// Refuse puzzles whose estimated clause count exceeds this.
    #[arg(long)]
    pub(crate) max_clauses: Option<u64>,
}

impl CommonOptions {
    pub(crate) fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig::default()
            .with_exclusivity(self.exclusivity)
            .with_parallel(self.parallel)
            .with_max_clauses(self.max_clauses.map(u128::from))
    }
}

/// Writes completions for `shell` to stdout.
pub(crate) fn print_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Reads a puzzle, choosing the format by extension.
///
/// # Errors
///
/// If the file is missing or malformed.
pub(crate) fn load_puzzle(path: &Path) -> Result<PuzzleModel, String> {
    if !path.is_file() {
        return Err(format!("Puzzle file does not exist: {}", path.display()));
    }
    if path.extension().is_some_and(|ext| ext == persist::EXTENSION) {
        persist::load(path).map_err(|e| format!("Error loading {}: {e}", path.display()))
    } else {
        parser::parse_nonogram_file(path)
            .map_err(|e| format!("Error parsing {}: {e}", path.display()))
    }
}

fn is_puzzle_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == "non" || ext == persist::EXTENSION)
}

/// Solves a single file or every puzzle file under a directory.
///
/// # Errors
///
/// If the path does not exist, or a puzzle cannot be read or encoded.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if path.is_dir() {
        return solve_dir(path, common);
    }
    let model = load_puzzle(path)?;
    solve_and_report(&model, common)
}

/// Solves every `.non` and `.nng` file under `path`.
///
/// # Errors
///
/// On the first puzzle that cannot be read or encoded.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    let mut solved = 0usize;
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !is_puzzle_file(file_path) {
            debug!(path = %file_path.display(), "skipping non-puzzle entry");
            continue;
        }
        println!("Solving: {}", file_path.display());
        let model = load_puzzle(file_path)?;
        solve_and_report(&model, common)?;
        solved += 1;
    }
    if solved == 0 {
        warn!(path = %path.display(), "no puzzle files found");
    }
    Ok(())
}

/// Allocated and resident memory in MiB, if jemalloc can report them.
fn memory_mib() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Solves one puzzle and prints the grid, verification result and statistics.
///
/// # Errors
///
/// If encoding is refused or verification fails.
pub(crate) fn solve_and_report(model: &PuzzleModel, common: &CommonOptions) -> Result<(), String> {
    let options = SolveOptions {
        encoder: common.encoder_config(),
        verify: common.verify,
    };
    let mut observer: Box<dyn EncodeObserver> = if common.debug {
        Box::new(LogObserver)
    } else {
        Box::new(NoOpObserver)
    };

    let mut engine = Dpll::new();
    let outcome = solve_with(model, &mut engine, options, observer.as_mut())
        .map_err(|e| format!("{}: {e}", model.name()))?;

    let cnf = engine.cnf();

    if common.verify {
        verify_solution(cnf, &outcome)?;
    }

    if common.stats {
        print_stats(cnf, &outcome, memory_mib());
    }

    if let (true, Some(solutions)) = (common.print_solution, &outcome.solutions) {
        println!("Solutions: {solutions}");
    }

    match &outcome.grid {
        Some(grid) => println!("\nSATISFIABLE\n{grid}"),
        None => println!("\nUNSATISFIABLE"),
    }
    Ok(())
}

/// Checks the model against the formula it was found for.
///
/// # Errors
///
/// If the model falsifies a clause.
pub(crate) fn verify_solution(cnf: &Cnf, outcome: &SolveOutcome) -> Result<(), String> {
    let Some(solutions) = &outcome.solutions else {
        return Ok(());
    };
    let ok = cnf.verify(solutions);
    println!("Verified: {ok:?}");
    if ok {
        Ok(())
    } else {
        Err("Solution failed verification!".to_string())
    }
}

/// Prints the complexity estimate of a puzzle.
pub(crate) fn print_estimate(model: &PuzzleModel, estimate: &Complexity, lines: bool) {
    println!("{model}");
    if lines {
        println!("\n  line          length   configurations        clauses");
        for line in &estimate.lines {
            println!(
                "  {:<6} {:>5}  {:>7}  {:>15}  {:>13}",
                line.orientation.to_string(),
                line.index,
                line.length,
                line.configurations,
                line.clauses
            );
        }
    }
    println!("\n=======================[ Encoding Estimate ]=========================");
    stat_line("Cell variables", model.num_cells());
    stat_line("Configurations", estimate.configurations);
    stat_line("Clauses (at-least-one)", estimate.clauses);
    stat_line(
        "Clauses (exactly-one)",
        estimate.clauses_with(Exclusivity::ExactlyOne),
    );
    stat_line("Approx. size (MiB)", estimate.approx_mib());
    stat_line("Infeasible lines", estimate.infeasible_lines().count());
    println!("=====================================================================");
}

/// Estimates the encoding of a puzzle file.
///
/// # Errors
///
/// If the puzzle cannot be read.
pub(crate) fn estimate(path: &Path, lines: bool) -> Result<(), String> {
    let model = load_puzzle(path)?;
    let estimate = complexity::estimate(&model);
    print_estimate(&model, &estimate, lines);
    Ok(())
}

/// Encodes a puzzle file and writes the formula as DIMACS.
///
/// # Errors
///
/// If the puzzle cannot be read or encoded, or the output cannot be written.
pub(crate) fn export(
    path: &Path,
    output: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), String> {
    let model = load_puzzle(path)?;
    let time = Instant::now();
    let (cnf, summary) = Encoder::new(common.encoder_config())
        .to_cnf(&model)
        .map_err(|e| format!("{}: {e}", model.name()))?;
    debug!(?summary, elapsed = ?time.elapsed(), "encoded for export");

    let dimacs = format!("c {}\n{cnf}", model.name());
    match output {
        Some(out) => {
            fs::write(out, dimacs).map_err(|e| format!("Unable to write {}: {e}", out.display()))?;
            println!("DIMACS written to: {}", out.display());
        }
        None => print!("{dimacs}"),
    }
    Ok(())
}

/// Generates a random puzzle and acts on it.
///
/// # Errors
///
/// If the dimensions are zero, or saving or solving fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn random_puzzle(
    name: &str,
    width: usize,
    height: usize,
    density: f64,
    seed: Option<u64>,
    save: Option<&Path>,
    text: bool,
    solve: bool,
    common: &CommonOptions,
) -> Result<(), String> {
    let (model, grid) =
        random::random_puzzle(name, width, height, density, seed).map_err(|e| e.to_string())?;
    println!("{model}");
    if common.debug {
        println!("Source grid:\n{grid}");
    }

    if let Some(dir) = save {
        let path = persist::save(&model, dir).map_err(|e| e.to_string())?;
        println!("Saved to: {}", path.display());
        if text {
            let non_path = path.with_extension("non");
            fs::write(&non_path, parser::to_non(&model))
                .map_err(|e| format!("Unable to write {}: {e}", non_path.display()))?;
            println!("Saved to: {}", non_path.display());
        }
    }

    if solve {
        solve_and_report(&model, common)?;
    }
    Ok(())
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

fn seconds(d: Duration) -> String {
    format!("{:.3}", d.as_secs_f64())
}

/// Prints a summary of encoding and search statistics.
pub(crate) fn print_stats(cnf: &Cnf, outcome: &SolveOutcome, memory: Option<(f64, f64)>) {
    let s = &outcome.stats;
    let summary = &outcome.summary;
    let solve_secs = outcome.timings.solve.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Encode time (s)", seconds(outcome.timings.encode));
    stat_line("Cell variables", summary.cell_variables);
    stat_line("Selector variables", summary.selectors);
    stat_line("Variables", cnf.num_vars);
    stat_line("Clauses", cnf.len());
    stat_line("Literals", cnf.num_literals());
    stat_line("Infeasible lines", summary.empty_lines);

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Conflicts", s.conflicts, solve_secs);
    stat_line_with_rate("Decisions", s.decisions, solve_secs);
    stat_line_with_rate("Propagations", s.propagations, solve_secs);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("Solve time (s)", format!("{solve_secs:.3}"));
    stat_line("Decode time (s)", seconds(outcome.timings.decode));
    println!("=====================================================================");
}
