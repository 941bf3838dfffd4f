//! `warren`: generate or load a maze, explore it, print the run report.
//!
//! With `--iterations N` the maze is explored N times, each run seeded
//! from `--seed`, followed by a summary over every run.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use warren::maze::MAX_SIZE;
use warren::prelude::*;

// ── Command line ───────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Explore a maze with a pool of lock-step workers")]
#[command(version)]
struct Args {
    /// Load a maze from a text file instead of generating one
    #[arg(long, short)]
    maze: Option<PathBuf>,

    /// Logical size of the generated maze (cells per side)
    #[arg(
        long,
        short,
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SIZE))
    )]
    size: u32,

    /// Seed for maze generation and random strategies
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Exploration strategy
    #[arg(long, value_enum, default_value = "dfs")]
    strategy: CliStrategy,

    /// Number of workers (defaults to the available parallelism, at most 4)
    #[arg(long, short)]
    workers: Option<usize>,

    /// Where worker step logic runs
    #[arg(long, value_enum, default_value = "threaded")]
    mode: CliMode,

    /// Step budget: auto, fewest, unlimited, or a number of ticks
    #[arg(long, default_value = "auto", value_parser = parse_budget)]
    budget: StepBudget,

    /// Start anchor for generated mazes
    #[arg(long, value_enum, default_value = "top-left")]
    start: CliPlacement,

    /// End anchor for generated mazes
    #[arg(long, value_enum, default_value = "bottom-right")]
    end: CliPlacement,

    /// Stop after this many consecutive stalled ticks
    #[arg(long, default_value = "20")]
    max_stalls: u32,

    /// Number of runs; run `i` is seeded with `seed + i`
    #[arg(
        long,
        short = 'n',
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    iterations: u32,

    /// Generate a new maze for every run instead of reusing the first
    #[arg(long)]
    fresh_maze: bool,

    /// Pause after every tick: a number of milliseconds, or `input` to
    /// wait for Enter
    #[arg(long, value_parser = parse_pause)]
    step_delay: Option<StepPause>,

    /// Print the coordinator status view after the run
    #[arg(long)]
    status: bool,

    /// Skip the final maze rendering
    #[arg(long)]
    no_render: bool,
}

/// CLI strategy selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliStrategy {
    /// Depth-first search, one stack per worker
    Dfs,
    /// Breadth-first search over one shared queue
    Bfs,
    /// Random walk that backtracks along its breadcrumbs
    Backtrack,
    /// Random walk that jumps to a peer when its trail runs out
    JumpToPeer,
    /// Prefer the least visited neighbour
    Weighted,
    /// Uniformly random legal moves
    Confused,
    /// Every worker follows the left wall
    LeftWall,
    /// Every worker follows the right wall
    RightWall,
    /// Even workers follow the left wall, odd workers the right
    Alternating,
}

impl From<CliStrategy> for Strategy {
    fn from(cli: CliStrategy) -> Self {
        match cli {
            CliStrategy::Dfs => Strategy::Dfs,
            CliStrategy::Bfs => Strategy::Bfs,
            CliStrategy::Backtrack => Strategy::Wanderer(WanderPolicy::Backtrack),
            CliStrategy::JumpToPeer => Strategy::Wanderer(WanderPolicy::JumpToPeer),
            CliStrategy::Weighted => Strategy::Wanderer(WanderPolicy::Weighted),
            CliStrategy::Confused => Strategy::Wanderer(WanderPolicy::Confused),
            CliStrategy::LeftWall => Strategy::WallHugger(Some(Side::Left)),
            CliStrategy::RightWall => Strategy::WallHugger(Some(Side::Right)),
            CliStrategy::Alternating => Strategy::WallHugger(None),
        }
    }
}

/// CLI execution mode selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliMode {
    /// Every worker runs on the driver thread
    Inline,
    /// One thread per worker
    Threaded,
}

impl From<CliMode> for ExecutionMode {
    fn from(cli: CliMode) -> Self {
        match cli {
            CliMode::Inline => ExecutionMode::Inline,
            CliMode::Threaded => ExecutionMode::Threaded,
        }
    }
}

/// CLI goal anchor selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliPlacement {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Middle,
    /// A corner or the middle
    Random,
    /// Any of the four corners
    RandomCorner,
    /// Any cell
    RandomAny,
}

impl From<CliPlacement> for Placement {
    fn from(cli: CliPlacement) -> Self {
        match cli {
            CliPlacement::TopLeft => Placement::TopLeft,
            CliPlacement::TopRight => Placement::TopRight,
            CliPlacement::BottomLeft => Placement::BottomLeft,
            CliPlacement::BottomRight => Placement::BottomRight,
            CliPlacement::Middle => Placement::Middle,
            CliPlacement::Random => Placement::Random,
            CliPlacement::RandomCorner => Placement::RandomCorner,
            CliPlacement::RandomAny => Placement::RandomAny,
        }
    }
}

fn parse_budget(s: &str) -> Result<StepBudget, String> {
    match s.to_ascii_lowercase().as_str() {
        "auto" => Ok(StepBudget::Auto),
        "fewest" => Ok(StepBudget::Fewest),
        "unlimited" | "none" => Ok(StepBudget::Unlimited),
        n => n
            .parse::<u64>()
            .map(StepBudget::Fixed)
            .map_err(|_| format!("expected auto, fewest, unlimited or a tick count, got '{s}'")),
    }
}

/// What to do between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepPause {
    Millis(u64),
    Input,
}

impl StepPause {
    fn wait(self) {
        match self {
            Self::Millis(ms) => thread::sleep(Duration::from_millis(ms)),
            Self::Input => {
                eprint!("... press Enter for the next step ...");
                let mut line = String::new();
                // EOF or a closed stdin just stops pausing.
                let _ = io::stdin().read_line(&mut line);
            }
        }
    }
}

fn parse_pause(s: &str) -> Result<StepPause, String> {
    if s.eq_ignore_ascii_case("input") {
        return Ok(StepPause::Input);
    }
    s.parse::<u64>()
        .map(StepPause::Millis)
        .map_err(|_| format!("expected milliseconds or 'input', got '{s}'"))
}

/// Seed for run `run` of a repeated exploration.
fn run_seed(seed: u64, run: u32) -> u64 {
    seed.wrapping_add(u64::from(run))
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum CliError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Config(ConfigError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read maze '{}': {source}", path.display())
            }
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── Run ────────────────────────────────────────────────────────────

fn load_maze(args: &Args, seed: u64) -> Result<Maze, CliError> {
    match &args.maze {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            Ok(Maze::parse(&text, &Symbols::default())?)
        }
        None => Ok(MazeGenerator::new(seed).generate_maze(
            args.size,
            args.start.into(),
            args.end.into(),
        )?),
    }
}

fn run(args: &Args) -> Result<Vec<RunReport>, CliError> {
    let mut maze = load_maze(args, args.seed)?;
    let mut reports = Vec::with_capacity(args.iterations as usize);
    for run in 0..args.iterations {
        let seed = run_seed(args.seed, run);
        if run > 0 && args.fresh_maze && args.maze.is_none() {
            maze = load_maze(args, seed)?;
        }
        debug!(
            run,
            seed,
            size = maze.size(),
            start = %maze.start_pos(),
            end = %maze.end_pos(),
            "maze ready"
        );

        let coordinator = CoordinatorConfig {
            worker_count: args.workers,
            mode: args.mode.into(),
            seed,
            ..Default::default()
        };
        let session = SessionConfig {
            budget: args.budget,
            max_consecutive_stalls: args.max_stalls,
        };
        let mut session =
            Session::setup(maze.clone(), args.strategy.into(), coordinator, session)?;
        let report = session.run_with(|_, outcome| {
            // No pause after the last tick.
            if let Some(pause) = args.step_delay {
                if outcome.positions().is_some() && !outcome.reached_end() {
                    pause.wait();
                }
            }
        });

        if args.iterations > 1 {
            if run > 0 {
                println!();
            }
            println!("Run {}/{} (seed {seed})", run + 1, args.iterations);
        }
        println!("{report}");
        print_explorer(args, session.explorer());
        reports.push(report);
    }

    if args.iterations > 1 {
        println!();
        println!("{}", RunSummary::from_reports(&reports));
    }
    Ok(reports)
}

fn print_explorer(args: &Args, explorer: &dyn Explorer) {
    if args.status {
        println!();
        for entry in explorer.status() {
            println!("{}: {}", entry.label, entry.value);
        }
    }
    if !args.no_render {
        let visited = explorer.visited();
        println!();
        print!(
            "{}",
            explorer.maze().render(
                &Symbols::default(),
                &explorer.current_positions(),
                |p| visited.contains(&p)
            )
        );
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
