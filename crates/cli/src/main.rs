//! Set-associative cache simulator CLI.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::{fs, process};

use cachesim::config::{ReplacementPolicy, WriteMissPolicy};
use cachesim::sim::parse_trace;
use cachesim::{Cache, Config, FlatMemory};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Replay a memory access trace through a set-associative cache",
    long_about = None,
)]
struct Cli {
    /// Access trace (`r <addr>` / `w <addr> <data>` per line).
    #[arg(short, long)]
    trace: PathBuf,

    /// TOML configuration file; defaults apply to anything it omits.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw memory image loaded at address 0 before the run.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Number of sets (power of two).
    #[arg(long)]
    sets: Option<usize>,

    /// Number of ways per set (power of two).
    #[arg(long)]
    ways: Option<usize>,

    /// Words per line (power of two).
    #[arg(long)]
    line_words: Option<usize>,

    /// Replacement policy.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Write-miss policy.
    #[arg(long, value_enum)]
    write_miss: Option<WriteMissArg>,

    /// Write back dirty lines after the trace, so memory counters include them.
    #[arg(long)]
    flush: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Lru,
    Fifo,
    Plru,
    Random,
}

impl From<PolicyArg> for ReplacementPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Lru => ReplacementPolicy::Lru,
            PolicyArg::Fifo => ReplacementPolicy::Fifo,
            PolicyArg::Plru => ReplacementPolicy::Plru,
            PolicyArg::Random => ReplacementPolicy::Random,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WriteMissArg {
    Allocate,
    NoAllocate,
}

impl From<WriteMissArg> for WriteMissPolicy {
    fn from(w: WriteMissArg) -> Self {
        match w {
            WriteMissArg::Allocate => WriteMissPolicy::Allocate,
            WriteMissArg::NoAllocate => WriteMissPolicy::NoAllocate,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("\x1b[1;31merror:\x1b[0m {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let mut cache = config.build()?;

    if let Some(image) = &cli.image {
        load_image(&mut cache, image)?;
    }

    let text = fs::read_to_string(&cli.trace)
        .map_err(|e| format!("failed to read trace {}: {}", cli.trace.display(), e))?;
    let trace = parse_trace(&text)?;
    log::info!("loaded {} accesses from {}", trace.len(), cli.trace.display());

    cache.run(&trace)?;
    if cli.flush {
        cache.flush()?;
    }

    let report = cache.report();
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(sets) = cli.sets {
        config.cache.sets = sets;
    }
    if let Some(ways) = cli.ways {
        config.cache.ways = ways;
    }
    if let Some(line_words) = cli.line_words {
        config.cache.line_words = line_words;
    }
    if let Some(policy) = cli.policy {
        config.cache.policy = policy.into();
    }
    if let Some(write_miss) = cli.write_miss {
        config.cache.write_miss = write_miss.into();
    }
    Ok(config)
}

fn load_image(
    cache: &mut Cache<FlatMemory>,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(path)
        .map_err(|e| format!("failed to read image {}: {}", path.display(), e))?;
    cache.memory_mut().load(&data, 0)?;
    log::info!("loaded {} byte image from {}", data.len(), path.display());
    Ok(())
}
