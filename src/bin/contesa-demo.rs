//! Demo driver running the singleton probes and the counter strategies.
//!
//! Run with:
//! ```bash
//! cargo run --bin contesa-demo --features demo -- --help
//! ```

use std::io::{self, Write};

use clap::{ArgAction, Parser, ValueEnum};
use contesa::counters::{
    CountOutcome, CounterKind, Workload, WorkloadError, DEFAULT_TOTAL, DEFAULT_WORKERS,
};
use contesa::harness::{self, ContentionReport, IdentityProbe};
use contesa::observers::json::JsonObserver;
use contesa::observers::table::{TableObserver, TableStyle};
use contesa::observers::ObserverError;
use contesa::registry::{self, Strategy};
use contesa::snapshot::RunSnapshot;
use thiserror::Error;

/// Errors the driver can exit with.
#[derive(Debug, Error)]
enum DemoError {
    #[error("invalid workload: {0}")]
    Workload(#[from] WorkloadError),

    #[error(transparent)]
    Observer(#[from] ObserverError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, DemoError>;

/// Output format for results.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty ASCII tables
    Table,
    /// JSON format
    Json,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Modern,
    Markdown,
    Dots,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Modern => TableStyle::Modern,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Dots => TableStyle::Dots,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Counter strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CounterChoice {
    Sequential,
    Racy,
    Channel,
    Sharded,
}

impl From<CounterChoice> for CounterKind {
    fn from(choice: CounterChoice) -> Self {
        match choice {
            CounterChoice::Sequential => CounterKind::Sequential,
            CounterChoice::Racy => CounterKind::Racy,
            CounterChoice::Channel => CounterKind::Channel,
            CounterChoice::Sharded => CounterKind::Sharded,
        }
    }
}

/// Demo application for contesa - singleton strategies and counters under contention.
///
/// Resolves the process-wide store through every singleton strategy,
/// hammers the thread-safe ones with concurrent callers, then runs the
/// counter strategies over the same workload.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Table style (for table format)
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include timestamp in JSON output
    #[arg(long)]
    timestamp: bool,

    /// Total number of increments per counter strategy
    #[arg(short, long, default_value_t = DEFAULT_TOTAL)]
    total: u64,

    /// Number of counting workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Counter strategies to run (repeatable, default: all)
    #[arg(short, long, value_enum)]
    counter: Vec<CounterChoice>,

    /// Concurrent callers per singleton contention probe
    #[arg(long, default_value = "100")]
    callers: usize,

    /// Skip the singleton probes
    #[arg(long)]
    no_singleton: bool,

    /// Skip the counter strategies
    #[arg(long)]
    no_counters: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Everything one run produced.
#[derive(Default)]
struct Results {
    identity: Option<IdentityProbe>,
    contention: Vec<ContentionReport>,
    outcomes: Vec<CountOutcome>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Exercises the process-wide store the way a caller would.
fn exercise_store(out: &mut impl Write) -> io::Result<()> {
    let store = registry::instance(Strategy::OnceGuarded);
    store.set("nome", "João");
    store.set("idade", "30");
    store.set("cidade", "São Paulo");

    writeln!(out, "nome: {:?}", store.get("nome"))?;
    writeln!(out, "idade: {:?}", store.get("idade"))?;
    writeln!(out, "size: {}", store.size())?;

    for strategy in Strategy::ALL {
        let shared = registry::instance(strategy).get("nome");
        writeln!(out, "nome via {strategy}: {shared:?}")?;
    }

    store.delete("cidade");
    writeln!(out, "after delete: size {}, keys {:?}", store.size(), store.keys())?;
    Ok(())
}

fn collect(args: &Args, out: &mut impl Write) -> Result<Results> {
    let mut results = Results::default();

    if !args.no_singleton {
        let global = registry::global();
        // resolve through the preferred strategy first so the unsynchronized
        // accessor never sees an empty slot
        global.once_guarded();
        results.identity = Some(harness::probe_identity(global));

        if matches!(args.format, OutputFormat::Table) {
            exercise_store(out)?;
        }

        results.contention = Strategy::THREAD_SAFE
            .into_iter()
            .map(|strategy| harness::probe_contention(global, strategy, args.callers))
            .collect();
    }

    if !args.no_counters {
        let workload = Workload::new(args.total, args.workers)?;
        let kinds: Vec<CounterKind> = if args.counter.is_empty() {
            CounterKind::ALL.to_vec()
        } else {
            args.counter.iter().copied().map(CounterKind::from).collect()
        };
        eprintln!(
            "Counting {} over {} workers with {} strategies...",
            workload.total(),
            workload.workers(),
            kinds.len()
        );
        results.outcomes = harness::run_counters(&kinds, workload);
    }

    Ok(results)
}

fn render(args: &Args, results: &Results) -> Result<String> {
    match args.format {
        OutputFormat::Table => {
            let observer = TableObserver::new().with_style(args.style.into());
            let mut sections = Vec::new();
            if let Some(ref identity) = results.identity {
                sections.push(observer.clone().with_title("Identity").render_identity(identity));
            }
            if !results.contention.is_empty() {
                sections.push(
                    observer
                        .clone()
                        .with_title("Contention")
                        .render_contention(&results.contention),
                );
            }
            if !results.outcomes.is_empty() {
                sections.push(observer.with_title("Counters").render_outcomes(&results.outcomes));
            }
            Ok(sections.join("\n\n"))
        }

        OutputFormat::Json => {
            let mut snapshot = RunSnapshot::new()
                .with_contention(&results.contention)
                .with_counters(&results.outcomes);
            if let Some(ref identity) = results.identity {
                snapshot = snapshot.with_identity(identity);
            }
            let json = JsonObserver::new()
                .pretty(args.pretty)
                .include_timestamp(args.timestamp)
                .to_json(snapshot)?;
            Ok(json)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let results = collect(args, &mut out)?;
    writeln!(out, "{}", render(args, &results)?)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        log::error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
