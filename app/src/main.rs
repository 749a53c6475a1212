use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use planner::{SearchMode, StopSignal};
use settings::Settings;

mod pddl;
mod report;
mod settings;

/// Domain specific planner for blocks world problems
#[derive(Debug, Parser)]
#[command(name = "bwplanner", version)]
struct Args {
    /// Find a valid plan fast. Combined with -o, keep searching for a shorter one.
    #[arg(short = 'n', long)]
    fast: bool,

    /// Find a shortest plan
    #[arg(short = 'o', long)]
    optimal: bool,

    /// Stop searching after this many seconds
    #[arg(short = 't', long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Configuration file, defaults to config.toml in the working directory
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// PDDL problem file
    problem: PathBuf,
}

#[tokio::main(flavor = "multi_thread")]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::new(args.config.as_deref()).context("Error reading configuration")?;
    settings.monitoring.init().context("Error initializing monitoring")?;

    let mut config = settings.planner.clone();
    if let Some(mode) = SearchMode::from_flags(args.fast, args.optimal) {
        config.mode = mode;
    }

    let problem = pddl::load(&args.problem)?;
    report::log_problem(&problem);

    let stop = StopSignal::new();
    let planner = config.new_planner(stop.clone());
    let blocks = problem.blocks().clone();

    tracing::info!(mode = %config.mode, fast_strategy = %config.fast_strategy, "Starting search");

    let mut search = tokio::task::spawn_blocking(move || {
        let mut reporter = report::TracingReporter::new(problem.blocks().clone());
        planner.run(&problem, &mut reporter)
    });

    let outcome = tokio::select!(
        result = &mut search => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping search");
            stop.request_stop();
            search.await?
        },
        _ = expired(args.timeout.map(Duration::from_secs)) => {
            tracing::info!("Timeout of {:?}s reached, stopping search", args.timeout);
            stop.request_stop();
            search.await?
        },
    )?;

    report::log_outcome(&outcome);

    let Some(solution) = outcome.solution() else {
        anyhow::bail!("No plan found");
    };

    for action in &solution.plan {
        println!("{}", action.labeled(&blocks));
    }

    Ok(())
}

async fn expired(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending().await,
    }
}
