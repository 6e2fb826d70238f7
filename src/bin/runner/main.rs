// Scenario Runner: batch simulations with seeded Monte Carlo parameter sweeps
//
// Usage:
//   cargo run --release --bin runner                      # All scenarios, 30 jittered runs each
//   cargo run --release --bin runner -- --runs 5          # Quick mode
//   cargo run --release --bin runner -- CRISIS            # Filter by name/label/category
//   cargo run --release --bin runner -- --ticks 200       # Override run length
//   cargo run --release --bin runner -- --time-series     # Baseline JSONL per scenario
//   cargo run --release --bin runner -- --seed 42         # Custom base seed
//
// Logging follows RUST_LOG (default: info).

mod monte_carlo;
mod report;
mod scenarios;

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use report::*;
use scenarios::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    ticks: Option<usize>,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        ticks: None,
        time_series: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    cli.runs = v.parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    cli.seed = v.parse().unwrap_or(0);
                }
            }
            "--ticks" => {
                i += 1;
                cli.ticks = args.get(i).and_then(|v| v.parse().ok());
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            other => {
                warn!(argument = other, "unknown argument ignored");
            }
        }
        i += 1;
    }

    cli
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    init_logging();
    if let Err(e) = run() {
        error!(error = %e, "runner failed");
        std::process::exit(1);
    }
}

fn run() -> resilience_engine::Result<()> {
    let cli = parse_args();
    let mut all_scenarios = scenarios();
    if let Some(ticks) = cli.ticks {
        for s in &mut all_scenarios {
            s.ticks = ticks;
        }
    }

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&f_lower)
                        || s.label.to_lowercase().contains(&f_lower)
                        || s.category.to_lowercase().contains(&f_lower)
                })
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        error!(filter = ?cli.filter, "no scenarios match filter");
        std::process::exit(1);
    }

    let ts_dir: Option<PathBuf> = cli
        .time_series
        .then(|| Path::new("runner-results/time-series").to_path_buf());

    info!(runs = cli.runs, seed = cli.seed, scenarios = to_run.len(), prng = "ChaCha8Rng", "starting batch");
    println!(
        "\n  {:<34} {:>7} {:>14} {:>14} {:>10} {:>7} {:>6}",
        "Scenario", "Ticks", "Perf (±CI)", "Resil (±CI)", "PeakRisk", "Crisis", "Phase"
    );
    println!("  {}", "-".repeat(100));

    let suite_start = Instant::now();
    let mut reports = Vec::with_capacity(to_run.len());
    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ts_dir.as_deref())?;
        println!(
            "  {:<34} {:>7} {:>7.3}±{:<6.3} {:>7.3}±{:<6.3} {:>10.3} {:>7.0} {:>6}",
            report.label,
            scenario.ticks,
            report.final_performance_index.mean,
            report.final_performance_index.half_width(),
            report.final_community_resilience.mean,
            report.final_community_resilience.half_width(),
            report.peak_collapse_risk.mean,
            report.crisis_ticks.mean,
            report.baseline.final_phase,
        );
        reports.push(report);
    }
    println!("  {}", "-".repeat(100));
    println!(
        "  {} scenario(s) in {:.2}s\n",
        reports.len(),
        suite_start.elapsed().as_secs_f64()
    );

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let report = RunnerReport {
        timestamp: ts.to_string(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        base_seed: cli.seed,
        scenarios: reports,
    };

    let dir = Path::new("runner-results");
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("runner-{}.json", ts));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %path.display(), "results saved");
    Ok(())
}
