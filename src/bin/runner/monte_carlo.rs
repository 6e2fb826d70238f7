// Monte Carlo Sweeps: N jittered runs per scenario with statistical aggregation
// Run i uses ChaCha8Rng seeded with base_seed + i, so batches are reproducible.

use std::path::Path;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use resilience_engine::params::ParamKind;
use resilience_engine::{Overrides, ParameterSet, ResilienceSimulation, Result, PARAM_SPECS};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::report::*;
use crate::scenarios::Scenario;

/// Fraction of a slider's range a single jitter may move it.
const JITTER_FRACTION: f64 = 0.1;

fn scenario_overrides(scenario: &Scenario) -> Overrides {
    match (scenario.overrides)() {
        Value::Object(map) => map,
        _ => Overrides::new(),
    }
}

/// Start from the scenario's pinned keys and perturb every other slider
/// around its default, staying inside the documented range.
pub fn jitter_overrides(pinned: &Overrides, rng: &mut ChaCha8Rng) -> Overrides {
    let defaults = ParameterSet::default();
    let mut overrides = pinned.clone();
    for spec in PARAM_SPECS.iter() {
        if spec.kind != ParamKind::Slider || pinned.contains_key(spec.key) {
            continue;
        }
        let Some(base) = defaults.get(spec.key) else { continue };
        let delta = rng.gen_range(-JITTER_FRACTION..=JITTER_FRACTION) * (spec.max - spec.min);
        overrides.insert(spec.key.to_string(), json!((base + delta).clamp(spec.min, spec.max)));
    }
    overrides
}

/// Run one configuration to completion and summarise it.
pub fn run_single(overrides: &Overrides, ticks: usize, seed: Option<u64>) -> Result<(RunResult, ResilienceSimulation)> {
    let start = Instant::now();
    let mut sim = ResilienceSimulation::with_overrides(overrides)?;
    sim.run_core(ticks)?;

    let history = sim.history_log();
    let last = sim.latest_sample();
    let result = RunResult {
        seed,
        ticks,
        final_performance_index: last.performance_index,
        final_community_resilience: last.stocks.community_resilience,
        final_adaptive_capacity: last.adaptive_capacity,
        peak_collapse_risk: history.iter().map(|s| s.collapse_risk).fold(0.0, f64::max),
        crisis_ticks: history.iter().filter(|s| s.signals.crisis_mode > 0.5).count(),
        final_phase: last.panarchy_phase.symbol(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    Ok((result, sim))
}

pub fn run_monte_carlo(
    scenario: &Scenario,
    runs: usize,
    base_seed: u64,
    time_series_dir: Option<&Path>,
) -> Result<MonteCarloReport> {
    let pinned = scenario_overrides(scenario);

    let (baseline, baseline_sim) = run_single(&pinned, scenario.ticks, None)?;
    if let Some(dir) = time_series_dir {
        let path = dir.join(format!("{}.jsonl", scenario.name.to_lowercase()));
        baseline_sim.history_log().write_jsonl(&path)?;
        info!(scenario = scenario.name, path = %path.display(), "time series written");
    }

    let mut individual_runs = Vec::with_capacity(runs);
    for i in 0..runs {
        let seed = base_seed + i as u64;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let overrides = jitter_overrides(&pinned, &mut rng);
        let (result, _) = run_single(&overrides, scenario.ticks, Some(seed))?;
        debug!(scenario = scenario.name, seed, performance = result.final_performance_index, "run complete");
        individual_runs.push(result);
    }

    let collect = |f: fn(&RunResult) -> f64| -> Stats {
        let samples: Vec<f64> = individual_runs.iter().map(f).collect();
        Stats::from_samples(&samples)
    };

    Ok(MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: runs,
        final_performance_index: collect(|r| r.final_performance_index),
        final_community_resilience: collect(|r| r.final_community_resilience),
        peak_collapse_risk: collect(|r| r.peak_collapse_risk),
        crisis_ticks: collect(|r| r.crisis_ticks as f64),
        elapsed_ms: collect(|r| r.elapsed_ms),
        baseline,
        individual_runs,
    })
}
