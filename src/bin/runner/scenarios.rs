// Scenario Definitions: named parameter overrides run against the engine
// Keys listed in a scenario are pinned; Monte Carlo runs jitter the rest.

use serde_json::{json, Value};

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub ticks: usize,
    pub overrides: fn() -> Value,
}

fn baseline() -> Value {
    json!({})
}

fn no_panarchy() -> Value {
    json!({ "panarchy_enabled": false })
}

fn severe_crisis() -> Value {
    json!({
        "crisis_intensity": 1.0,
        "crisis_duration": 50,
        "volatility_level": 0.9,
        "uncertainty_level": 0.9,
        "complexity_level": 0.9,
        "ambiguity_level": 0.9,
    })
}

// Configured crisis overlaps the fixed day 200-220 spike.
fn late_crisis() -> Value {
    json!({ "crisis_start": 190, "crisis_duration": 25, "crisis_intensity": 0.8 })
}

fn fast_cycle() -> Value {
    json!({ "cycle_duration": 10 })
}

fn low_connectivity() -> Value {
    json!({
        "social_connectivity_baseline": 0.1,
        "digital_inclusion_baseline": 0.1,
        "technological_access_baseline": 0.1,
    })
}

fn transformation_ready() -> Value {
    json!({
        "transformation_threshold": 0.05,
        "learning_rate": 0.6,
        "adaptation_rate": 0.6,
    })
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "BASELINE",
            label: "Default parameters",
            category: "reference",
            ticks: resilience_engine::FULL_RUN_TICKS,
            overrides: baseline,
        },
        Scenario {
            name: "NO_PANARCHY",
            label: "Adaptive cycle disabled",
            category: "reference",
            ticks: resilience_engine::FULL_RUN_TICKS,
            overrides: no_panarchy,
        },
        Scenario {
            name: "SEVERE_CRISIS",
            label: "Long crisis, high VUCA",
            category: "stress",
            ticks: resilience_engine::FULL_RUN_TICKS,
            overrides: severe_crisis,
        },
        Scenario {
            name: "LATE_CRISIS",
            label: "Crisis overlapping day 200 spike",
            category: "stress",
            ticks: resilience_engine::FULL_RUN_TICKS,
            overrides: late_crisis,
        },
        Scenario {
            name: "FAST_CYCLE",
            label: "10-day operational cycle",
            category: "structure",
            ticks: resilience_engine::FULL_RUN_TICKS,
            overrides: fast_cycle,
        },
        Scenario {
            name: "LOW_CONNECTIVITY",
            label: "Weak structural baselines",
            category: "structure",
            ticks: resilience_engine::FULL_RUN_TICKS,
            overrides: low_connectivity,
        },
        Scenario {
            name: "TRANSFORMATION_READY",
            label: "Low transformation threshold",
            category: "structure",
            // Two years, long enough for a full adaptive cycle.
            ticks: 2 * resilience_engine::FULL_RUN_TICKS,
            overrides: transformation_ready,
        },
    ]
}
