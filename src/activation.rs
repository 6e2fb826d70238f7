// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Stage Activation Signals

//! Seven first-order low-pass filters gating which flows are active.
//!
//! Each signal is described by one [`SmoothingRule`]: a gate deciding whether
//! it is "on" this tick, and the (target, rate) pair used when on and when
//! off. Rules are evaluated in table order, so the observation gate sees the
//! crisis signal as already updated for this tick.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::ParameterSet;

const RISE_RATE: f64 = 0.15;
const DECAY_RATE: f64 = 0.1;
const CRISIS_PRESSURE: f64 = 0.7;
const CRISIS_OBSERVATION_LEVEL: f64 = 0.5;

// ─── Signals ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    ObservationActive,
    TheoryBuildingActive,
    SystemDevelopmentActive,
    CommunityActionActive,
    ValidationActive,
    CrisisMode,
    TransformationMode,
}

/// Activation levels. Not hard-clamped; smoothing keeps them between their
/// targets, which all lie in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivationSignals {
    pub observation_active: f64,
    pub theory_building_active: f64,
    pub system_development_active: f64,
    pub community_action_active: f64,
    pub validation_active: f64,
    pub crisis_mode: f64,
    pub transformation_mode: f64,
}

/// Per-tick inputs, all taken before stocks are integrated.
#[derive(Debug, Clone, Copy)]
pub struct ActivationInputs {
    pub pressure: f64,
    pub cycle_progress: f64,
    pub transformation_readiness: f64,
    pub transformation_threshold: f64,
}

// ─── Rule Table ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Drive {
    target: f64,
    rate: f64,
}

#[derive(Debug, Clone, Copy)]
enum Gate {
    HighPressure,
    /// Open strictly inside (above, below) of cycle progress.
    Window { above: f64, below: f64 },
    /// Observation also opens whenever the crisis signal is high.
    WindowOrCrisis { below: f64 },
    ReadinessAboveThreshold,
}

#[derive(Debug, Clone, Copy)]
struct SmoothingRule {
    signal: Signal,
    gate: Gate,
    on: Drive,
    off: Drive,
}

const fn cycle_rule(signal: Signal, gate: Gate, rest: f64) -> SmoothingRule {
    SmoothingRule {
        signal,
        gate,
        on: Drive { target: 1.0, rate: RISE_RATE },
        off: Drive { target: rest, rate: DECAY_RATE },
    }
}

const RULES: [SmoothingRule; 7] = [
    SmoothingRule {
        signal: Signal::CrisisMode,
        gate: Gate::HighPressure,
        on: Drive { target: 1.0, rate: 0.2 },
        off: Drive { target: 0.0, rate: 0.1 },
    },
    cycle_rule(Signal::ObservationActive, Gate::WindowOrCrisis { below: 0.2 }, 0.3),
    cycle_rule(Signal::TheoryBuildingActive, Gate::Window { above: 0.15, below: 0.35 }, 0.2),
    cycle_rule(Signal::SystemDevelopmentActive, Gate::Window { above: 0.3, below: 0.5 }, 0.2),
    cycle_rule(Signal::CommunityActionActive, Gate::Window { above: 0.45, below: 0.75 }, 0.3),
    cycle_rule(Signal::ValidationActive, Gate::Window { above: 0.7, below: f64::INFINITY }, 0.2),
    SmoothingRule {
        signal: Signal::TransformationMode,
        gate: Gate::ReadinessAboveThreshold,
        on: Drive { target: 1.0, rate: 0.1 },
        off: Drive { target: 0.0, rate: 0.05 },
    },
];

/// `value + rate * (target - value)`
pub fn smooth(value: f64, target: f64, rate: f64) -> f64 {
    value + rate * (target - value)
}

/// Position within the operational cycle, in [0, 1) for non-negative time.
pub fn cycle_progress(time: f64, params: &ParameterSet) -> Result<f64> {
    params.validate()?;
    Ok((time % params.cycle_duration) / params.cycle_duration)
}

impl ActivationSignals {
    pub fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::ObservationActive => self.observation_active,
            Signal::TheoryBuildingActive => self.theory_building_active,
            Signal::SystemDevelopmentActive => self.system_development_active,
            Signal::CommunityActionActive => self.community_action_active,
            Signal::ValidationActive => self.validation_active,
            Signal::CrisisMode => self.crisis_mode,
            Signal::TransformationMode => self.transformation_mode,
        }
    }

    fn slot_mut(&mut self, signal: Signal) -> &mut f64 {
        match signal {
            Signal::ObservationActive => &mut self.observation_active,
            Signal::TheoryBuildingActive => &mut self.theory_building_active,
            Signal::SystemDevelopmentActive => &mut self.system_development_active,
            Signal::CommunityActionActive => &mut self.community_action_active,
            Signal::ValidationActive => &mut self.validation_active,
            Signal::CrisisMode => &mut self.crisis_mode,
            Signal::TransformationMode => &mut self.transformation_mode,
        }
    }

    fn is_open(&self, gate: Gate, inputs: &ActivationInputs) -> bool {
        match gate {
            Gate::HighPressure => inputs.pressure > CRISIS_PRESSURE,
            Gate::Window { above, below } => {
                inputs.cycle_progress > above && inputs.cycle_progress < below
            }
            Gate::WindowOrCrisis { below } => {
                inputs.cycle_progress < below || self.crisis_mode > CRISIS_OBSERVATION_LEVEL
            }
            Gate::ReadinessAboveThreshold => {
                inputs.transformation_readiness > inputs.transformation_threshold
            }
        }
    }

    /// Run every rule once, in table order.
    pub fn update(&mut self, inputs: &ActivationInputs) {
        for rule in RULES.iter() {
            let drive = if self.is_open(rule.gate, inputs) { rule.on } else { rule.off };
            let slot = self.slot_mut(rule.signal);
            *slot = smooth(*slot, drive.target, drive.rate);
        }
    }
}
