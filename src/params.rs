// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Parameter Set

//! Resolved simulation parameters.
//!
//! A [`ParameterSet`] is always built by merging an override map onto the
//! compile-time defaults. Nothing here range-checks values: the documented
//! ranges in [`PARAM_SPECS`] describe the dashboard sliders and bound the
//! Monte Carlo sweeps, but the equations accept whatever they are given.
//! The single exception is `cycle_duration`, see [`ParameterSet::validate`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Override map: parameter key to JSON value. Same shape as the assistant's
/// `parameter_changes` object and as a plain JS object passed from the UI.
pub type Overrides = serde_json::Map<String, Value>;

// ─── ParameterSet ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    // Core behavioural rates
    pub learning_rate: f64,
    pub adaptation_rate: f64,
    /// Configurable but not read by any flow equation.
    pub feedback_strength: f64,
    pub transformation_threshold: f64,

    // Environmental / VUCA drivers
    pub crisis_intensity: f64,
    pub volatility_level: f64,
    pub uncertainty_level: f64,
    pub complexity_level: f64,
    pub ambiguity_level: f64,

    // Structural baselines
    pub social_connectivity_baseline: f64,
    pub digital_inclusion_baseline: f64,
    pub resource_availability_baseline: f64,
    pub technological_access_baseline: f64,

    // Timing (days)
    pub cycle_duration: f64,
    pub crisis_start: f64,
    pub crisis_duration: f64,

    pub panarchy_enabled: bool,
    pub phase_r_length: f64,
    pub phase_k_length: f64,
    pub phase_omega_length: f64,
    pub phase_alpha_length: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            adaptation_rate: 0.1,
            feedback_strength: 0.3,
            transformation_threshold: 0.7,
            crisis_intensity: 0.5,
            volatility_level: 0.3,
            uncertainty_level: 0.4,
            complexity_level: 0.5,
            ambiguity_level: 0.4,
            social_connectivity_baseline: 0.5,
            digital_inclusion_baseline: 0.4,
            resource_availability_baseline: 0.6,
            technological_access_baseline: 0.5,
            cycle_duration: 50.0,
            crisis_start: 50.0,
            crisis_duration: 20.0,
            panarchy_enabled: true,
            phase_r_length: 90.0,
            phase_k_length: 60.0,
            phase_omega_length: 30.0,
            phase_alpha_length: 50.0,
        }
    }
}

/// Every field key, in declaration order.
pub const PARAM_KEYS: [&str; 21] = [
    "learning_rate",
    "adaptation_rate",
    "feedback_strength",
    "transformation_threshold",
    "crisis_intensity",
    "volatility_level",
    "uncertainty_level",
    "complexity_level",
    "ambiguity_level",
    "social_connectivity_baseline",
    "digital_inclusion_baseline",
    "resource_availability_baseline",
    "technological_access_baseline",
    "cycle_duration",
    "crisis_start",
    "crisis_duration",
    "panarchy_enabled",
    "phase_r_length",
    "phase_k_length",
    "phase_omega_length",
    "phase_alpha_length",
];

impl ParameterSet {
    /// Defaults with `overrides` applied key by key. Unknown keys are ignored,
    /// missing keys keep their default. Always starts from the default table,
    /// never from a previously configured set.
    pub fn from_overrides(overrides: &Overrides) -> Self {
        let mut params = Self::default();
        for (key, value) in overrides {
            params.apply(key, value);
        }
        params
    }

    /// Apply one override entry in place. Returns false if the key is unknown
    /// or the value could not be coerced to the field's type.
    pub fn apply(&mut self, key: &str, value: &Value) -> bool {
        let mut fields = self.to_fields();
        let Some(slot) = fields.get_mut(key) else {
            debug!(key, "ignoring unknown parameter");
            return false;
        };
        let coerced = match slot {
            Value::Bool(_) => coerce_flag(value).map(Value::Bool),
            _ => coerce_number(value)
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
        };
        let Some(coerced) = coerced else {
            warn!(key, %value, "parameter value has the wrong type or is not finite, keeping default");
            return false;
        };
        *slot = coerced;
        match serde_json::from_value(Value::Object(fields)) {
            Ok(params) => {
                *self = params;
                true
            }
            Err(e) => {
                warn!(key, error = %e, "parameter could not be applied");
                false
            }
        }
    }

    /// Read any field by key; booleans read as 0.0 / 1.0.
    pub fn get(&self, key: &str) -> Option<f64> {
        match self.to_fields().get(key)? {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            v => v.as_f64(),
        }
    }

    /// The set as a key -> value map; the serde field names are the keys.
    fn to_fields(&self) -> Overrides {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Overrides::new(),
        }
    }

    /// Mean of the four VUCA drivers; scales how hard a crisis bites.
    pub fn vuca_factor(&self) -> f64 {
        (self.volatility_level + self.uncertainty_level + self.complexity_level + self.ambiguity_level)
            / 4.0
    }

    /// Reject only what would make the cycle position undefined. Everything
    /// else, including out-of-range rates, is passed through to the model.
    pub fn validate(&self) -> Result<()> {
        if self.cycle_duration == 0.0 || !self.cycle_duration.is_finite() {
            return Err(Error::InvalidParameter {
                name: "cycle_duration",
                value: self.cycle_duration,
                reason: "cycle progress is undefined for a zero or non-finite cycle length",
            });
        }
        Ok(())
    }
}

/// Non-finite results ("NaN", "inf") are rejected like any other bad value.
fn coerce_number(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    v.filter(|v: &f64| v.is_finite())
}

fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ─── Parameter Specs (dashboard sliders) ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Slider,
    Toggle,
}

/// Documented range of a casually configurable parameter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub kind: ParamKind,
}

const fn slider(key: &'static str, label: &'static str, min: f64, max: f64, step: f64) -> ParamSpec {
    ParamSpec { key, label, min, max, step, kind: ParamKind::Slider }
}

/// Phase lengths are intentionally absent: they are part of the set but not
/// offered for casual configuration.
pub const PARAM_SPECS: [ParamSpec; 17] = [
    slider("learning_rate", "Learning Rate", 0.0, 1.0, 0.01),
    slider("adaptation_rate", "Adaptation Rate", 0.0, 1.0, 0.01),
    slider("feedback_strength", "Feedback Strength", 0.0, 1.0, 0.01),
    slider("transformation_threshold", "Transformation Threshold", 0.0, 1.0, 0.01),
    slider("crisis_intensity", "Crisis Intensity", 0.0, 1.0, 0.01),
    slider("volatility_level", "Volatility Level", 0.0, 1.0, 0.01),
    slider("uncertainty_level", "Uncertainty Level", 0.0, 1.0, 0.01),
    slider("complexity_level", "Complexity Level", 0.0, 1.0, 0.01),
    slider("ambiguity_level", "Ambiguity Level", 0.0, 1.0, 0.01),
    slider("social_connectivity_baseline", "Social Connectivity", 0.0, 1.0, 0.01),
    slider("digital_inclusion_baseline", "Digital Inclusion", 0.0, 1.0, 0.01),
    slider("resource_availability_baseline", "Resource Availability", 0.0, 1.0, 0.01),
    slider("technological_access_baseline", "Technological Access", 0.0, 1.0, 0.01),
    slider("cycle_duration", "Cycle Duration (days)", 1.0, 100.0, 1.0),
    slider("crisis_start", "Crisis Start Time (days)", 1.0, 200.0, 1.0),
    slider("crisis_duration", "Crisis Duration (days)", 1.0, 50.0, 1.0),
    ParamSpec {
        key: "panarchy_enabled",
        label: "Panarchy Enabled",
        min: 0.0,
        max: 1.0,
        step: 1.0,
        kind: ParamKind::Toggle,
    },
];

pub fn param_spec(key: &str) -> Option<&'static ParamSpec> {
    PARAM_SPECS.iter().find(|s| s.key == key)
}
