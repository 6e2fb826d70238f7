// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Environmental Pressure

use std::f64::consts::PI;

use crate::params::ParameterSet;

const BASELINE_PRESSURE: f64 = 0.5;
const SEASONAL_AMPLITUDE: f64 = 0.2;
const YEAR_DAYS: f64 = 365.0;

/// Scripted secondary crisis, always active regardless of parameters.
pub const SECONDARY_CRISIS_WINDOW: (f64, f64) = (200.0, 220.0);
pub const SECONDARY_CRISIS_INTENSITY: f64 = 0.4;

/// Larger of the configured crisis and the scripted secondary spike at `time`.
/// Both windows are closed intervals.
pub fn crisis_spike(time: f64, params: &ParameterSet) -> f64 {
    let mut spike = 0.0;
    if time >= params.crisis_start && time <= params.crisis_start + params.crisis_duration {
        spike = params.crisis_intensity;
    }
    let (start, end) = SECONDARY_CRISIS_WINDOW;
    if time >= start && time <= end {
        spike = f64::max(spike, SECONDARY_CRISIS_INTENSITY);
    }
    spike
}

/// Environmental pressure at simulated `time` (days). Pure.
pub fn environmental_pressure(time: f64, params: &ParameterSet) -> f64 {
    let seasonal = SEASONAL_AMPLITUDE * (2.0 * PI * time / YEAR_DAYS).sin();
    BASELINE_PRESSURE + seasonal + crisis_spike(time, params) * params.vuca_factor()
}
