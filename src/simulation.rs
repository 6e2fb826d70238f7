// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Simulation Core

use tracing::{debug, info, trace};
use wasm_bindgen::prelude::*;

use crate::activation::{cycle_progress, ActivationInputs, ActivationSignals};
use crate::assistant::AssistantResponse;
use crate::error::Result;
use crate::flows::compute_flows;
use crate::history::HistoryLog;
use crate::panarchy::PanarchyState;
use crate::params::{Overrides, ParameterSet};
use crate::pressure::environmental_pressure;
use crate::types::*;

/// Ticks in a full run: one simulated year at `DT`.
pub const FULL_RUN_TICKS: usize = 730;

/// Simulated day at which an interactive scheduler should stop ticking.
pub const INTERACTIVE_HORIZON_DAYS: f64 = 365.0;

const CRISIS_LEVEL: f64 = 0.5;

// ─── ResilienceSimulation struct ────────────────────────────────────────────

/// One model instance. Owns all mutable state; calls must be serialised by
/// the caller (typically a single driving timer).
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct ResilienceSimulation {
    pub(crate) params: ParameterSet,
    pub(crate) time: f64,
    pub(crate) stocks: Stocks,
    pub(crate) signals: ActivationSignals,
    pub(crate) panarchy: PanarchyState,
    /// Pressure computed by the most recent tick (0 before the first).
    pub(crate) pressure: f64,
    pub(crate) history: HistoryLog,
}

// ─── Internal Logic (Testable, pure Rust) ───────────────────────────────────

impl ResilienceSimulation {
    /// Defaults merged with `overrides`, at time 0 with an empty history.
    pub fn with_overrides(overrides: &Overrides) -> Result<Self> {
        Self::with_params(ParameterSet::from_overrides(overrides))
    }

    pub fn with_params(params: ParameterSet) -> Result<Self> {
        params.validate()?;
        info!(panarchy = params.panarchy_enabled, cycle = params.cycle_duration, "simulation created");
        Ok(Self {
            params,
            time: 0.0,
            stocks: Stocks::INITIAL,
            signals: ActivationSignals::default(),
            panarchy: PanarchyState::INITIAL,
            pressure: 0.0,
            history: HistoryLog::new(),
        })
    }

    /// Replace the parameters with defaults + `overrides` and reset. On an
    /// invalid set the current parameters and state are left untouched.
    pub fn configure_core(&mut self, overrides: &Overrides) -> Result<()> {
        let params = ParameterSet::from_overrides(overrides);
        params.validate()?;
        info!(keys = overrides.len(), panarchy = params.panarchy_enabled, "parameters replaced");
        self.params = params;
        self.reset_state();
        Ok(())
    }

    pub(crate) fn reset_state(&mut self) {
        self.time = 0.0;
        self.stocks = Stocks::INITIAL;
        self.signals = ActivationSignals::default();
        self.panarchy = PanarchyState::INITIAL;
        self.pressure = 0.0;
        self.history.clear();
    }

    /// Advance one tick and return the sample it recorded.
    pub fn step_core(&mut self) -> Result<HistorySample> {
        let time = self.time;
        let pressure = environmental_pressure(time, &self.params);
        let progress = cycle_progress(time, &self.params)?;

        let crisis_before = self.signals.crisis_mode;
        self.signals.update(&ActivationInputs {
            pressure,
            cycle_progress: progress,
            transformation_readiness: self.stocks.transformation_readiness,
            transformation_threshold: self.params.transformation_threshold,
        });
        if (crisis_before > CRISIS_LEVEL) != (self.signals.crisis_mode > CRISIS_LEVEL) {
            debug!(time, crisis = self.signals.crisis_mode, pressure, "crisis mode crossed threshold");
        }

        if self.params.panarchy_enabled {
            if let Some(t) = self.panarchy.advance(&self.params, DT) {
                debug!(time, from = t.from.symbol(), to = t.to.symbol(), "panarchy phase transition");
            }
        }

        let flows = compute_flows(&self.stocks, &self.signals, &self.panarchy, &self.params, pressure);
        self.stocks.integrate(&flows, DT);
        self.pressure = pressure;

        let sample = HistorySample::capture(time, &self.stocks, &self.signals, &self.panarchy, pressure);
        trace!(time, pressure, performance = sample.performance_index, "tick");
        self.history.push(sample);
        self.time += DT;
        Ok(sample)
    }

    /// Run `ticks` steps in order and return the full history.
    pub fn run_core(&mut self, ticks: usize) -> Result<&HistoryLog> {
        for _ in 0..ticks {
            self.step_core()?;
        }
        Ok(&self.history)
    }

    /// Reset, then run a full simulated year.
    pub fn run_complete_core(&mut self) -> Result<&HistoryLog> {
        self.reset_state();
        self.run_core(FULL_RUN_TICKS)
    }

    /// Decode an assistant reply, configure from its changes, and return its
    /// summary for display. A reply with no changes (a clarifying question)
    /// leaves parameters, state and history as they are.
    pub fn apply_assistant_core(&mut self, text: &str) -> Result<String> {
        let response = AssistantResponse::parse(text)?;
        if response.parameter_changes.is_empty() {
            debug!("assistant reply carries no parameter changes");
            return Ok(response.summary);
        }
        self.configure_core(&response.parameter_changes)?;
        Ok(response.summary)
    }

    /// Most recent sample, or a snapshot of the initial state before any tick.
    pub fn latest_sample(&self) -> HistorySample {
        match self.history.last() {
            Some(sample) => *sample,
            None => HistorySample::capture(
                self.time,
                &self.stocks,
                &self.signals,
                &self.panarchy,
                self.pressure,
            ),
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn stocks(&self) -> &Stocks {
        &self.stocks
    }

    pub fn signals(&self) -> &ActivationSignals {
        &self.signals
    }

    pub fn panarchy(&self) -> &PanarchyState {
        &self.panarchy
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.history
    }

    /// True once an interactive run has reached its one-year horizon.
    pub fn horizon_reached(&self) -> bool {
        self.time >= INTERACTIVE_HORIZON_DAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panarchy::PanarchyPhase;
    use serde_json::json;

    fn overrides(v: serde_json::Value) -> Overrides {
        match v {
            serde_json::Value::Object(map) => map,
            _ => panic!("test: overrides must be an object"),
        }
    }

    #[test]
    fn first_tick_is_recorded_at_time_zero() {
        let mut sim = ResilienceSimulation::default();
        let sample = sim.step_core().expect("test: step");
        assert_eq!(sample.time, 0.0);
        assert_eq!(sim.time(), 0.5);
        assert_eq!(sample.environmental_pressure, 0.5);
        assert_eq!(sample.signals.observation_active, 0.15);
        assert_eq!(sim.history_log().len(), 1);
    }

    #[test]
    fn first_tick_community_intelligence() {
        // obs 0.15, validation 0.02 after the signal update
        let mut sim = ResilienceSimulation::default();
        let sample = sim.step_core().expect("test: step");
        let flow = 0.05 * 0.15 * 0.2 * (1.0 - 0.3) - 0.02 * 0.3 * (1.0 - 0.020000000000000004);
        let expected = 0.3 + flow * DT;
        assert!((sample.stocks.community_intelligence - expected).abs() < 1e-12);
    }

    #[test]
    fn configure_resets_and_starts_from_defaults() {
        let mut sim = ResilienceSimulation::default();
        sim.configure_core(&overrides(json!({"learning_rate": 0.9}))).expect("test: configure");
        sim.run_core(10).expect("test: run");

        sim.configure_core(&overrides(json!({"adaptation_rate": 0.2}))).expect("test: configure");
        assert!(sim.history_log().is_empty());
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.params().adaptation_rate, 0.2);
        assert_eq!(sim.params().learning_rate, 0.05, "merges onto defaults, not prior set");
    }

    #[test]
    fn invalid_configure_leaves_state_alone() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(4).expect("test: run");
        let err = sim.configure_core(&overrides(json!({"cycle_duration": 0})));
        assert!(err.is_err());
        assert_eq!(sim.history_log().len(), 4);
        assert_eq!(sim.params().cycle_duration, 50.0);
    }

    #[test]
    fn construction_rejects_zero_cycle() {
        assert!(ResilienceSimulation::with_overrides(&overrides(json!({"cycle_duration": 0.0}))).is_err());
    }

    #[test]
    fn latest_before_any_tick_reflects_initial_state() {
        let sim = ResilienceSimulation::default();
        let s = sim.latest_sample();
        assert_eq!(s.time, 0.0);
        assert_eq!(s.stocks, Stocks::INITIAL);
        assert_eq!(s.panarchy_phase, PanarchyPhase::Exploitation);
        assert!((s.performance_index - 0.36).abs() < 1e-12);
    }

    #[test]
    fn run_complete_covers_one_year() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(5).expect("test: run");
        let len = sim.run_complete_core().expect("test: run complete").len();
        assert_eq!(len, FULL_RUN_TICKS);
        assert!(sim.horizon_reached());
        assert_eq!(sim.time(), 365.0);
    }

    #[test]
    fn assistant_reply_configures() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(3).expect("test: run");
        let summary = sim
            .apply_assistant_core(
                r#"{"summary": "Increasing adaptation and learning rates as requested.",
                    "parameter_changes": {"adaptation_rate": 0.7, "learning_rate": 0.8, "mood": "sunny"}}"#,
            )
            .expect("test: apply");
        assert_eq!(summary, "Increasing adaptation and learning rates as requested.");
        assert_eq!(sim.params().adaptation_rate, 0.7);
        assert_eq!(sim.params().learning_rate, 0.8);
        assert!(sim.history_log().is_empty());
    }

    #[test]
    fn malformed_assistant_reply_changes_nothing() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(3).expect("test: run");
        assert!(sim.apply_assistant_core("not json").is_err());
        assert_eq!(sim.history_log().len(), 3);
    }
}
