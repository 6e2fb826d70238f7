// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite

pub mod activation;
pub mod assistant;
pub mod error;
pub mod flows;
pub mod history;
pub mod panarchy;
pub mod params;
pub mod pressure;
pub mod simulation;
pub mod types;

pub use activation::{ActivationSignals, Signal};
pub use assistant::AssistantResponse;
pub use error::{Error, Result};
pub use history::HistoryLog;
pub use panarchy::{PanarchyPhase, PanarchyState};
pub use params::{Overrides, ParamSpec, ParameterSet, PARAM_SPECS};
pub use simulation::{ResilienceSimulation, FULL_RUN_TICKS, INTERACTIVE_HORIZON_DAYS};
pub use types::*;

use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    // Plain objects rather than JS Maps so the dashboard can index by key.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "value could not be converted for JS, returning null");
        JsValue::NULL
    })
}

fn overrides_from_js(value: JsValue) -> std::result::Result<Overrides, JsValue> {
    let overrides: Option<Overrides> = serde_wasm_bindgen::from_value(value)?;
    Ok(overrides.unwrap_or_default())
}

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ResilienceSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(overrides: JsValue) -> std::result::Result<ResilienceSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let overrides = overrides_from_js(overrides)?;
        ResilienceSimulation::with_overrides(&overrides).map_err(js_error)
    }

    /// Merge `overrides` onto the defaults and reset. Discards history.
    pub fn configure(&mut self, overrides: JsValue) -> std::result::Result<(), JsValue> {
        let overrides = overrides_from_js(overrides)?;
        self.configure_core(&overrides).map_err(js_error)
    }

    /// Return to the initial state, keeping the current parameters.
    pub fn reset(&mut self) {
        self.reset_state();
        tracing::info!("simulation reset");
    }

    pub fn step(&mut self) -> std::result::Result<(), JsValue> {
        self.step_core().map(|_| ()).map_err(js_error)
    }

    /// Run `ticks` steps; returns the full history, not just the new samples.
    pub fn run(&mut self, ticks: u32) -> std::result::Result<JsValue, JsValue> {
        let history = self.run_core(ticks as usize).map_err(js_error)?;
        Ok(to_js(history.as_slice()))
    }

    /// Reset and run a full simulated year.
    pub fn run_complete(&mut self) -> std::result::Result<JsValue, JsValue> {
        let history = self.run_complete_core().map_err(js_error)?;
        Ok(to_js(history.as_slice()))
    }

    /// Apply an assistant reply (`{summary, parameter_changes}` JSON text).
    /// Returns the summary to show the user.
    pub fn apply_assistant_response(&mut self, text: &str) -> std::result::Result<String, JsValue> {
        self.apply_assistant_core(text).map_err(js_error)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[wasm_bindgen(js_name = history)]
    pub fn get_history(&self) -> JsValue {
        to_js(self.history.as_slice())
    }

    #[wasm_bindgen(js_name = latest)]
    pub fn get_latest(&self) -> JsValue {
        to_js(&self.latest_sample())
    }

    #[wasm_bindgen(js_name = params)]
    pub fn get_params(&self) -> JsValue {
        to_js(&self.params)
    }

    #[wasm_bindgen(js_name = paramSpecs)]
    pub fn get_param_specs(&self) -> JsValue {
        to_js(&PARAM_SPECS[..])
    }

    pub fn is_horizon_reached(&self) -> bool {
        self.horizon_reached()
    }
}
