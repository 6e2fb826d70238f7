// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};

use crate::activation::ActivationSignals;
use crate::panarchy::{PanarchyPhase, PanarchyState};

/// Simulated days advanced per tick.
pub const DT: f64 = 0.5;

// ─── Stocks ─────────────────────────────────────────────────────────────────

pub const STOCK_COUNT: usize = 8;

pub const STOCK_NAMES: [&str; STOCK_COUNT] = [
    "community_intelligence",
    "shared_understanding",
    "system_adaptability",
    "resource_mobilization",
    "knowledge_accumulation",
    "community_resilience",
    "innovation_capacity",
    "transformation_readiness",
];

/// The eight bounded state variables. Every value stays in [0, 1] after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stocks {
    pub community_intelligence: f64,
    pub shared_understanding: f64,
    pub system_adaptability: f64,
    pub resource_mobilization: f64,
    pub knowledge_accumulation: f64,
    pub community_resilience: f64,
    pub innovation_capacity: f64,
    pub transformation_readiness: f64,
}

/// Per-stock derivatives share the stock layout.
pub type Flows = Stocks;

impl Stocks {
    /// Fixed starting point, independent of parameters.
    pub const INITIAL: Stocks = Stocks {
        community_intelligence: 0.3,
        shared_understanding: 0.2,
        system_adaptability: 0.4,
        resource_mobilization: 0.5,
        knowledge_accumulation: 0.1,
        community_resilience: 0.3,
        innovation_capacity: 0.2,
        transformation_readiness: 0.1,
    };

    /// Values in [`STOCK_NAMES`] order.
    pub fn to_array(&self) -> [f64; STOCK_COUNT] {
        [
            self.community_intelligence,
            self.shared_understanding,
            self.system_adaptability,
            self.resource_mobilization,
            self.knowledge_accumulation,
            self.community_resilience,
            self.innovation_capacity,
            self.transformation_readiness,
        ]
    }

    pub fn values_mut(&mut self) -> [&mut f64; STOCK_COUNT] {
        [
            &mut self.community_intelligence,
            &mut self.shared_understanding,
            &mut self.system_adaptability,
            &mut self.resource_mobilization,
            &mut self.knowledge_accumulation,
            &mut self.community_resilience,
            &mut self.innovation_capacity,
            &mut self.transformation_readiness,
        ]
    }

    /// Forward Euler step with each result clamped to [0, 1].
    pub fn integrate(&mut self, flows: &Flows, dt: f64) {
        for (stock, flow) in self.values_mut().into_iter().zip(flows.to_array()) {
            *stock = clamp01(*stock + flow * dt);
        }
    }
}

impl Default for Stocks {
    fn default() -> Self {
        Self::INITIAL
    }
}

pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

// ─── Derived Metrics ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub performance_index: f64,
    pub adaptive_capacity: f64,
    pub collapse_risk: f64,
}

impl DerivedMetrics {
    pub fn compute(stocks: &Stocks, panarchy: &PanarchyState) -> Self {
        Self {
            performance_index: 0.3 * stocks.community_resilience
                + 0.3 * stocks.community_intelligence
                + 0.2 * stocks.system_adaptability
                + 0.2 * stocks.resource_mobilization,
            adaptive_capacity: stocks.system_adaptability
                * stocks.innovation_capacity
                * stocks.transformation_readiness,
            collapse_risk: (1.0 - panarchy.resilience) * panarchy.connectedness,
        }
    }
}

// ─── HistorySample ──────────────────────────────────────────────────────────

/// Snapshot recorded once per tick. Serialises flat, one key per series, so
/// the dashboard can chart any field by name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub time: f64,
    #[serde(flatten)]
    pub stocks: Stocks,
    #[serde(flatten)]
    pub signals: ActivationSignals,
    pub environmental_pressure: f64,
    pub performance_index: f64,
    pub adaptive_capacity: f64,
    pub panarchy_potential: f64,
    pub panarchy_connectedness: f64,
    pub panarchy_resilience: f64,
    pub panarchy_phase: PanarchyPhase,
    pub collapse_risk: f64,
}

impl HistorySample {
    pub fn capture(
        time: f64,
        stocks: &Stocks,
        signals: &ActivationSignals,
        panarchy: &PanarchyState,
        environmental_pressure: f64,
    ) -> Self {
        let metrics = DerivedMetrics::compute(stocks, panarchy);
        Self {
            time,
            stocks: *stocks,
            signals: *signals,
            environmental_pressure,
            performance_index: metrics.performance_index,
            adaptive_capacity: metrics.adaptive_capacity,
            panarchy_potential: panarchy.potential,
            panarchy_connectedness: panarchy.connectedness,
            panarchy_resilience: panarchy.resilience,
            panarchy_phase: panarchy.phase,
            collapse_risk: metrics.collapse_risk,
        }
    }
}
