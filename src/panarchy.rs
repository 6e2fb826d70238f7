// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Panarchy Adaptive Cycle

//! Four-phase adaptive cycle: r → K → Ω → α → r, forever.
//!
//! Each phase runs its update rule once per tick until `phase_time` reaches
//! the configured length, then a tick is spent on the transition alone: the
//! phase advances, `phase_time` resets to 0, and the new phase's rule waits
//! for the next tick.

use serde::{Deserialize, Serialize};

use crate::params::ParameterSet;
use crate::types::clamp01;

// ─── Phase ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanarchyPhase {
    #[serde(rename = "r")]
    Exploitation,
    #[serde(rename = "K")]
    Conservation,
    #[serde(rename = "Ω")]
    Release,
    #[serde(rename = "α")]
    Reorganization,
}

impl PanarchyPhase {
    pub const ALL: [PanarchyPhase; 4] = [
        Self::Exploitation,
        Self::Conservation,
        Self::Release,
        Self::Reorganization,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Exploitation => "r",
            Self::Conservation => "K",
            Self::Release => "Ω",
            Self::Reorganization => "α",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exploitation => "Exploitation",
            Self::Conservation => "Conservation",
            Self::Release => "Release",
            Self::Reorganization => "Reorganization",
        }
    }

    pub fn next(&self) -> Self {
        self.rule().next
    }

    /// Configured duration of this phase in days.
    pub fn length(&self, params: &ParameterSet) -> f64 {
        (self.rule().length)(params)
    }

    fn rule(&self) -> &'static PhaseRule {
        &PHASE_TABLE[*self as usize]
    }
}

// ─── Phase Table ────────────────────────────────────────────────────────────

struct PhaseRule {
    length: fn(&ParameterSet) -> f64,
    update: fn(&mut PanarchyState),
    next: PanarchyPhase,
}

// Indexed by discriminant; order must match the enum.
static PHASE_TABLE: [PhaseRule; 4] = [
    PhaseRule {
        length: r_length,
        update: exploit,
        next: PanarchyPhase::Conservation,
    },
    PhaseRule {
        length: k_length,
        update: conserve,
        next: PanarchyPhase::Release,
    },
    PhaseRule {
        length: omega_length,
        update: release,
        next: PanarchyPhase::Reorganization,
    },
    PhaseRule {
        length: alpha_length,
        update: reorganize,
        next: PanarchyPhase::Exploitation,
    },
];

fn r_length(p: &ParameterSet) -> f64 {
    p.phase_r_length
}

fn k_length(p: &ParameterSet) -> f64 {
    p.phase_k_length
}

fn omega_length(p: &ParameterSet) -> f64 {
    p.phase_omega_length
}

fn alpha_length(p: &ParameterSet) -> f64 {
    p.phase_alpha_length
}

fn exploit(s: &mut PanarchyState) {
    s.potential += 0.01 * (1.0 - s.potential);
    s.connectedness += 0.008 * (1.0 - s.connectedness);
    s.resilience -= 0.003;
}

fn conserve(s: &mut PanarchyState) {
    s.potential = f64::min(0.9, s.potential + 0.001);
    s.connectedness = f64::min(0.95, s.connectedness + 0.002);
    s.resilience -= 0.01;
}

fn release(s: &mut PanarchyState) {
    s.potential *= 0.97;
    s.connectedness *= 0.95;
    s.resilience = f64::max(0.1, s.resilience - 0.005);
}

fn reorganize(s: &mut PanarchyState) {
    s.potential += 0.008 * (0.6 - s.potential);
    s.connectedness += 0.005 * (0.4 - s.connectedness);
    s.resilience += 0.015 * (0.8 - s.resilience);
}

// ─── State ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanarchyState {
    pub potential: f64,
    pub connectedness: f64,
    pub resilience: f64,
    pub phase: PanarchyPhase,
    /// Days spent in the current phase; 0 right after a transition.
    pub phase_time: f64,
}

/// Emitted when a tick moves the cycle into a new phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: PanarchyPhase,
    pub to: PanarchyPhase,
}

impl PanarchyState {
    pub const INITIAL: PanarchyState = PanarchyState {
        potential: 0.5,
        connectedness: 0.3,
        resilience: 0.7,
        phase: PanarchyPhase::Exploitation,
        phase_time: 0.0,
    };

    /// Advance one tick. Callers skip this entirely when panarchy is disabled.
    pub fn advance(&mut self, params: &ParameterSet, dt: f64) -> Option<PhaseTransition> {
        let rule = self.phase.rule();
        let transition = if self.phase_time < (rule.length)(params) {
            (rule.update)(self);
            self.phase_time += dt;
            None
        } else {
            let from = self.phase;
            self.phase = rule.next;
            self.phase_time = 0.0;
            Some(PhaseTransition { from, to: self.phase })
        };

        self.potential = clamp01(self.potential);
        self.connectedness = clamp01(self.connectedness);
        self.resilience = clamp01(self.resilience);
        transition
    }
}

impl Default for PanarchyState {
    fn default() -> Self {
        Self::INITIAL
    }
}
