// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Flow Equations

use crate::activation::ActivationSignals;
use crate::panarchy::PanarchyState;
use crate::params::ParameterSet;
use crate::types::{Flows, Stocks};

/// Panarchy contribution to community resilience growth; zero when the
/// adaptive cycle is disabled even though its last state is still reported.
pub fn panarchy_influence(panarchy: &PanarchyState, params: &ParameterSet) -> f64 {
    if params.panarchy_enabled {
        panarchy.resilience * 0.2
    } else {
        0.0
    }
}

/// Instantaneous derivative of every stock. Pure; `feedback_strength` is not
/// read by any term.
pub fn compute_flows(
    s: &Stocks,
    d: &ActivationSignals,
    panarchy: &PanarchyState,
    p: &ParameterSet,
    pressure: f64,
) -> Flows {
    let influence = panarchy_influence(panarchy, p);

    Flows {
        community_intelligence: p.learning_rate
            * d.observation_active
            * s.shared_understanding
            * (1.0 - s.community_intelligence)
            - 0.02 * s.community_intelligence * (1.0 - d.validation_active),

        shared_understanding: 0.1
            * d.theory_building_active
            * s.community_intelligence
            * p.social_connectivity_baseline
            - 0.01 * s.shared_understanding,

        system_adaptability: p.adaptation_rate
            * d.system_development_active
            * s.innovation_capacity
            * (1.0 - s.system_adaptability)
            - 0.03 * s.system_adaptability * pressure * (1.0 - d.crisis_mode),

        resource_mobilization: 0.15
            * d.community_action_active
            * s.shared_understanding
            * p.resource_availability_baseline
            - 0.05 * s.resource_mobilization * (1.0 + pressure),

        knowledge_accumulation: 0.08
            * d.validation_active
            * s.community_intelligence
            * p.digital_inclusion_baseline
            - 0.005 * s.knowledge_accumulation,

        community_resilience: 0.12
            * s.system_adaptability
            * s.resource_mobilization
            * (1.0 - s.community_resilience)
            + influence * (1.0 - s.community_resilience)
            - 0.04 * s.community_resilience * pressure * (1.0 - d.transformation_mode),

        innovation_capacity: 0.1
            * s.knowledge_accumulation
            * p.technological_access_baseline
            * d.theory_building_active
            - 0.02 * s.innovation_capacity,

        transformation_readiness: 0.05
            * s.community_resilience
            * s.innovation_capacity
            * d.crisis_mode
            * (1.0 - s.transformation_readiness)
            - 0.03 * s.transformation_readiness * (1.0 - d.transformation_mode),
    }
}
