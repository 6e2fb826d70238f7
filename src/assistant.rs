// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - Assistant Response Boundary

//! Decoding of the parameter assistant's reply.
//!
//! The assistant itself is a remote service; the engine only consumes its
//! `{ summary, parameter_changes }` object and feeds the changes to
//! `configure`, where unknown keys are ignored like any other override.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::params::Overrides;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub summary: String,
    /// Missing or non-object decodes as no changes.
    #[serde(default, deserialize_with = "changes_or_none")]
    pub parameter_changes: Overrides,
}

fn changes_or_none<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Overrides, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map,
        _ => Overrides::new(),
    })
}

impl AssistantResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        let response: Self = serde_json::from_value(value)
            .map_err(|e| Error::MalformedAssistantResponse(e.to_string()))?;
        response.checked()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let response: Self = serde_json::from_str(text)
            .map_err(|e| Error::MalformedAssistantResponse(e.to_string()))?;
        response.checked()
    }

    fn checked(self) -> Result<Self> {
        if self.summary.trim().is_empty() {
            return Err(Error::MalformedAssistantResponse("empty summary".into()));
        }
        Ok(self)
    }
}
