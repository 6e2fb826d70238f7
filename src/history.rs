// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Community Resilience Simulation Suite - History Log

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::types::HistorySample;

/// Append-only sequence of per-tick samples. Only a reset clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    samples: Vec<HistorySample>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sample: HistorySample) {
        self.samples.push(sample);
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistorySample> {
        self.samples.get(index)
    }

    pub fn last(&self) -> Option<&HistorySample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistorySample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[HistorySample] {
        &self.samples
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.samples)?)
    }

    /// One JSON object per line, creating parent directories as needed.
    pub fn write_jsonl(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for sample in &self.samples {
            serde_json::to_writer(&mut file, sample)?;
            writeln!(file)?;
        }
        file.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistorySample;
    type IntoIter = std::slice::Iter<'a, HistorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
