//! Step traces for observing a `SensorimotorTemporalMemory` over time.
//!
//! A `StepTrace` records the diagnostics of each step (active columns, predicted active cells,
//! unpredicted active columns and the anomaly score). It only reads the layer; nothing recorded
//! here flows back into learning. `summary` condenses every trace into min/max/mean/sum metrics.

use super::sensorimotor::SensorimotorTemporalMemory;
use serde::Serialize;

/// Summary statistics over one trace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Metric {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
}

impl Metric {
    /// Computes the metric over `values`, or `None` for an empty trace.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            min,
            max,
            mean: sum / values.len() as f64,
            sum,
        })
    }
}

/// Metrics of every trace recorded by a `StepTrace`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceSummary {
    pub steps: usize,
    pub active_columns: Option<Metric>,
    pub predicted_active_cells: Option<Metric>,
    pub unpredicted_active_columns: Option<Metric>,
    pub anomaly_score: Option<Metric>,
}

/// Per-step record of a layer's diagnostics.
#[derive(Clone, Debug, Default)]
pub struct StepTrace {
    active_columns: Vec<f64>,
    predicted_active_cells: Vec<f64>,
    unpredicted_active_columns: Vec<f64>,
    anomaly_scores: Vec<f64>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the diagnostics of the layer's latest step.
    pub fn record(&mut self, layer: &SensorimotorTemporalMemory) {
        self.active_columns.push(layer.active_columns().len() as f64);
        self.predicted_active_cells
            .push(layer.predicted_active_cells().len() as f64);
        self.unpredicted_active_columns
            .push(layer.unpredicted_active_columns().len() as f64);
        self.anomaly_scores.push(layer.anomaly_score());
    }

    pub fn len(&self) -> usize {
        self.anomaly_scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anomaly_scores.is_empty()
    }

    pub fn anomaly_scores(&self) -> &[f64] {
        &self.anomaly_scores
    }

    pub fn clear(&mut self) {
        self.active_columns.clear();
        self.predicted_active_cells.clear();
        self.unpredicted_active_columns.clear();
        self.anomaly_scores.clear();
    }

    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            steps: self.len(),
            active_columns: Metric::from_values(&self.active_columns),
            predicted_active_cells: Metric::from_values(&self.predicted_active_cells),
            unpredicted_active_columns: Metric::from_values(&self.unpredicted_active_columns),
            anomaly_score: Metric::from_values(&self.anomaly_scores),
        }
    }
}
