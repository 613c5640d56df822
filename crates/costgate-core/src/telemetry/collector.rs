//! Cost collector: buffers computed-cost reports for the host to drain.
//! Reports are only produced when `expose_computed_cost` is enabled.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Buffered reports are capped to keep memory bounded under sustained load.
const MAX_BUFFERED_REPORTS: usize = 1000;

/// Computed cost of one validated operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub operation_name: Option<String>,
    pub cost: f64,
    pub limit: Option<u64>,
    pub accepted: bool,
}

/// Receives one report per completed cost pass, pass or fail.
pub trait CostObserver: Send + Sync {
    fn observe(&self, report: &CostReport);
}

/// Observer that drops every report.
#[derive(Debug, Default)]
pub struct NoopCostObserver;

impl CostObserver for NoopCostObserver {
    fn observe(&self, _report: &CostReport) {}
}

/// Observer that buffers reports in memory.
#[derive(Debug, Default)]
pub struct CostCollector {
    buffer: Mutex<Vec<CostReport>>,
}

impl CostCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered reports.
    pub fn drain(&self) -> Vec<CostReport> {
        if let Ok(mut buf) = self.buffer.lock() {
            std::mem::take(&mut *buf)
        } else {
            Vec::new()
        }
    }

    pub fn buffered_count(&self) -> usize {
        self.buffer.lock().map(|b| b.len()).unwrap_or(0)
    }
}

impl CostObserver for CostCollector {
    fn observe(&self, report: &CostReport) {
        tracing::debug!(
            operation = report.operation_name.as_deref().unwrap_or("<anonymous>"),
            cost = report.cost,
            accepted = report.accepted,
            "operation cost computed"
        );
        if let Ok(mut buf) = self.buffer.lock() {
            if buf.len() < MAX_BUFFERED_REPORTS {
                buf.push(report.clone());
            }
        }
    }
}
