//! Cost telemetry: the observability callback for computed operation costs.

pub mod collector;

pub use collector::{CostCollector, CostObserver, CostReport, NoopCostObserver};
