//! # Recurra Core Types
//!
//! The shared vocabulary of the workspace: raw yearly records as they arrive
//! from a dataset, the derived metric records produced by the analytics
//! engine, and the small policy enums that tune how the engine behaves.
//!
//! This crate has no logic beyond construction helpers. Everything here is
//! `Serialize` so results can leave the process as JSON.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ChurnMeanPolicy, DuplicateYearPolicy, MetricField, UnitScale};
pub use structs::{
    DerivedMetricRecord, ForecastRecord, KpiSummary, RawRecord, RawValue, YearlyRecord,
};
