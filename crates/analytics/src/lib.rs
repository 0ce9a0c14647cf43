//! # Recurra Analytics Engine
//!
//! This crate turns the yearly customer records of a subscription business
//! into revenue and retention metrics, and projects annual recurring revenue
//! forward under a chosen growth rate.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** No I/O and no knowledge of where datasets come from. It
//!   depends only on `core-types`.
//! - **Stateless calculation:** Every component is a small `Copy` value
//!   holding its policy. Calling it never mutates anything, so the same
//!   engine can serve many datasets concurrently.
//! - **Total functions:** Nothing in this crate returns an error. Bad input
//!   records are rejected with a reason and out-of-range projections are
//!   pinned at the decimal limits, so every dataset yields a report.
//!
//! ## Public API
//!
//! - `MetricsDeriver`: cleans raw records and derives MRR, ARR, churn, ARPU and LTV.
//! - `KpiSummarizer`: reduces a derived series to headline figures.
//! - `Forecaster`: compounds the latest ARR forward.
//! - `AnalyticsEngine`: runs all three and returns an `AnalyticsReport`.

// Declare the modules that constitute this crate.
pub mod coerce;
pub mod deriver;
pub mod engine;
pub mod forecast;
pub mod report;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use deriver::{DerivedSeries, MetricsDeriver, RejectReason, RejectedRecord};
pub use engine::AnalyticsEngine;
pub use forecast::{DEFAULT_HORIZON, Forecaster};
pub use report::AnalyticsReport;
pub use summary::KpiSummarizer;
