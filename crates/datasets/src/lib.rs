//! # Recurra Datasets Crate
//!
//! The adapter between files on disk and the analytics engine. It knows
//! which CSV file holds the history of each business model and how to read
//! those files into uncleaned `RawRecord`s.
//!
//! ## Public API
//!
//! - `DatasetCatalog`: resolves model identifiers and loads their records.
//! - `read_csv` / `read_csv_path`: the loader, usable without a catalog.
//! - `DatasetError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod catalog;
pub mod error;
pub mod loader;

// Re-export the key components to create a clean, public-facing API.
pub use catalog::DatasetCatalog;
pub use error::DatasetError;
pub use loader::{read_csv, read_csv_path};
