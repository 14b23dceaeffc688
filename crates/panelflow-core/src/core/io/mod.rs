//! Reading airfoil coordinate files and writing tabular results.
//!
//! Both directions use the `csv` crate: coordinate files are loosely formatted
//! whitespace- or comma-separated tables, and results are written as headed CSV.

pub mod coordinates;
pub mod export;
