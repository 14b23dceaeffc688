//! # Engine Module
//!
//! The numerical core of the panel method: everything between a set of panels and the
//! aerodynamic coefficients.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Solver, quadrature and analysis settings with a builder
//! - **Assembly** ([`assembly`]) - Influence coefficients and the (N+1)×(N+1) linear system
//! - **Solver** ([`solver`]) - Gauss-Seidel relaxation with explicit convergence reporting
//! - **Post-Processing** ([`postprocess`]) - Surface velocity, pressure, lift, moment and centers
//! - **State** ([`state`]) - Per-case solution data, kept apart from the immutable panels
//! - **Progress** ([`progress`]) - Callback-based progress reporting for long sweeps
//! - **Errors** ([`error`]) - The aggregated engine error type
//!
//! Influence coefficients depend only on the geometry, so they are computed once per panel set
//! and reused for every freestream case.

pub mod assembly;
pub mod config;
pub mod error;
pub mod postprocess;
pub mod progress;
pub mod solver;
pub mod state;
