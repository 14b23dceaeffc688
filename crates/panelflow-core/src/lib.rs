//! # PanelFlow Core Library
//!
//! Inviscid, incompressible aerodynamic analysis of two-dimensional airfoils using the
//! source-vortex panel method: surface pressure, lift, pitching moment and aerodynamic center.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that geometry, numerics and
//! orchestration stay independently testable.
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Panel`, `Freestream`), the cosine
//!   discretizer, the panel influence kernel with its adaptive quadrature, and coordinate I/O.
//!
//! - **[`engine`]: The Numerical Core.** Assembles the (N+1)×(N+1) influence system, solves it
//!   with Gauss-Seidel relaxation, and derives surface velocities, pressures and force
//!   coefficients. Solution data travels in an explicit `SolutionState` rather than on the panels.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into complete
//!   procedures: a single angle-of-attack analysis and a multi-angle sweep.

pub mod core;
pub mod engine;
pub mod workflows;
