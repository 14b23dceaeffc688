//! # Core Module
//!
//! Geometry, data models and the boundary-integral kernel used by the panel method.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Immutable `Panel` segments and `Freestream` conditions
//! - **Geometry** ([`geometry`]) - Cosine-spaced discretization and NACA 4-digit sections
//! - **Influence Kernel** ([`kernel`]) - Panel line integrals evaluated by adaptive quadrature
//! - **File I/O** ([`io`]) - Coordinate readers and tabular result export
//!
//! Nothing in this module holds solution state; solved quantities live in
//! [`crate::engine::state::SolutionState`].

pub mod geometry;
pub mod io;
pub mod kernel;
pub mod models;
