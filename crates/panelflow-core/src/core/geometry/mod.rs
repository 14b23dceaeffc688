//! # Geometry Module
//!
//! Turns raw airfoil coordinates into the ordered, closed panel polygon consumed by the solver.
//!
//! - [`discretize`] - Cosine-spaced panel placement by projecting a circle onto the contour.
//! - [`naca`] - Analytic NACA 4-digit sections, mainly for tests and quick studies.
//!
//! Input contours are expected to run from the trailing edge over the upper surface, around the
//! leading edge, and back along the lower surface. The Kutta condition couples the first and the
//! last panel, so this ordering is part of the contract rather than a convention.

pub mod discretize;
pub mod naca;

pub use discretize::{DEFAULT_PANEL_COUNT, MIN_PANEL_COUNT, discretize};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("At least 2 coordinate pairs are required, found {found}")]
    TooFewPoints { found: usize },

    #[error("Coordinate arrays differ in length (x: {x}, y: {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("Coordinate pair {index} is not finite")]
    NonFiniteCoordinate { index: usize },

    #[error("At least {minimum} panels are required to close the contour, requested {requested}")]
    TooFewPanels { requested: usize, minimum: usize },

    #[error("Contour has zero x-extent; cannot place cosine-spaced panels")]
    ZeroChord,

    #[error(
        "Panel end-point {index} at x = {x} is not bracketed by the remaining contour; \
         the contour must run trailing edge -> upper surface -> leading edge -> lower surface"
    )]
    UnbracketedEnd { index: usize, x: f64 },

    #[error("Panel {index} has zero length")]
    DegeneratePanel { index: usize },

    #[error("Invalid NACA 4-digit designation '{0}'")]
    InvalidNacaDesignation(String),
}
