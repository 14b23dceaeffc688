//! # Influence Kernel
//!
//! Line integrals of the source/vortex influence of one panel at a field point.
//!
//! - [`influence`] - The panel integrand and its evaluation at control points.
//! - [`quadrature`] - Globally adaptive Gauss-Kronrod (G7/K15) integration.

pub mod influence;
pub mod quadrature;

pub use influence::{influence_integral, influence_integral_with};
pub use quadrature::{QuadratureConfig, QuadratureResult};
