//! # Models Module
//!
//! Plain data types describing the discretized body and the farfield flow.
//!
//! - [`panel`] - [`panel::Panel`], one straight segment of the airfoil contour, and its
//!   [`panel::SurfaceSide`] tag.
//! - [`freestream`] - [`freestream::Freestream`], the validated farfield speed and incidence.
//!
//! Panels are created once per geometry and never mutated; the same slice of panels can be
//! shared by any number of freestream cases.

pub mod freestream;
pub mod panel;
