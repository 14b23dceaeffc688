//! # Workflows Module
//!
//! Top-level entry points that take a panel set from freestream conditions to aerodynamic
//! coefficients.
//!
//! - **Single-case Analysis** ([`analyze`]) - Solve and post-process one angle of attack, plus
//!   the lower-level `solve` and `post_process` steps for callers composing their own pipeline.
//! - **Angle-of-attack Sweep** ([`sweep`]) - Many cases on one panel set, sharing the influence
//!   coefficients, with lift slope, zero-lift angle and aerodynamic center derived at the end.
//!
//! Panels are borrowed immutably throughout; every case returns its own
//! [`SolutionState`](crate::engine::state::SolutionState).

pub mod analyze;
pub mod sweep;
