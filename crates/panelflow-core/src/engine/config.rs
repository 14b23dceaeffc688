use crate::core::geometry::{DEFAULT_PANEL_COUNT, MIN_PANEL_COUNT};
use crate::core::kernel::QuadratureConfig;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Stopping rules for the Gauss-Seidel solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub max_iterations: usize,
    /// Convergence threshold on the infinity norm of the update between sweeps.
    pub tolerance: f64,
    /// Treat an unconverged solve as an error instead of a reported warning.
    pub require_convergence: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-10,
            require_convergence: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(invalid("tolerance", "must be positive and finite"));
        }
        Ok(())
    }
}

/// Everything needed to analyze one panel set at one or more angles of attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub panel_count: usize,
    pub u_inf: f64,
    /// Chord fraction about which pitching moments are reported.
    pub moment_reference: f64,
    pub solver: SolverConfig,
    pub quadrature: QuadratureConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            panel_count: DEFAULT_PANEL_COUNT,
            u_inf: 1.0,
            moment_reference: 0.25,
            solver: SolverConfig::default(),
            quadrature: QuadratureConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel_count < MIN_PANEL_COUNT {
            return Err(invalid(
                "panel_count",
                format!("must be at least {}", MIN_PANEL_COUNT),
            ));
        }
        if !(self.u_inf.is_finite() && self.u_inf > 0.0) {
            return Err(invalid("u_inf", "must be positive and finite"));
        }
        if !self.moment_reference.is_finite() {
            return Err(invalid("moment_reference", "must be finite"));
        }
        self.solver.validate()?;

        let q = &self.quadrature;
        if q.max_subintervals == 0 {
            return Err(invalid("quadrature.max_subintervals", "must be at least 1"));
        }
        if !(q.abs_tolerance >= 0.0 && q.rel_tolerance >= 0.0)
            || (q.abs_tolerance == 0.0 && q.rel_tolerance == 0.0)
        {
            return Err(invalid(
                "quadrature tolerances",
                "must be non-negative and not both zero",
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

/// Builds a validated [`AnalysisConfig`].
///
/// The freestream speed must be given explicitly; every other setting falls back to the
/// [`AnalysisConfig::default`] value.
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    panel_count: Option<usize>,
    u_inf: Option<f64>,
    moment_reference: Option<f64>,
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
    require_convergence: Option<bool>,
    quadrature: Option<QuadratureConfig>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel_count(mut self, count: usize) -> Self {
        self.panel_count = Some(count);
        self
    }
    pub fn u_inf(mut self, speed: f64) -> Self {
        self.u_inf = Some(speed);
        self
    }
    pub fn moment_reference(mut self, chord_fraction: f64) -> Self {
        self.moment_reference = Some(chord_fraction);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn require_convergence(mut self, required: bool) -> Self {
        self.require_convergence = Some(required);
        self
    }
    pub fn quadrature(mut self, quadrature: QuadratureConfig) -> Self {
        self.quadrature = Some(quadrature);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = AnalysisConfig::default();
        let solver = SolverConfig {
            max_iterations: self
                .max_iterations
                .unwrap_or(defaults.solver.max_iterations),
            tolerance: self.tolerance.unwrap_or(defaults.solver.tolerance),
            require_convergence: self
                .require_convergence
                .unwrap_or(defaults.solver.require_convergence),
        };
        let config = AnalysisConfig {
            panel_count: self.panel_count.unwrap_or(defaults.panel_count),
            u_inf: self.u_inf.ok_or(ConfigError::MissingParameter("u_inf"))?,
            moment_reference: self.moment_reference.unwrap_or(defaults.moment_reference),
            solver,
            quadrature: self.quadrature.unwrap_or(defaults.quadrature),
        };
        config.validate()?;
        Ok(config)
    }
}
