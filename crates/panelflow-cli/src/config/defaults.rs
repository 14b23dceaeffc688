use panelflow::engine::config::AnalysisConfig;

/// Values used when neither the config file nor the command line sets a parameter.
pub struct DefaultsConfig {
    pub panel_count: usize,
    pub u_inf: f64,
    pub moment_reference: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub require_convergence: bool,
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    pub max_subintervals: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let core = AnalysisConfig::default();
        Self {
            panel_count: core.panel_count,
            u_inf: 1.0,
            moment_reference: core.moment_reference,
            max_iterations: core.solver.max_iterations,
            tolerance: core.solver.tolerance,
            require_convergence: false,
            abs_tolerance: core.quadrature.abs_tolerance,
            rel_tolerance: core.quadrature.rel_tolerance,
            max_subintervals: core.quadrature.max_subintervals,
        }
    }
}
