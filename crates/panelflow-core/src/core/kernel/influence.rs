use super::quadrature::{self, QuadratureConfig, QuadratureResult};
use crate::core::models::panel::Panel;

/// Evaluates the influence integral of `panel` at the field point `(x, y)`.
///
/// Integrates, over the panel arc length `s ∈ [0, length]`,
///
/// ```text
/// [(x - px(s))·dxdz + (y - py(s))·dydz] / [(x - px(s))² + (y - py(s))²]
/// ```
///
/// where `(px, py)` walks the panel from its start point. `(dxdz, dydz)` is the direction in
/// which the induced velocity is measured: `(cos βᵢ, sin βᵢ)` for the normal component at
/// panel `i`, `(-sin βᵢ, cos βᵢ)` for the tangential one.
///
/// The field point must not lie on the panel itself; the integrand is singular there.
pub fn influence_integral(x: f64, y: f64, panel: &Panel, dxdz: f64, dydz: f64) -> f64 {
    influence_integral_with(x, y, panel, dxdz, dydz, &QuadratureConfig::default()).value
}

/// [`influence_integral`] with explicit quadrature settings and the full quadrature report.
pub fn influence_integral_with(
    x: f64,
    y: f64,
    panel: &Panel,
    dxdz: f64,
    dydz: f64,
    config: &QuadratureConfig,
) -> QuadratureResult {
    let (sin_beta, cos_beta) = panel.beta.sin_cos();
    let (xa, ya) = (panel.start.x, panel.start.y);

    let integrand = |s: f64| {
        let dx = x - (xa - sin_beta * s);
        let dy = y - (ya + cos_beta * s);
        (dx * dxdz + dy * dydz) / (dx * dx + dy * dy)
    };

    quadrature::integrate(integrand, 0.0, panel.length, config)
}
