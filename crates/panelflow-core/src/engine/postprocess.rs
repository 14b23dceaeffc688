use super::assembly::InfluenceCoefficients;
use super::state::SolutionState;
use crate::core::models::freestream::Freestream;
use crate::core::models::panel::{Panel, chord_length};

/// Step of the chordwise scan in [`center_of_pressure`].
pub const CENTER_OF_PRESSURE_STEP: f64 = 0.001;

/// Divisor applied to [`moment_coefficient`] values before the α fit in
/// [`broadcast_aerodynamic_center`].
pub const BROADCAST_MOMENT_SCALE: f64 = 100.0;

/// Tangential velocity at every control point.
///
/// `vtᵢ = Σⱼ Ktᵢⱼ·σⱼ − γ·Σⱼ Knᵢⱼ + u∞·sin(α − βᵢ)`
pub fn tangential_velocity(
    panels: &[Panel],
    freestream: &Freestream,
    state: &SolutionState,
    coefficients: &InfluenceCoefficients,
) -> Vec<f64> {
    let kt = coefficients.tangential();
    let vortex = coefficients.vortex_tangential_array();

    panels
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let sources: f64 = kt
                .row(i)
                .iter()
                .zip(&state.sigma)
                .map(|(k, sigma)| k * sigma)
                .sum();
            sources + state.gamma * vortex[i] + freestream.tangential_component(panel.beta)
        })
        .collect()
}

/// `Cpᵢ = 1 − (vtᵢ / u∞)²`
pub fn pressure_coefficient(tangential_velocity: &[f64], freestream: &Freestream) -> Vec<f64> {
    let u_inf = freestream.u_inf();
    tangential_velocity
        .iter()
        .map(|vt| 1.0 - (vt / u_inf).powi(2))
        .collect()
}

/// Tangential velocity on the flow side of the vortex sheet: `vtᵢ − γ/2`.
///
/// [`tangential_velocity`] evaluates the sheet's own influence as a principal value, which is the
/// mean of the velocities on its two sides. The flow side differs from that mean by half the
/// sheet strength. Pressures that are integrated into forces should be taken from this velocity.
pub fn flow_side_velocity(tangential_velocity: &[f64], gamma: f64) -> Vec<f64> {
    tangential_velocity.iter().map(|vt| vt - 0.5 * gamma).collect()
}

/// Returns `state` with tangential velocity and pressure coefficient filled in.
pub fn post_process(
    panels: &[Panel],
    freestream: &Freestream,
    state: SolutionState,
    coefficients: &InfluenceCoefficients,
) -> SolutionState {
    let vt = tangential_velocity(panels, freestream, &state, coefficients);
    let cp = pressure_coefficient(&vt, freestream);
    SolutionState {
        tangential_velocity: vt,
        pressure_coefficient: cp,
        ..state
    }
}

/// Kutta-Joukowski lift coefficient: `Cl = γ·ΣLᵢ / (½·u∞·c)`.
///
/// The chord `c` is the x-extent of the panel start points.
pub fn lift_coefficient(panels: &[Panel], gamma: f64, freestream: &Freestream) -> f64 {
    let total_length: f64 = panels.iter().map(|p| p.length).sum();
    gamma * total_length / (0.5 * freestream.u_inf() * chord_length(panels))
}

/// Pitching-moment coefficient about `x_ref` as `Σᵢ cl·(x_midᵢ − x_ref)`.
///
/// This applies the total lift at every control point rather than integrating the actual load
/// distribution. It is kept for comparison with existing results; see
/// [`pressure_moment_coefficient`] for the moment of the surface pressures.
pub fn moment_coefficient(cl: f64, x_mid: &[f64], x_ref: f64) -> f64 {
    x_mid.iter().map(|x| cl * (x - x_ref)).sum()
}

/// First reference point on the `[0, 1]` grid of step [`CENTER_OF_PRESSURE_STEP`] where
/// `|moment_coefficient|` is smallest. Returns `0.0` when `cl` is zero.
pub fn center_of_pressure(cl: f64, x_mid: &[f64]) -> f64 {
    let steps = (1.0 / CENTER_OF_PRESSURE_STEP).round() as usize;
    let mut best_x = 0.0;
    let mut best_moment = f64::INFINITY;
    for k in 0..=steps {
        let x_ref = k as f64 * CENTER_OF_PRESSURE_STEP;
        let moment = moment_coefficient(cl, x_mid, x_ref).abs();
        if moment < best_moment {
            best_moment = moment;
            best_x = x_ref;
        }
    }
    best_x
}

/// Least-squares line through `(xs, ys)`; returns `(slope, intercept)`.
///
/// `None` if the slices differ in length, hold fewer than two points, or all `xs` are equal.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len();
    if n != ys.len() || n < 2 {
        return None;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (sxy, sxx) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Aerodynamic center as `0.25 − d(cm)/d(α)`, with `α` in the units supplied (degrees).
pub fn aerodynamic_center(alphas: &[f64], cms: &[f64]) -> Option<f64> {
    linear_fit(alphas, cms).map(|(slope, _)| -slope + 0.25)
}

/// Aerodynamic center from broadcast moments about the quarter chord.
///
/// Each `cm` is divided by [`BROADCAST_MOMENT_SCALE`] before [`aerodynamic_center`] is applied,
/// which reproduces the established sweep output. At the default 100 panels the scaled moment
/// is `cl·(x̄_mid − 0.25)`.
pub fn broadcast_aerodynamic_center(alphas: &[f64], cms: &[f64]) -> Option<f64> {
    let scaled: Vec<f64> = cms.iter().map(|cm| cm / BROADCAST_MOMENT_SCALE).collect();
    aerodynamic_center(alphas, &scaled)
}

/// Aerodynamic center from moment about `x_ref` against lift: `x_ref − d(cm)/d(cl)`.
///
/// With nose-up positive moments taken from [`pressure_moment_coefficient`], this is the
/// chordwise position where the moment does not change with lift.
pub fn aerodynamic_center_from_lift(cls: &[f64], cms: &[f64], x_ref: f64) -> Option<f64> {
    linear_fit(cls, cms).map(|(slope, _)| x_ref - slope)
}

/// Pitching moment of the surface pressures about `(x_min + x_ref·c, 0)`, positive nose-up.
///
/// `cp` should come from [`flow_side_velocity`] for the moment to be consistent with the lift.
///
/// `Cm = Σᵢ Cpᵢ·Lᵢ·[(xᵢ − x_r)·n_yᵢ − yᵢ·n_xᵢ] / c²`, evaluated at the control points.
pub fn pressure_moment_coefficient(panels: &[Panel], cp: &[f64], x_ref: f64) -> f64 {
    let chord = chord_length(panels);
    let x_min = panels
        .iter()
        .map(|p| p.start.x)
        .fold(f64::INFINITY, f64::min);
    let x_r = x_min + x_ref * chord;

    let moment: f64 = panels
        .iter()
        .zip(cp)
        .map(|(panel, cp)| {
            let n = panel.normal();
            cp * panel.length * ((panel.center.x - x_r) * n.y - panel.center.y * n.x)
        })
        .sum();
    moment / (chord * chord)
}

/// Lift coefficient from integrating surface pressures normal to the freestream.
///
/// With `cp` from [`flow_side_velocity`] this agrees with [`lift_coefficient`] up to
/// discretization error.
pub fn pressure_lift_coefficient(panels: &[Panel], cp: &[f64], freestream: &Freestream) -> f64 {
    let (sin_a, cos_a) = freestream.alpha().sin_cos();
    let lift: f64 = panels
        .iter()
        .zip(cp)
        .map(|(panel, cp)| {
            let n = panel.normal();
            -cp * panel.length * (n.y * cos_a - n.x * sin_a)
        })
        .sum();
    lift / chord_length(panels)
}

/// Control-point x-coordinates, the `x_mid` input of the moment functions.
pub fn control_point_x(panels: &[Panel]) -> Vec<f64> {
    panels.iter().map(|p| p.center.x).collect()
}
