use super::GeometryError;
use crate::core::models::panel::Panel;
use nalgebra::Point2;
use std::f64::consts::PI;
use tracing::debug;

pub const DEFAULT_PANEL_COUNT: usize = 100;
pub const MIN_PANEL_COUNT: usize = 3;

/// Discretizes a contour into `panel_count` panels using cosine spacing.
///
/// A circle spanning the chord is divided into `panel_count` equal arcs. The x-coordinates of
/// the arc end-points are projected onto the contour, which clusters panels at the leading and
/// trailing edges where the flow changes fastest. The y-coordinate of each projected end-point
/// is linearly interpolated on the contour segment that brackets it.
///
/// The bracketing search is a single forward pass over the closed contour, so the contour must
/// be ordered the same way the circle is walked: trailing edge, upper surface, leading edge,
/// lower surface.
///
/// # Arguments
///
/// * `x`, `y` - Contour coordinates. The contour is closed implicitly.
/// * `panel_count` - Number of panels, at least [`MIN_PANEL_COUNT`].
///
/// # Errors
///
/// Returns [`GeometryError`] if the input is too short, mismatched or non-finite, if
/// `panel_count` is too small, or if an end-point cannot be bracketed by the rest of the contour.
pub fn discretize(x: &[f64], y: &[f64], panel_count: usize) -> Result<Vec<Panel>, GeometryError> {
    validate_input(x, y, panel_count)?;

    let (x_min, x_max) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if x_max <= x_min {
        return Err(GeometryError::ZeroChord);
    }

    let x_ends = cosine_ends(x_min, x_max, panel_count);
    let y_ends = project_onto_contour(x, y, &x_ends)?;

    let mut panels = Vec::with_capacity(panel_count);
    for i in 0..panel_count {
        let start = Point2::new(x_ends[i], y_ends[i]);
        let end = Point2::new(x_ends[i + 1], y_ends[i + 1]);
        if start == end {
            return Err(GeometryError::DegeneratePanel { index: i });
        }
        panels.push(Panel::new(start, end));
    }

    debug!(
        panels = panels.len(),
        chord = x_max - x_min,
        "Contour discretized with cosine spacing."
    );
    Ok(panels)
}

fn validate_input(x: &[f64], y: &[f64], panel_count: usize) -> Result<(), GeometryError> {
    if x.len() != y.len() {
        return Err(GeometryError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(GeometryError::TooFewPoints { found: x.len() });
    }
    if let Some(index) = x
        .iter()
        .zip(y)
        .position(|(xi, yi)| !xi.is_finite() || !yi.is_finite())
    {
        return Err(GeometryError::NonFiniteCoordinate { index });
    }
    if panel_count < MIN_PANEL_COUNT {
        return Err(GeometryError::TooFewPanels {
            requested: panel_count,
            minimum: MIN_PANEL_COUNT,
        });
    }
    Ok(())
}

/// X-coordinates of `panel_count + 1` equal-angle points on the circle spanning `[x_min, x_max]`.
fn cosine_ends(x_min: f64, x_max: f64, panel_count: usize) -> Vec<f64> {
    let radius = 0.5 * (x_max - x_min);
    let x_center = 0.5 * (x_max + x_min);
    let step = 2.0 * PI / panel_count as f64;

    (0..=panel_count)
        .map(|k| {
            let theta = if k == panel_count {
                2.0 * PI
            } else {
                k as f64 * step
            };
            // Rounding in the projection must not push an end past the extreme contour point.
            (x_center + radius * theta.cos()).clamp(x_min, x_max)
        })
        .collect()
}

/// Interpolates contour heights at `x_ends` with a monotonic scan over the closed contour.
///
/// The returned array has the same length as `x_ends`; its last entry repeats the first so the
/// panel polygon closes exactly.
fn project_onto_contour(x: &[f64], y: &[f64], x_ends: &[f64]) -> Result<Vec<f64>, GeometryError> {
    let closing = [(x[0], y[0])];
    let contour: Vec<(f64, f64)> = x
        .iter()
        .copied()
        .zip(y.iter().copied())
        .chain(closing)
        .collect();
    let segment_count = contour.len() - 1;
    let last = x_ends.len() - 1;

    let mut y_ends = vec![0.0; x_ends.len()];
    let mut cursor = 0;
    for (i, &x_end) in x_ends[..last].iter().enumerate() {
        while cursor < segment_count && !brackets(contour[cursor].0, contour[cursor + 1].0, x_end)
        {
            cursor += 1;
        }
        if cursor == segment_count {
            return Err(GeometryError::UnbracketedEnd { index: i, x: x_end });
        }
        y_ends[i] = interpolate(contour[cursor], contour[cursor + 1], x_end);
    }
    y_ends[last] = y_ends[0];

    Ok(y_ends)
}

#[inline]
fn brackets(x0: f64, x1: f64, x: f64) -> bool {
    (x0 <= x && x <= x1) || (x1 <= x && x <= x0)
}

#[inline]
fn interpolate((x0, y0): (f64, f64), (x1, y1): (f64, f64), x: f64) -> f64 {
    let dx = x1 - x0;
    if dx == 0.0 {
        return y0;
    }
    let slope = (y1 - y0) / dx;
    let intercept = y1 - slope * x1;
    slope * x + intercept
}
