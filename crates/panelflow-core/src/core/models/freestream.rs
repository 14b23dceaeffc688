use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone, Copy)]
pub enum DomainError {
    #[error("Freestream speed must be positive, got {0}")]
    NonPositiveSpeed(f64),
    #[error("Freestream {quantity} must be finite, got {value}")]
    NonFinite { quantity: &'static str, value: f64 },
}

/// Uniform farfield flow: speed and angle of attack.
///
/// The angle is supplied in degrees and kept exactly as given alongside its radian value.
/// Instances are immutable; a new one is created for every angle-of-attack case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Freestream {
    u_inf: f64,
    alpha: f64,
    alpha_degrees: f64,
}

impl Freestream {
    /// Validates and creates a freestream condition.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if `u_inf` is not a positive finite number or `alpha_degrees` is
    /// not finite.
    pub fn new(u_inf: f64, alpha_degrees: f64) -> Result<Self, DomainError> {
        if !u_inf.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "speed",
                value: u_inf,
            });
        }
        if !alpha_degrees.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "angle of attack",
                value: alpha_degrees,
            });
        }
        if u_inf <= 0.0 {
            return Err(DomainError::NonPositiveSpeed(u_inf));
        }
        Ok(Self {
            u_inf,
            alpha: alpha_degrees.to_radians(),
            alpha_degrees,
        })
    }

    #[inline]
    pub fn u_inf(&self) -> f64 {
        self.u_inf
    }

    /// Angle of attack in radians.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Angle of attack in degrees, as supplied to [`Freestream::new`].
    #[inline]
    pub fn alpha_degrees(&self) -> f64 {
        self.alpha_degrees
    }

    /// Freestream velocity component along the outward normal of direction `beta`.
    #[inline]
    pub fn normal_component(&self, beta: f64) -> f64 {
        self.u_inf * (self.alpha - beta).cos()
    }

    /// Freestream velocity component along the tangent of direction `beta`.
    #[inline]
    pub fn tangential_component(&self, beta: f64) -> f64 {
        self.u_inf * (self.alpha - beta).sin()
    }
}
