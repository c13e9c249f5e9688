use super::precision::Real;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_QUINTIC_LOWER_LIMIT_FACTOR: Real = 0.8;
pub const DEFAULT_QUINTIC_UPPER_BORN_RADIUS_LIMIT: Real = 5.0;

/// Switching function applied to Born radii in the softcore model.
///
/// The integer codes match the values used by the GPU kernels that consume these
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BornRadiusScalingMethod {
    /// Born radii are used unmodified.
    #[default]
    NoScaling = 0,
    /// Hyperbolic-tangent switching.
    Tanh = 1,
    /// Quintic-spline switching between the lower and upper limits.
    QuinticSpline = 2,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ScalingMethodError {
    #[error("Unknown Born radius scaling method: '{0}'")]
    UnknownName(String),
    #[error("Unknown Born radius scaling method code: {0}")]
    UnknownCode(i32),
}

impl FromStr for BornRadiusScalingMethod {
    type Err = ScalingMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "no-scaling" | "no_scaling" | "noscaling" => Ok(Self::NoScaling),
            "tanh" => Ok(Self::Tanh),
            "quintic" | "quintic-spline" | "quintic_spline" | "quinticspline" => {
                Ok(Self::QuinticSpline)
            }
            _ => Err(ScalingMethodError::UnknownName(s.to_string())),
        }
    }
}

impl TryFrom<i32> for BornRadiusScalingMethod {
    type Error = ScalingMethodError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NoScaling),
            1 => Ok(Self::Tanh),
            2 => Ok(Self::QuinticSpline),
            other => Err(ScalingMethodError::UnknownCode(other)),
        }
    }
}

impl From<BornRadiusScalingMethod> for i32 {
    fn from(method: BornRadiusScalingMethod) -> Self {
        method as i32
    }
}

impl fmt::Display for BornRadiusScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoScaling => "no-scaling",
            Self::Tanh => "tanh",
            Self::QuinticSpline => "quintic-spline",
        };
        f.write_str(name)
    }
}

/// Born-radius switching configuration.
///
/// The upper spline limit is always `upper_born_radius_limit^-3`. It is recomputed only
/// when the Born radius limit is written and has no setter of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BornRadiusScaling {
    method: BornRadiusScalingMethod,
    lower_limit_factor: Real,
    upper_born_radius_limit: Real,
    upper_spline_limit: Real,
}

impl Default for BornRadiusScaling {
    fn default() -> Self {
        let mut scaling = Self {
            method: BornRadiusScalingMethod::default(),
            lower_limit_factor: DEFAULT_QUINTIC_LOWER_LIMIT_FACTOR,
            upper_born_radius_limit: 0.0,
            upper_spline_limit: 0.0,
        };
        scaling.set_upper_born_radius_limit(DEFAULT_QUINTIC_UPPER_BORN_RADIUS_LIMIT);
        scaling
    }
}

impl BornRadiusScaling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self) -> BornRadiusScalingMethod {
        self.method
    }

    pub fn set_method(&mut self, method: BornRadiusScalingMethod) {
        self.method = method;
    }

    pub fn lower_limit_factor(&self) -> Real {
        self.lower_limit_factor
    }

    pub fn set_lower_limit_factor(&mut self, factor: Real) {
        self.lower_limit_factor = factor;
    }

    pub fn upper_born_radius_limit(&self) -> Real {
        self.upper_born_radius_limit
    }

    /// Stores the upper Born radius limit and recomputes the upper spline limit from it.
    pub fn set_upper_born_radius_limit(&mut self, limit: Real) {
        self.upper_born_radius_limit = limit;
        self.upper_spline_limit = limit.powi(-3);
    }

    pub fn upper_spline_limit(&self) -> Real {
        self.upper_spline_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: Real = 1e-6;

    fn approx_equal(a: Real, b: Real) -> bool {
        (a - b).abs() <= TOLERANCE * b.abs().max(1.0)
    }

    #[test]
    fn default_matches_documented_values() {
        let scaling = BornRadiusScaling::default();
        assert_eq!(scaling.method(), BornRadiusScalingMethod::NoScaling);
        assert_eq!(scaling.lower_limit_factor(), 0.8);
        assert_eq!(scaling.upper_born_radius_limit(), 5.0);
        assert!(approx_equal(scaling.upper_spline_limit(), 0.008));
    }

    #[test]
    fn upper_spline_limit_tracks_every_write_to_born_radius_limit() {
        let mut scaling = BornRadiusScaling::new();
        for limit in [0.5, 1.0, 2.0, 3.7, 5.0, 12.5] {
            scaling.set_upper_born_radius_limit(limit);
            assert_eq!(scaling.upper_born_radius_limit(), limit);
            assert!(approx_equal(
                scaling.upper_spline_limit(),
                1.0 / (limit * limit * limit)
            ));
        }
    }

    #[test]
    fn lower_limit_factor_is_independent_of_the_upper_limits() {
        let mut scaling = BornRadiusScaling::new();
        scaling.set_lower_limit_factor(0.6);
        assert_eq!(scaling.lower_limit_factor(), 0.6);
        assert_eq!(scaling.upper_born_radius_limit(), 5.0);
        assert!(approx_equal(scaling.upper_spline_limit(), 0.008));
    }

    #[test]
    fn set_method_round_trips() {
        let mut scaling = BornRadiusScaling::new();
        scaling.set_method(BornRadiusScalingMethod::QuinticSpline);
        assert_eq!(scaling.method(), BornRadiusScalingMethod::QuinticSpline);
        scaling.set_method(BornRadiusScalingMethod::Tanh);
        assert_eq!(scaling.method(), BornRadiusScalingMethod::Tanh);
    }

    #[test]
    fn from_str_parses_known_names_case_insensitively() {
        assert_eq!(
            "none".parse::<BornRadiusScalingMethod>(),
            Ok(BornRadiusScalingMethod::NoScaling)
        );
        assert_eq!(
            "TANH".parse::<BornRadiusScalingMethod>(),
            Ok(BornRadiusScalingMethod::Tanh)
        );
        assert_eq!(
            "Quintic-Spline".parse::<BornRadiusScalingMethod>(),
            Ok(BornRadiusScalingMethod::QuinticSpline)
        );
        assert!(matches!(
            "cubic".parse::<BornRadiusScalingMethod>(),
            Err(ScalingMethodError::UnknownName(_))
        ));
    }

    #[test]
    fn integer_codes_match_kernel_values() {
        assert_eq!(i32::from(BornRadiusScalingMethod::NoScaling), 0);
        assert_eq!(i32::from(BornRadiusScalingMethod::Tanh), 1);
        assert_eq!(i32::from(BornRadiusScalingMethod::QuinticSpline), 2);
        assert_eq!(
            BornRadiusScalingMethod::try_from(2),
            Ok(BornRadiusScalingMethod::QuinticSpline)
        );
        assert_eq!(
            BornRadiusScalingMethod::try_from(3),
            Err(ScalingMethodError::UnknownCode(3))
        );
    }

    #[test]
    fn display_uses_kebab_case_names() {
        assert_eq!(BornRadiusScalingMethod::QuinticSpline.to_string(), "quintic-spline");
        assert_eq!(
            BornRadiusScalingMethod::NoScaling
                .to_string()
                .parse::<BornRadiusScalingMethod>(),
            Ok(BornRadiusScalingMethod::NoScaling)
        );
    }
}
