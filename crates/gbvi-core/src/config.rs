//! # Configuration
//!
//! Declarative description of the scalar settings of a [`GbviSoftcoreParameters`]
//! container: dielectrics, Born-radius switching, and cutoff/periodic boundaries.
//!
//! A configuration can be read from TOML or assembled with [`SoftcoreConfigBuilder`].
//! Every configuration is validated before it touches a container, so a bad periodic
//! box is reported as a [`ConfigError`] instead of reaching the panicking contract check
//! in [`BoundaryConditions::set_periodic`](crate::core::boundary::BoundaryConditions::set_periodic).
//!
//! ```toml
//! solute-dielectric = 1.0
//! solvent-dielectric = 78.3
//!
//! [switching]
//! method = "quintic-spline"
//! lower-limit-factor = 0.8
//! upper-born-radius-limit = 5.0
//!
//! [boundary]
//! cutoff = 1.0
//! periodic-box = [3.0, 3.0, 3.0]
//! ```

use crate::core::boundary::{BoundaryError, check_periodic_box};
use crate::core::precision::Real;
use crate::core::softcore::GbviSoftcoreParameters;
use crate::core::solvent::{DEFAULT_SOLUTE_DIELECTRIC, DEFAULT_SOLVENT_DIELECTRIC};
use crate::core::switching::{
    BornRadiusScalingMethod, DEFAULT_QUINTIC_LOWER_LIMIT_FACTOR,
    DEFAULT_QUINTIC_UPPER_BORN_RADIUS_LIMIT,
};
use nalgebra::Vector3;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid boundary configuration: {0}")]
    Boundary(#[from] BoundaryError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct SwitchingConfig {
    pub method: BornRadiusScalingMethod,
    pub lower_limit_factor: Real,
    pub upper_born_radius_limit: Real,
}

impl Default for SwitchingConfig {
    fn default() -> Self {
        Self {
            method: BornRadiusScalingMethod::default(),
            lower_limit_factor: DEFAULT_QUINTIC_LOWER_LIMIT_FACTOR,
            upper_born_radius_limit: DEFAULT_QUINTIC_UPPER_BORN_RADIUS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct BoundaryConfig {
    pub cutoff: Option<Real>,
    pub periodic_box: Option<[Real; 3]>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct SoftcoreConfig {
    pub solute_dielectric: Real,
    pub solvent_dielectric: Real,
    pub switching: SwitchingConfig,
    pub boundary: BoundaryConfig,
}

impl Default for SoftcoreConfig {
    fn default() -> Self {
        Self {
            solute_dielectric: DEFAULT_SOLUTE_DIELECTRIC,
            solvent_dielectric: DEFAULT_SOLVENT_DIELECTRIC,
            switching: SwitchingConfig::default(),
            boundary: BoundaryConfig::default(),
        }
    }
}

impl SoftcoreConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    /// Reads, parses, and validates a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        config.validate()?;
        debug!(origin, "Loaded softcore configuration.");
        Ok(config)
    }

    /// Checks the settings that the container would otherwise accept silently or reject
    /// with a panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limit = self.switching.upper_born_radius_limit;
        if !(limit.is_finite() && limit > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "upper Born radius limit must be positive and finite, got {limit}"
            )));
        }
        if let Some(cutoff) = self.boundary.cutoff {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "cutoff distance must be positive and finite, got {cutoff}"
                )));
            }
        }
        if let Some(box_size) = self.boundary.periodic_box {
            check_periodic_box(self.boundary.cutoff, &Vector3::from(box_size))?;
        }
        Ok(())
    }

    /// Validates this configuration and writes it into `params`.
    ///
    /// A cutoff given without a box must also fit the periodic box `params` already has.
    /// Nothing is written if validation fails.
    #[instrument(skip_all, name = "apply_softcore_config")]
    pub fn apply(&self, params: &mut GbviSoftcoreParameters) -> Result<(), ConfigError> {
        self.validate()?;
        if let (Some(cutoff), None) = (self.boundary.cutoff, self.boundary.periodic_box) {
            if params.periodic() {
                check_periodic_box(Some(cutoff), params.periodic_box())?;
            }
        }

        let base = params.base_mut();
        base.set_solute_dielectric(self.solute_dielectric);
        base.set_solvent_dielectric(self.solvent_dielectric);

        params.set_born_radius_scaling_method(self.switching.method);
        params.set_quintic_lower_limit_factor(self.switching.lower_limit_factor);
        params.set_quintic_upper_born_radius_limit(self.switching.upper_born_radius_limit);

        match (self.boundary.cutoff, self.boundary.periodic_box) {
            (Some(cutoff), Some(box_size)) => {
                params.set_cutoff_and_periodic(cutoff, Vector3::from(box_size));
            }
            (Some(cutoff), None) => params.set_use_cutoff(cutoff),
            // Rejected by `validate`.
            (None, _) => {}
        }

        info!(
            method = %self.switching.method,
            tau = params.tau(),
            cutoff = params.use_cutoff(),
            periodic = params.periodic(),
            "Applied softcore configuration."
        );
        Ok(())
    }
}

impl GbviSoftcoreParameters {
    /// Creates a container for `number_of_atoms` atoms and applies `config` to it.
    pub fn from_config(
        number_of_atoms: usize,
        config: &SoftcoreConfig,
    ) -> Result<Self, ConfigError> {
        let mut params = Self::new(number_of_atoms);
        config.apply(&mut params)?;
        Ok(params)
    }
}

#[derive(Default)]
pub struct SoftcoreConfigBuilder {
    solute_dielectric: Option<Real>,
    solvent_dielectric: Option<Real>,
    method: Option<BornRadiusScalingMethod>,
    lower_limit_factor: Option<Real>,
    upper_born_radius_limit: Option<Real>,
    cutoff: Option<Real>,
    periodic_box: Option<[Real; 3]>,
}

impl SoftcoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solute_dielectric(mut self, dielectric: Real) -> Self {
        self.solute_dielectric = Some(dielectric);
        self
    }
    pub fn solvent_dielectric(mut self, dielectric: Real) -> Self {
        self.solvent_dielectric = Some(dielectric);
        self
    }
    pub fn method(mut self, method: BornRadiusScalingMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn lower_limit_factor(mut self, factor: Real) -> Self {
        self.lower_limit_factor = Some(factor);
        self
    }
    pub fn upper_born_radius_limit(mut self, limit: Real) -> Self {
        self.upper_born_radius_limit = Some(limit);
        self
    }
    pub fn cutoff(mut self, distance: Real) -> Self {
        self.cutoff = Some(distance);
        self
    }
    pub fn periodic_box(mut self, box_size: [Real; 3]) -> Self {
        self.periodic_box = Some(box_size);
        self
    }

    pub fn build(self) -> Result<SoftcoreConfig, ConfigError> {
        let defaults = SoftcoreConfig::default();
        let config = SoftcoreConfig {
            solute_dielectric: self
                .solute_dielectric
                .unwrap_or(defaults.solute_dielectric),
            solvent_dielectric: self
                .solvent_dielectric
                .unwrap_or(defaults.solvent_dielectric),
            switching: SwitchingConfig {
                method: self.method.unwrap_or(defaults.switching.method),
                lower_limit_factor: self
                    .lower_limit_factor
                    .unwrap_or(defaults.switching.lower_limit_factor),
                upper_born_radius_limit: self
                    .upper_born_radius_limit
                    .unwrap_or(defaults.switching.upper_born_radius_limit),
            },
            boundary: BoundaryConfig {
                cutoff: self.cutoff,
                periodic_box: self.periodic_box,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
