//! # Core Module
//!
//! State owned by a GB-VI softcore parameter container.
//!
//! - [`precision`] - Build-time choice of `f32` or `f64` for every scalar and array
//! - [`array`] - Per-atom arrays that are either owned by the container or borrowed from
//!   an external buffer owner, with release-exactly-once semantics
//! - [`solvent`] - Implicit-solvent base state (atom count, dielectrics, atomic radii) and
//!   the [`solvent::StateReport`] extension point
//! - [`switching`] - Born-radius switching method and its derived quintic spline limit
//! - [`boundary`] - Cutoff and periodic-boundary state with its box-size invariant
//! - [`softcore`] - The [`softcore::GbviSoftcoreParameters`] container

pub mod array;
pub mod boundary;
pub mod precision;
pub mod softcore;
pub mod solvent;
pub mod switching;
