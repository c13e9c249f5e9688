//! # GB-VI Softcore Parameters
//!
//! Parameter container for the softcore variant of the GB-VI implicit-solvent model used
//! during molecular-dynamics force-field evaluation.
//!
//! ## Architecture
//!
//! - **[`core`]: The State.** Per-atom parameter arrays with tracked ownership
//!   ([`core::array`]), the implicit-solvent base ([`core::solvent`]), the Born-radius
//!   switching configuration ([`core::switching`]), cutoff/periodic-boundary state
//!   ([`core::boundary`]), and the container that ties them together
//!   ([`core::softcore::GbviSoftcoreParameters`]).
//!
//! - **[`config`]: The Setup Layer.** A validated, TOML-loadable description of the scalar
//!   settings that can be applied to a container without ever tripping its contract checks.
//!
//! Numeric precision is fixed at build time through [`core::precision::Real`].
//! Energies and forces are computed elsewhere; this crate only owns and maintains the
//! inputs those evaluators read.

pub mod config;
pub mod core;
