//! Build-time numeric precision.
//!
//! Every scalar and per-atom array in this crate uses [`Real`]. The default build uses
//! double precision; enabling the `single-precision` cargo feature switches the whole
//! crate to `f32` so the parameters can be handed to single-precision kernels without a
//! conversion pass.

#[cfg(not(feature = "single-precision"))]
pub type Real = f64;

#[cfg(feature = "single-precision")]
pub type Real = f32;
