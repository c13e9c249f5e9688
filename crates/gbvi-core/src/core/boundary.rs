use super::precision::Real;
use nalgebra::Vector3;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum BoundaryError {
    #[error("Periodic boundary conditions require a cutoff to be set first")]
    CutoffRequired,
    #[error(
        "Periodic box dimension {axis} ({size}) is smaller than twice the cutoff distance ({cutoff})"
    )]
    BoxTooSmall { axis: char, size: Real, cutoff: Real },
}

/// Cutoff and periodic-boundary state for nonbonded solvation terms.
///
/// Configuration only moves forward: no cutoff, then a cutoff, then a cutoff with a
/// periodic box. Once periodic, every box edge is at least twice the cutoff distance.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryConditions {
    cutoff: bool,
    cutoff_distance: Real,
    periodic: bool,
    periodic_box_size: Vector3<Real>,
}

impl Default for BoundaryConditions {
    fn default() -> Self {
        Self {
            cutoff: false,
            cutoff_distance: 0.0,
            periodic: false,
            periodic_box_size: Vector3::zeros(),
        }
    }
}

impl BoundaryConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the cutoff and stores its distance.
    ///
    /// # Panics
    ///
    /// Panics if periodic boundaries are already enabled and `distance` is more than half
    /// of any box edge.
    pub fn set_use_cutoff(&mut self, distance: Real) {
        if self.periodic {
            if let Err(e) = check_periodic_box(Some(distance), &self.periodic_box_size) {
                panic!("invalid periodic box: {e}");
            }
        }
        debug!(distance, "Nonbonded cutoff enabled.");
        self.cutoff = true;
        self.cutoff_distance = distance;
    }

    pub fn use_cutoff(&self) -> bool {
        self.cutoff
    }

    pub fn cutoff_distance(&self) -> Real {
        self.cutoff_distance
    }

    /// Checks whether `box_size` could be made periodic under the current cutoff.
    pub fn validate_periodic_box(&self, box_size: &Vector3<Real>) -> Result<(), BoundaryError> {
        check_periodic_box(self.cutoff.then_some(self.cutoff_distance), box_size)
    }

    /// Enables periodic boundary conditions with the given box edge lengths.
    ///
    /// # Panics
    ///
    /// Panics if no cutoff has been set, or if any edge of `box_size` is shorter than
    /// twice the cutoff distance. Neighbor searches that consume this state assume the
    /// condition holds, so a violation is a caller bug rather than a runtime error.
    pub fn set_periodic(&mut self, box_size: Vector3<Real>) {
        if let Err(e) = self.validate_periodic_box(&box_size) {
            panic!("invalid periodic box: {e}");
        }
        debug!(
            x = box_size.x,
            y = box_size.y,
            z = box_size.z,
            "Periodic boundary conditions enabled."
        );
        self.periodic = true;
        self.periodic_box_size = box_size;
    }

    /// Sets the cutoff and the periodic box together, checking the box against the new
    /// cutoff only.
    ///
    /// # Panics
    ///
    /// Panics if any edge of `box_size` is shorter than twice `distance`.
    pub fn set_cutoff_and_periodic(&mut self, distance: Real, box_size: Vector3<Real>) {
        if let Err(e) = check_periodic_box(Some(distance), &box_size) {
            panic!("invalid periodic box: {e}");
        }
        debug!(
            distance,
            x = box_size.x,
            y = box_size.y,
            z = box_size.z,
            "Cutoff and periodic boundary conditions enabled."
        );
        self.cutoff = true;
        self.cutoff_distance = distance;
        self.periodic = true;
        self.periodic_box_size = box_size;
    }

    pub fn periodic(&self) -> bool {
        self.periodic
    }

    pub fn periodic_box(&self) -> &Vector3<Real> {
        &self.periodic_box_size
    }
}

/// Validates a periodic box against an optional cutoff distance.
pub(crate) fn check_periodic_box(
    cutoff: Option<Real>,
    box_size: &Vector3<Real>,
) -> Result<(), BoundaryError> {
    let cutoff = cutoff.ok_or(BoundaryError::CutoffRequired)?;
    for (axis, &size) in ['x', 'y', 'z'].into_iter().zip(box_size.iter()) {
        // Written so that a NaN edge or cutoff fails the check.
        if !(size >= 2.0 * cutoff) {
            return Err(BoundaryError::BoxTooSmall { axis, size, cutoff });
        }
    }
    Ok(())
}
