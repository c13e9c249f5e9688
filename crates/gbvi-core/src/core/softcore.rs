use super::array::{ParameterArray, SharedArray};
use super::boundary::BoundaryConditions;
use super::precision::Real;
use super::solvent::{ImplicitSolventParameters, StateReport};
use super::switching::{BornRadiusScaling, BornRadiusScalingMethod};
use nalgebra::Vector3;
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard};

/// Parameters for the softcore GB-VI implicit-solvent model.
///
/// Extends the implicit-solvent base with three per-atom arrays (scaled radii, gamma
/// parameters, Born radius scale factors), the Born-radius switching configuration, and
/// cutoff/periodic-boundary state.
///
/// Each per-atom array is a [`ParameterArray`]: it is either owned by this container and
/// released when replaced or dropped, or borrowed from an external owner (for example a
/// device-buffer wrapper) and never released here. Typical GPU setup hands the wrapper's
/// buffers over with `set_*` and then marks them as not owned:
///
/// ```
/// use gbvi_softcore::core::array::shared_array;
/// use gbvi_softcore::core::softcore::GbviSoftcoreParameters;
///
/// let device_radii = shared_array(vec![0.0; 3]);
/// let mut params = GbviSoftcoreParameters::new(3);
/// params.set_scaled_radii(device_radii.clone());
/// params.set_own_scaled_radii(false);
/// params.scaled_radii_mut().copy_from_slice(&[0.15, 0.12, 0.17]);
/// drop(params);
/// assert_eq!(device_radii.read().as_slice(), &[0.15, 0.12, 0.17]);
/// ```
#[derive(Debug)]
pub struct GbviSoftcoreParameters {
    base: ImplicitSolventParameters,
    scaled_radii: ParameterArray,
    gamma_parameters: ParameterArray,
    born_radius_scale_factors: ParameterArray,
    scaling: BornRadiusScaling,
    boundary: BoundaryConditions,
}

impl GbviSoftcoreParameters {
    /// Creates a container for `number_of_atoms` atoms.
    ///
    /// All per-atom arrays start empty, switching is disabled, the quintic limits take
    /// their defaults (lower factor 0.8, upper Born radius 5.0), and neither a cutoff nor
    /// periodic boundaries are set.
    ///
    /// # Panics
    ///
    /// Panics if `number_of_atoms` is zero.
    pub fn new(number_of_atoms: usize) -> Self {
        Self {
            base: ImplicitSolventParameters::new(number_of_atoms),
            scaled_radii: ParameterArray::new("scaled_radii", number_of_atoms),
            gamma_parameters: ParameterArray::new("gamma_parameters", number_of_atoms),
            born_radius_scale_factors: ParameterArray::new(
                "born_radius_scale_factors",
                number_of_atoms,
            ),
            scaling: BornRadiusScaling::default(),
            boundary: BoundaryConditions::default(),
        }
    }

    pub fn base(&self) -> &ImplicitSolventParameters {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ImplicitSolventParameters {
        &mut self.base
    }

    pub fn number_of_atoms(&self) -> usize {
        self.base.number_of_atoms()
    }

    // Atomic radii live on the base.

    pub fn atomic_radii(&mut self) -> MappedRwLockReadGuard<'_, [Real]> {
        self.base.atomic_radii()
    }

    pub fn set_atomic_radii(&mut self, radii: SharedArray) {
        self.base.set_atomic_radii(radii);
    }

    pub fn set_atomic_radii_from_slice(&mut self, radii: &[Real]) {
        self.base.set_atomic_radii_from_slice(radii);
    }

    // Scaled radii.

    /// Scaled radii, zero-filled and owned on first access if never set.
    pub fn scaled_radii(&mut self) -> MappedRwLockReadGuard<'_, [Real]> {
        self.scaled_radii.values()
    }

    pub fn scaled_radii_mut(&mut self) -> MappedRwLockWriteGuard<'_, [Real]> {
        self.scaled_radii.values_mut()
    }

    /// Borrows an externally owned array. See [`ParameterArray::set`].
    pub fn set_scaled_radii(&mut self, radii: SharedArray) {
        self.scaled_radii.set(radii);
    }

    /// Copies `radii` into a fresh owned array. See [`ParameterArray::set_from_slice`].
    pub fn set_scaled_radii_from_slice(&mut self, radii: &[Real]) {
        self.scaled_radii.set_from_slice(radii);
    }

    pub fn set_own_scaled_radii(&mut self, owned: bool) {
        self.scaled_radii.set_owned(owned);
    }

    pub fn scaled_radii_slot(&mut self) -> &mut ParameterArray {
        &mut self.scaled_radii
    }

    // Gamma parameters.

    /// Gamma parameters, zero-filled and owned on first access if never set.
    pub fn gamma_parameters(&mut self) -> MappedRwLockReadGuard<'_, [Real]> {
        self.gamma_parameters.values()
    }

    pub fn gamma_parameters_mut(&mut self) -> MappedRwLockWriteGuard<'_, [Real]> {
        self.gamma_parameters.values_mut()
    }

    pub fn set_gamma_parameters(&mut self, gammas: SharedArray) {
        self.gamma_parameters.set(gammas);
    }

    pub fn set_gamma_parameters_from_slice(&mut self, gammas: &[Real]) {
        self.gamma_parameters.set_from_slice(gammas);
    }

    pub fn set_own_gamma_parameters(&mut self, owned: bool) {
        self.gamma_parameters.set_owned(owned);
    }

    pub fn gamma_parameters_slot(&mut self) -> &mut ParameterArray {
        &mut self.gamma_parameters
    }

    // Born radius scale factors.

    /// Born radius scale factors, zero-filled and owned on first access if never set.
    pub fn born_radius_scale_factors(&mut self) -> MappedRwLockReadGuard<'_, [Real]> {
        self.born_radius_scale_factors.values()
    }

    pub fn born_radius_scale_factors_mut(&mut self) -> MappedRwLockWriteGuard<'_, [Real]> {
        self.born_radius_scale_factors.values_mut()
    }

    pub fn set_born_radius_scale_factors(&mut self, factors: SharedArray) {
        self.born_radius_scale_factors.set(factors);
    }

    pub fn set_born_radius_scale_factors_from_slice(&mut self, factors: &[Real]) {
        self.born_radius_scale_factors.set_from_slice(factors);
    }

    pub fn set_own_born_radius_scale_factors(&mut self, owned: bool) {
        self.born_radius_scale_factors.set_owned(owned);
    }

    pub fn born_radius_scale_factors_slot(&mut self) -> &mut ParameterArray {
        &mut self.born_radius_scale_factors
    }

    // Switching function.

    pub fn born_radius_scaling(&self) -> &BornRadiusScaling {
        &self.scaling
    }

    pub fn born_radius_scaling_method(&self) -> BornRadiusScalingMethod {
        self.scaling.method()
    }

    pub fn set_born_radius_scaling_method(&mut self, method: BornRadiusScalingMethod) {
        self.scaling.set_method(method);
    }

    pub fn quintic_lower_limit_factor(&self) -> Real {
        self.scaling.lower_limit_factor()
    }

    pub fn set_quintic_lower_limit_factor(&mut self, factor: Real) {
        self.scaling.set_lower_limit_factor(factor);
    }

    pub fn quintic_upper_born_radius_limit(&self) -> Real {
        self.scaling.upper_born_radius_limit()
    }

    /// Sets the upper Born radius limit; the upper spline limit follows as `limit^-3`.
    pub fn set_quintic_upper_born_radius_limit(&mut self, limit: Real) {
        self.scaling.set_upper_born_radius_limit(limit);
    }

    pub fn quintic_upper_spline_limit(&self) -> Real {
        self.scaling.upper_spline_limit()
    }

    // Cutoff and periodic boundaries.

    pub fn boundary(&self) -> &BoundaryConditions {
        &self.boundary
    }

    /// Enables the cutoff. See [`BoundaryConditions::set_use_cutoff`].
    ///
    /// # Panics
    ///
    /// Panics if periodic boundaries are enabled and the box is narrower than twice
    /// `distance`.
    pub fn set_use_cutoff(&mut self, distance: Real) {
        self.boundary.set_use_cutoff(distance);
    }

    pub fn use_cutoff(&self) -> bool {
        self.boundary.use_cutoff()
    }

    pub fn cutoff_distance(&self) -> Real {
        self.boundary.cutoff_distance()
    }

    /// Enables periodic boundaries. See [`BoundaryConditions::set_periodic`].
    ///
    /// # Panics
    ///
    /// Panics if no cutoff is set or any box edge is shorter than twice the cutoff.
    pub fn set_periodic(&mut self, box_size: Vector3<Real>) {
        self.boundary.set_periodic(box_size);
    }

    /// Sets cutoff and periodic box in one step. See
    /// [`BoundaryConditions::set_cutoff_and_periodic`].
    pub fn set_cutoff_and_periodic(&mut self, distance: Real, box_size: Vector3<Real>) {
        self.boundary.set_cutoff_and_periodic(distance, box_size);
    }

    pub fn periodic(&self) -> bool {
        self.boundary.periodic()
    }

    pub fn periodic_box(&self) -> &Vector3<Real> {
        self.boundary.periodic_box()
    }

    /// Dielectric prefactor `1/ε_solute - 1/ε_solvent`, or zero if either dielectric is zero.
    pub fn tau(&self) -> Real {
        let solute = self.base.solute_dielectric();
        let solvent = self.base.solvent_dielectric();
        if solute != 0.0 && solvent != 0.0 {
            1.0 / solute - 1.0 / solvent
        } else {
            0.0
        }
    }
}

impl StateReport for GbviSoftcoreParameters {
    fn state_string(&self, title: Option<&str>) -> String {
        self.base.state_string(title)
    }
}
