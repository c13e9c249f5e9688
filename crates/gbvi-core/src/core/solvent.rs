use super::array::{ParameterArray, SharedArray};
use super::precision::Real;
use parking_lot::MappedRwLockReadGuard;
use std::fmt::Write;

/// Default relative permittivity of the solute interior.
pub const DEFAULT_SOLUTE_DIELECTRIC: Real = 1.0;
/// Default relative permittivity of the implicit solvent (water).
pub const DEFAULT_SOLVENT_DIELECTRIC: Real = 78.3;
/// Default solvent probe radius in nm.
pub const DEFAULT_PROBE_RADIUS: Real = 0.14;
/// Default surface-area prefactor, 4π times the nonpolar solvation coefficient.
pub const DEFAULT_PI4_ASOLV: Real = 28.3919551;
/// Default electrostatic prefactor, -1/2 of 1/(4πε₀) in kJ·nm/(mol·e²).
pub const DEFAULT_ELECTRIC_CONSTANT: Real = -0.5 * 138.935485;

const REPORT_TAB: &str = "   ";

/// Produces a human-readable, multi-line dump of a parameter container's state.
///
/// Containers that wrap another container should start from the wrapped container's
/// report and append only their own fields.
pub trait StateReport {
    fn state_string(&self, title: Option<&str>) -> String;
}

/// Solvent-model state shared by every implicit-solvent parameter container.
///
/// Holds the atom count that sizes all per-atom arrays, the dielectric constants, the
/// surface-area settings, and the raw atomic radii.
#[derive(Debug)]
pub struct ImplicitSolventParameters {
    number_of_atoms: usize,
    solute_dielectric: Real,
    solvent_dielectric: Real,
    electric_constant: Real,
    probe_radius: Real,
    pi4_asolv: Real,
    atomic_radii: ParameterArray,
}

impl ImplicitSolventParameters {
    /// Creates the base state for `number_of_atoms` atoms with default solvent settings.
    ///
    /// # Panics
    ///
    /// Panics if `number_of_atoms` is zero.
    pub fn new(number_of_atoms: usize) -> Self {
        assert!(
            number_of_atoms > 0,
            "implicit-solvent parameters require at least one atom"
        );
        Self {
            number_of_atoms,
            solute_dielectric: DEFAULT_SOLUTE_DIELECTRIC,
            solvent_dielectric: DEFAULT_SOLVENT_DIELECTRIC,
            electric_constant: DEFAULT_ELECTRIC_CONSTANT,
            probe_radius: DEFAULT_PROBE_RADIUS,
            pi4_asolv: DEFAULT_PI4_ASOLV,
            atomic_radii: ParameterArray::new("atomic_radii", number_of_atoms),
        }
    }

    pub fn number_of_atoms(&self) -> usize {
        self.number_of_atoms
    }

    pub fn solute_dielectric(&self) -> Real {
        self.solute_dielectric
    }

    pub fn set_solute_dielectric(&mut self, dielectric: Real) {
        self.solute_dielectric = dielectric;
    }

    pub fn solvent_dielectric(&self) -> Real {
        self.solvent_dielectric
    }

    pub fn set_solvent_dielectric(&mut self, dielectric: Real) {
        self.solvent_dielectric = dielectric;
    }

    pub fn electric_constant(&self) -> Real {
        self.electric_constant
    }

    pub fn set_electric_constant(&mut self, electric_constant: Real) {
        self.electric_constant = electric_constant;
    }

    pub fn probe_radius(&self) -> Real {
        self.probe_radius
    }

    pub fn set_probe_radius(&mut self, probe_radius: Real) {
        self.probe_radius = probe_radius;
    }

    pub fn pi4_asolv(&self) -> Real {
        self.pi4_asolv
    }

    pub fn set_pi4_asolv(&mut self, pi4_asolv: Real) {
        self.pi4_asolv = pi4_asolv;
    }

    /// Atomic radii, zero-filled and owned on first access if never set.
    pub fn atomic_radii(&mut self) -> MappedRwLockReadGuard<'_, [Real]> {
        self.atomic_radii.values()
    }

    pub fn atomic_radii_slot(&self) -> &ParameterArray {
        &self.atomic_radii
    }

    pub fn atomic_radii_slot_mut(&mut self) -> &mut ParameterArray {
        &mut self.atomic_radii
    }

    /// Borrows an externally owned radii array. See [`ParameterArray::set`].
    pub fn set_atomic_radii(&mut self, radii: SharedArray) {
        self.atomic_radii.set(radii);
    }

    /// Copies `radii` into a fresh owned array. See [`ParameterArray::set_from_slice`].
    pub fn set_atomic_radii_from_slice(&mut self, radii: &[Real]) {
        self.atomic_radii.set_from_slice(radii);
    }

    pub fn set_own_atomic_radii(&mut self, owned: bool) {
        self.atomic_radii.set_owned(owned);
    }
}

fn describe_slot(slot: &ParameterArray) -> String {
    let Some(values) = slot.peek() else {
        return "unset".to_string();
    };
    let kind = if slot.is_owned() { "owned" } else { "borrowed" };
    format!("{kind} ({}/{} values)", values.len(), slot.atom_count())
}

impl StateReport for ImplicitSolventParameters {
    fn state_string(&self, title: Option<&str>) -> String {
        let mut report = String::new();
        if let Some(title) = title {
            let _ = writeln!(report, "{title}");
        }
        let _ = writeln!(report, "{REPORT_TAB}Number of atoms:    {}", self.number_of_atoms);
        let _ = writeln!(report, "{REPORT_TAB}Solute dielectric:  {:.5}", self.solute_dielectric);
        let _ = writeln!(report, "{REPORT_TAB}Solvent dielectric: {:.5}", self.solvent_dielectric);
        let _ = writeln!(report, "{REPORT_TAB}Electric constant:  {:.5}", self.electric_constant);
        let _ = writeln!(report, "{REPORT_TAB}Probe radius:       {:.5}", self.probe_radius);
        let _ = writeln!(report, "{REPORT_TAB}Pi4Asolv:           {:.5}", self.pi4_asolv);
        let _ = writeln!(
            report,
            "{REPORT_TAB}Atomic radii:       {}",
            describe_slot(&self.atomic_radii)
        );
        report
    }
}
