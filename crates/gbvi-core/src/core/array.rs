use super::precision::Real;
use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A per-atom buffer that can be shared between a parameter container and an external
/// owner, such as a wrapper around a device-resident buffer.
///
/// Every holder of the handle sees the same storage. Dropping a handle never frees the
/// storage while other handles exist; only the exclusive owner releases it.
pub type SharedArray = Arc<RwLock<Vec<Real>>>;

/// Wraps `values` in a fresh [`SharedArray`] handle.
pub fn shared_array(values: Vec<Real>) -> SharedArray {
    Arc::new(RwLock::new(values))
}

/// A per-atom parameter slot holding an optional array and an ownership flag.
///
/// The slot is either empty, the owner of its array, or a borrower of an array that
/// belongs to someone else. Only an owning slot ever releases its array, and it does so
/// exactly once: on replacement, or when the slot itself is dropped.
///
/// Reads allocate lazily. The first read of an empty slot creates a zero-filled array of
/// `atom_count` elements and marks the slot as its owner.
#[derive(Debug)]
pub struct ParameterArray {
    /// Name used in log events (e.g. "scaled_radii").
    name: &'static str,
    /// Length of arrays this slot allocates.
    atom_count: usize,
    array: Option<SharedArray>,
    owned: bool,
}

impl ParameterArray {
    /// Creates an empty, non-owning slot sized for `atom_count` atoms.
    pub fn new(name: &'static str, atom_count: usize) -> Self {
        Self {
            name,
            atom_count,
            array: None,
            owned: false,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Returns `true` if an array is currently attached, owned or borrowed.
    pub fn is_allocated(&self) -> bool {
        self.array.is_some()
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Sets the ownership flag without touching the attached array.
    ///
    /// Clearing the flag hands responsibility for the storage to an external owner;
    /// setting it makes this slot the one that releases the array later.
    pub fn set_owned(&mut self, owned: bool) {
        trace!(array = self.name, owned, "Ownership flag updated.");
        self.owned = owned;
    }

    /// Returns a read view of the array, allocating a zero-filled owned array first if
    /// the slot is empty.
    pub fn values(&mut self) -> MappedRwLockReadGuard<'_, [Real]> {
        RwLockReadGuard::map(self.ensure_allocated().read(), |values| values.as_slice())
    }

    /// Returns a write view of the array, allocating lazily like [`values`](Self::values).
    pub fn values_mut(&mut self) -> MappedRwLockWriteGuard<'_, [Real]> {
        RwLockWriteGuard::map(self.ensure_allocated().write(), |values| {
            values.as_mut_slice()
        })
    }

    /// Returns a read view of the array if one is attached, without allocating.
    pub fn peek(&self) -> Option<MappedRwLockReadGuard<'_, [Real]>> {
        self.array
            .as_ref()
            .map(|array| RwLockReadGuard::map(array.read(), |values| values.as_slice()))
    }

    /// Returns a clone of the shared handle, allocating lazily like
    /// [`values`](Self::values).
    pub fn handle(&mut self) -> SharedArray {
        Arc::clone(self.ensure_allocated())
    }

    /// Attaches a caller-supplied array.
    ///
    /// If the slot owns a different array, that array is released first and the
    /// ownership flag is cleared: the new array is treated as borrowed until the caller
    /// says otherwise with [`set_owned`](Self::set_owned). Re-attaching the array that is
    /// already held leaves ownership untouched.
    pub fn set(&mut self, array: SharedArray) {
        let same = self
            .array
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &array));

        if self.owned && !same {
            self.release_owned();
            self.owned = false;
        }

        trace!(array = self.name, owned = self.owned, "Attached external array.");
        self.array = Some(array);
    }

    /// Replaces the array with a freshly allocated, owned copy of `values`.
    ///
    /// The new array always has `atom_count` elements. Only the leading
    /// `min(values.len(), atom_count)` elements are copied; a shorter input leaves the
    /// remaining elements at zero and a longer input is cut off. No error is reported
    /// for either mismatch.
    pub fn set_from_slice(&mut self, values: &[Real]) {
        self.release_owned();

        let mut fresh = vec![0.0; self.atom_count];
        let copied = values.len().min(self.atom_count);
        fresh[..copied].copy_from_slice(&values[..copied]);

        if values.len() != self.atom_count {
            trace!(
                array = self.name,
                supplied = values.len(),
                atom_count = self.atom_count,
                "Length mismatch on copy; copied the overlapping prefix."
            );
        }

        self.array = Some(shared_array(fresh));
        self.owned = true;
    }

    fn ensure_allocated(&mut self) -> &SharedArray {
        if self.array.is_none() {
            trace!(
                array = self.name,
                atom_count = self.atom_count,
                "Allocating zero-filled array on first access."
            );
            self.owned = true;
        }
        let atom_count = self.atom_count;
        self.array
            .get_or_insert_with(|| shared_array(vec![0.0; atom_count]))
    }

    /// Frees the storage of the attached array if this slot owns it, and detaches it.
    /// Borrowed arrays are left attached.
    ///
    /// If a view of the array is still alive elsewhere, the storage cannot be emptied
    /// without blocking, so the array is only detached and its memory goes away with the
    /// last handle.
    fn release_owned(&mut self) {
        if !self.owned {
            return;
        }
        if let Some(array) = self.array.take() {
            match array.try_write() {
                Some(mut values) => {
                    drop(std::mem::take(&mut *values));
                    debug!(array = self.name, "Released owned array.");
                }
                None => warn!(
                    array = self.name,
                    "Owned array is locked by another view; detached without freeing storage."
                ),
            }
        }
    }
}

impl Drop for ParameterArray {
    fn drop(&mut self) {
        self.release_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(values: &[Real]) -> SharedArray {
        shared_array(values.to_vec())
    }

    #[test]
    fn new_slot_is_empty_and_not_owned() {
        let slot = ParameterArray::new("gamma", 4);
        assert!(!slot.is_allocated());
        assert!(!slot.is_owned());
        assert!(slot.peek().is_none());
        assert_eq!(slot.atom_count(), 4);
    }

    #[test]
    fn first_read_allocates_zero_filled_owned_array() {
        for atom_count in [1, 7, 128] {
            let mut slot = ParameterArray::new("scaled_radii", atom_count);
            let values = slot.values();
            assert_eq!(values.len(), atom_count);
            assert!(values.iter().all(|&v| v == 0.0));
            drop(values);
            assert!(slot.is_owned());
            assert!(slot.is_allocated());
        }
    }

    #[test]
    fn repeated_reads_return_the_same_array() {
        let mut slot = ParameterArray::new("gamma", 3);
        slot.values_mut()[1] = 2.5;
        let first = slot.handle();
        let second = slot.handle();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(slot.values()[1], 2.5);
    }

    #[test]
    fn set_owned_changes_only_the_flag() {
        let mut slot = ParameterArray::new("gamma", 2);
        slot.values_mut()[0] = 1.0;
        let handle = slot.handle();
        slot.set_owned(false);
        assert!(!slot.is_owned());
        assert!(Arc::ptr_eq(&handle, &slot.handle()));
        assert_eq!(handle.read().as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn set_releases_previously_owned_array_once_and_leaves_new_array_alone() {
        let mut slot = ParameterArray::new("scaled_radii", 3);
        let previous = slot.handle();
        slot.set_owned(true);

        let replacement = external(&[1.0, 2.0, 3.0]);
        slot.set(Arc::clone(&replacement));

        assert!(previous.read().is_empty());
        assert_eq!(Arc::strong_count(&previous), 1);
        assert!(!slot.is_owned());
        assert_eq!(replacement.read().as_slice(), &[1.0, 2.0, 3.0]);

        drop(slot);
        assert_eq!(replacement.read().as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(Arc::strong_count(&replacement), 1);
    }

    #[test]
    fn set_with_the_same_array_keeps_ownership() {
        let mut slot = ParameterArray::new("gamma", 2);
        let handle = slot.handle();
        slot.set(Arc::clone(&handle));
        assert!(slot.is_owned());
        assert_eq!(handle.read().len(), 2);
    }

    #[test]
    fn set_over_a_borrowed_array_does_not_release_it() {
        let mut slot = ParameterArray::new("gamma", 2);
        let first = external(&[4.0, 5.0]);
        slot.set(Arc::clone(&first));
        slot.set(external(&[6.0, 7.0]));
        assert_eq!(first.read().as_slice(), &[4.0, 5.0]);
        assert_eq!(slot.values().to_vec(), vec![6.0, 7.0]);
    }

    #[test]
    fn dropping_a_slot_never_releases_a_borrowed_array() {
        let buffer = external(&[0.5, 1.5]);
        let mut slot = ParameterArray::new("born_radius_scale_factors", 2);
        slot.set(Arc::clone(&buffer));
        slot.set_owned(false);
        drop(slot);
        assert_eq!(buffer.read().as_slice(), &[0.5, 1.5]);
    }

    #[test]
    fn dropping_a_slot_releases_an_array_whose_ownership_was_transferred_to_it() {
        let buffer = external(&[0.5, 1.5]);
        let mut slot = ParameterArray::new("born_radius_scale_factors", 2);
        slot.set(Arc::clone(&buffer));
        slot.set_owned(true);
        drop(slot);
        assert!(buffer.read().is_empty());
    }

    #[test]
    fn set_from_slice_copies_into_a_fresh_owned_array() {
        let mut slot = ParameterArray::new("gamma", 3);
        let borrowed = external(&[9.0, 9.0, 9.0]);
        slot.set(Arc::clone(&borrowed));

        slot.set_from_slice(&[1.0, 2.0, 3.0]);

        assert!(slot.is_owned());
        assert_eq!(slot.values().to_vec(), vec![1.0, 2.0, 3.0]);
        assert!(!Arc::ptr_eq(&borrowed, &slot.handle()));
        assert_eq!(borrowed.read().as_slice(), &[9.0, 9.0, 9.0]);
    }

    #[test]
    fn set_from_slice_releases_the_previous_owned_array() {
        let mut slot = ParameterArray::new("gamma", 2);
        let previous = slot.handle();
        slot.set_from_slice(&[1.0, 2.0]);
        assert!(previous.read().is_empty());
    }

    #[test]
    fn set_from_slice_does_not_block_on_a_live_view_of_the_previous_array() {
        let mut slot = ParameterArray::new("gamma", 2);
        slot.values_mut()[0] = 3.0;
        let previous = slot.handle();
        let view = previous.read();

        slot.set_from_slice(&[1.0, 2.0]);

        assert_eq!(view.as_slice(), &[3.0, 0.0]);
        drop(view);
        assert!(slot.is_owned());
        assert_eq!(slot.values().to_vec(), vec![1.0, 2.0]);
        assert_eq!(Arc::strong_count(&previous), 1);
    }

    #[test]
    fn dropping_a_slot_does_not_block_on_a_live_view() {
        let mut slot = ParameterArray::new("gamma", 2);
        let handle = slot.handle();
        let view = handle.read();
        drop(slot);
        assert_eq!(view.len(), 2);
    }

    // Lenient on purpose: a short input is not rejected, the tail simply stays zero.
    #[test]
    fn set_from_shorter_slice_leaves_tail_zeroed() {
        let mut slot = ParameterArray::new("scaled_radii", 5);
        slot.set_from_slice(&[1.0, 2.0]);
        assert_eq!(slot.values().to_vec(), vec![1.0, 2.0, 0.0, 0.0, 0.0]);
    }

    // Lenient on purpose: extra input beyond the atom count is dropped.
    #[test]
    fn set_from_longer_slice_truncates_to_atom_count() {
        let mut slot = ParameterArray::new("scaled_radii", 2);
        slot.set_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(slot.values().to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn external_array_of_other_length_is_kept_as_is() {
        let mut slot = ParameterArray::new("gamma", 3);
        slot.set(external(&[1.0]));
        assert_eq!(slot.values().len(), 1);
    }
}
