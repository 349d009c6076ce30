//! Shared storage cell behind every value handle.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A reference-counted, lock-protected storage cell.
///
/// Cloning the handle aliases the cell. Only this module and its parent can
/// allocate a cell, so every cell is created through a `Value` factory.
#[repr(transparent)]
pub struct Storage<T>(Arc<RwLock<T>>);

impl<T> Storage<T> {
    #[inline]
    pub(super) fn new(value: T) -> Self {
        Storage(Arc::new(RwLock::new(value)))
    }

    /// Overwrite the cell's contents.
    #[inline]
    pub(super) fn replace(&self, value: T) {
        *self.0.write() = value;
    }

    /// Whether both handles refer to the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Storage<T> {
    /// Snapshot of the cell's contents.
    #[inline]
    pub fn get(&self) -> T {
        self.0.read().clone()
    }
}

impl<T> Clone for Storage<T> {
    #[inline]
    fn clone(&self) -> Self {
        Storage(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Storage").field(&*self.0.read()).finish()
    }
}
