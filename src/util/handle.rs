use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared ownership of a store behind one reader/writer lock.
///
/// Holding the write guard for a whole store call makes that call a single
/// critical section, so two toggles on the same topic never interleave.
pub struct Handle<T>(Arc<RwLock<T>>);

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Handle<T> {
    fn default() -> Self {
        Self::from(T::default())
    }
}

impl<T> From<T> for Handle<T> {
    fn from(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }
}

impl<T: Default> Handle<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

// A panic inside a store call cannot leave a half-applied toggle behind
// (tallies are updated in one step), so a poisoned lock is taken over.
impl<T> Handle<T> {
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.get())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.get_mut())
    }
}
