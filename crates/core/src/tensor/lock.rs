//! Optional locking around API-side collections
//!
//! A collection that may be shared is wrapped in a [`parking_lot::Mutex`];
//! one with a single owner is wrapped in [`NoLock`], which never blocks and
//! is `!Sync`, so it cannot be shared by reference between threads. Release
//! happens when the guard returned by [`Lockable::acquire`] is dropped.

use std::cell::{RefCell, RefMut};
use std::ops::DerefMut;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// A container that hands out exclusive access to its value
pub trait Lockable {
    /// The protected value
    type Target;

    /// Guard holding access until dropped
    type Guard<'a>: DerefMut<Target = Self::Target>
    where
        Self: 'a;

    /// Acquire access, blocking when the container is a real lock
    fn acquire(&self) -> Self::Guard<'_>;
}

impl<T> Lockable for Mutex<T> {
    type Target = T;
    type Guard<'a>
        = MutexGuard<'a, T>
    where
        Self: 'a;

    fn acquire(&self) -> Self::Guard<'_> {
        self.lock()
    }
}

impl<L: Lockable> Lockable for Arc<L> {
    type Target = L::Target;
    type Guard<'a>
        = L::Guard<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Self::Guard<'_> {
        L::acquire(self)
    }
}

/// Lock-free wrapper for single-owner collections
///
/// Access is not re-entrant: acquiring again while a guard from
/// [`Lockable::acquire`] is alive panics. Drop the guard before passing the
/// wrapper to a function that acquires it, such as
/// [`copy_to_pipeline`](crate::tensor::copy_to_pipeline).
#[derive(Debug, Default)]
pub struct NoLock<T> {
    value: RefCell<T>,
}

impl<T> NoLock<T> {
    /// Wrap `value`
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
        }
    }

    /// Unwrap the value
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T> Lockable for NoLock<T> {
    type Target = T;
    type Guard<'a>
        = RefMut<'a, T>
    where
        Self: 'a;

    /// # Panics
    ///
    /// Panics when a guard from an earlier `acquire` is still alive.
    fn acquire(&self) -> Self::Guard<'_> {
        self.value.borrow_mut()
    }
}
