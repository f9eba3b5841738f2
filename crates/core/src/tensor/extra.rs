//! Overflow storage for descriptors beyond the inline array
//!
//! Both representations keep the first [`SIZE_LIMIT_STATIC`] descriptors
//! inline. Descriptors `SIZE_LIMIT_STATIC..SIZE_LIMIT` live in an
//! [`ExtraInfo`] that is allocated at most once per collection and freed
//! only with it.

use crate::tensor::{SIZE_LIMIT, SIZE_LIMIT_STATIC};
use crate::Result;

/// Number of descriptors held by an extra store
pub const EXTRA_CAPACITY: usize = SIZE_LIMIT - SIZE_LIMIT_STATIC;

/// Lazily allocated side storage for overflow descriptors
///
/// Indices taken by [`get`](Self::get) and [`get_mut`](Self::get_mut) are
/// collection indices, not offsets into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraInfo<T> {
    infos: Vec<T>,
}

impl<T: Default> ExtraInfo<T> {
    /// Allocate a store of [`EXTRA_CAPACITY`] empty descriptors
    pub fn try_new() -> Result<Self> {
        let mut infos = Vec::new();
        infos.try_reserve_exact(EXTRA_CAPACITY)?;
        infos.resize_with(EXTRA_CAPACITY, T::default);
        Ok(Self { infos })
    }

    /// Create the store in `slot` unless one is already there
    ///
    /// Calling this on an occupied slot is a no-op and keeps the existing
    /// descriptors.
    pub fn ensure(slot: &mut Option<Self>) -> Result<&mut Self> {
        let extra = match slot.take() {
            Some(extra) => extra,
            None => {
                tracing::debug!(capacity = EXTRA_CAPACITY, "creating extra tensors info");
                Self::try_new()?
            }
        };
        Ok(slot.insert(extra))
    }

    /// Reset every descriptor to its empty state
    pub fn reset(&mut self) {
        self.infos.iter_mut().for_each(|info| *info = T::default());
    }
}

impl<T> ExtraInfo<T> {
    /// Descriptor at collection index `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        index
            .checked_sub(SIZE_LIMIT_STATIC)
            .and_then(|offset| self.infos.get(offset))
    }

    /// Mutable descriptor at collection index `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        index
            .checked_sub(SIZE_LIMIT_STATIC)
            .and_then(|offset| self.infos.get_mut(offset))
    }

    /// All overflow descriptors in index order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.infos.iter()
    }

    /// Number of descriptors the store holds
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether the store holds no descriptors
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
