//! Remote store seam used when a mask is deleted.
//!
//! Local state is authoritative for the editing session: the engine removes a
//! mask locally first and then tells the remote store. A `NotFound` reply means
//! the record was already gone; any other failure is logged and never rolls the
//! local removal back.

use crate::mask::MaskId;

/// Error returned by a [`RemoteStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The remote has no record of the mask.
    #[error("mask not found: {0}")]
    NotFound(MaskId),
    /// Any other backend failure (network, auth, server error).
    #[error("remote store error: {0}")]
    Backend(String),
}

/// Persistence collaborator for mask records.
pub trait RemoteStore {
    /// Delete the remote copy of a mask.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the record does not exist and
    /// [`StoreError::Backend`] for any other failure.
    fn delete_mask(&self, id: MaskId) -> Result<(), StoreError>;
}

/// A store with nothing behind it. Every delete succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl RemoteStore for LocalOnly {
    fn delete_mask(&self, _id: MaskId) -> Result<(), StoreError> {
        Ok(())
    }
}
