//! Mask store: the in-memory container for every committed mask.
//!
//! `MaskStore` owns the masks for one editing session plus the creation
//! counter that stamps each new mask's `order`. It has no knowledge of
//! locking, modes or selection; those guards live in [`crate::mask`] and
//! [`crate::engine`]. The renderer reads from it via [`MaskStore::sorted_masks`]
//! to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use crate::mask::{Mask, MaskId};

/// In-memory store of masks.
#[derive(Debug, Clone)]
pub struct MaskStore {
    masks: HashMap<MaskId, Mask>,
    next_order: u64,
}

impl MaskStore {
    /// Create an empty store. The first mask gets order `1`.
    #[must_use]
    pub fn new() -> Self {
        Self { masks: HashMap::new(), next_order: 1 }
    }

    /// Take the next creation order. Never returns the same value twice.
    pub fn next_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// Peek at the order the next mask would receive.
    #[must_use]
    pub fn peek_order(&self) -> u64 {
        self.next_order
    }

    /// Insert or replace a mask. If a mask with the same `id` already
    /// exists it is overwritten.
    pub fn insert(&mut self, mask: Mask) {
        if mask.order >= self.next_order {
            self.next_order = mask.order + 1;
        }
        self.masks.insert(mask.id, mask);
    }

    /// Remove a mask by id, returning it if it was present.
    pub fn remove(&mut self, id: &MaskId) -> Option<Mask> {
        self.masks.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &MaskId) -> Option<&Mask> {
        self.masks.get(id)
    }

    pub fn get_mut(&mut self, id: &MaskId) -> Option<&mut Mask> {
        self.masks.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &MaskId) -> bool {
        self.masks.contains_key(id)
    }

    /// Replace all masks with a full snapshot. The order counter only moves forward.
    pub fn load_snapshot(&mut self, masks: Vec<Mask>) {
        self.masks.clear();
        for mask in masks {
            self.insert(mask);
        }
    }

    /// All masks sorted by `(z_index, order)` for draw order.
    #[must_use]
    pub fn sorted_masks(&self) -> Vec<&Mask> {
        let mut masks: Vec<&Mask> = self.masks.values().collect();
        masks.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.order.cmp(&b.order)));
        masks
    }

    /// Swap `id` with its neighbour in draw order.
    ///
    /// z-indexes are rewritten to draw-order ranks starting at 1 so ties and
    /// gaps cannot make a mask jump past a third one. Returns the ids whose
    /// `z_index` changed; `None` when `id` is unknown or already at that end.
    pub fn swap_z(&mut self, id: &MaskId, forward: bool) -> Option<Vec<MaskId>> {
        let mut ids: Vec<MaskId> = self.sorted_masks().iter().map(|m| m.id).collect();
        let pos = ids.iter().position(|mid| mid == id)?;
        let other = if forward { pos + 1 } else { pos.checked_sub(1)? };
        if other >= ids.len() {
            return None;
        }
        ids.swap(pos, other);
        let mut changed = Vec::new();
        for (rank, mid) in (1_i64..).zip(ids) {
            if let Some(m) = self.masks.get_mut(&mid) {
                if m.z_index != rank {
                    m.z_index = rank;
                    changed.push(mid);
                }
            }
        }
        Some(changed)
    }

    /// Number of masks currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Returns `true` if the store contains no masks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

impl Default for MaskStore {
    fn default() -> Self {
        Self::new()
    }
}
