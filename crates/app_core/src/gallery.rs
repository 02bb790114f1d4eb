//! Gallery selection and modal navigation state

use crate::catalog::{Catalog, ImageEntry};
use crate::AppError;

/// Selection state over the current catalog
///
/// Indices always refer to the catalog currently held; installing a new
/// catalog resets every index and bumps the generation.
#[derive(Debug, Default)]
pub struct GalleryState {
    catalog: Catalog,

    /// Grid item carrying the selection marker
    highlighted: Option<usize>,

    /// Item shown (or last shown) in the modal
    active: Option<usize>,

    modal_open: bool,

    generation: u64,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched catalog
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.highlighted = None;
        self.active = None;
        self.modal_open = false;
        self.generation += 1;

        tracing::debug!(
            "Catalog replaced: {} entries (generation {})",
            self.catalog.len(),
            self.generation
        );
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn check_index(&self, index: usize) -> Result<(), AppError> {
        if index < self.catalog.len() {
            Ok(())
        } else {
            Err(AppError::IndexOutOfRange {
                index,
                len: self.catalog.len(),
            })
        }
    }

    /// Highlight an item and make it the active one
    pub fn select(&mut self, index: usize) -> Result<(), AppError> {
        self.check_index(index)?;
        self.highlighted = Some(index);
        self.active = Some(index);
        Ok(())
    }

    /// Show the modal at `index`
    pub fn open_modal_at(&mut self, index: usize) -> Result<&ImageEntry, AppError> {
        self.check_index(index)?;
        self.active = Some(index);
        self.modal_open = true;
        self.catalog
            .get(index)
            .ok_or(AppError::IndexOutOfRange { index, len: self.catalog.len() })
    }

    /// Advance the active item, wrapping past the end
    pub fn next(&mut self) -> Option<&ImageEntry> {
        self.step(1)
    }

    /// Retreat the active item, wrapping before the start
    pub fn prev(&mut self) -> Option<&ImageEntry> {
        let len = self.catalog.len();
        if len == 0 {
            return None;
        }
        self.step(len - 1)
    }

    fn step(&mut self, forward: usize) -> Option<&ImageEntry> {
        let len = self.catalog.len();
        if len == 0 {
            return None;
        }
        let current = self.active?;
        let index = (current + forward) % len;
        self.active = Some(index);
        self.catalog.get(index)
    }

    /// Hide the modal; the active index is kept
    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&ImageEntry> {
        self.active.and_then(|i| self.catalog.get(i))
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted == Some(index)
    }
}
