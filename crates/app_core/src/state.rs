//! Application state owned by the UI thread

use crate::catalog::{Catalog, CatalogSummary};
use crate::config::GalleryConfig;
use crate::gallery::GalleryState;
use crate::lazy_load::{LazyLoader, ObserverConfig};

/// Image shown by the modal viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerImage {
    Empty,
    Loading { generation: u64, index: usize },
    Ready { generation: u64, index: usize },
    Failed { generation: u64, index: usize },
}

impl ViewerImage {
    fn key(&self) -> Option<(u64, usize)> {
        match *self {
            ViewerImage::Empty => None,
            ViewerImage::Loading { generation, index }
            | ViewerImage::Ready { generation, index }
            | ViewerImage::Failed { generation, index } => Some((generation, index)),
        }
    }
}

/// Everything the views read; mutated only through the dispatcher
pub struct ViewerState {
    pub gallery: GalleryState,
    pub thumbnails: LazyLoader,
    pub summary: CatalogSummary,
    pub viewer: ViewerImage,
}

impl ViewerState {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            gallery: GalleryState::new(),
            thumbnails: LazyLoader::new(ObserverConfig::from(config)),
            summary: CatalogSummary::default(),
            viewer: ViewerImage::Empty,
        }
    }

    /// Replace the catalog and everything derived from it
    pub fn install_catalog(&mut self, catalog: Catalog) {
        self.summary = catalog.summary();
        let len = catalog.len();
        self.gallery.replace_catalog(catalog);
        self.thumbnails.reset(self.gallery.generation(), len);
        self.viewer = ViewerImage::Empty;
    }

    /// Whether the viewer is waiting on exactly this image
    pub fn viewer_awaits(&self, generation: u64, index: usize) -> bool {
        self.viewer == ViewerImage::Loading { generation, index }
    }

    /// Whether the viewer slot belongs to the current active entry
    pub fn viewer_is_current(&self) -> bool {
        match (self.viewer.key(), self.gallery.active_index()) {
            (Some((generation, index)), Some(active)) => {
                generation == self.gallery.generation() && index == active
            }
            _ => false,
        }
    }
}
