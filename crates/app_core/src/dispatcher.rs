//! Translates user gestures into state changes and server requests

use crate::client::{CatalogClient, ClientEvent, ImagePurpose, Notice, Reply};
use crate::image_loader::LoadedImage;
use crate::lazy_load::Bounds;
use crate::state::{ViewerImage, ViewerState};

/// Gesture reported by the view layer
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Toolbar refresh or keyboard command
    Refresh,
    /// Left click on a grid item
    PrimaryClick(usize),
    /// Right click on a grid item at pointer position
    SecondaryClick { index: usize, x: f32, y: f32 },
    /// Click outside the open context menu
    DismissContextMenu,
    OpenTargetInExplorer,
    DeleteTarget,
    DeleteAll,
    ModalNext,
    ModalPrev,
    CloseModal,
}

/// Entry a context menu action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTarget {
    pub index: usize,
    pub name: String,
}

/// Open context menu
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub target: ContextTarget,
    pub anchor: (f32, f32),
}

/// Decoded image the view layer should upload
#[derive(Debug)]
pub enum Delivery {
    Thumbnail { index: usize, image: LoadedImage },
    Viewer { index: usize, image: LoadedImage },
}

/// Routes actions and replies between the views, the state and the client
pub struct ActionDispatcher {
    client: CatalogClient,
    context_menu: Option<ContextMenu>,
}

impl ActionDispatcher {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            context_menu: None,
        }
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn is_delete_all_in_flight(&self) -> bool {
        self.client.is_delete_all_in_flight()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.client.take_notices()
    }

    pub fn handle(&mut self, action: UserAction, state: &mut ViewerState) {
        tracing::trace!("Action: {:?}", action);

        match action {
            UserAction::Refresh => self.client.refresh(),

            UserAction::PrimaryClick(index) => {
                if let Err(e) = state.gallery.select(index) {
                    tracing::warn!("Ignoring click: {}", e);
                    return;
                }
                if state.gallery.open_modal_at(index).is_ok() {
                    self.request_viewer_image(state);
                }
            }

            UserAction::SecondaryClick { index, x, y } => {
                let Some(entry) = state.gallery.catalog().get(index) else {
                    tracing::warn!("Ignoring context click on missing item {}", index);
                    return;
                };
                self.context_menu = Some(ContextMenu {
                    target: ContextTarget {
                        index,
                        name: entry.name.clone(),
                    },
                    anchor: (x, y),
                });
                let _ = state.gallery.select(index);
            }

            UserAction::DismissContextMenu => {
                self.context_menu = None;
            }

            UserAction::OpenTargetInExplorer => match self.context_menu.take() {
                Some(menu) => self.client.open_in_explorer(&menu.target.name),
                None => tracing::debug!("Open in explorer without a target"),
            },

            UserAction::DeleteTarget => match self.context_menu.take() {
                Some(menu) => self.client.delete_one(&menu.target.name),
                None => tracing::debug!("Delete without a target"),
            },

            UserAction::DeleteAll => {
                self.client.delete_all();
            }

            UserAction::ModalNext => {
                if state.gallery.is_modal_open() && state.gallery.next().is_some() {
                    self.request_viewer_image(state);
                }
            }

            UserAction::ModalPrev => {
                if state.gallery.is_modal_open() && state.gallery.prev().is_some() {
                    self.request_viewer_image(state);
                }
            }

            UserAction::CloseModal => state.gallery.close_modal(),
        }
    }

    /// Feed one grid cell's on-screen position to the lazy loader, fetching
    /// its thumbnail if it just became visible
    pub fn observe_thumbnail(
        &mut self,
        state: &mut ViewerState,
        index: usize,
        item: &Bounds,
        viewport: &Bounds,
    ) {
        if let Some(ticket) = state.thumbnails.observe(index, item, viewport) {
            if let Some(entry) = state.gallery.catalog().get(index) {
                self.client
                    .fetch_image(&entry.name, ImagePurpose::Thumbnail(ticket));
            }
        }
    }

    fn request_viewer_image(&mut self, state: &mut ViewerState) {
        let Some(index) = state.gallery.active_index() else {
            return;
        };
        let generation = state.gallery.generation();

        if state.viewer_is_current() && !matches!(state.viewer, ViewerImage::Failed { .. }) {
            return;
        }

        if let Some(entry) = state.gallery.catalog().get(index) {
            state.viewer = ViewerImage::Loading { generation, index };
            self.client
                .fetch_image(&entry.name, ImagePurpose::Viewer { generation, index });
        }
    }

    /// Apply a completed request to the state
    pub fn on_reply(&mut self, reply: Reply, state: &mut ViewerState) -> Option<Delivery> {
        match self.client.on_reply(reply)? {
            ClientEvent::CatalogLoaded(catalog) => {
                self.context_menu = None;
                state.install_catalog(catalog);
                None
            }

            ClientEvent::ImageLoaded {
                purpose: ImagePurpose::Thumbnail(ticket),
                result,
            } => {
                if !state.thumbnails.complete(ticket, result.is_ok()) {
                    return None;
                }
                result.ok().map(|image| Delivery::Thumbnail {
                    index: ticket.index,
                    image,
                })
            }

            ClientEvent::ImageLoaded {
                purpose: ImagePurpose::Viewer { generation, index },
                result,
            } => {
                if !state.viewer_awaits(generation, index) {
                    return None;
                }
                match result {
                    Ok(image) => {
                        state.viewer = ViewerImage::Ready { generation, index };
                        Some(Delivery::Viewer { index, image })
                    }
                    Err(_) => {
                        state.viewer = ViewerImage::Failed { generation, index };
                        None
                    }
                }
            }
        }
    }
}
