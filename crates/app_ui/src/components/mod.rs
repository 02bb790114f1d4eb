//! UI Components

pub mod thumbnail_grid;
pub mod image_modal;
pub mod context_menu;
pub mod toolbar;
pub mod status_bar;
pub mod dialogs;

pub use thumbnail_grid::{GridAction, GridCell, GridLayout, GridOutput, ThumbnailGrid};
pub use image_modal::{ImageModal, ModalAction, ModalCaption, ModalContent};
pub use context_menu::{ContextMenuAction, ContextMenuView};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarInfo};
pub use status_bar::{StatusBar, StatusInfo};
pub use dialogs::NoticeDialog;
