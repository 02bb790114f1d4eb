//! Cache Viewer Core Domain Logic
//!
//! This crate contains:
//! - Catalog model and size arithmetic
//! - Gallery selection and modal navigation
//! - Lazy thumbnail loading
//! - Server client and async transport
//! - Action dispatching
//! - Configuration
//! - Error types
//! - Image decoding

pub mod catalog;
pub mod gallery;
pub mod lazy_load;
pub mod client;
pub mod transport;
pub mod dispatcher;
pub mod state;
pub mod config;
pub mod command;
pub mod error;
pub mod image_loader;

pub use catalog::{
    relative_time, Catalog, CatalogSummary, ImageEntry, SizeLabel, SizeUnit,
};
pub use gallery::GalleryState;
pub use lazy_load::{Bounds, FetchTicket, LazyLoader, LoadState, ObserverConfig};
pub use client::{
    CatalogClient, ClientEvent, ImagePurpose, Notice, NoticeLevel, Reply, Request, Transport,
};
pub use transport::{AsyncTransport, DecodeSizes};
pub use dispatcher::{ActionDispatcher, ContextMenu, ContextTarget, Delivery, UserAction};
pub use state::{ViewerImage, ViewerState};
pub use config::{AppConfig, GalleryConfig, GeneralConfig, ServerConfig};
pub use command::{Command, CommandId};
pub use error::AppError;
pub use image_loader::{ImageDecoder, LoadedImage};
