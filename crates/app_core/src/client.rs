//! Catalog client: issues server requests and interprets their replies

use crate::catalog::Catalog;
use crate::image_loader::LoadedImage;
use crate::lazy_load::FetchTicket;
use crate::AppError;
use app_client::{CatalogResponse, ClientError};
use std::collections::VecDeque;

/// What a fetched image is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePurpose {
    /// Grid thumbnail of a lazily loaded entry
    Thumbnail(FetchTicket),
    /// Full view in the modal
    Viewer { generation: u64, index: usize },
}

/// Request handed to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListImages { seq: u64 },
    FetchImage { name: String, purpose: ImagePurpose },
    DeleteCache,
    DeleteImage { name: String },
    OpenInExplorer { name: String },
}

/// Completion of a request, delivered back on the UI thread
#[derive(Debug)]
pub enum Reply {
    Catalog {
        seq: u64,
        result: Result<CatalogResponse, ClientError>,
    },
    Image {
        name: String,
        purpose: ImagePurpose,
        result: Result<LoadedImage, AppError>,
    },
    CacheDeleted(Result<(), ClientError>),
    ImageDeleted {
        name: String,
        result: Result<(), ClientError>,
    },
    ExplorerOpened {
        name: String,
        result: Result<(), ClientError>,
    },
}

/// Starts requests without blocking; replies arrive later as [`Reply`]
pub trait Transport {
    fn submit(&self, request: Request);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message shown to the user in a blocking dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Result of interpreting a reply
#[derive(Debug)]
pub enum ClientEvent {
    /// A newer catalog replaces the displayed one
    CatalogLoaded(Catalog),
    /// An image fetch finished, successfully or not
    ImageLoaded {
        purpose: ImagePurpose,
        result: Result<LoadedImage, AppError>,
    },
}

/// Client for the cache server
pub struct CatalogClient {
    transport: Box<dyn Transport>,
    notices: VecDeque<Notice>,
    next_seq: u64,
    applied_seq: u64,
    delete_all_in_flight: bool,
}

impl CatalogClient {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            notices: VecDeque::new(),
            next_seq: 1,
            applied_seq: 0,
            delete_all_in_flight: false,
        }
    }

    /// Request the current image list
    pub fn refresh(&mut self) {
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!("Refreshing catalog (seq {})", seq);
        self.transport.submit(Request::ListImages { seq });
    }

    /// Request deletion of the whole cache. Returns false if one is already running.
    pub fn delete_all(&mut self) -> bool {
        if self.delete_all_in_flight {
            tracing::debug!("Delete-all already in flight, ignoring");
            return false;
        }
        self.delete_all_in_flight = true;
        self.transport.submit(Request::DeleteCache);
        true
    }

    pub fn is_delete_all_in_flight(&self) -> bool {
        self.delete_all_in_flight
    }

    pub fn delete_one(&mut self, name: &str) {
        tracing::info!("Deleting {}", name);
        self.transport.submit(Request::DeleteImage {
            name: name.to_string(),
        });
    }

    pub fn open_in_explorer(&mut self, name: &str) {
        self.transport.submit(Request::OpenInExplorer {
            name: name.to_string(),
        });
    }

    pub fn fetch_image(&mut self, name: &str, purpose: ImagePurpose) {
        self.transport.submit(Request::FetchImage {
            name: name.to_string(),
            purpose,
        });
    }

    /// Interpret a completed request, queueing notices and follow-up refreshes
    pub fn on_reply(&mut self, reply: Reply) -> Option<ClientEvent> {
        match reply {
            Reply::Catalog { seq, result } => match result {
                Ok(response) => {
                    if seq < self.applied_seq {
                        tracing::debug!("Dropping catalog seq {} (have {})", seq, self.applied_seq);
                        return None;
                    }
                    self.applied_seq = seq;
                    let catalog = Catalog::from_response(response);
                    tracing::info!("Catalog loaded: {} images", catalog.len());
                    Some(ClientEvent::CatalogLoaded(catalog))
                }
                Err(e) => {
                    tracing::error!("Failed to load images: {}", e);
                    self.notices.push_back(Notice::error("Failed to load images."));
                    None
                }
            },

            Reply::Image { purpose, result, name } => {
                if let Err(e) = &result {
                    tracing::warn!("Failed to load {}: {}", name, e);
                }
                Some(ClientEvent::ImageLoaded { purpose, result })
            }

            Reply::CacheDeleted(result) => {
                self.delete_all_in_flight = false;
                match result {
                    Ok(()) => {
                        tracing::info!("Cache deleted");
                        self.refresh();
                        self.notices.push_back(Notice::info("All cache has been deleted."));
                    }
                    Err(e) => {
                        tracing::error!("Failed to delete cache: {}", e);
                        self.notices.push_back(Notice::error("Failed to delete cache."));
                    }
                }
                None
            }

            Reply::ImageDeleted { name, result } => {
                match result {
                    Ok(()) => {
                        self.refresh();
                        self.notices.push_back(Notice::info(format!("Deleted {}", name)));
                    }
                    Err(e) => {
                        tracing::error!("Failed to delete {}: {}", name, e);
                        self.notices.push_back(Notice::error("Failed to delete image."));
                    }
                }
                None
            }

            Reply::ExplorerOpened { name, result } => {
                if let Err(e) = result {
                    tracing::error!("Failed to open {} in explorer: {}", name, e);
                    self.notices
                        .push_back(Notice::error("Failed to open file in explorer."));
                }
                None
            }
        }
    }

    /// Take queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Transport that only records what was submitted
    #[derive(Clone, Default)]
    pub(crate) struct RecordingTransport {
        pub requests: Arc<Mutex<Vec<Request>>>,
    }

    impl RecordingTransport {
        pub fn take(&self) -> Vec<Request> {
            std::mem::take(&mut *self.requests.lock())
        }
    }

    impl Transport for RecordingTransport {
        fn submit(&self, request: Request) {
            self.requests.lock().push(request);
        }
    }

    fn client() -> (CatalogClient, RecordingTransport) {
        let transport = RecordingTransport::default();
        (CatalogClient::new(Box::new(transport.clone())), transport)
    }

    fn server_error() -> ClientError {
        ClientError::Status {
            status: 500,
            endpoint: "/delete-image".into(),
        }
    }

    fn refreshes(requests: &[Request]) -> usize {
        requests
            .iter()
            .filter(|r| matches!(r, Request::ListImages { .. }))
            .count()
    }

    #[test]
    fn test_delete_one_success() {
        let (mut client, transport) = client();
        client.delete_one("x");
        assert_eq!(transport.take(), vec![Request::DeleteImage { name: "x".into() }]);

        client.on_reply(Reply::ImageDeleted { name: "x".into(), result: Ok(()) });

        assert_eq!(refreshes(&transport.take()), 1);
        let notices = client.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains('x'));
        assert_eq!(notices[0].level, NoticeLevel::Info);
    }

    #[test]
    fn test_delete_one_failure() {
        let (mut client, transport) = client();
        client.delete_one("x");
        transport.take();

        client.on_reply(Reply::ImageDeleted { name: "x".into(), result: Err(server_error()) });

        assert_eq!(refreshes(&transport.take()), 0);
        assert_eq!(client.take_notices(), vec![Notice::error("Failed to delete image.")]);
    }

    #[test]
    fn test_delete_all_guard() {
        let (mut client, transport) = client();
        assert!(client.delete_all());
        assert!(!client.delete_all());
        assert_eq!(transport.take(), vec![Request::DeleteCache]);

        client.on_reply(Reply::CacheDeleted(Ok(())));
        assert!(!client.is_delete_all_in_flight());
        assert_eq!(refreshes(&transport.take()), 1);
        assert_eq!(client.take_notices(), vec![Notice::info("All cache has been deleted.")]);

        assert!(client.delete_all());
    }

    #[test]
    fn test_delete_all_failure_releases_guard() {
        let (mut client, transport) = client();
        client.delete_all();
        client.on_reply(Reply::CacheDeleted(Err(server_error())));

        assert_eq!(refreshes(&transport.take()), 0);
        assert_eq!(client.take_notices(), vec![Notice::error("Failed to delete cache.")]);
        assert!(client.delete_all());
    }

    #[test]
    fn test_explorer_success_is_silent() {
        let (mut client, _transport) = client();
        client.on_reply(Reply::ExplorerOpened { name: "x".into(), result: Ok(()) });
        assert!(client.take_notices().is_empty());

        client.on_reply(Reply::ExplorerOpened { name: "x".into(), result: Err(server_error()) });
        assert_eq!(client.take_notices(), vec![Notice::error("Failed to open file in explorer.")]);
    }

    #[test]
    fn test_refresh_failure_keeps_catalog() {
        let (mut client, _transport) = client();
        client.refresh();
        let event = client.on_reply(Reply::Catalog { seq: 1, result: Err(server_error()) });
        assert!(event.is_none());
        assert_eq!(client.take_notices().len(), 1);
    }

    #[test]
    fn test_out_of_order_catalogs() {
        let (mut client, transport) = client();
        client.refresh();
        client.refresh();
        assert_eq!(
            transport.take(),
            vec![Request::ListImages { seq: 1 }, Request::ListImages { seq: 2 }]
        );

        let newer = client.on_reply(Reply::Catalog { seq: 2, result: Ok(CatalogResponse::default()) });
        assert!(matches!(newer, Some(ClientEvent::CatalogLoaded(_))));

        let older = client.on_reply(Reply::Catalog { seq: 1, result: Ok(CatalogResponse::default()) });
        assert!(older.is_none());
    }
}
