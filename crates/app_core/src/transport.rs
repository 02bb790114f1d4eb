//! Runs server requests on a tokio runtime and hands replies back over a channel

use crate::client::{ImagePurpose, Reply, Request, Transport};
use crate::image_loader::ImageDecoder;
use crate::AppError;
use app_client::CacheBackend;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Decoders per image purpose
#[derive(Debug, Clone, Copy)]
pub struct DecodeSizes {
    pub thumbnail: ImageDecoder,
    pub viewer: ImageDecoder,
}

/// Transport spawning each request as a task on the runtime
pub struct AsyncTransport {
    runtime: Handle,
    backend: Arc<dyn CacheBackend>,
    replies: Sender<Reply>,
    decoders: DecodeSizes,
}

impl AsyncTransport {
    /// Create a transport and the receiver the UI thread drains
    pub fn new(
        runtime: Handle,
        backend: Arc<dyn CacheBackend>,
        decoders: DecodeSizes,
    ) -> (Self, Receiver<Reply>) {
        let (replies, rx) = crossbeam_channel::unbounded();
        (
            Self {
                runtime,
                backend,
                replies,
                decoders,
            },
            rx,
        )
    }
}

impl Transport for AsyncTransport {
    fn submit(&self, request: Request) {
        let backend = self.backend.clone();
        let replies = self.replies.clone();
        let decoders = self.decoders;

        self.runtime.spawn(async move {
            let reply = execute(backend.as_ref(), request, decoders).await;
            if replies.send(reply).is_err() {
                tracing::debug!("Reply dropped: receiver closed");
            }
        });
    }
}

async fn execute(backend: &dyn CacheBackend, request: Request, decoders: DecodeSizes) -> Reply {
    match request {
        Request::ListImages { seq } => Reply::Catalog {
            seq,
            result: backend.list_images().await,
        },

        Request::FetchImage { name, purpose } => {
            let decoder = match purpose {
                ImagePurpose::Thumbnail(_) => decoders.thumbnail,
                ImagePurpose::Viewer { .. } => decoders.viewer,
            };
            let result = match backend.fetch_image(&name).await {
                Ok(bytes) => decode_blocking(decoder, name.clone(), bytes).await,
                Err(e) => Err(AppError::from(e)),
            };
            Reply::Image {
                name,
                purpose,
                result,
            }
        }

        Request::DeleteCache => Reply::CacheDeleted(backend.delete_cache().await),

        Request::DeleteImage { name } => {
            let result = backend.delete_image(&name).await;
            Reply::ImageDeleted { name, result }
        }

        Request::OpenInExplorer { name } => {
            let result = backend.open_in_explorer(&name).await;
            Reply::ExplorerOpened { name, result }
        }
    }
}

async fn decode_blocking(
    decoder: ImageDecoder,
    name: String,
    bytes: Vec<u8>,
) -> Result<crate::LoadedImage, AppError> {
    tokio::task::spawn_blocking(move || decoder.decode(&name, &bytes))
        .await
        .map_err(|e| AppError::ImageDecode(format!("decode task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_client::{CatalogResponse, ClientError, ImageInfo, Timestamp};
    use async_trait::async_trait;
    use image::{ImageFormat, Rgba, RgbaImage};
    use parking_lot::Mutex;
    use std::io::Cursor;
    use std::time::Duration;

    /// In-memory stand-in for the cache server
    #[derive(Default)]
    struct FakeBackend {
        images: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FakeBackend {
        fn with_png(name: &str, width: u32, height: u32) -> Self {
            let img = RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255]));
            let mut out = Cursor::new(Vec::new());
            img.write_to(&mut out, ImageFormat::Png).unwrap();
            Self {
                images: Mutex::new(vec![(name.to_string(), out.into_inner())]),
            }
        }

        fn missing(name: &str) -> ClientError {
            ClientError::Status {
                status: 404,
                endpoint: format!("/images/{}", name),
            }
        }
    }

    #[async_trait]
    impl CacheBackend for FakeBackend {
        async fn list_images(&self) -> app_client::Result<CatalogResponse> {
            let images: Vec<ImageInfo> = self
                .images
                .lock()
                .iter()
                .map(|(name, bytes)| ImageInfo {
                    name: name.clone(),
                    timestamp: Timestamp::Millis(0),
                    size: format!("{:.2} MB", bytes.len() as f64 / (1024.0 * 1024.0)),
                })
                .collect();
            Ok(CatalogResponse {
                total: images.len(),
                images,
            })
        }

        async fn fetch_image(&self, name: &str) -> app_client::Result<Vec<u8>> {
            self.images
                .lock()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| Self::missing(name))
        }

        async fn delete_cache(&self) -> app_client::Result<()> {
            self.images.lock().clear();
            Ok(())
        }

        async fn delete_image(&self, name: &str) -> app_client::Result<()> {
            let mut images = self.images.lock();
            let before = images.len();
            images.retain(|(n, _)| n != name);
            if images.len() == before {
                return Err(Self::missing(name));
            }
            Ok(())
        }

        async fn open_in_explorer(&self, _name: &str) -> app_client::Result<()> {
            Ok(())
        }
    }

    fn transport(backend: FakeBackend) -> (tokio::runtime::Runtime, AsyncTransport, Receiver<Reply>) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let decoders = DecodeSizes {
            thumbnail: ImageDecoder::new(8),
            viewer: ImageDecoder::new(64),
        };
        let (transport, rx) = AsyncTransport::new(runtime.handle().clone(), Arc::new(backend), decoders);
        (runtime, transport, rx)
    }

    fn recv(rx: &Receiver<Reply>) -> Reply {
        rx.recv_timeout(Duration::from_secs(5)).expect("no reply within 5s")
    }

    #[test]
    fn test_list_images() {
        let (_rt, transport, rx) = transport(FakeBackend::with_png("a.png", 4, 4));
        transport.submit(Request::ListImages { seq: 7 });

        match recv(&rx) {
            Reply::Catalog { seq, result } => {
                assert_eq!(seq, 7);
                let response = result.unwrap();
                assert_eq!(response.total, 1);
                assert_eq!(response.images[0].name, "a.png");
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_thumbnail_is_decoded_and_shrunk() {
        let (_rt, transport, rx) = transport(FakeBackend::with_png("a.png", 32, 16));
        let purpose = ImagePurpose::Thumbnail(crate::FetchTicket { generation: 1, index: 0 });
        transport.submit(Request::FetchImage { name: "a.png".into(), purpose });

        match recv(&rx) {
            Reply::Image { name, purpose: got, result } => {
                assert_eq!(name, "a.png");
                assert_eq!(got, purpose);
                let image = result.unwrap();
                assert_eq!((image.width, image.height), (8, 4));
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_viewer_uses_larger_decoder() {
        let (_rt, transport, rx) = transport(FakeBackend::with_png("a.png", 32, 16));
        let purpose = ImagePurpose::Viewer { generation: 1, index: 0 };
        transport.submit(Request::FetchImage { name: "a.png".into(), purpose });

        let Reply::Image { result, .. } = recv(&rx) else {
            panic!("expected an image reply");
        };
        let image = result.unwrap();
        assert_eq!((image.width, image.height), (32, 16));
    }

    #[test]
    fn test_missing_image_is_error() {
        let (_rt, transport, rx) = transport(FakeBackend::default());
        let purpose = ImagePurpose::Viewer { generation: 1, index: 0 };
        transport.submit(Request::FetchImage { name: "gone.png".into(), purpose });

        let Reply::Image { result, .. } = recv(&rx) else {
            panic!("expected an image reply");
        };
        assert!(matches!(result, Err(AppError::Client(ClientError::Status { status: 404, .. }))));
    }

    #[test]
    fn test_delete_image_reply() {
        let (_rt, transport, rx) = transport(FakeBackend::with_png("a.png", 2, 2));
        transport.submit(Request::DeleteImage { name: "a.png".into() });
        let Reply::ImageDeleted { name, result } = recv(&rx) else {
            panic!("expected a delete reply");
        };
        assert_eq!(name, "a.png");
        assert!(result.is_ok());

        transport.submit(Request::DeleteImage { name: "a.png".into() });
        let Reply::ImageDeleted { result, .. } = recv(&rx) else {
            panic!("expected a delete reply");
        };
        assert!(result.is_err());
    }
}
