//! Cache Viewer - desktop gallery for a local image cache server
//!
//! Main entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::{Context, Result};
use app_client::HttpBackend;
use app_core::{ActionDispatcher, AppConfig, AsyncTransport, CatalogClient, DecodeSizes, ImageDecoder};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    // Logging and panic hook first; the guard flushes the log file on exit
    let _log_guard = app_log::init("info")?;

    if let Err(e) = app_log::cleanup_old_logs(&app_log::log_dir(), 7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Cache Viewer starting...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };
    if !AppConfig::config_path().exists() {
        if let Err(e) = config.save() {
            tracing::warn!("Failed to write default configuration: {}", e);
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("cache-viewer-io")
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let backend = HttpBackend::new(
        &config.server.base_url,
        Duration::from_secs(config.server.request_timeout_secs),
    )
    .context("Invalid server configuration")?;

    let decoders = DecodeSizes {
        thumbnail: ImageDecoder::new(config.gallery.thumbnail_size),
        viewer: ImageDecoder::new(config.gallery.viewer_max_dimension),
    };
    let (transport, replies) = AsyncTransport::new(runtime.handle().clone(), Arc::new(backend), decoders);
    let dispatcher = ActionDispatcher::new(CatalogClient::new(Box::new(transport)));

    let result = app::run(config, dispatcher, replies);

    runtime.shutdown_timeout(Duration::from_secs(1));
    tracing::info!("Cache Viewer stopped");
    result
}
