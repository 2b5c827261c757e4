use std::sync::Arc;

use vidhub_media::MediaHost;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vidhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Remote store for avatars, cover images, thumbnails, and videos.
    pub media: Arc<dyn MediaHost>,
}
