//! Shared query parameter types for API handlers.

use serde::Deserialize;
use vidhub_core::error::CoreError;
use vidhub_core::pagination::{PageRequest, VideoSort};
use vidhub_core::types::DbId;

/// Generic pagination parameters (`?page=&limit=`).
///
/// Values are clamped by [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Query parameters for `GET /video`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Free-text search over title and description.
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    /// Restrict to one channel's uploads.
    pub user_id: Option<DbId>,
}

impl VideoListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Resolve `sortBy`/`sortType` against the allow-lists.
    pub fn sort(&self) -> Result<VideoSort, CoreError> {
        VideoSort::from_query(self.sort_by.as_deref(), self.sort_type.as_deref())
    }
}
