//! Offset pagination and the sort allow-lists for list endpoints.
//!
//! Callers pick a sort key and direction from enumerated sets; the SQL column
//! names are fixed strings, so user input never reaches an `ORDER BY` clause.
//! Every ordering ends with `id DESC` so pages are stable.

use serde::Serialize;

use crate::error::CoreError;

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Maximum number of items per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-based page number.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// A resolved page request (both values already clamped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            limit: clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub docs: Vec<T>,
    pub total_docs: i64,
    pub limit: i64,
    pub page: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T: Serialize> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: i64, request: PageRequest) -> Self {
        let total_pages = total_pages(total_docs, request.limit);
        Self {
            docs,
            total_docs,
            limit: request.limit,
            page: request.page,
            total_pages,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

/// Number of pages needed to hold `total` items at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Sort direction accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CoreError::Validation(
                "Invalid sort type. Use \"asc\" or \"desc\".".into(),
            )),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sortable video fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSortKey {
    #[default]
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortKey {
    /// Parse the camelCase field name used by clients.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "createdAt" => Ok(Self::CreatedAt),
            "views" => Ok(Self::Views),
            "duration" => Ok(Self::Duration),
            "title" => Ok(Self::Title),
            other => Err(CoreError::Validation(format!(
                "Invalid sort field '{other}'. Must be one of: createdAt, views, duration, title"
            ))),
        }
    }

    /// Column on the `videos` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Views => "views",
            Self::Duration => "duration",
            Self::Title => "title",
        }
    }
}

/// A validated video ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoSort {
    pub key: VideoSortKey,
    pub direction: SortDirection,
}

impl VideoSort {
    /// Resolve the optional `sortBy` / `sortType` query pair.
    ///
    /// A missing key falls back to `createdAt`; a missing direction falls back
    /// to descending.
    pub fn from_query(sort_by: Option<&str>, sort_type: Option<&str>) -> Result<Self, CoreError> {
        let key = sort_by.map(VideoSortKey::parse).transpose()?.unwrap_or_default();
        let direction = sort_type
            .map(SortDirection::parse)
            .transpose()?
            .unwrap_or_default();
        Ok(Self { key, direction })
    }

    /// `ORDER BY` body for a `videos` alias, including the id tiebreaker.
    pub fn order_by(self, alias: &str) -> String {
        format!(
            "{alias}.{} {}, {alias}.id DESC",
            self.key.column(),
            self.direction.as_sql()
        )
    }
}
