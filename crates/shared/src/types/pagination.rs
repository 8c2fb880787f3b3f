//! Keyset pagination for upstream list endpoints.
//!
//! Large ledger reads are fetched page by page, each page anchored on the last
//! id of the previous one.

use serde::{Deserialize, Serialize};

/// Request parameters for a keyset-paginated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Id of the last item of the previous page; `None` for the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,
}

fn default_page_size() -> u32 {
    1000
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(default_page_size())
    }
}

impl PageRequest {
    /// First page with the given size.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            last_id: None,
        }
    }

    /// The page following an item with the given id.
    #[must_use]
    pub fn after(&self, last_id: impl Into<String>) -> Self {
        Self {
            page_size: self.page_size,
            last_id: Some(last_id.into()),
        }
    }

    /// Returns the limit for upstream queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}
