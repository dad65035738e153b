use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// `size` when it is one of [`PAGE_SIZE_OPTIONS`], otherwise [`DEFAULT_PAGE_SIZE`].
#[must_use]
pub fn supported_page_size(size: u32) -> u32 {
    if PAGE_SIZE_OPTIONS.contains(&size) { size } else { DEFAULT_PAGE_SIZE }
}

/// One page of a server-paginated list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn empty(page_size: u32) -> Self {
        Self { total: 0, page: 1, page_size, data: Vec::new() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Body of the `batch-delete` endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDeleteParams {
    pub ids: Vec<String>,
}
