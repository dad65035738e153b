//! Summary counts shown on the dashboard.

use serde::Serialize;

use crate::models::{FileSystemItem, ItemType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub folders: usize,
    pub apps: usize,
    pub web: usize,
    pub widgets: usize,
}

impl DashboardStats {
    /// Count `items` by type. Nesting is ignored: every item counts once.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a FileSystemItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut stats, item| {
            stats.total += 1;
            match item.item_type {
                ItemType::Folder => stats.folders += 1,
                ItemType::App => stats.apps += 1,
                ItemType::Web => stats.web += 1,
                ItemType::Widget => stats.widgets += 1,
            }
            stats
        })
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
