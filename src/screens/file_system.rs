//! Desktop item screen over the shared file-system store.
//!
//! The list is fetched whole and filtered client-side by the store's search
//! term and type filter.

use std::sync::Arc;

use crate::dashboard::DashboardStats;
use crate::models::{DesktopLayout, FileSystemItem, Position, UpdateFileSystemItem};
use crate::services::FileSystemService;
use crate::state::{AppContext, FileSystemStore, TypeFilter};
use crate::validation::FileSystemItemForm;

use super::{Confirm, DeleteOutcome, ScreenError, settle_reload};

#[derive(Debug)]
pub struct FileSystemScreen {
    context: Arc<AppContext>,
    service: FileSystemService,
    loading: bool,
}

impl FileSystemScreen {
    #[must_use]
    pub fn new(context: Arc<AppContext>) -> Self {
        let service = context.file_system_service();
        Self { context, service, loading: false }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the store contents with the backend list.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the store is left as it was.
    pub async fn load(&mut self) -> Result<usize, ScreenError> {
        self.loading = true;
        let result = self.service.list().await;
        self.loading = false;
        let items = result?;
        let count = items.len();
        self.context.update_file_system(|store| store.set_items(items));
        Ok(count)
    }

    /// Set the search term and type filter in one step.
    pub fn filter(&self, search_term: impl Into<String>, filter_type: TypeFilter) {
        let search_term = search_term.into();
        self.context.update_file_system(|store| {
            store.set_search_term(search_term);
            store.set_filter_type(filter_type);
        });
    }

    #[must_use]
    pub fn visible(&self) -> Vec<FileSystemItem> {
        self.context.with_file_system(FileSystemStore::filtered)
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        self.context.with_file_system(FileSystemStore::stats)
    }

    /// # Errors
    ///
    /// [`ScreenError::Validation`] before any call, or the gateway error.
    pub async fn submit(&mut self, editing: Option<&str>, form: &FileSystemItemForm) -> Result<FileSystemItem, ScreenError> {
        let item = match editing {
            Some(id) => {
                let patch = form.validate_update()?;
                self.service.update(id, &patch).await?
            }
            None => {
                let new_item = form.validate_create()?;
                self.service.create(&new_item).await?
            }
        };
        settle_reload("file_system", self.load().await);
        Ok(item)
    }

    /// Move an item on the desktop grid; the cached copy is patched in place.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the cache is untouched on failure.
    pub async fn move_item(&self, id: &str, position: Position) -> Result<FileSystemItem, ScreenError> {
        let patch = UpdateFileSystemItem { position: Some(position), ..UpdateFileSystemItem::default() };
        let item = self.service.update(id, &patch).await?;
        self.context.update_file_system(|store| store.update(id, &patch));
        Ok(item)
    }

    /// Fetch the saved layout and move cached items into their slots.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the cache is untouched on failure.
    pub async fn restore_layout(&self) -> Result<DesktopLayout, ScreenError> {
        let layout = self.service.get_layout().await?;
        let placed = self.context.update_file_system(|store| store.apply_layout(&layout));
        tracing::debug!(slots = layout.items.len(), placed, "desktop layout restored");
        Ok(layout)
    }

    /// Save the current positions of the items sitting on the desktop.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn save_layout(&self) -> Result<DesktopLayout, ScreenError> {
        let layout = self.context.with_file_system(FileSystemStore::layout);
        Ok(self.service.save_layout(&layout).await?)
    }

    /// # Errors
    ///
    /// Returns the gateway error from the delete. A failed reload is only logged.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if !confirm.confirm(&format!("Delete item {id}?")) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete(id).await?;
        self.context.update_file_system(|store| store.delete(id));
        settle_reload("file_system", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
#[path = "file_system_test.rs"]
mod tests;
