//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppContext` is built once at startup and handed to every screen. It owns
//! the config, the session, the gateway, and the two client-side stores: UI
//! flags and the desktop item cache with its filter. Stores are only changed
//! through the setters here; locks are `std::sync` and never held across an
//! await.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConsoleConfig};
use crate::dashboard::DashboardStats;
use crate::gateway::{Gateway, GatewayError, ReqwestTransport, Transport};
use crate::models::{DesktopLayout, FileSystemItem, ItemType, UpdateFileSystemItem};
use crate::services::{AuthService, DictionaryService, FileSystemService, MarketService, MenuService, UserService};
use crate::session::Session;
use crate::storage::{FileStore, Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

// =============================================================================
// UI STATE
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_collapsed: bool,
    pub theme: Theme,
}

// =============================================================================
// FILE SYSTEM STORE
// =============================================================================

/// Type filter of the desktop item list; `all` matches every type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ItemType),
}

impl TypeFilter {
    #[must_use]
    pub fn matches(self, item_type: ItemType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == item_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(item_type) => fmt::Display::fmt(item_type, f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

/// Cached desktop items keyed by id, plus the list filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileSystemStore {
    items: BTreeMap<String, FileSystemItem>,
    search_term: String,
    filter_type: TypeFilter,
}

impl FileSystemStore {
    pub fn set_items(&mut self, items: impl IntoIterator<Item = FileSystemItem>) {
        self.items = items.into_iter().map(|item| (item.id.clone(), item)).collect();
    }

    /// Insert or replace by id.
    pub fn add(&mut self, item: FileSystemItem) {
        self.items.insert(item.id.clone(), item);
    }

    /// Merge `patch` into the cached item. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, patch: &UpdateFileSystemItem) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &str) -> Option<FileSystemItem> {
        self.items.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FileSystemItem> {
        self.items.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &FileSystemItem> {
        self.items.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_filter_type(&mut self, filter: TypeFilter) {
        self.filter_type = filter;
    }

    #[must_use]
    pub fn filter_type(&self) -> TypeFilter {
        self.filter_type
    }

    /// Items whose name or id contains the search term (case-insensitive)
    /// and whose type passes the type filter.
    #[must_use]
    pub fn filtered(&self) -> Vec<FileSystemItem> {
        let needle = self.search_term.to_lowercase();
        self.items
            .values()
            .filter(|item| {
                needle.is_empty() || item.name.to_lowercase().contains(&needle) || item.id.to_lowercase().contains(&needle)
            })
            .filter(|item| self.filter_type.matches(item.item_type))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_items(self.items.values())
    }

    #[must_use]
    pub fn layout(&self) -> DesktopLayout {
        DesktopLayout::from_items(self.items.values())
    }

    /// Move cached items to their saved slots. Returns how many were placed.
    pub fn apply_layout(&mut self, layout: &DesktopLayout) -> usize {
        let mut placed = 0;
        for slot in &layout.items {
            if let Some(item) = self.items.get_mut(&slot.id) {
                item.position = Some(slot.position);
                if slot.size.is_some() {
                    item.size = slot.size;
                }
                placed += 1;
            }
        }
        placed
    }
}

// =============================================================================
// APP CONTEXT
// =============================================================================

pub struct AppContext {
    config: ConsoleConfig,
    session: Arc<Session>,
    gateway: Gateway,
    ui: RwLock<UiState>,
    file_system: RwLock<FileSystemStore>,
}

impl AppContext {
    /// File-backed session storage and the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] if the storage file is unreadable or the HTTP
    /// client cannot be built.
    pub fn open(config: ConsoleConfig) -> Result<Self, ContextError> {
        let path = config.resolved_storage_path()?;
        let store = FileStore::open(path)?;
        let storage = Storage::new(Arc::new(store), config.storage_prefix.clone());
        let transport = ReqwestTransport::new(config.timeouts)?;
        Ok(Self::with_parts(config, storage, Arc::new(transport)))
    }

    #[must_use]
    pub fn with_parts(config: ConsoleConfig, storage: Storage, transport: Arc<dyn Transport>) -> Self {
        let session = Arc::new(Session::new(storage));
        let gateway = Gateway::new(config.base_url.clone(), transport, Arc::clone(&session));
        Self {
            config,
            session,
            gateway,
            ui: RwLock::new(UiState::default()),
            file_system: RwLock::new(FileSystemStore::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.gateway.clone())
    }

    #[must_use]
    pub fn users(&self) -> UserService {
        UserService::new(self.gateway.clone())
    }

    #[must_use]
    pub fn menu(&self) -> MenuService {
        MenuService::new(self.gateway.clone())
    }

    #[must_use]
    pub fn dictionary(&self) -> DictionaryService {
        DictionaryService::new(self.gateway.clone())
    }

    #[must_use]
    pub fn market(&self) -> MarketService {
        MarketService::new(self.gateway.clone())
    }

    #[must_use]
    pub fn file_system_service(&self) -> FileSystemService {
        FileSystemService::new(self.gateway.clone())
    }

    // -------------------------------------------------------------------------
    // UI
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn ui(&self) -> UiState {
        *self.ui.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.ui.write().unwrap_or_else(PoisonError::into_inner).sidebar_collapsed = collapsed;
    }

    pub fn set_theme(&self, theme: Theme) {
        self.ui.write().unwrap_or_else(PoisonError::into_inner).theme = theme;
    }

    // -------------------------------------------------------------------------
    // FILE SYSTEM
    // -------------------------------------------------------------------------

    /// Read the desktop item store.
    pub fn with_file_system<R>(&self, read: impl FnOnce(&FileSystemStore) -> R) -> R {
        let guard = self.file_system.read().unwrap_or_else(PoisonError::into_inner);
        read(&*guard)
    }

    /// Change the desktop item store.
    pub fn update_file_system<R>(&self, write: impl FnOnce(&mut FileSystemStore) -> R) -> R {
        let mut guard = self.file_system.write().unwrap_or_else(PoisonError::into_inner);
        write(&mut *guard)
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").field("config", &self.config).field("ui", &self.ui()).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
