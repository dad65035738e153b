//! Wire records exchanged with the admin backend.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Records are plain data:
//! the client never derives entity state, it only filters and sorts what the
//! backend returned.

pub mod auth;
pub mod desktop;
pub mod dictionary;
pub mod file_system;
pub mod market;
pub mod menu;
pub mod page;
pub mod user;

pub use auth::{AuthSession, LoginParams, LoginResult, SessionUser};
pub use desktop::{DesktopLayout, LayoutSlot};
pub use dictionary::{
    BatchCreateItem, BatchCreateParams, CreateDictDataParams, CreateDictTypeParams, DictData, DictOption, DictType,
    UpdateDictDataParams, UpdateDictTypeParams,
};
pub use file_system::{FileSystemItem, ItemType, NewFileSystemItem, Position, UpdateFileSystemItem, WidgetKind, WidgetSize};
pub use market::{MarketApp, MarketAppParams, MarketAppType, MarketQuery};
pub use menu::{Category, CategoryParams, CategoryQuery};
pub use page::{BatchDeleteParams, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, Page, SortOrder, supported_page_size};
pub use user::{CreateUserParams, Role, UpdateUserParams, User, UserQuery};

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
