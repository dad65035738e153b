//! Typed wrappers over the gateway, one per backend resource.
//!
//! ARCHITECTURE
//! ============
//! Services own endpoint paths and request/response shapes so screens can
//! stay focused on the load / submit / delete flow. Each service holds a
//! cheap clone of the shared [`crate::gateway::Gateway`].

pub mod auth;
pub mod dictionary;
pub mod file_system;
pub mod market;
pub mod menu;
pub mod users;

pub use auth::AuthService;
pub use dictionary::DictionaryService;
pub use file_system::FileSystemService;
pub use market::MarketService;
pub use menu::MenuService;
pub use users::UserService;
