//! Client library for the admin console backend.
//!
//! ARCHITECTURE
//! ============
//! Every backend call goes through [`gateway::Gateway`], which injects the
//! bearer token held by [`session::Session`] and unwraps the response
//! envelope. [`services`] wrap the endpoints per resource, [`validation`]
//! checks forms before any call, and [`screens`] drive the list / submit /
//! delete flow over an explicitly passed [`state::AppContext`].

pub mod config;
pub mod dashboard;
pub mod gateway;
pub mod models;
pub mod screens;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

pub use config::{ConfigError, ConsoleConfig};
pub use gateway::{Gateway, GatewayError};
pub use session::{Session, SessionEvent};
pub use state::{AppContext, ContextError};
