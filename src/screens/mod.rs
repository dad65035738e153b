//! Screen controllers: the load / search / submit / delete flow of each
//! management page, without any rendering.
//!
//! DESIGN
//! ======
//! Every screen holds the query that drives its list and the last list it
//! loaded. Changing a filter resets paging to the first page and reloads.
//! Submit validates locally before any call and reloads after success.
//! Deletes ask a [`Confirm`] first; a declined prompt makes no call.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as [`ScreenError`]. The previous list is kept when a
//! reload fails, and the `loading` flag is always cleared. Once the backend
//! has accepted a change, the follow-up reload can no longer fail the call:
//! its error is logged and the stale list stays in place.

pub mod categories;
pub mod dictionary;
pub mod file_system;
pub mod market;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use categories::CategoriesScreen;
pub use dictionary::DictionaryScreen;
pub use file_system::FileSystemScreen;
pub use market::MarketScreen;
pub use users::UsersScreen;

use crate::gateway::GatewayError;
use crate::validation::ValidationErrors;

/// Asks the operator to approve a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything; for non-interactive runs (`--yes`).
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Batch action with an empty selection.
    #[error("nothing selected")]
    NothingSelected,

    /// Data-row action with no dictionary type opened.
    #[error("no dictionary type is open")]
    NoActiveType,
}

impl ScreenError {
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_session_expired())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Swallow the error of a reload that follows an accepted change.
pub(crate) fn settle_reload<T>(screen: &'static str, reload: Result<T, ScreenError>) {
    if let Err(e) = reload {
        tracing::warn!(screen, error = %e, "reload after change failed, keeping previous list");
    }
}
