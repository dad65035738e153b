//! User management screen: server-paginated list with email and role filters.

use crate::models::{Page, Role, User, UserQuery, supported_page_size};
use crate::services::UserService;
use crate::state::AppContext;
use crate::validation::UserForm;

use super::{Confirm, DeleteOutcome, ScreenError, settle_reload};

#[derive(Debug)]
pub struct UsersScreen {
    service: UserService,
    query: UserQuery,
    page: Page<User>,
    selected: Vec<String>,
    loading: bool,
}

impl UsersScreen {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        let query = UserQuery::default();
        Self { service: context.users(), page: Page::empty(query.page_size), query, selected: Vec::new(), loading: false }
    }

    #[must_use]
    pub fn query(&self) -> &UserQuery {
        &self.query
    }

    #[must_use]
    pub fn page(&self) -> &Page<User> {
        &self.page
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch the current page.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the previous page is kept.
    pub async fn load(&mut self) -> Result<&Page<User>, ScreenError> {
        self.loading = true;
        let result = self.service.list(&self.query).await;
        self.loading = false;
        self.page = result?;
        Ok(&self.page)
    }

    /// Apply new filters and reload from the first page.
    ///
    /// # Errors
    ///
    /// See [`UsersScreen::load`].
    pub async fn search(&mut self, email: Option<String>, role: Option<Role>) -> Result<&Page<User>, ScreenError> {
        self.query.email = email.filter(|e| !e.trim().is_empty());
        self.query.role = role;
        self.query.page = 1;
        self.load().await
    }

    /// Sizes outside [`PAGE_SIZE_OPTIONS`](crate::models::PAGE_SIZE_OPTIONS) fall back to the default.
    ///
    /// # Errors
    ///
    /// See [`UsersScreen::load`].
    pub async fn go_to_page(&mut self, page: u32, page_size: u32) -> Result<&Page<User>, ScreenError> {
        self.query.page = page.max(1);
        self.query.page_size = supported_page_size(page_size);
        self.load().await
    }

    /// Create (no `editing` id) or update, then reload.
    ///
    /// # Errors
    ///
    /// [`ScreenError::Validation`] before any call, or the gateway error.
    pub async fn submit(&mut self, editing: Option<&str>, form: &UserForm) -> Result<User, ScreenError> {
        let user = match editing {
            Some(id) => {
                let params = form.validate_update()?;
                self.service.update(id, &params).await?
            }
            None => {
                let params = form.validate_create()?;
                self.service.create(&params).await?
            }
        };
        settle_reload("users", self.load().await);
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns the gateway error from the delete. A failed reload is only logged.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if !confirm.confirm(&format!("Delete user {id}?")) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete(id).await?;
        self.selected.retain(|s| s != id);
        settle_reload("users", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = String>) {
        self.selected = ids.into_iter().collect();
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Delete every selected user in one call.
    ///
    /// # Errors
    ///
    /// [`ScreenError::NothingSelected`] without a call, or the gateway error.
    pub async fn batch_delete(&mut self, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if self.selected.is_empty() {
            return Err(ScreenError::NothingSelected);
        }
        if !confirm.confirm(&format!("Delete {} selected users?", self.selected.len())) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.batch_delete(&self.selected).await?;
        self.selected.clear();
        settle_reload("users", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
