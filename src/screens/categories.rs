//! Menu category screen: server-paginated list filtered by name.

use crate::models::{Category, CategoryQuery, Page, supported_page_size};
use crate::services::MenuService;
use crate::state::AppContext;
use crate::validation::CategoryForm;

use super::{Confirm, DeleteOutcome, ScreenError, settle_reload};

#[derive(Debug)]
pub struct CategoriesScreen {
    service: MenuService,
    query: CategoryQuery,
    page: Page<Category>,
    selected: Vec<String>,
    loading: bool,
}

impl CategoriesScreen {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        let query = CategoryQuery::default();
        Self { service: context.menu(), page: Page::empty(query.page_size), query, selected: Vec::new(), loading: false }
    }

    #[must_use]
    pub fn query(&self) -> &CategoryQuery {
        &self.query
    }

    #[must_use]
    pub fn page(&self) -> &Page<Category> {
        &self.page
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// # Errors
    ///
    /// Returns the gateway error; the previous page is kept.
    pub async fn load(&mut self) -> Result<&Page<Category>, ScreenError> {
        self.loading = true;
        let result = self.service.list(&self.query).await;
        self.loading = false;
        self.page = result?;
        Ok(&self.page)
    }

    /// Filter by name and reload from the first page.
    ///
    /// # Errors
    ///
    /// See [`CategoriesScreen::load`].
    pub async fn search(&mut self, name: Option<String>) -> Result<&Page<Category>, ScreenError> {
        self.query.name = name.filter(|n| !n.trim().is_empty());
        self.query.page = 1;
        self.load().await
    }

    /// Sizes outside [`PAGE_SIZE_OPTIONS`](crate::models::PAGE_SIZE_OPTIONS) fall back to the default.
    ///
    /// # Errors
    ///
    /// See [`CategoriesScreen::load`].
    pub async fn go_to_page(&mut self, page: u32, page_size: u32) -> Result<&Page<Category>, ScreenError> {
        self.query.page = page.max(1);
        self.query.page_size = supported_page_size(page_size);
        self.load().await
    }

    /// # Errors
    ///
    /// [`ScreenError::Validation`] before any call, or the gateway error.
    pub async fn submit(&mut self, editing: Option<&str>, form: &CategoryForm) -> Result<Category, ScreenError> {
        let params = form.validate()?;
        let category = match editing {
            Some(id) => self.service.update(id, &params).await?,
            None => self.service.create(&params).await?,
        };
        settle_reload("categories", self.load().await);
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns the gateway error from the delete. A failed reload is only logged.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if !confirm.confirm(&format!("Delete category {id}?")) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete(id).await?;
        self.selected.retain(|s| s != id);
        settle_reload("categories", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = String>) {
        self.selected = ids.into_iter().collect();
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// # Errors
    ///
    /// [`ScreenError::NothingSelected`] without a call, or the gateway error.
    pub async fn batch_delete(&mut self, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if self.selected.is_empty() {
            return Err(ScreenError::NothingSelected);
        }
        if !confirm.confirm(&format!("Delete {} selected categories?", self.selected.len())) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.batch_delete(&self.selected).await?;
        self.selected.clear();
        settle_reload("categories", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
