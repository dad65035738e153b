//! Marketplace screen: catalog filtered server-side, plus install.

use std::sync::Arc;

use crate::models::{FileSystemItem, MarketApp, MarketQuery};
use crate::services::MarketService;
use crate::state::AppContext;
use crate::validation::MarketAppForm;

use super::{Confirm, DeleteOutcome, ScreenError, settle_reload};

#[derive(Debug)]
pub struct MarketScreen {
    context: Arc<AppContext>,
    service: MarketService,
    query: MarketQuery,
    apps: Vec<MarketApp>,
    loading: bool,
}

impl MarketScreen {
    #[must_use]
    pub fn new(context: Arc<AppContext>) -> Self {
        let service = context.market();
        Self { context, service, query: MarketQuery::default(), apps: Vec::new(), loading: false }
    }

    #[must_use]
    pub fn apps(&self) -> &[MarketApp] {
        &self.apps
    }

    #[must_use]
    pub fn query(&self) -> &MarketQuery {
        &self.query
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// # Errors
    ///
    /// Returns the gateway error; the previous list is kept.
    pub async fn load(&mut self) -> Result<&[MarketApp], ScreenError> {
        self.loading = true;
        let result = self.service.list(&self.query).await;
        self.loading = false;
        self.apps = result?;
        Ok(&self.apps)
    }

    /// # Errors
    ///
    /// See [`MarketScreen::load`].
    pub async fn search(&mut self, category: Option<String>, search: Option<String>) -> Result<&[MarketApp], ScreenError> {
        self.query.category = category.filter(|c| !c.trim().is_empty());
        self.query.search = search.filter(|s| !s.trim().is_empty());
        self.load().await
    }

    /// Install onto the desktop and cache the new item.
    ///
    /// # Errors
    ///
    /// Returns the gateway error.
    pub async fn install(&self, id: &str) -> Result<FileSystemItem, ScreenError> {
        let item = self.service.install(id).await?;
        self.context.update_file_system(|store| store.add(item.clone()));
        tracing::info!(app = id, item = %item.id, "app installed");
        Ok(item)
    }

    /// # Errors
    ///
    /// [`ScreenError::Validation`] before any call, or the gateway error.
    pub async fn submit(&mut self, editing: Option<&str>, form: &MarketAppForm) -> Result<MarketApp, ScreenError> {
        let params = form.validate()?;
        let app = match editing {
            Some(id) => self.service.update(id, &params).await?,
            None => self.service.create(&params).await?,
        };
        settle_reload("market", self.load().await);
        Ok(app)
    }

    /// # Errors
    ///
    /// Returns the gateway error from the delete. A failed reload is only logged.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if !confirm.confirm(&format!("Delete market app {id}?")) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete(id).await?;
        settle_reload("market", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
#[path = "market_test.rs"]
mod tests;
