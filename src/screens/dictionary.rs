//! Dictionary screen: type list with a client-side keyword filter, plus the
//! data rows of one opened type.

use crate::models::{DictData, DictType};
use crate::services::DictionaryService;
use crate::state::AppContext;
use crate::validation::{BatchDictForm, DictDataForm, DictTypeForm};

use super::{Confirm, DeleteOutcome, ScreenError, settle_reload};

#[derive(Debug)]
pub struct DictionaryScreen {
    service: DictionaryService,
    types: Vec<DictType>,
    keyword: String,
    open_type: Option<DictType>,
    data: Vec<DictData>,
    loading: bool,
}

impl DictionaryScreen {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            service: context.dictionary(),
            types: Vec::new(),
            keyword: String::new(),
            open_type: None,
            data: Vec::new(),
            loading: false,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // TYPES
    // =========================================================================

    /// # Errors
    ///
    /// Returns the gateway error; the previous list is kept.
    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.loading = true;
        let result = self.service.list_types().await;
        self.loading = false;
        self.types = result?;
        Ok(())
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    /// Types whose code or name contains the keyword, case-insensitively.
    #[must_use]
    pub fn visible_types(&self) -> Vec<&DictType> {
        let needle = self.keyword.trim().to_lowercase();
        self.types
            .iter()
            .filter(|t| needle.is_empty() || t.code.to_lowercase().contains(&needle) || t.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// # Errors
    ///
    /// [`ScreenError::Validation`] before any call, or the gateway error.
    pub async fn submit_type(&mut self, editing: Option<&str>, form: &DictTypeForm) -> Result<DictType, ScreenError> {
        let dict_type = match editing {
            Some(id) => {
                let params = form.validate_update()?;
                self.service.update_type(id, &params).await?
            }
            None => {
                let params = form.validate_create()?;
                self.service.create_type(&params).await?
            }
        };
        settle_reload("dictionary", self.load().await);
        Ok(dict_type)
    }

    /// # Errors
    ///
    /// Returns the gateway error from the delete. A failed reload is only logged.
    pub async fn delete_type(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if !confirm.confirm(&format!("Delete dictionary type {id} and all its data?")) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete_type(id).await?;
        if self.open_type.as_ref().is_some_and(|t| t.id == id) {
            self.close();
        }
        settle_reload("dictionary", self.load().await);
        Ok(DeleteOutcome::Deleted)
    }

    // =========================================================================
    // DATA
    // =========================================================================

    /// Open `dict_type` and load its rows.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the type stays open with no rows.
    pub async fn open(&mut self, dict_type: DictType) -> Result<&[DictData], ScreenError> {
        self.data.clear();
        self.open_type = Some(dict_type);
        self.reload_data().await?;
        Ok(&self.data)
    }

    pub fn close(&mut self) {
        self.open_type = None;
        self.data.clear();
    }

    #[must_use]
    pub fn open_type(&self) -> Option<&DictType> {
        self.open_type.as_ref()
    }

    #[must_use]
    pub fn data(&self) -> &[DictData] {
        &self.data
    }

    /// Create or update a row of the open type.
    ///
    /// # Errors
    ///
    /// [`ScreenError::NoActiveType`], [`ScreenError::Validation`], or the
    /// gateway error.
    pub async fn submit_data(&mut self, editing: Option<&str>, form: &DictDataForm) -> Result<DictData, ScreenError> {
        let type_id = self.open_type.as_ref().map(|t| t.id.clone()).ok_or(ScreenError::NoActiveType)?;
        let row = match editing {
            Some(id) => {
                let params = form.validate_update()?;
                self.service.update_data(id, &params).await?
            }
            None => {
                let params = form.validate_create(&type_id)?;
                self.service.create_data(&params).await?
            }
        };
        settle_reload("dictionary", self.reload_data().await);
        Ok(row)
    }

    /// # Errors
    ///
    /// [`ScreenError::NoActiveType`] or the gateway error.
    pub async fn delete_data(&mut self, id: &str, confirm: &dyn Confirm) -> Result<DeleteOutcome, ScreenError> {
        if self.open_type.is_none() {
            return Err(ScreenError::NoActiveType);
        }
        if !confirm.confirm(&format!("Delete dictionary data {id}?")) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete_data(id).await?;
        settle_reload("dictionary", self.reload_data().await);
        Ok(DeleteOutcome::Deleted)
    }

    /// Add several rows to `dict_type` in one call. The open rows are reloaded
    /// when they belong to the same type.
    ///
    /// # Errors
    ///
    /// [`ScreenError::Validation`] before any call, or the gateway error.
    pub async fn batch_add(&mut self, form: &BatchDictForm) -> Result<(), ScreenError> {
        let params = form.validate()?;
        self.service.batch_create(&params).await?;
        if self.open_type.as_ref().is_some_and(|t| t.code == params.code) {
            settle_reload("dictionary", self.reload_data().await);
        }
        Ok(())
    }

    async fn reload_data(&mut self) -> Result<(), ScreenError> {
        let Some(code) = self.open_type.as_ref().map(|t| t.code.clone()) else {
            return Ok(());
        };
        self.loading = true;
        let result = self.service.data_by_code(&code).await;
        self.loading = false;
        self.data = result?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "dictionary_test.rs"]
mod tests;
