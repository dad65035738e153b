//! Field-level form rules that run before any network call.
//!
//! DESIGN
//! ======
//! Each form is a plain struct of raw input. `validate` checks every field,
//! collects all failures at once, and on success returns the request body the
//! matching service expects. Blank optional text becomes `None` so it is left
//! out of the request.

use crate::models::{
    BatchCreateItem, BatchCreateParams, CategoryParams, CreateDictDataParams, CreateDictTypeParams, CreateUserParams,
    ItemType, LoginParams, MarketAppParams, MarketAppType, NewFileSystemItem, Position, Role, UpdateDictDataParams,
    UpdateDictTypeParams, UpdateFileSystemItem, UpdateUserParams, WidgetKind, WidgetSize,
};

pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every rule a form failed, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join("; ")
}

// =============================================================================
// RULES
// =============================================================================

/// Trimmed, lowercased address with exactly one `@` and a dotted domain.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.chars().any(char::is_whitespace) {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() {
        return None;
    }
    let domain = parts[1];
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return None;
    }
    Some(normalized)
}

/// Identifier shape: a letter or underscore, then letters, digits, underscores.
#[must_use]
pub fn is_identifier(code: &str) -> bool {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Absolute http(s) URL with a host.
#[must_use]
pub fn is_http_url(raw: &str) -> bool {
    match url::Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

fn required(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, message);
    }
    trimmed.to_owned()
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn email_field(errors: &mut ValidationErrors, value: &str) -> String {
    if value.trim().is_empty() {
        errors.push("email", "email is required");
        return String::new();
    }
    normalize_email(value).unwrap_or_else(|| {
        errors.push("email", "enter a valid email address");
        String::new()
    })
}

fn code_field(errors: &mut ValidationErrors, value: &str) -> String {
    let code = required(errors, "code", value, "code is required");
    if !code.is_empty() && !is_identifier(value) {
        errors.push("code", "code may contain only letters, digits and underscores, and must not start with a digit");
    }
    code
}

// =============================================================================
// AUTH + USERS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate(&self) -> Result<LoginParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = email_field(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.push("password", "password is required");
        }
        errors.into_result(|| LoginParams { email, password: self.password.clone() })
    }
}

/// Create and edit form for a user; email is fixed once created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserForm {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl UserForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_create(&self) -> Result<CreateUserParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = email_field(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.push("password", "password is required");
        } else {
            check_password_len(&mut errors, &self.password);
        }
        errors.into_result(|| CreateUserParams { email, password: self.password.clone(), role: self.role })
    }

    /// Role always, password only when one was typed.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_update(&self) -> Result<UpdateUserParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let password = (!self.password.is_empty()).then(|| self.password.clone());
        if let Some(password) = &password {
            check_password_len(&mut errors, password);
        }
        errors.into_result(|| UpdateUserParams { role: Some(self.role), password })
    }
}

fn check_password_len(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", format!("password must be at least {MIN_PASSWORD_LEN} characters"));
    }
}

// =============================================================================
// MENU
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl CategoryForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate(&self) -> Result<CategoryParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required(&mut errors, "name", &self.name, "category name is required");
        errors.into_result(|| CategoryParams {
            name,
            description: optional(&self.description),
            icon: optional(&self.icon),
            color: optional(&self.color),
        })
    }
}

// =============================================================================
// DICTIONARY
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictTypeForm {
    pub code: String,
    pub name: String,
    pub description: String,
}

impl DictTypeForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_create(&self) -> Result<CreateDictTypeParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let code = code_field(&mut errors, &self.code);
        let name = required(&mut errors, "name", &self.name, "name is required");
        errors.into_result(|| CreateDictTypeParams { code, name, description: optional(&self.description) })
    }

    /// Same rules as create; sends every field.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_update(&self) -> Result<UpdateDictTypeParams, ValidationErrors> {
        self.validate_create().map(|p| UpdateDictTypeParams {
            code: Some(p.code),
            name: Some(p.name),
            description: p.description,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictDataForm {
    pub label: String,
    pub value: String,
    pub order: Option<i64>,
}

impl DictDataForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_create(&self, type_id: &str) -> Result<CreateDictDataParams, ValidationErrors> {
        let (label, value) = self.check()?;
        Ok(CreateDictDataParams { type_id: type_id.to_owned(), label, value, order: self.order })
    }

    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_update(&self) -> Result<UpdateDictDataParams, ValidationErrors> {
        let (label, value) = self.check()?;
        Ok(UpdateDictDataParams { label: Some(label), value: Some(value), order: self.order })
    }

    fn check(&self) -> Result<(String, String), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let label = required(&mut errors, "label", &self.label, "label is required");
        let value = required(&mut errors, "value", &self.value, "value is required");
        errors.into_result(|| (label, value))
    }
}

/// Several data rows added to one existing type in a single call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchDictForm {
    pub code: String,
    pub name: String,
    pub items: Vec<BatchCreateItem>,
}

impl BatchDictForm {
    /// Row errors are keyed `items[i].label` / `items[i].value`.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate(&self) -> Result<BatchCreateParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let code = code_field(&mut errors, &self.code);
        let name = required(&mut errors, "name", &self.name, "name is required");
        if self.items.is_empty() {
            errors.push("items", "add at least one item");
        }
        let mut items = Vec::with_capacity(self.items.len());
        for (i, item) in self.items.iter().enumerate() {
            let label = required(&mut errors, &format!("items[{i}].label"), &item.label, "label is required");
            let value = required(&mut errors, &format!("items[{i}].value"), &item.value, "value is required");
            items.push(BatchCreateItem { label, value });
        }
        errors.into_result(|| BatchCreateParams { code, name, items })
    }
}

// =============================================================================
// MARKET
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct MarketAppForm {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub app_type: MarketAppType,
    pub category: String,
    pub widget_type: String,
    pub default_size: String,
    pub url: String,
    pub price: Option<f64>,
}

impl Default for MarketAppForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            icon: String::new(),
            app_type: MarketAppType::App,
            category: String::new(),
            widget_type: String::new(),
            default_size: String::new(),
            url: String::new(),
            price: None,
        }
    }
}

impl MarketAppForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate(&self) -> Result<MarketAppParams, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let title = required(&mut errors, "title", &self.title, "title is required");
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                errors.push("price", "price must be zero or more");
            }
        }
        let url = optional(&self.url);
        match (&url, self.app_type) {
            (None, MarketAppType::Link) => errors.push("url", "link apps need a URL"),
            (Some(raw), _) if !is_http_url(raw) => errors.push("url", "enter a valid http(s) URL"),
            _ => {}
        }
        errors.into_result(|| MarketAppParams {
            title,
            description: self.description.trim().to_owned(),
            icon: self.icon.trim().to_owned(),
            app_type: self.app_type,
            category: optional(&self.category),
            widget_type: optional(&self.widget_type),
            default_size: optional(&self.default_size),
            url,
            price: self.price,
        })
    }
}

// =============================================================================
// FILE SYSTEM
// =============================================================================

/// Desktop item form. Only the fields belonging to `item_type` are sent:
/// `url` for web, `widget_type`/`size` for widgets, `content` for apps and
/// folders.
#[derive(Clone, Debug, PartialEq)]
pub struct FileSystemItemForm {
    pub parent_id: String,
    pub name: String,
    pub item_type: ItemType,
    pub icon: String,
    pub content: String,
    pub url: String,
    pub widget_type: Option<WidgetKind>,
    pub size: Option<WidgetSize>,
    pub position: Position,
}

impl Default for FileSystemItemForm {
    fn default() -> Self {
        let defaults = NewFileSystemItem::default();
        Self {
            parent_id: defaults.parent_id,
            name: defaults.name,
            item_type: defaults.item_type,
            icon: String::new(),
            content: String::new(),
            url: String::new(),
            widget_type: None,
            size: None,
            position: defaults.position,
        }
    }
}

impl FileSystemItemForm {
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_create(&self) -> Result<NewFileSystemItem, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required(&mut errors, "name", &self.name, "name is required");
        let parent_id = required(&mut errors, "parentId", &self.parent_id, "parent is required");

        let mut item = NewFileSystemItem {
            parent_id,
            name,
            item_type: self.item_type,
            position: self.position,
            icon: optional(&self.icon),
            ..NewFileSystemItem::default()
        };
        match self.item_type {
            ItemType::Web => {
                item.url = optional(&self.url);
                if let Some(url) = &item.url {
                    if !is_http_url(url) {
                        errors.push("url", "enter a valid http(s) URL");
                    }
                }
            }
            ItemType::Widget => {
                item.widget_type = self.widget_type;
                item.size = self.size;
            }
            ItemType::App | ItemType::Folder => item.content = optional(&self.content),
        }
        errors.into_result(|| item)
    }

    /// Same rules as create; sends the type-relevant fields as a patch.
    ///
    /// # Errors
    ///
    /// Returns every failed rule.
    pub fn validate_update(&self) -> Result<UpdateFileSystemItem, ValidationErrors> {
        self.validate_create().map(UpdateFileSystemItem::from)
    }
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
