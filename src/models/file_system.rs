use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Parent id of items that sit directly on the desktop.
pub const ROOT_PARENT: &str = "root";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    App,
    Folder,
    Web,
    Widget,
}

impl ItemType {
    pub const ALL: [Self; 4] = [Self::App, Self::Folder, Self::Web, Self::Widget];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Folder => "folder",
            Self::Web => "web",
            Self::Widget => "widget",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown item type: {s}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Clock,
    Calendar,
    Weather,
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clock" => Ok(Self::Clock),
            "calendar" => Ok(Self::Calendar),
            "weather" => Ok(Self::Weather),
            other => Err(format!("unknown widget type: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetSize {
    #[serde(rename = "1x1")]
    OneByOne,
    #[serde(rename = "1x2")]
    OneByTwo,
    #[serde(rename = "2x1")]
    TwoByOne,
    #[serde(rename = "2x2")]
    TwoByTwo,
}

impl FromStr for WidgetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1x1" => Ok(Self::OneByOne),
            "1x2" => Ok(Self::OneByTwo),
            "2x1" => Ok(Self::TwoByOne),
            "2x2" => Ok(Self::TwoByTwo),
            other => Err(format!("unknown widget size: {other}")),
        }
    }
}

/// Grid position on the desktop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemItem {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<WidgetSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<WidgetKind>,
}

impl FileSystemItem {
    #[must_use]
    pub fn is_on_desktop(&self) -> bool {
        self.parent_id == ROOT_PARENT
    }

    /// Apply a partial update in place. Fields absent from `patch` are kept.
    pub fn apply(&mut self, patch: &UpdateFileSystemItem) {
        if let Some(parent_id) = &patch.parent_id {
            self.parent_id.clone_from(parent_id);
        }
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(item_type) = patch.item_type {
            self.item_type = item_type;
        }
        if patch.content.is_some() {
            self.content.clone_from(&patch.content);
        }
        if patch.icon.is_some() {
            self.icon.clone_from(&patch.icon);
        }
        if patch.position.is_some() {
            self.position = patch.position;
        }
        if patch.url.is_some() {
            self.url.clone_from(&patch.url);
        }
        if patch.size.is_some() {
            self.size = patch.size;
        }
        if patch.widget_type.is_some() {
            self.widget_type = patch.widget_type;
        }
    }
}

/// Body of the create call; the backend assigns the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFileSystemItem {
    pub parent_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<WidgetSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<WidgetKind>,
}

impl Default for NewFileSystemItem {
    fn default() -> Self {
        Self {
            parent_id: ROOT_PARENT.to_owned(),
            name: "Untitled".to_owned(),
            item_type: ItemType::Folder,
            position: Position::default(),
            icon: None,
            content: None,
            url: None,
            size: None,
            widget_type: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileSystemItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<WidgetSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<WidgetKind>,
}

impl From<NewFileSystemItem> for UpdateFileSystemItem {
    fn from(item: NewFileSystemItem) -> Self {
        Self {
            parent_id: Some(item.parent_id),
            name: Some(item.name),
            item_type: Some(item.item_type),
            position: Some(item.position),
            icon: item.icon,
            content: item.content,
            url: item.url,
            size: item.size,
            widget_type: item.widget_type,
        }
    }
}
