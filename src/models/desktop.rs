use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::file_system::{FileSystemItem, Position, WidgetSize};

/// Where one desktop item sits on the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSlot {
    pub id: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<WidgetSize>,
}

/// Saved arrangement of the desktop, exchanged with `/desktop/layout`.
///
/// Fields the client does not model are carried in `extra` so a load/save
/// cycle sends them back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DesktopLayout {
    #[serde(default)]
    pub items: Vec<LayoutSlot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesktopLayout {
    /// Snapshot of the positioned items sitting directly on the desktop.
    #[must_use]
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a FileSystemItem>) -> Self {
        let items = items
            .into_iter()
            .filter(|item| item.is_on_desktop())
            .filter_map(|item| {
                let position = item.position?;
                Some(LayoutSlot { id: item.id.clone(), position, size: item.size })
            })
            .collect();
        Self { items, extra: Map::new() }
    }

    #[must_use]
    pub fn slot(&self, id: &str) -> Option<&LayoutSlot> {
        self.items.iter().find(|slot| slot.id == id)
    }
}
