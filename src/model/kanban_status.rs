use crate::config::KANBAN_STATUSES;
use crate::model::{explicit_null, Entity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A column on a kanban board (e.g. "Todo", "In Progress").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KanbanStatus {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub board_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewKanbanStatus {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub board_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KanbanStatusPatch {
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub board_id: Option<Option<i64>>,
}

impl Entity for KanbanStatus {
    const TABLE: &'static str = KANBAN_STATUSES;
    type Create = NewKanbanStatus;
    type Patch = KanbanStatusPatch;

    fn id(&self) -> i64 {
        self.id
    }
}
