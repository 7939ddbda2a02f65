use crate::config::KANBAN_BOARDS;
use crate::model::{explicit_null, Entity};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KanbanBoard {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewKanbanBoard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KanbanBoardPatch {
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl Entity for KanbanBoard {
    const TABLE: &'static str = KANBAN_BOARDS;
    type Create = NewKanbanBoard;
    type Patch = KanbanBoardPatch;

    fn id(&self) -> i64 {
        self.id
    }
}
