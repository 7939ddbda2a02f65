//! Typed records for the tracked entities and the trait tying each to its table.

mod kanban_board;
mod kanban_status;
mod project;
mod ticket;

pub use kanban_board::{KanbanBoard, KanbanBoardPatch, NewKanbanBoard};
pub use kanban_status::{KanbanStatus, KanbanStatusPatch, NewKanbanStatus};
pub use project::{NewProject, Project, ProjectPatch};
pub use ticket::{NewTicket, Ticket, TicketPatch};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::postgres::PgRow;
use sqlx::FromRow;

/// Patch fields are tri-state: absent (`None`), explicit null (`Some(None)`) or a value.
/// Nulls are kept so that validation can reject them on required columns.
pub(crate) fn explicit_null<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// A stored record type. `Create` carries every required field, `Patch` any subset of
/// writable fields (absent fields serialize to nothing and stay untouched).
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    /// Catalog table name.
    const TABLE: &'static str;

    type Create: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Patch: Serialize + DeserializeOwned + Default + Send + Sync + 'static;

    fn id(&self) -> i64;
}
