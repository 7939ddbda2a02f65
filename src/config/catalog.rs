//! Built-in catalog: kanban boards, kanban statuses, projects and tickets.
//! Tables are listed parents first so DDL can be applied in order.

use crate::config::types::{Catalog, ColumnConfig, ColumnType, TableConfig};

pub const KANBAN_BOARDS: &str = "kanban_boards";
pub const KANBAN_STATUSES: &str = "kanban_statuses";
pub const PROJECTS: &str = "projects";
pub const TICKETS: &str = "tickets";

const NAME_LEN: u32 = 255;

fn id() -> ColumnConfig {
    ColumnConfig::new("id", ColumnType::Serial).required()
}

fn short_text(name: &str) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::Varchar(NAME_LEN)).required().not_blank()
}

fn foreign_key(name: &str, table: &str) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::BigInt).required().references(table)
}

pub fn tracker_catalog(schema: &str) -> Catalog {
    Catalog {
        schema: schema.to_string(),
        tables: vec![
            TableConfig {
                name: KANBAN_BOARDS.into(),
                path_segment: "kanban-boards".into(),
                label: "Kanban Board".into(),
                primary_key: "id".into(),
                columns: vec![
                    id(),
                    short_text("name"),
                    ColumnConfig::new("description", ColumnType::Text),
                ],
                timestamps: false,
            },
            TableConfig {
                name: KANBAN_STATUSES.into(),
                path_segment: "kanban-statuses".into(),
                label: "Kanban Status".into(),
                primary_key: "id".into(),
                columns: vec![
                    id(),
                    short_text("name"),
                    ColumnConfig::new("description", ColumnType::Text),
                    foreign_key("board_id", KANBAN_BOARDS),
                ],
                timestamps: false,
            },
            TableConfig {
                name: PROJECTS.into(),
                path_segment: "projects".into(),
                label: "Project".into(),
                primary_key: "id".into(),
                columns: vec![
                    id(),
                    short_text("name"),
                    ColumnConfig::new("description", ColumnType::Text).required(),
                    foreign_key("kanban_board_id", KANBAN_BOARDS),
                ],
                timestamps: true,
            },
            TableConfig {
                name: TICKETS.into(),
                path_segment: "tickets".into(),
                label: "Ticket".into(),
                primary_key: "id".into(),
                columns: vec![
                    id(),
                    foreign_key("project_id", PROJECTS),
                    short_text("title"),
                    ColumnConfig::new("description", ColumnType::Text).required(),
                    short_text("status"),
                    short_text("priority"),
                    foreign_key("kanban_status_id", KANBAN_STATUSES),
                ],
                timestamps: true,
            },
        ],
    }
}
