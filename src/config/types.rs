//! Catalog types: declarative table definitions for the tracked entities.

use serde::{Deserialize, Serialize};

/// Column storage type. `Serial` is the auto-assigned primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "name", content = "length")]
pub enum ColumnType {
    Serial,
    BigInt,
    Varchar(u32),
    Text,
    Timestamp,
}

impl ColumnType {
    /// Type used in CREATE TABLE.
    pub fn ddl(&self) -> String {
        match self {
            ColumnType::Serial => "BIGSERIAL".into(),
            ColumnType::BigInt => "BIGINT".into(),
            ColumnType::Varchar(n) => format!("VARCHAR({})", n),
            ColumnType::Text => "TEXT".into(),
            ColumnType::Timestamp => "TIMESTAMPTZ".into(),
        }
    }

    /// Type used to cast bound parameters. Never length-bounded: a varchar(n) cast would truncate.
    pub fn cast(&self) -> &'static str {
        match self {
            ColumnType::Serial | ColumnType::BigInt => "bigint",
            ColumnType::Varchar(_) | ColumnType::Text => "text",
            ColumnType::Timestamp => "timestamptz",
        }
    }

    pub fn max_length(&self) -> Option<u32> {
        match self {
            ColumnType::Varchar(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    Now,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<ColumnDefault>,
    /// Table name this column references (single-column FK to that table's primary key).
    #[serde(default)]
    pub references: Option<String>,
    /// Reject empty and whitespace-only strings.
    #[serde(default)]
    pub not_blank: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnConfig {
    pub fn new(name: &str, type_: ColumnType) -> Self {
        ColumnConfig {
            name: name.to_string(),
            type_,
            nullable: true,
            default: None,
            references: None,
            not_blank: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn not_blank(mut self) -> Self {
        self.not_blank = true;
        self
    }

    pub fn references(mut self, table: &str) -> Self {
        self.references = Some(table.to_string());
        self
    }

    pub fn defaults_to_now(mut self) -> Self {
        self.default = Some(ColumnDefault::Now);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    /// URL segment under the API prefix, e.g. "kanban-boards".
    pub path_segment: String,
    /// Human-readable name used in not-found messages, e.g. "Kanban Board".
    pub label: String,
    pub primary_key: String,
    pub columns: Vec<ColumnConfig>,
    /// Adds created_at / updated_at managed by the store.
    #[serde(default)]
    pub timestamps: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub not_blank: bool,
    #[serde(default)]
    pub max_length: Option<u32>,
}

/// The whole catalog plus the PostgreSQL schema its tables live in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub schema: String,
    pub tables: Vec<TableConfig>,
}
