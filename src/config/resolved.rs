//! Resolved model: catalog validated and flattened for runtime use.
//! Built once at startup and shared by reference through `AppState`.

use crate::config::{validate, Catalog, ColumnConfig, ColumnDefault, ColumnType, ValidationRule};
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    pub nullable: bool,
    /// Whether the column has a DB default (serial sequence, NOW()).
    pub has_default: bool,
    /// Accepted from request bodies. False for the primary key and managed timestamps.
    pub writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedEntity {
    pub schema_name: String,
    pub table_name: String,
    pub path_segment: String,
    pub label: String,
    pub pk_column: String,
    pub columns: Vec<ColumnInfo>,
    pub timestamps: bool,
    pub validation: HashMap<String, ValidationRule>,
}

impl ResolvedEntity {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn writable_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| c.writable)
    }

    /// Our column holding a foreign key to `parent_table`, if any.
    pub fn foreign_key_to(&self, parent_table: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.references.as_deref() == Some(parent_table))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedModel {
    pub schema_name: String,
    /// Catalog order, parents before children.
    pub entities: Vec<ResolvedEntity>,
    #[serde(skip)]
    by_table: HashMap<String, usize>,
}

impl ResolvedModel {
    pub fn entity(&self, table: &str) -> Option<&ResolvedEntity> {
        self.by_table.get(table).map(|&i| &self.entities[i])
    }

    /// Lookup that fails with a config error; used where a missing table is a wiring bug.
    pub fn require(&self, table: &str) -> Result<&ResolvedEntity, ConfigError> {
        self.entity(table).ok_or_else(|| ConfigError::MissingReference {
            kind: "table",
            id: table.to_string(),
        })
    }
}

/// `created_at` / `updated_at`, filled by the database.
fn timestamp_columns() -> [ColumnConfig; 2] {
    ["created_at", "updated_at"]
        .map(|name| ColumnConfig::new(name, ColumnType::Timestamp).required().defaults_to_now())
}

/// Primary key and NOW()-defaulted columns are never taken from request bodies.
fn column_info(c: &ColumnConfig, primary_key: &str) -> ColumnInfo {
    let is_pk = c.name == primary_key;
    let managed = c.default == Some(ColumnDefault::Now);
    ColumnInfo {
        name: c.name.clone(),
        type_: c.type_,
        nullable: c.nullable && !is_pk,
        has_default: is_pk || c.default.is_some(),
        writable: !is_pk && !managed,
        references: c.references.clone(),
    }
}

/// Build the resolved model from a catalog (validates first).
pub fn resolve(catalog: &Catalog) -> Result<ResolvedModel, ConfigError> {
    validate(catalog)?;

    let mut entities = Vec::with_capacity(catalog.tables.len());
    let mut by_table = HashMap::new();

    for table in &catalog.tables {
        let mut columns: Vec<ColumnInfo> = table
            .columns
            .iter()
            .map(|c| column_info(c, &table.primary_key))
            .collect();
        if table.timestamps {
            columns.extend(
                timestamp_columns()
                    .iter()
                    .map(|c| column_info(c, &table.primary_key)),
            );
        }

        let mut validation = HashMap::new();
        for c in table.columns.iter().filter(|c| c.name != table.primary_key) {
            let rule = ValidationRule {
                required: (!c.nullable && c.default != Some(ColumnDefault::Now)).then_some(true),
                not_blank: c.not_blank,
                max_length: c.type_.max_length(),
            };
            if rule != ValidationRule::default() {
                validation.insert(c.name.clone(), rule);
            }
        }

        by_table.insert(table.name.clone(), entities.len());
        entities.push(ResolvedEntity {
            schema_name: catalog.schema.clone(),
            table_name: table.name.clone(),
            path_segment: table.path_segment.clone(),
            label: table.label.clone(),
            pk_column: table.primary_key.clone(),
            columns,
            timestamps: table.timestamps,
            validation,
        });
    }

    Ok(ResolvedModel {
        schema_name: catalog.schema.clone(),
        entities,
        by_table,
    })
}
