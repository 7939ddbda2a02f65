//! Catalog validation: referential integrity and API consistency.

use crate::config::{Catalog, ColumnType};
use crate::error::ConfigError;
use std::collections::HashSet;

/// Plain lowercase identifier: letters, digits and underscores, not starting with a digit.
pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub fn validate(catalog: &Catalog) -> Result<(), ConfigError> {
    if !is_plain_identifier(&catalog.schema) {
        return Err(ConfigError::Validation(format!(
            "schema name '{}' must be a plain lowercase identifier",
            catalog.schema
        )));
    }
    if catalog.tables.is_empty() {
        return Err(ConfigError::Validation("at least one table required".into()));
    }

    // Tables seen so far: a foreign key may only point at an earlier table.
    let mut tables = HashSet::new();
    let mut path_segments = HashSet::new();

    for t in &catalog.tables {
        if !is_plain_identifier(&t.name) {
            return Err(ConfigError::Validation(format!(
                "table name '{}' must be a plain lowercase identifier",
                t.name
            )));
        }
        if tables.contains(t.name.as_str()) {
            return Err(ConfigError::DuplicateTable(t.name.clone()));
        }
        if !path_segments.insert(t.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(t.path_segment.clone()));
        }

        let mut columns = HashSet::new();
        for c in &t.columns {
            if !is_plain_identifier(&c.name) {
                return Err(ConfigError::Validation(format!(
                    "column name '{}.{}' must be a plain lowercase identifier",
                    t.name, c.name
                )));
            }
            if !columns.insert(c.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate column '{}.{}'",
                    t.name, c.name
                )));
            }
            if let Some(target) = &c.references {
                if !tables.contains(target.as_str()) {
                    return Err(ConfigError::MissingReference {
                        kind: "table",
                        id: format!("{} (from {}.{})", target, t.name, c.name),
                    });
                }
            }
        }
        if t.timestamps && (columns.contains("created_at") || columns.contains("updated_at")) {
            return Err(ConfigError::Validation(format!(
                "table {} declares timestamp columns that are managed automatically",
                t.name
            )));
        }

        let pk = t.columns.iter().find(|c| c.name == t.primary_key);
        match pk {
            Some(c) if c.type_ == ColumnType::Serial => {}
            _ => {
                return Err(ConfigError::InvalidPrimaryKey {
                    table: t.name.clone(),
                    column: t.primary_key.clone(),
                })
            }
        }

        tables.insert(t.name.as_str());
    }

    Ok(())
}
