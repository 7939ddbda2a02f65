//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a resolved entity.

use crate::config::ResolvedEntity;
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL (safe: only from the catalog).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn table_of(entity: &ResolvedEntity) -> String {
    qualified_table(&entity.schema_name, &entity.table_name)
}

fn select_column_list(entity: &ResolvedEntity) -> String {
    entity
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by primary key. Id is the sole param.
pub fn select_by_id(entity: &ResolvedEntity, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}::bigint",
        select_column_list(entity),
        table_of(entity),
        quoted(&entity.pk_column),
        n
    );
    q
}

/// SELECT every row, ordered by primary key.
pub fn select_all(entity: &ResolvedEntity) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity),
        table_of(entity),
        quoted(&entity.pk_column)
    );
    q
}

/// SELECT rows whose `column` equals `value`, ordered by primary key.
/// Returns None when `column` is not a column of the entity.
pub fn select_by_column(entity: &ResolvedEntity, column: &str, value: i64) -> Option<QueryBuf> {
    let c = entity.column(column)?;
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(value));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}::{} ORDER BY {}",
        select_column_list(entity),
        table_of(entity),
        quoted(&c.name),
        n,
        c.type_.cast(),
        quoted(&entity.pk_column)
    );
    Some(q)
}

/// SELECT EXISTS by primary key.
pub fn exists_by_id(entity: &ResolvedEntity, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ${}::bigint)",
        table_of(entity),
        quoted(&entity.pk_column),
        n
    );
    q
}

/// INSERT over writable columns; values from body, missing values bound as NULL.
/// Columns with a DB default are left out when the body does not provide them.
pub fn insert(entity: &ResolvedEntity, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in entity.writable_columns() {
        let val = body.get(&c.name).cloned();
        if val.is_none() && c.has_default {
            continue;
        }
        let param_num = q.push_param(val.unwrap_or(Value::Null));
        cols.push(quoted(&c.name));
        placeholders.push(format!("${}::{}", param_num, c.type_.cast()));
    }
    let returning = select_column_list(entity);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table_of(entity), returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table_of(entity),
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET only writable columns present in body, plus `updated_at = NOW()`
/// for entities with timestamps. With nothing to set this degrades to a SELECT by id,
/// so "not found" still surfaces as no row.
pub fn update(entity: &ResolvedEntity, id: i64, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    // Catalog order keeps the generated SQL stable regardless of map iteration order.
    for c in entity.writable_columns() {
        let Some(v) = body.get(&c.name) else { continue };
        let param_num = q.push_param(v.clone());
        sets.push(format!("{} = ${}::{}", quoted(&c.name), param_num, c.type_.cast()));
    }
    if entity.timestamps {
        sets.push(format!("{} = NOW()", quoted("updated_at")));
    }
    if sets.is_empty() {
        return select_by_id(entity, id);
    }
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}::bigint RETURNING {}",
        table_of(entity),
        sets.join(", "),
        quoted(&entity.pk_column),
        id_param,
        select_column_list(entity)
    );
    q
}

/// DELETE by id, returning the removed row.
pub fn delete(entity: &ResolvedEntity, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}::bigint RETURNING {}",
        table_of(entity),
        quoted(&entity.pk_column),
        n,
        select_column_list(entity)
    );
    q
}
