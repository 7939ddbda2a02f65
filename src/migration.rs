//! Apply the resolved model to the database: schema, tables with foreign keys, FK indexes.
//! Entities are created in model order, which puts parents before children.

use crate::config::{ColumnInfo, ResolvedEntity, ResolvedModel};
use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;

fn column_def(model: &ResolvedModel, entity: &ResolvedEntity, c: &ColumnInfo) -> String {
    let mut def = format!("{} {}", quoted(&c.name), c.type_.ddl());
    if c.name == entity.pk_column {
        def.push_str(" PRIMARY KEY");
        return def;
    }
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    if c.has_default {
        def.push_str(" DEFAULT NOW()");
    }
    if let Some(parent) = &c.references {
        let parent_pk = model.entity(parent).map(|p| p.pk_column.as_str()).unwrap_or("id");
        def.push_str(&format!(
            " REFERENCES {} ({})",
            qualified_table(&entity.schema_name, parent),
            quoted(parent_pk)
        ));
    }
    def
}

/// CREATE TABLE IF NOT EXISTS for one entity.
pub fn create_table_sql(model: &ResolvedModel, entity: &ResolvedEntity) -> String {
    let cols: Vec<String> = entity
        .columns
        .iter()
        .map(|c| column_def(model, entity, c))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        qualified_table(&entity.schema_name, &entity.table_name),
        cols.join(",\n  ")
    )
}

/// One index per foreign key column; children are listed by parent id.
pub fn foreign_key_index_sql(entity: &ResolvedEntity) -> Vec<String> {
    entity
        .columns
        .iter()
        .filter(|c| c.references.is_some())
        .map(|c| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quoted(&format!("{}_{}_idx", entity.table_name, c.name)),
                qualified_table(&entity.schema_name, &entity.table_name),
                quoted(&c.name)
            )
        })
        .collect()
}

/// All statements needed for the model, in execution order.
pub fn migration_statements(model: &ResolvedModel) -> Vec<String> {
    let mut out = vec![format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&model.schema_name))];
    for entity in &model.entities {
        out.push(create_table_sql(model, entity));
        out.extend(foreign_key_index_sql(entity));
    }
    out
}

/// Apply the model in one transaction. Idempotent: everything is IF NOT EXISTS.
pub async fn apply_migrations(pool: &PgPool, model: &ResolvedModel) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for sql in migration_statements(model) {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(schema = %model.schema_name, tables = model.entities.len(), "migrations applied");
    Ok(())
}
