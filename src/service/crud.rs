//! Generic CRUD execution against PostgreSQL. One transaction per operation.

use crate::config::{ResolvedEntity, ResolvedModel};
use crate::error::{AppError, ConfigError};
use crate::model::Entity;
use crate::service::RequestValidator;
use crate::sql::{delete, exists_by_id, insert, select_all, select_by_column, select_by_id, update, PgBindValue, QueryBuf};
use serde::Serialize;
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use std::marker::PhantomData;

/// CRUD over one entity type. Cheap to build per request: borrows the pool and the
/// resolved entity from the shared model.
pub struct CrudService<'a, E> {
    pool: &'a PgPool,
    entity: &'a ResolvedEntity,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> CrudService<'a, E> {
    pub fn new(pool: &'a PgPool, model: &'a ResolvedModel) -> Result<Self, AppError> {
        let entity = model.require(E::TABLE)?;
        Ok(CrudService {
            pool,
            entity,
            _entity: PhantomData,
        })
    }

    pub fn entity(&self) -> &'a ResolvedEntity {
        self.entity
    }

    /// Insert one row from a full field set. Returns the stored row with id and timestamps.
    pub async fn create(&self, fields: &E::Create) -> Result<E, AppError> {
        let body = fields_of(fields)?;
        RequestValidator::validate(&body, &self.entity.validation)?;
        let q = insert(self.entity, &body);
        let mut tx = self.pool.begin().await?;
        let row = Self::fetch_optional(&mut tx, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tx.commit().await?;
        tracing::info!(table = E::TABLE, id = row.id(), "created");
        Ok(row)
    }

    /// Fetch one row by primary key.
    pub async fn get(&self, id: i64) -> Result<Option<E>, AppError> {
        let q = select_by_id(self.entity, id);
        let mut tx = self.pool.begin().await?;
        let row = Self::fetch_optional(&mut tx, &q).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Every row of the table, ordered by id.
    pub async fn get_all(&self) -> Result<Vec<E>, AppError> {
        let q = select_all(self.entity);
        let mut tx = self.pool.begin().await?;
        let rows = Self::fetch_all(&mut tx, &q).await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Overwrite exactly the fields present in `fields`. None when no row has `id`.
    pub async fn update(&self, id: i64, fields: &E::Patch) -> Result<Option<E>, AppError> {
        let body = fields_of(fields)?;
        RequestValidator::validate_partial(&body, &self.entity.validation)?;
        self.write(id, &body).await
    }

    /// Overwrite every writable field. None when no row has `id`.
    pub async fn replace(&self, id: i64, fields: &E::Create) -> Result<Option<E>, AppError> {
        let body = fields_of(fields)?;
        RequestValidator::validate(&body, &self.entity.validation)?;
        self.write(id, &body).await
    }

    /// Delete one row by id. Returns the deleted row, or None when absent.
    pub async fn delete(&self, id: i64) -> Result<Option<E>, AppError> {
        let q = delete(self.entity, id);
        let mut tx = self.pool.begin().await?;
        let row = Self::fetch_optional(&mut tx, &q).await?;
        tx.commit().await?;
        if row.is_some() {
            tracing::info!(table = E::TABLE, id, "deleted");
        }
        Ok(row)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let q = exists_by_id(self.entity, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query_scalar::<_, bool>(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let found = query.fetch_one(&mut *tx).await?;
        tx.commit().await?;
        Ok(found)
    }

    /// Rows whose foreign key to `P` equals `parent_id`.
    pub async fn list_by_parent<P: Entity>(&self, parent_id: i64) -> Result<Vec<E>, AppError> {
        let missing = || ConfigError::MissingReference {
            kind: "foreign key",
            id: format!("{} -> {}", E::TABLE, P::TABLE),
        };
        let fk = self.entity.foreign_key_to(P::TABLE).ok_or_else(missing)?;
        let q = select_by_column(self.entity, &fk.name, parent_id).ok_or_else(missing)?;
        let mut tx = self.pool.begin().await?;
        let rows = Self::fetch_all(&mut tx, &q).await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn write(&self, id: i64, body: &HashMap<String, Value>) -> Result<Option<E>, AppError> {
        let q = update(self.entity, id, body);
        let mut tx = self.pool.begin().await?;
        let row = Self::fetch_optional(&mut tx, &q).await?;
        tx.commit().await?;
        if row.is_some() {
            tracing::info!(table = E::TABLE, id, fields = body.len(), "updated");
        }
        Ok(row)
    }

    async fn fetch_optional(conn: &mut PgConnection, q: &QueryBuf) -> Result<Option<E>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, E>(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        Ok(query.fetch_optional(&mut *conn).await?)
    }

    async fn fetch_all(conn: &mut PgConnection, q: &QueryBuf) -> Result<Vec<E>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, E>(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        Ok(query.fetch_all(&mut *conn).await?)
    }
}

/// Serialize a typed field set into column -> value pairs.
pub fn fields_of<T: Serialize>(fields: &T) -> Result<HashMap<String, Value>, AppError> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(m)) => Ok(m.into_iter().collect()),
        Ok(_) => Err(AppError::BadRequest("fields must form a JSON object".into())),
        Err(e) => Err(AppError::BadRequest(e.to_string())),
    }
}
