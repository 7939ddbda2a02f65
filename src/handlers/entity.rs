//! Entity CRUD handlers, generic over the record type: list, create, read, replace,
//! update, delete, and listing the children of a parent row.

use crate::config::ResolvedEntity;
use crate::error::AppError;
use crate::model::Entity;
use crate::response::{success_many, success_one, success_one_created};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Malformed JSON is a bad request; a well-formed body with missing or mistyped
/// fields is a validation error. A body cut off by the size limit stays a 413.
pub(crate) fn parse_body<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<T, AppError> {
    let Json(value) = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::BadRequest(e.body_text()),
    })?;
    if !value.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| AppError::Validation(e.to_string()))
}

fn not_found(entity: &ResolvedEntity, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", entity.label, id))
}

pub async fn list<E: Entity>(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let crud = CrudService::<E>::new(&state.pool, &state.model)?;
    let rows = crud.get_all().await?;
    Ok(success_many(rows))
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let fields: E::Create = parse_body(body)?;
    let crud = CrudService::<E>::new(&state.pool, &state.model)?;
    let row = crud.create(&fields).await?;
    Ok(success_one_created(row))
}

pub async fn read<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let crud = CrudService::<E>::new(&state.pool, &state.model)?;
    let row = crud.get(id).await?.ok_or_else(|| not_found(crud.entity(), id))?;
    Ok(success_one(row))
}

/// PUT: every writable field is replaced.
pub async fn replace<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let fields: E::Create = parse_body(body)?;
    let crud = CrudService::<E>::new(&state.pool, &state.model)?;
    let row = crud
        .replace(id, &fields)
        .await?
        .ok_or_else(|| not_found(crud.entity(), id))?;
    Ok(success_one(row))
}

/// PATCH: only the supplied fields change.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let fields: E::Patch = parse_body(body)?;
    let crud = CrudService::<E>::new(&state.pool, &state.model)?;
    let row = crud
        .update(id, &fields)
        .await?
        .ok_or_else(|| not_found(crud.entity(), id))?;
    Ok(success_one(row))
}

pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let crud = CrudService::<E>::new(&state.pool, &state.model)?;
    crud.delete(id).await?.ok_or_else(|| not_found(crud.entity(), id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Children of parent `P` (e.g. tickets of a project). 404 when the parent is absent.
pub async fn list_children<P: Entity, C: Entity>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let parent = CrudService::<P>::new(&state.pool, &state.model)?;
    if !parent.exists(id).await? {
        return Err(not_found(parent.entity(), id));
    }
    let rows = CrudService::<C>::new(&state.pool, &state.model)?
        .list_by_parent::<P>(id)
        .await?;
    Ok(success_many(rows))
}
