//! Entity CRUD routes, one resource per catalog entity plus parent/child listings.

use crate::config::ResolvedModel;
use crate::error::ConfigError;
use crate::handlers::entity::{create, delete, list, list_children, read, replace, update};
use crate::handlers::get_schema;
use crate::model::{Entity, KanbanBoard, KanbanStatus, Project, Ticket};
use crate::state::AppState;
use axum::{routing::get, Router};

/// `/{segment}` and `/{segment}/:id` for one entity. The segment comes from the model.
fn resource<E: Entity>(model: &ResolvedModel) -> Result<Router<AppState>, ConfigError> {
    let base = format!("/{}", model.require(E::TABLE)?.path_segment);
    Ok(Router::new()
        .route(&base, get(list::<E>).post(create::<E>))
        .route(
            &format!("{}/:id", base),
            get(read::<E>).put(replace::<E>).patch(update::<E>).delete(delete::<E>),
        ))
}

/// `/{parent segment}/:id/{children}` listing rows of `C` that reference a `P`.
fn children<P: Entity, C: Entity>(model: &ResolvedModel, name: &str) -> Result<Router<AppState>, ConfigError> {
    let parent = model.require(P::TABLE)?;
    if model.require(C::TABLE)?.foreign_key_to(P::TABLE).is_none() {
        return Err(ConfigError::MissingReference {
            kind: "foreign key",
            id: format!("{} -> {}", C::TABLE, P::TABLE),
        });
    }
    let path = format!("/{}/:id/{}", parent.path_segment, name);
    Ok(Router::new().route(&path, get(list_children::<P, C>)))
}

pub fn entity_routes(state: AppState) -> Result<Router, ConfigError> {
    let model = state.model.clone();
    let router = Router::new()
        .route("/schema", get(get_schema))
        .merge(resource::<KanbanBoard>(&model)?)
        .merge(resource::<KanbanStatus>(&model)?)
        .merge(resource::<Project>(&model)?)
        .merge(resource::<Ticket>(&model)?)
        .merge(children::<KanbanBoard, KanbanStatus>(&model, "statuses")?)
        .merge(children::<KanbanBoard, Project>(&model, "projects")?)
        .merge(children::<Project, Ticket>(&model, "tickets")?)
        .merge(children::<KanbanStatus, Ticket>(&model, "tickets")?)
        .with_state(state);
    Ok(router)
}
