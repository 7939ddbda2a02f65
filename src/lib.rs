//! Tracker API: projects, tickets and kanban boards over PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{resolve, tracker_catalog, AppConfig, ResolvedEntity, ResolvedModel};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::Entity;
pub use routes::{app, common_routes, entity_routes, API_PREFIX};
pub use service::{CrudService, KanbanBoardCrud, KanbanStatusCrud, ProjectCrud, TicketCrud};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
