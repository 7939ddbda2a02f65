//! CrudService: generic CRUD using the safe SQL builder, plus per-entity aliases.

mod crud;
mod validation;
pub use crud::{fields_of, CrudService};
pub use validation::RequestValidator;

use crate::model::{KanbanBoard, KanbanStatus, Project, Ticket};

pub type KanbanBoardCrud<'a> = CrudService<'a, KanbanBoard>;
pub type KanbanStatusCrud<'a> = CrudService<'a, KanbanStatus>;
pub type ProjectCrud<'a> = CrudService<'a, Project>;
pub type TicketCrud<'a> = CrudService<'a, Ticket>;
