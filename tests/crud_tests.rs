//! CRUD against a real PostgreSQL. Each test works in its own throwaway schema and
//! is skipped when `TEST_DATABASE_URL` is not set.

mod common;

use axum::http::Method;
use common::{router, send, test_db};
use serde_json::json;
use std::time::Duration;
use tracker_api::model::{
    KanbanBoard, KanbanBoardPatch, KanbanStatus, NewKanbanBoard, NewKanbanStatus, NewProject, NewTicket, Project,
    ProjectPatch, Ticket, TicketPatch,
};
use tracker_api::{AppError, CrudService, KanbanBoardCrud, ProjectCrud, TicketCrud};

fn board(name: &str) -> NewKanbanBoard {
    NewKanbanBoard {
        name: name.into(),
        description: None,
    }
}

fn status(name: &str, board_id: i64) -> NewKanbanStatus {
    NewKanbanStatus {
        name: name.into(),
        description: None,
        board_id,
    }
}

fn project(name: &str, kanban_board_id: i64) -> NewProject {
    NewProject {
        name: name.into(),
        description: "backend".into(),
        kanban_board_id,
    }
}

fn ticket(title: &str, project_id: i64, kanban_status_id: i64) -> NewTicket {
    NewTicket {
        project_id,
        title: title.into(),
        description: "...".into(),
        status: "Todo".into(),
        priority: "High".into(),
        kanban_status_id,
    }
}

#[tokio::test]
async fn fresh_store_scenario() {
    let Some(db) = test_db().await else { return };
    let (pool, model) = (&db.pool, &db.model);

    let b = KanbanBoardCrud::new(pool, model).unwrap().create(&board("Eng")).await.unwrap();
    let s = CrudService::<KanbanStatus>::new(pool, model)
        .unwrap()
        .create(&status("Todo", b.id))
        .await
        .unwrap();
    let p = ProjectCrud::new(pool, model).unwrap().create(&project("API", b.id)).await.unwrap();
    let tickets = TicketCrud::new(pool, model).unwrap();
    let t = tickets.create(&ticket("Fix bug", p.id, s.id)).await.unwrap();

    assert_eq!((b.id, s.id, p.id, t.id), (1, 1, 1, 1));
    assert_eq!(t.project_id, p.id);
    assert_eq!(t.kanban_status_id, s.id);
    assert_eq!(t.created_at, t.updated_at);

    let all = tickets.get_all().await.unwrap();
    assert_eq!(all, vec![t]);

    db.cleanup().await;
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let Some(db) = test_db().await else { return };
    let boards = KanbanBoardCrud::new(&db.pool, &db.model).unwrap();

    let created = boards
        .create(&NewKanbanBoard {
            name: "Ops".into(),
            description: Some("on-call".into()),
        })
        .await
        .unwrap();
    let fetched = boards.get(created.id).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));
    assert_eq!(
        created,
        KanbanBoard {
            id: created.id,
            name: "Ops".into(),
            description: Some("on-call".into()),
        }
    );

    db.cleanup().await;
}

#[tokio::test]
async fn absent_ids_are_reported_without_side_effects() {
    let Some(db) = test_db().await else { return };
    let boards = KanbanBoardCrud::new(&db.pool, &db.model).unwrap();
    boards.create(&board("Eng")).await.unwrap();

    assert_eq!(boards.get(42).await.unwrap(), None);
    let rename = KanbanBoardPatch {
        name: Some(Some("Other".into())),
        ..Default::default()
    };
    assert_eq!(boards.update(42, &rename).await.unwrap(), None);
    assert_eq!(boards.replace(42, &board("Other")).await.unwrap(), None);
    assert_eq!(boards.delete(42).await.unwrap(), None);
    assert!(!boards.exists(42).await.unwrap());

    let all = boards.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Eng");

    db.cleanup().await;
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let Some(db) = test_db().await else { return };
    let (pool, model) = (&db.pool, &db.model);
    let b = KanbanBoardCrud::new(pool, model).unwrap().create(&board("Eng")).await.unwrap();
    let s = CrudService::<KanbanStatus>::new(pool, model)
        .unwrap()
        .create(&status("Todo", b.id))
        .await
        .unwrap();
    let p = ProjectCrud::new(pool, model).unwrap().create(&project("API", b.id)).await.unwrap();
    let tickets = TicketCrud::new(pool, model).unwrap();
    let before = tickets.create(&ticket("Fix bug", p.id, s.id)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let patch = TicketPatch {
        status: Some(Some("Done".into())),
        ..Default::default()
    };
    let after = tickets.update(before.id, &patch).await.unwrap().unwrap();

    assert_eq!(after.status, "Done");
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.project_id, before.project_id);
    assert_eq!(after.kanban_status_id, before.kanban_status_id);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(tickets.get(before.id).await.unwrap(), Some(after));

    db.cleanup().await;
}

#[tokio::test]
async fn empty_patch_returns_current_row() {
    let Some(db) = test_db().await else { return };
    let boards = KanbanBoardCrud::new(&db.pool, &db.model).unwrap();
    let b = boards.create(&board("Eng")).await.unwrap();
    let same = boards.update(b.id, &KanbanBoardPatch::default()).await.unwrap();
    assert_eq!(same, Some(b));
    db.cleanup().await;
}

#[tokio::test]
async fn replace_overwrites_every_field() {
    let Some(db) = test_db().await else { return };
    let boards = KanbanBoardCrud::new(&db.pool, &db.model).unwrap();
    let b = boards
        .create(&NewKanbanBoard {
            name: "Eng".into(),
            description: Some("old".into()),
        })
        .await
        .unwrap();
    let replaced = boards.replace(b.id, &board("Platform")).await.unwrap().unwrap();
    assert_eq!(replaced.name, "Platform");
    assert_eq!(replaced.description, None);
    db.cleanup().await;
}

#[tokio::test]
async fn patch_can_clear_optional_description() {
    let Some(db) = test_db().await else { return };
    let boards = KanbanBoardCrud::new(&db.pool, &db.model).unwrap();
    let b = boards
        .create(&NewKanbanBoard {
            name: "Eng".into(),
            description: Some("old".into()),
        })
        .await
        .unwrap();
    let clear = KanbanBoardPatch {
        description: Some(None),
        ..Default::default()
    };
    let cleared = boards.update(b.id, &clear).await.unwrap().unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.name, "Eng");
    db.cleanup().await;
}

#[tokio::test]
async fn delete_then_get_is_absent() {
    let Some(db) = test_db().await else { return };
    let boards = KanbanBoardCrud::new(&db.pool, &db.model).unwrap();
    let b = boards.create(&board("Eng")).await.unwrap();

    assert_eq!(boards.delete(b.id).await.unwrap(), Some(b.clone()));
    assert_eq!(boards.get(b.id).await.unwrap(), None);
    assert_eq!(boards.delete(b.id).await.unwrap(), None);

    db.cleanup().await;
}

#[tokio::test]
async fn dangling_foreign_key_is_a_store_error() {
    let Some(db) = test_db().await else { return };
    let projects = ProjectCrud::new(&db.pool, &db.model).unwrap();

    assert!(matches!(projects.create(&project("API", 999)).await, Err(AppError::Db(_))));
    assert!(projects.get_all().await.unwrap().is_empty());

    db.cleanup().await;
}

#[tokio::test]
async fn rejected_update_leaves_row_unchanged() {
    let Some(db) = test_db().await else { return };
    let b = KanbanBoardCrud::new(&db.pool, &db.model).unwrap().create(&board("Eng")).await.unwrap();
    let projects = ProjectCrud::new(&db.pool, &db.model).unwrap();
    let p = projects.create(&project("API", b.id)).await.unwrap();

    let blank = ProjectPatch {
        name: Some(Some(String::new())),
        ..Default::default()
    };
    assert!(matches!(projects.update(p.id, &blank).await, Err(AppError::Validation(_))));
    assert_eq!(projects.get(p.id).await.unwrap().unwrap().name, "API");

    db.cleanup().await;
}

#[tokio::test]
async fn children_are_listed_by_parent() {
    let Some(db) = test_db().await else { return };
    let (pool, model) = (&db.pool, &db.model);
    let b = KanbanBoardCrud::new(pool, model).unwrap().create(&board("Eng")).await.unwrap();
    let statuses = CrudService::<KanbanStatus>::new(pool, model).unwrap();
    let todo = statuses.create(&status("Todo", b.id)).await.unwrap();
    let done = statuses.create(&status("Done", b.id)).await.unwrap();
    let projects = ProjectCrud::new(pool, model).unwrap();
    let api = projects.create(&project("API", b.id)).await.unwrap();
    let web = projects.create(&project("Web", b.id)).await.unwrap();
    let tickets = TicketCrud::new(pool, model).unwrap();
    let t1 = tickets.create(&ticket("Fix bug", api.id, todo.id)).await.unwrap();
    let t2 = tickets.create(&ticket("Ship", api.id, done.id)).await.unwrap();
    tickets.create(&ticket("Landing page", web.id, todo.id)).await.unwrap();

    let api_tickets = tickets.list_by_parent::<Project>(api.id).await.unwrap();
    assert_eq!(api_tickets, vec![t1.clone(), t2]);

    let todo_tickets = tickets.list_by_parent::<KanbanStatus>(todo.id).await.unwrap();
    assert_eq!(todo_tickets.len(), 2);
    assert_eq!(todo_tickets[0], t1);

    assert_eq!(statuses.list_by_parent::<KanbanBoard>(b.id).await.unwrap().len(), 2);
    assert!(projects.list_by_parent::<KanbanBoard>(999).await.unwrap().is_empty());
    assert!(matches!(
        tickets.list_by_parent::<Ticket>(1).await,
        Err(AppError::Config(_))
    ));

    db.cleanup().await;
}

#[tokio::test]
async fn http_round_trip() {
    let Some(db) = test_db().await else { return };
    let app = router(db.state());

    let (status, body) = send(&app, Method::POST, "/api/v1/kanban-boards", Some(json!({"name": "Eng"}))).await;
    assert_eq!(status, 201);
    let board_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/projects",
        Some(json!({"name": "API", "description": "backend", "kanban_board_id": board_id})),
    )
    .await;
    assert_eq!(status, 201);
    let project_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/v1/projects", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["meta"]["count"], 1);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/projects/{}", project_id),
        Some(json!({"name": "API v2"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "API v2");
    assert_eq!(body["data"]["description"], "backend");

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/kanban-boards/{}/projects", board_id), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["id"], project_id);

    let (status, body) = send(&app, Method::GET, "/api/v1/projects/99", None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["message"], "Project with id 99 not found");

    let (status, _) = send(&app, Method::GET, "/api/v1/projects/99/tickets", None).await;
    assert_eq!(status, 404);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/projects",
        Some(json!({"name": "Orphan", "description": "x", "kanban_board_id": 999})),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "database_error");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/projects/{}", project_id), None).await;
    assert_eq!(status, 204);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/projects/{}", project_id), None).await;
    assert_eq!(status, 404);

    db.cleanup().await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let Some(db) = test_db().await else { return };
    tracker_api::apply_migrations(&db.pool, &db.model).await.unwrap();
    let boards = CrudService::<KanbanBoard>::new(&db.pool, &db.model).unwrap();
    assert!(boards.get_all().await.unwrap().is_empty());
    db.cleanup().await;
}
