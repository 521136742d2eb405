//! Reconciler behavior over a mock store: the board must track server
//! responses without full reloads, and its counters must always balance.

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daydash_core::model::{TaskDraft, TaskFilters, TaskPatch};
use daydash_core::view::Stats;
use daydash_core::{ApiClient, Session, SessionStore, TaskBoard, User};

fn task_json(id: i64, title: &str, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "start_date": null,
        "end_date": null,
        "start_time": null,
        "end_time": null,
        "category": null,
        "completed": completed,
        "created_at": format!("2024-01-01T08:00:{:02}", id % 60),
        "updated_at": null,
        "user_id": 3
    })
}

fn page_json(tasks: Vec<serde_json::Value>) -> serde_json::Value {
    let total = tasks.len();
    json!({
        "tasks": tasks,
        "total": total,
        "page": 1,
        "per_page": 100,
        "total_pages": 1
    })
}

async fn client_for(server: &MockServer, dir: &TempDir) -> ApiClient {
    let store = SessionStore::new(dir.path().join("session.json"));
    store
        .save(&Session {
            token: "tok-123".into(),
            user: User {
                id: 3,
                name: "Ada".into(),
                email: "ada@example.com".into(),
                is_active: true,
                created_at: "2024-01-01T08:00:00".parse().unwrap(),
            },
        })
        .unwrap();
    ApiClient::with_store(server.uri(), store).unwrap()
}

fn balanced(board: &TaskBoard) -> bool {
    let stats = Stats::compute(board.tasks(), "2024-06-15".parse().unwrap());
    stats.pending + stats.completed == stats.total
}

#[tokio::test]
async fn load_replaces_the_whole_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            task_json(1, "Water plants", false),
            task_json(2, "File taxes", true),
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();

    let applied = board
        .load(&client, &TaskFilters::default())
        .await
        .unwrap();
    assert!(applied);
    assert_eq!(board.len(), 2);
    assert!(balanced(&board));
}

#[tokio::test]
async fn create_appends_the_server_record_not_the_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .respond_with(
            // The store trims the title; the board must keep its version.
            ResponseTemplate::new(201).set_body_json(task_json(10, "Buy milk", false)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();

    let before = board.len();
    let created = board
        .create(&client, &TaskDraft::new("  Buy milk  "))
        .await
        .unwrap();

    assert_eq!(board.len(), before + 1);
    assert_eq!(created.id, 10);
    assert_eq!(board.get(10).unwrap().title, "Buy milk");
    assert!(balanced(&board));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would fail the test with a 404.
    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();

    let err = board
        .create(&client, &TaskDraft::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, daydash_core::ApiError::Validation(_)));
    assert!(board.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_twice_restores_the_original_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![task_json(5, "Stretch", false)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/5/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "Stretch", true)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/5/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "Stretch", false)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();
    board.load(&client, &TaskFilters::default()).await.unwrap();
    assert!(!board.get(5).unwrap().completed);

    board.toggle(&client, 5).await.unwrap();
    assert!(board.get(5).unwrap().completed);
    assert!(balanced(&board));

    board.toggle(&client, 5).await.unwrap();
    assert!(!board.get(5).unwrap().completed);
    assert!(balanced(&board));
}

#[tokio::test]
async fn update_swaps_the_matching_entry_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            task_json(1, "First", false),
            task_json(2, "Second", false),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json(2, "Second, renamed", false)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();
    board.load(&client, &TaskFilters::default()).await.unwrap();

    let patch = TaskPatch {
        title: Some("Second, renamed".into()),
        ..TaskPatch::default()
    };
    board.update(&client, 2, &patch).await.unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(board.tasks()[0].title, "First");
    assert_eq!(board.tasks()[1].title, "Second, renamed");
}

#[tokio::test]
async fn delete_removes_by_id_and_tolerates_absent_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(1, "Keep", false)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/99"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();
    board.load(&client, &TaskFilters::default()).await.unwrap();

    // Deleting an id the board never held leaves it unchanged.
    board.remove(&client, 99).await.unwrap();
    assert_eq!(board.len(), 1);
    assert!(balanced(&board));

    board.remove(&client, 1).await.unwrap();
    assert!(board.is_empty());
    assert!(!board.contains(1));
}

#[tokio::test]
async fn failed_mutation_leaves_the_board_at_its_last_applied_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(1, "Keep", false)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Task not found"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server, &dir).await;
    let mut board = TaskBoard::new();
    board.load(&client, &TaskFilters::default()).await.unwrap();

    let err = board.remove(&client, 1).await.unwrap_err();
    assert!(matches!(
        err,
        daydash_core::ApiError::Request { status: 404, .. }
    ));
    assert_eq!(board.len(), 1);
}
