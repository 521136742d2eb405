use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::AppConfig;
use crate::core::ApiClient;
use crate::model::{Category, Task, User};
use crate::tui::form::{FormField, TaskForm};

use super::input::NormalAction;
use super::{App, ConfirmChoice, InputMode};

fn sample_task() -> Task {
    Task {
        id: 7,
        title: "Water plants".into(),
        description: Some("Back garden first".into()),
        start_date: Some("2024-06-01".parse().unwrap()),
        end_date: Some("2024-06-03".parse().unwrap()),
        start_time: chrono::NaiveTime::from_hms_opt(9, 30, 0),
        end_time: None,
        category: Some(Category::Hobby),
        completed: false,
        created_at: "2024-05-30T08:00:00".parse().unwrap(),
        updated_at: None,
        user_id: 1,
    }
}

#[test]
fn category_cycling_wraps_through_none() {
    let mut form = TaskForm::blank();
    assert_eq!(form.category, None);

    form.cycle_category(true);
    assert_eq!(form.category, Some(Category::Work));

    for _ in 0..5 {
        form.cycle_category(true);
    }
    assert_eq!(form.category, Some(Category::Other));

    form.cycle_category(true);
    assert_eq!(form.category, None);

    form.cycle_category(false);
    assert_eq!(form.category, Some(Category::Other));
}

#[test]
fn form_fields_cycle_in_order() {
    let mut form = TaskForm::blank();
    assert_eq!(form.field, FormField::Title);
    form.prev_field();
    assert_eq!(form.field, FormField::Category);
    form.next_field();
    assert_eq!(form.field, FormField::Title);
}

#[test]
fn form_prefills_and_parses_back_to_the_task() {
    let task = sample_task();
    let form = TaskForm::for_task(&task);
    assert!(form.is_editing());

    let draft = form.parse().unwrap();
    assert_eq!(draft.title, "Water plants");
    assert_eq!(draft.description.as_deref(), Some("Back garden first"));
    assert_eq!(draft.start_date, task.start_date);
    assert_eq!(draft.end_date, task.end_date);
    assert_eq!(draft.start_time, task.start_time);
    assert_eq!(draft.category, Some(Category::Hobby));
}

#[test]
fn form_rejects_malformed_dates_with_a_message() {
    let mut form = TaskForm::blank();
    form.title.set("Review notes");
    form.end_date.set("tomorrow");

    let err = form.parse().unwrap_err();
    assert!(err.contains("YYYY-MM-DD"), "unexpected message: {err}");
}

#[rstest::rstest]
#[case(KeyCode::Char('q'), "Quit")]
#[case(KeyCode::Char('a'), "EnterAdd")]
#[case(KeyCode::Char(' '), "ToggleDone")]
#[case(KeyCode::Char('x'), "Delete")]
#[case(KeyCode::Tab, "NextTab")]
#[case(KeyCode::Enter, "ShowDetails")]
fn normal_keys_map_to_expected_actions(#[case] code: KeyCode, #[case] expected: &str) {
    let key = KeyEvent::new(code, KeyModifiers::NONE);
    let action = NormalAction::from_event(&key).expect("key should map");
    assert_eq!(format!("{:?}", action), expected);
}

#[test]
fn unknown_keys_map_to_nothing() {
    let unmapped = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
    assert!(NormalAction::from_event(&unmapped).is_none());
}

fn page_json(tasks: serde_json::Value) -> serde_json::Value {
    let len = tasks.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "tasks": tasks,
        "total": len,
        "page": 1,
        "per_page": 50,
        "total_pages": 1,
    })
}

fn task_json(id: i64, title: &str, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "start_date": null,
        "end_date": null,
        "start_time": null,
        "end_time": null,
        "category": "work",
        "completed": completed,
        "created_at": "2024-05-30T08:00:00",
        "updated_at": null,
        "user_id": 1,
    })
}

fn app_against(server: &MockServer, dir: &TempDir) -> App {
    let config = AppConfig::from_parts(server.uri(), dir.path().to_path_buf()).unwrap();
    let api = ApiClient::new(&config).unwrap();
    let user = User {
        id: 1,
        name: "Ada".into(),
        email: "ada@example.com".into(),
        is_active: true,
        created_at: "2024-01-01T08:00:00".parse().unwrap(),
    };
    App::new(config, api, user).unwrap()
}

#[test]
fn startup_load_puts_pending_tasks_before_completed() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(json!([
                task_json(1, "Done already", true),
                task_json(2, "Still open", false),
            ]))))
            .mount(&server)
            .await;
        server
    });

    let dir = TempDir::new().unwrap();
    let app = app_against(&server, &dir);

    let titles: Vec<&str> = app.visible.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Still open", "Done already"]);
    assert_eq!(app.table_state.selected(), Some(0));
    assert!(!app.should_quit());
}

#[test]
fn delete_flow_requires_an_explicit_yes() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(json!([task_json(3, "Keep me", false)]))),
            )
            .mount(&server)
            .await;
        server
    });

    let dir = TempDir::new().unwrap();
    let mut app = app_against(&server, &dir);
    assert_eq!(app.visible.len(), 1);

    app.on_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
        .unwrap();
    assert_eq!(app.input_mode, InputMode::ConfirmDelete);
    assert_eq!(app.confirm_choice, ConfirmChoice::No);

    // Enter with "No" selected backs out without touching the board.
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.visible.len(), 1);
}

#[test]
fn detail_overlay_opens_and_closes() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(json!([task_json(4, "Inspect me", false)]))),
            )
            .mount(&server)
            .await;
        server
    });

    let dir = TempDir::new().unwrap();
    let mut app = app_against(&server, &dir);

    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Inspect);
    assert_eq!(
        app.inspect_task.as_ref().map(|t| t.id),
        Some(4),
    );

    app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.inspect_task.is_none());
}

#[test]
fn overdue_detection_feeds_detail_entries() {
    let mut task = sample_task();
    task.end_date = Some("2024-06-03".parse().unwrap());
    let today: NaiveDate = "2024-06-10".parse().unwrap();

    let entries = crate::tui::helpers::format_task_detail_entries(&task, today);
    let state = entries
        .iter()
        .find(|(key, _)| key == "State")
        .map(|(_, value)| value.as_str());
    assert_eq!(state, Some("pending (overdue)"));
}
