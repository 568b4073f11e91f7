mod common;

use std::sync::Arc;
use std::time::Duration;

use agent_console::integration::{CONNECTED_MESSAGE, NOT_CONNECTED_MESSAGE};
use agent_console::tasks::{
    TASK_CACHE_TTL, TASK_FETCH_FAILED_MESSAGE, TASK_STATUS_UPDATED_MESSAGE,
};
use agent_console::{
    ConnectionTestController, ConnectionTestStatus, IntegrationSettingsForm, Outcome,
    RecordingNotifier, TaskListController,
};
use agent_console_client::{
    ConnectionTestResponse, NotionSettingsUpdate, Settings, DEFAULT_STATUS_PROPERTY,
    DEFAULT_TASK_LIMIT,
};
use agent_console_error::{ConsoleError, Notification};
use common::{task, Call, FakeBackend};

fn not_connected(error: Option<&str>) -> ConnectionTestResponse {
    ConnectionTestResponse {
        connected: false,
        message: None,
        error: error.map(str::to_string),
    }
}

#[tokio::test]
async fn not_connected_answer_sets_error_status() {
    let backend = FakeBackend::new().with_connection(not_connected(Some("invalid key")));
    let notifier = RecordingNotifier::new();
    let controller = ConnectionTestController::new(backend, Arc::new(notifier.clone()));

    assert_eq!(controller.test().await, Outcome::Failed);

    let state = controller.state();
    assert_eq!(state.status, ConnectionTestStatus::Error);
    assert_eq!(state.message.as_deref(), Some("invalid key"));
    assert!(!state.in_flight);
    assert_eq!(notifier.last(), Some(Notification::error("invalid key")));
}

#[tokio::test]
async fn not_connected_without_detail_uses_default_message() {
    let backend = FakeBackend::new().with_connection(not_connected(None));
    let notifier = RecordingNotifier::new();
    let controller = ConnectionTestController::new(backend, Arc::new(notifier.clone()));

    controller.test().await;
    assert_eq!(notifier.last(), Some(Notification::error(NOT_CONNECTED_MESSAGE)));
}

#[tokio::test]
async fn connected_answer_sets_success() {
    let backend = FakeBackend::new();
    let notifier = RecordingNotifier::new();
    let controller = ConnectionTestController::new(backend, Arc::new(notifier.clone()));

    assert_eq!(controller.test().await, Outcome::Succeeded);
    assert_eq!(controller.state().status, ConnectionTestStatus::Success);
    assert_eq!(notifier.last(), Some(Notification::success(CONNECTED_MESSAGE)));
}

#[tokio::test]
async fn transport_failure_maps_to_error_status() {
    let backend = FakeBackend::failing(ConsoleError::transport(
        Some(500),
        "Request failed with status code 500",
    ));
    let notifier = RecordingNotifier::new();
    let controller = ConnectionTestController::new(backend, Arc::new(notifier.clone()));

    assert_eq!(controller.test().await, Outcome::Failed);
    assert_eq!(controller.state().status, ConnectionTestStatus::Error);
    assert_eq!(
        notifier.last(),
        Some(Notification::error("Request failed with status code 500"))
    );
}

#[tokio::test]
async fn second_test_refused_while_first_runs() {
    let backend = FakeBackend::new();
    let gate = backend.hold();
    let controller = ConnectionTestController::new(backend.clone(), Arc::new(RecordingNotifier::new()));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.test().await }
    });
    while backend.calls().is_empty() {
        tokio::task::yield_now().await;
    }

    assert!(!controller.test_enabled());
    assert_eq!(controller.test().await, Outcome::Skipped);

    gate.notify_one();
    assert_eq!(first.await.expect("test task"), Outcome::Succeeded);
    assert_eq!(backend.calls(), vec![Call::TestConnection]);
    assert!(controller.test_enabled());
}

#[tokio::test]
async fn disconnect_resets_connection_result() {
    let backend = FakeBackend::new();
    let notifier = RecordingNotifier::new();
    let notifier_arc = Arc::new(notifier.clone());
    let connection = ConnectionTestController::new(backend.clone(), notifier_arc.clone());
    let form = IntegrationSettingsForm::new(backend.clone(), notifier_arc, connection);

    form.connection().test().await;
    assert_eq!(form.connection().state().status, ConnectionTestStatus::Success);

    assert_eq!(form.disconnect().await, Outcome::Succeeded);
    assert_eq!(form.connection().state().status, ConnectionTestStatus::Idle);
    assert_eq!(
        backend.calls().last(),
        Some(&Call::SaveSettings(NotionSettingsUpdate::disconnect()))
    );
}

#[tokio::test]
async fn blank_settings_save_is_skipped() {
    let backend = FakeBackend::new();
    let notifier: Arc<RecordingNotifier> = Arc::new(RecordingNotifier::new());
    let connection = ConnectionTestController::new(backend.clone(), notifier.clone());
    let form = IntegrationSettingsForm::new(backend.clone(), notifier, connection);

    assert_eq!(form.save("  ", "").await, Outcome::Skipped);
    assert_eq!(form.save("secret_abc", "").await, Outcome::Succeeded);
    assert_eq!(
        backend.calls(),
        vec![Call::SaveSettings(NotionSettingsUpdate::save("secret_abc", ""))]
    );
}

#[tokio::test(start_paused = true)]
async fn task_list_is_cached_per_filter() {
    let backend = FakeBackend::new().with_tasks(vec![task("page-1", "To Do")]);
    let controller = TaskListController::new(backend.clone(), Arc::new(RecordingNotifier::new()));

    assert_eq!(controller.tasks(None).await.expect("disabled"), None);
    assert!(backend.calls().is_empty());

    controller.configure(&Settings {
        notion_api_key_set: true,
        ..Settings::default()
    });
    let tasks = controller
        .tasks(Some("To Do"))
        .await
        .expect("fetch")
        .expect("enabled");
    assert_eq!(tasks.len(), 1);

    controller.tasks(Some("To Do")).await.expect("cached");
    controller.tasks(Some("")).await.expect("no filter");
    assert_eq!(
        backend.calls(),
        vec![
            Call::ListTasks(Some("To Do".to_string()), DEFAULT_TASK_LIMIT),
            Call::ListTasks(None, DEFAULT_TASK_LIMIT),
        ]
    );

    tokio::time::advance(TASK_CACHE_TTL + Duration::from_secs(1)).await;
    controller.tasks(Some("To Do")).await.expect("refetch");
    assert_eq!(backend.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn stale_filters_are_evicted_on_insert() {
    let backend = FakeBackend::new().with_tasks(vec![task("page-1", "To Do")]);
    let controller = TaskListController::new(backend.clone(), Arc::new(RecordingNotifier::new()));
    controller.set_enabled(true);

    controller.tasks(Some("To Do")).await.expect("first filter");
    controller.tasks(Some("Done")).await.expect("second filter");
    assert_eq!(controller.cached_filters(), 2);

    tokio::time::advance(TASK_CACHE_TTL + Duration::from_secs(1)).await;
    controller.tasks(Some("Blocked")).await.expect("third filter");
    assert_eq!(controller.cached_filters(), 1);

    controller.tasks(Some("Blocked")).await.expect("cached");
    assert_eq!(backend.calls().len(), 3);
}

#[tokio::test]
async fn failed_fetch_notifies_and_returns_the_error() {
    let backend = FakeBackend::failing(ConsoleError::api(Some(401), "Invalid Notion API key"));
    let notifier = RecordingNotifier::new();
    let controller = TaskListController::new(backend, Arc::new(notifier.clone()));
    controller.set_enabled(true);

    let err = controller.tasks(None).await.expect_err("fetch fails");
    assert_eq!(err.detail_or(TASK_FETCH_FAILED_MESSAGE), "Invalid Notion API key");
    assert_eq!(
        notifier.notifications(),
        vec![Notification::error("Invalid Notion API key")]
    );
    assert_eq!(controller.cached_filters(), 0);
}

#[tokio::test]
async fn failed_fetch_without_detail_uses_default_message() {
    let backend = FakeBackend::failing(ConsoleError::transport(None, ""));
    let notifier = RecordingNotifier::new();
    let controller = TaskListController::new(backend, Arc::new(notifier.clone()));
    controller.set_enabled(true);

    assert!(controller.tasks(Some("To Do")).await.is_err());
    assert_eq!(
        notifier.last(),
        Some(Notification::error(TASK_FETCH_FAILED_MESSAGE))
    );
}

#[tokio::test]
async fn update_status_notifies_and_invalidates() {
    let backend = FakeBackend::new()
        .with_tasks(vec![task("page-1", "To Do")])
        .with_update_message("Updated to Done");
    let notifier = RecordingNotifier::new();
    let controller = TaskListController::new(backend.clone(), Arc::new(notifier.clone()));
    controller.set_enabled(true);

    controller.tasks(None).await.expect("fetch");
    assert_eq!(
        controller.update_status("page-1", "Done", None).await,
        Outcome::Succeeded
    );
    assert_eq!(notifier.last(), Some(Notification::success("Updated to Done")));

    controller.tasks(None).await.expect("refetch after invalidation");
    assert_eq!(
        backend.calls(),
        vec![
            Call::ListTasks(None, DEFAULT_TASK_LIMIT),
            Call::UpdateStatus(
                "page-1".to_string(),
                "Done".to_string(),
                DEFAULT_STATUS_PROPERTY.to_string()
            ),
            Call::ListTasks(None, DEFAULT_TASK_LIMIT),
        ]
    );
}

#[tokio::test]
async fn update_status_falls_back_to_default_message() {
    let backend = FakeBackend::new();
    let notifier = RecordingNotifier::new();
    let controller = TaskListController::new(backend, Arc::new(notifier.clone()));

    controller.update_status("page-1", "Done", Some("Stage")).await;
    assert_eq!(
        notifier.last(),
        Some(Notification::success(TASK_STATUS_UPDATED_MESSAGE))
    );
}

#[tokio::test]
async fn update_status_error_uses_structured_message() {
    let backend = FakeBackend::failing(ConsoleError::api(Some(200), "Page not found"));
    let notifier = RecordingNotifier::new();
    let controller = TaskListController::new(backend, Arc::new(notifier.clone()));

    assert_eq!(
        controller.update_status("missing", "Done", None).await,
        Outcome::Failed
    );
    assert_eq!(notifier.last(), Some(Notification::error("Page not found")));
}
