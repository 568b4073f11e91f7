mod common;

use std::sync::Arc;

use agent_console::credential_form::{PROVIDERS_DISCONNECTED_MESSAGE, SETTINGS_SAVED_MESSAGE};
use agent_console::{CredentialForm, Outcome, RecordingNotifier};
use agent_console_credentials::{
    ClearedFields, CredentialReconciler, ProviderConnections, ProviderId, ProviderToken,
    ReconciliationRequest,
};
use agent_console_error::{ConsoleError, Notification, GENERIC_ERROR_MESSAGE};
use common::{Call, FakeBackend};

fn form(backend: Arc<FakeBackend>) -> (CredentialForm, RecordingNotifier) {
    let notifier = RecordingNotifier::new();
    let form = CredentialForm::new(backend, Arc::new(notifier.clone()));
    (form, notifier)
}

#[tokio::test]
async fn github_token_submit_sends_five_slots_and_resets() {
    let backend = FakeBackend::new();
    let (form, notifier) = form(backend.clone());

    assert!(!form.submit_enabled());
    form.set_token(ProviderId::Github, "ghp_123");
    assert!(form.is_dirty());
    assert!(form.submit_enabled());

    assert_eq!(form.submit().await, Outcome::Succeeded);

    let calls = backend.calls();
    let [Call::Reconcile(ReconciliationRequest::Save { payload, cleared })] = calls.as_slice()
    else {
        panic!("expected one save request, got {calls:?}");
    };
    assert_eq!(payload.len(), 5);
    assert!(cleared.is_empty());
    assert_eq!(
        payload.get(ProviderId::Github),
        &ProviderToken {
            token: "ghp_123".to_string(),
            host: String::new(),
        }
    );
    for provider in [
        ProviderId::Gitlab,
        ProviderId::Bitbucket,
        ProviderId::AzureDevops,
        ProviderId::Forgejo,
    ] {
        assert_eq!(payload.get(provider), &ProviderToken::default());
    }

    assert!(!form.is_dirty());
    assert!(!form.submit_enabled());
    assert_eq!(
        notifier.notifications(),
        vec![Notification::success(SETTINGS_SAVED_MESSAGE)]
    );
}

#[tokio::test]
async fn untouched_form_does_not_submit() {
    let backend = FakeBackend::new();
    let (form, notifier) = form(backend.clone());

    assert_eq!(form.submit().await, Outcome::Skipped);
    assert!(backend.calls().is_empty());
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn cleared_field_still_counts_as_an_edit() {
    let backend = FakeBackend::new();
    let (form, _notifier) = form(backend.clone());

    form.set_host(ProviderId::Gitlab, "gitlab.example.com");
    form.set_host(ProviderId::Gitlab, "");
    assert!(form.submit_enabled());
    assert_eq!(form.submit().await, Outcome::Succeeded);

    let calls = backend.calls();
    let [Call::Reconcile(request)] = calls.as_slice() else {
        panic!("expected one save request, got {calls:?}");
    };
    assert_eq!(
        request.cleared(),
        ClearedFields {
            tokens: vec![],
            hosts: vec![ProviderId::Gitlab],
        }
    );
}

#[tokio::test]
async fn failed_save_keeps_the_form_dirty() {
    let backend = FakeBackend::failing(ConsoleError::api(Some(400), "Invalid GitHub token"));
    let (form, notifier) = form(backend);

    form.set_token(ProviderId::Github, "bad");
    assert_eq!(form.submit().await, Outcome::Failed);

    assert!(form.is_dirty());
    assert!(form.submit_enabled());
    assert_eq!(
        notifier.last(),
        Some(Notification::error("Invalid GitHub token"))
    );
}

#[tokio::test]
async fn transport_failure_uses_generic_message() {
    let backend = FakeBackend::failing(ConsoleError::transport(Some(502), "bad gateway"));
    let (form, notifier) = form(backend);

    form.set_token(ProviderId::Bitbucket, "token");
    form.submit().await;
    assert_eq!(
        notifier.last(),
        Some(Notification::error(GENERIC_ERROR_MESSAGE))
    );
}

#[tokio::test]
async fn submit_disabled_while_in_flight() {
    let backend = FakeBackend::new();
    let gate = backend.hold();
    let (form, _notifier) = form(backend.clone());
    form.set_token(ProviderId::Github, "ghp_123");

    let pending = tokio::spawn({
        let form = form.clone();
        async move { form.submit().await }
    });
    while backend.calls().is_empty() {
        tokio::task::yield_now().await;
    }

    assert!(form.is_in_flight());
    assert!(!form.submit_enabled());
    assert_eq!(form.submit().await, Outcome::Skipped);
    assert_eq!(form.disconnect_all().await, Outcome::Skipped);

    gate.notify_one();
    assert_eq!(pending.await.expect("submit task"), Outcome::Succeeded);
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn disconnect_all_is_explicit() {
    let backend = FakeBackend::new();
    let (form, notifier) = form(backend.clone());

    let connections =
        ProviderConnections::from_tokens_set([("github", None::<String>)]);
    assert!(form.disconnect_enabled(&connections));
    assert!(!form.disconnect_enabled(&ProviderConnections::default()));

    assert_eq!(form.disconnect_all().await, Outcome::Succeeded);
    assert_eq!(
        backend.calls(),
        vec![Call::Reconcile(CredentialReconciler::disconnect_all_request())]
    );
    assert_eq!(
        notifier.last(),
        Some(Notification::success(PROVIDERS_DISCONNECTED_MESSAGE))
    );
}

#[tokio::test]
async fn single_provider_disconnect_lists_both_fields() {
    let backend = FakeBackend::new();
    let (form, notifier) = form(backend.clone());

    assert_eq!(
        form.disconnect_provider(ProviderId::Gitlab).await,
        Outcome::Succeeded
    );

    let calls = backend.calls();
    let [Call::Reconcile(request)] = calls.as_slice() else {
        panic!("expected one save request, got {calls:?}");
    };
    assert!(!request.is_disconnect_all());
    assert_eq!(
        request.cleared(),
        ClearedFields {
            tokens: vec![ProviderId::Gitlab],
            hosts: vec![ProviderId::Gitlab],
        }
    );
    assert!(!form.is_dirty());
    assert_eq!(
        notifier.last(),
        Some(Notification::success(SETTINGS_SAVED_MESSAGE))
    );
}
