use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use agent_console_client::GitProviderApi;
use agent_console_credentials::{
    CredentialReconciler, CredentialSlotStore, ProviderConnections, ProviderId,
    ReconciliationRequest,
};
use agent_console_error::GENERIC_ERROR_MESSAGE;

use crate::notifier::Notifier;
use crate::Outcome;

pub const SETTINGS_SAVED_MESSAGE: &str = "Settings saved";
pub const PROVIDERS_DISCONNECTED_MESSAGE: &str = "Git providers disconnected";

/// Git provider settings form. Each form instance owns its own slot store;
/// clones share it.
#[derive(Clone)]
pub struct CredentialForm {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn GitProviderApi>,
    notifier: Arc<dyn Notifier>,
    state: StdMutex<FormState>,
}

#[derive(Default)]
struct FormState {
    store: CredentialSlotStore,
    in_flight: bool,
}

impl CredentialForm {
    pub fn new(api: Arc<dyn GitProviderApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                state: StdMutex::new(FormState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_token(&self, provider: ProviderId, value: impl Into<String>) {
        self.state().store.set_token(provider, value);
    }

    pub fn set_host(&self, provider: ProviderId, value: impl Into<String>) {
        self.state().store.set_host(provider, value);
    }

    pub fn store(&self) -> CredentialSlotStore {
        self.state().store.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state().store.is_dirty()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state().in_flight
    }

    pub fn submit_enabled(&self) -> bool {
        let state = self.state();
        CredentialReconciler::submit_enabled(&state.store, state.in_flight)
    }

    pub fn disconnect_enabled(&self, connections: &ProviderConnections) -> bool {
        connections.disconnect_enabled() && !self.is_in_flight()
    }

    /// Saves all five provider slots in one request.
    pub async fn submit(&self) -> Outcome {
        let request = {
            let mut state = self.state();
            if !CredentialReconciler::submit_enabled(&state.store, state.in_flight) {
                tracing::debug!("nothing to save or save already in flight");
                return Outcome::Skipped;
            }
            state.in_flight = true;
            CredentialReconciler::save_request(&state.store)
        };
        self.send(request, SETTINGS_SAVED_MESSAGE).await
    }

    /// Disconnects one provider by saving its fields as cleared. Other
    /// pending edits in the form go out with the same request.
    pub async fn disconnect_provider(&self, provider: ProviderId) -> Outcome {
        let request = {
            let mut state = self.state();
            if state.in_flight {
                return Outcome::Skipped;
            }
            state.store.clear(provider);
            state.in_flight = true;
            CredentialReconciler::save_request(&state.store)
        };
        tracing::info!(provider = %provider, "disconnecting git provider");
        self.send(request, SETTINGS_SAVED_MESSAGE).await
    }

    /// Clears every provider credential. Sent as an explicit disconnect so
    /// the backend can tell it apart from an untouched form.
    pub async fn disconnect_all(&self) -> Outcome {
        {
            let mut state = self.state();
            if state.in_flight {
                return Outcome::Skipped;
            }
            state.in_flight = true;
        }
        self.send(
            CredentialReconciler::disconnect_all_request(),
            PROVIDERS_DISCONNECTED_MESSAGE,
        )
        .await
    }

    async fn send(&self, request: ReconciliationRequest, success_message: &str) -> Outcome {
        let disconnect_all = request.is_disconnect_all();
        tracing::info!(disconnect_all, "saving git provider credentials");
        let result = self.inner.api.reconcile(&request).await;

        let mut state = self.state();
        state.in_flight = false;
        match result {
            Ok(()) => {
                state.store.reset();
                drop(state);
                self.inner.notifier.success(success_message);
                Outcome::Succeeded
            }
            Err(err) => {
                drop(state);
                tracing::warn!(disconnect_all, error = %err, "git provider save failed");
                self.inner
                    .notifier
                    .error(&err.user_message(GENERIC_ERROR_MESSAGE));
                Outcome::Failed
            }
        }
    }
}
