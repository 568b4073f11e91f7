use std::sync::Arc;

use agent_console_client::SandboxApi;
use agent_console_credentials::ProviderId;
use agent_console_error::GENERIC_ERROR_MESSAGE;
use agent_console_status::{PauseRequestState, SandboxRunState, ServerActions};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::notifier::Notifier;

/// Wraps the pause and resume mutations for conversation sandboxes.
///
/// Both calls return immediately. The spawned mutation owns the in-flight
/// flag and always clears it when it settles, success or not. The returned
/// handle is only for callers that want to await completion; `None` means
/// the call was skipped, either because no conversation id was given or
/// because the same mutation is already in flight.
#[derive(Clone)]
pub struct SandboxLifecycleController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn SandboxApi>,
    notifier: Arc<dyn Notifier>,
    pause: watch::Sender<PauseRequestState>,
    resuming: watch::Sender<bool>,
}

impl SandboxLifecycleController {
    pub fn new(api: Arc<dyn SandboxApi>, notifier: Arc<dyn Notifier>) -> Self {
        let (pause, _) = watch::channel(PauseRequestState::default());
        let (resuming, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                pause,
                resuming,
            }),
        }
    }

    pub fn pause_state(&self) -> PauseRequestState {
        *self.inner.pause.borrow()
    }

    pub fn is_resuming(&self) -> bool {
        *self.inner.resuming.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PauseRequestState> {
        self.inner.pause.subscribe()
    }

    pub fn subscribe_resuming(&self) -> watch::Receiver<bool> {
        self.inner.resuming.subscribe()
    }

    /// Stop/start availability for the current run state, with the opposite
    /// action disabled while either mutation is in flight.
    pub fn actions(&self, run_state: Option<&SandboxRunState>) -> ServerActions {
        let base = SandboxRunState::server_actions(run_state);
        let pausing = self.pause_state().is_pausing;
        let resuming = self.is_resuming();
        ServerActions {
            can_stop: base.can_stop && !pausing && !resuming,
            can_start: base.can_start && !pausing && !resuming,
        }
    }

    pub fn pause(&self, conversation_id: Option<&str>) -> Option<JoinHandle<()>> {
        let conversation_id = present(conversation_id)?;
        let started = self.inner.pause.send_if_modified(|state| {
            if state.is_pausing {
                return false;
            }
            state.is_pausing = true;
            true
        });
        if !started {
            tracing::debug!(conversation_id = %conversation_id, "pause already in flight");
            return None;
        }

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            tracing::info!(conversation_id = %conversation_id, "pausing sandbox");
            let result = inner.api.pause(&conversation_id).await;
            inner
                .pause
                .send_replace(PauseRequestState { is_pausing: false });
            if let Err(err) = result {
                tracing::warn!(conversation_id = %conversation_id, error = %err, "pause failed");
                inner
                    .notifier
                    .error(&err.user_message(GENERIC_ERROR_MESSAGE));
            }
        }))
    }

    /// `providers` are the caller's currently linked providers.
    pub fn resume(
        &self,
        conversation_id: Option<&str>,
        providers: Vec<ProviderId>,
    ) -> Option<JoinHandle<()>> {
        let conversation_id = present(conversation_id)?;
        let started = self.inner.resuming.send_if_modified(|resuming| {
            if *resuming {
                return false;
            }
            *resuming = true;
            true
        });
        if !started {
            tracing::debug!(conversation_id = %conversation_id, "resume already in flight");
            return None;
        }

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            tracing::info!(
                conversation_id = %conversation_id,
                providers = providers.len(),
                "resuming sandbox"
            );
            let result = inner.api.resume(&conversation_id, &providers).await;
            inner.resuming.send_replace(false);
            if let Err(err) = result {
                tracing::warn!(conversation_id = %conversation_id, error = %err, "resume failed");
                inner
                    .notifier
                    .error(&err.user_message(GENERIC_ERROR_MESSAGE));
            }
        }))
    }
}

fn present(conversation_id: Option<&str>) -> Option<String> {
    match conversation_id.map(str::trim) {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => {
            tracing::debug!("no conversation id, skipping sandbox mutation");
            None
        }
    }
}
