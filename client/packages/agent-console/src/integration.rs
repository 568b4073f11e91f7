use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agent_console_client::{IntegrationApi, NotionSettingsUpdate, SettingsApi};
use agent_console_error::GENERIC_ERROR_MESSAGE;
use serde::Serialize;
use tokio::sync::watch;

use crate::credential_form::SETTINGS_SAVED_MESSAGE;
use crate::notifier::Notifier;
use crate::Outcome;

pub const CONNECTED_MESSAGE: &str = "Successfully connected to Notion!";
pub const NOT_CONNECTED_MESSAGE: &str = "Failed to connect to Notion";
pub const TEST_FAILED_MESSAGE: &str = "Failed to test Notion connection";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTestStatus {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionTestState {
    pub status: ConnectionTestStatus,
    /// Message shown next to the status, if any.
    pub message: Option<String>,
    pub in_flight: bool,
}

/// Runs the integration connection test and keeps its tri-state result.
/// A second test while one is running is refused.
#[derive(Clone)]
pub struct ConnectionTestController {
    inner: Arc<ConnectionInner>,
}

struct ConnectionInner {
    api: Arc<dyn IntegrationApi>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<ConnectionTestState>,
}

impl ConnectionTestController {
    pub fn new(api: Arc<dyn IntegrationApi>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(ConnectionTestState::default());
        Self {
            inner: Arc::new(ConnectionInner {
                api,
                notifier,
                state,
            }),
        }
    }

    pub fn state(&self) -> ConnectionTestState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionTestState> {
        self.inner.state.subscribe()
    }

    pub fn test_enabled(&self) -> bool {
        !self.inner.state.borrow().in_flight
    }

    pub async fn test(&self) -> Outcome {
        let started = self.inner.state.send_if_modified(|state| {
            if state.in_flight {
                return false;
            }
            *state = ConnectionTestState {
                in_flight: true,
                ..ConnectionTestState::default()
            };
            true
        });
        if !started {
            tracing::debug!("connection test already in flight");
            return Outcome::Skipped;
        }

        let (status, message, outcome) = match self.inner.api.test_connection().await {
            Ok(result) if result.connected => {
                self.inner.notifier.success(CONNECTED_MESSAGE);
                (
                    ConnectionTestStatus::Success,
                    result.message,
                    Outcome::Succeeded,
                )
            }
            Ok(result) => {
                let message = result
                    .error
                    .filter(|error| !error.trim().is_empty())
                    .unwrap_or_else(|| NOT_CONNECTED_MESSAGE.to_string());
                tracing::info!(error = %message, "integration not connected");
                self.inner.notifier.error(&message);
                (ConnectionTestStatus::Error, Some(message), Outcome::Failed)
            }
            Err(err) => {
                tracing::warn!(error = %err, "connection test failed");
                let message = err.detail_or(TEST_FAILED_MESSAGE);
                self.inner.notifier.error(&message);
                (ConnectionTestStatus::Error, Some(message), Outcome::Failed)
            }
        };

        self.inner.state.send_replace(ConnectionTestState {
            status,
            message,
            in_flight: false,
        });
        outcome
    }

    /// Back to idle, used after the integration is disconnected.
    pub fn reset(&self) {
        self.inner.state.send_modify(|state| {
            state.status = ConnectionTestStatus::Idle;
            state.message = None;
        });
    }
}

/// Notion key and database settings, plus disconnect.
#[derive(Clone)]
pub struct IntegrationSettingsForm {
    inner: Arc<SettingsInner>,
}

struct SettingsInner {
    api: Arc<dyn SettingsApi>,
    notifier: Arc<dyn Notifier>,
    connection: ConnectionTestController,
    saving: AtomicBool,
}

impl IntegrationSettingsForm {
    pub fn new(
        api: Arc<dyn SettingsApi>,
        notifier: Arc<dyn Notifier>,
        connection: ConnectionTestController,
    ) -> Self {
        Self {
            inner: Arc::new(SettingsInner {
                api,
                notifier,
                connection,
                saving: AtomicBool::new(false),
            }),
        }
    }

    pub fn connection(&self) -> &ConnectionTestController {
        &self.inner.connection
    }

    pub fn is_saving(&self) -> bool {
        self.inner.saving.load(Ordering::SeqCst)
    }

    /// Blank inputs leave the stored values alone; all-blank is a no-op.
    pub async fn save(&self, api_key: &str, database_id: &str) -> Outcome {
        let update = NotionSettingsUpdate::save(api_key, database_id);
        if update.is_empty() {
            return Outcome::Skipped;
        }
        self.send(update).await
    }

    pub async fn disconnect(&self) -> Outcome {
        let outcome = self.send(NotionSettingsUpdate::disconnect()).await;
        if outcome == Outcome::Succeeded {
            self.inner.connection.reset();
        }
        outcome
    }

    async fn send(&self, update: NotionSettingsUpdate) -> Outcome {
        if self.inner.saving.swap(true, Ordering::SeqCst) {
            return Outcome::Skipped;
        }
        let result = self.inner.api.save_notion_settings(&update).await;
        self.inner.saving.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                tracing::info!("integration settings saved");
                self.inner.notifier.success(SETTINGS_SAVED_MESSAGE);
                Outcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(error = %err, "integration settings save failed");
                self.inner
                    .notifier
                    .error(&err.user_message(GENERIC_ERROR_MESSAGE));
                Outcome::Failed
            }
        }
    }
}
