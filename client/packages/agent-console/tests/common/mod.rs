#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use agent_console_client::{
    ConnectionTestResponse, GitProviderApi, IntegrationApi, NotionSettingsUpdate, NotionTask,
    NotionTaskList, SandboxApi, Settings, SettingsApi, UpdateStatusResponse,
};
use agent_console_credentials::{ProviderId, ReconciliationRequest};
use agent_console_error::ConsoleError;
use async_trait::async_trait;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Pause(String),
    Resume(String, Vec<ProviderId>),
    Reconcile(ReconciliationRequest),
    ListTasks(Option<String>, usize),
    UpdateStatus(String, String, String),
    TestConnection,
    SaveSettings(NotionSettingsUpdate),
}

/// In-memory backend. Every call is recorded; failures and the connection
/// test answer are configured up front. With `hold` set, calls wait for a
/// `release` before answering.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<ConsoleError>>,
    connection: Mutex<Option<ConnectionTestResponse>>,
    tasks: Mutex<Vec<NotionTask>>,
    update_message: Mutex<String>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(error: ConsoleError) -> Arc<Self> {
        let backend = Self::default();
        *backend.failure.lock().expect("failure lock") = Some(error);
        Arc::new(backend)
    }

    pub fn with_connection(self: Arc<Self>, response: ConnectionTestResponse) -> Arc<Self> {
        *self.connection.lock().expect("connection lock") = Some(response);
        self
    }

    pub fn with_tasks(self: Arc<Self>, tasks: Vec<NotionTask>) -> Arc<Self> {
        *self.tasks.lock().expect("tasks lock") = tasks;
        self
    }

    pub fn with_update_message(self: Arc<Self>, message: &str) -> Arc<Self> {
        *self.update_message.lock().expect("message lock") = message.to_string();
        self
    }

    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().expect("gate lock") = Some(notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn record(&self, call: Call) -> Result<(), ConsoleError> {
        self.calls.lock().expect("calls lock").push(call);
        let gate = self.gate.lock().expect("gate lock").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.failure.lock().expect("failure lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn task(page_id: &str, status: &str) -> NotionTask {
    NotionTask {
        page_id: page_id.to_string(),
        title: format!("Task {page_id}"),
        description: None,
        status: Some(status.to_string()),
        priority: None,
        url: format!("https://notion.so/{page_id}"),
    }
}

#[async_trait]
impl SandboxApi for FakeBackend {
    async fn pause(&self, conversation_id: &str) -> Result<(), ConsoleError> {
        self.record(Call::Pause(conversation_id.to_string())).await
    }

    async fn resume(
        &self,
        conversation_id: &str,
        providers: &[ProviderId],
    ) -> Result<(), ConsoleError> {
        self.record(Call::Resume(conversation_id.to_string(), providers.to_vec()))
            .await
    }
}

#[async_trait]
impl GitProviderApi for FakeBackend {
    async fn reconcile(&self, request: &ReconciliationRequest) -> Result<(), ConsoleError> {
        self.record(Call::Reconcile(request.clone())).await
    }
}

#[async_trait]
impl IntegrationApi for FakeBackend {
    async fn list_tasks(
        &self,
        status_filter: Option<&str>,
        limit: usize,
    ) -> Result<NotionTaskList, ConsoleError> {
        self.record(Call::ListTasks(status_filter.map(str::to_string), limit))
            .await?;
        let tasks = self.tasks.lock().expect("tasks lock").clone();
        Ok(NotionTaskList {
            total: tasks.len(),
            tasks,
        })
    }

    async fn update_status(
        &self,
        page_id: &str,
        status: &str,
        status_property_name: &str,
    ) -> Result<UpdateStatusResponse, ConsoleError> {
        self.record(Call::UpdateStatus(
            page_id.to_string(),
            status.to_string(),
            status_property_name.to_string(),
        ))
        .await?;
        Ok(UpdateStatusResponse {
            success: true,
            message: self.update_message.lock().expect("message lock").clone(),
        })
    }

    async fn test_connection(&self) -> Result<ConnectionTestResponse, ConsoleError> {
        self.record(Call::TestConnection).await?;
        Ok(self
            .connection
            .lock()
            .expect("connection lock")
            .clone()
            .unwrap_or(ConnectionTestResponse {
                connected: true,
                message: Some("Connected".to_string()),
                error: None,
            }))
    }
}

#[async_trait]
impl SettingsApi for FakeBackend {
    async fn settings(&self) -> Result<Settings, ConsoleError> {
        Ok(Settings {
            notion_api_key_set: true,
            ..Settings::default()
        })
    }

    async fn save_notion_settings(&self, update: &NotionSettingsUpdate) -> Result<(), ConsoleError> {
        self.record(Call::SaveSettings(update.clone())).await
    }
}
