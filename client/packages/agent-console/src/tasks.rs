use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use agent_console_client::{
    IntegrationApi, NotionTask, Settings, DEFAULT_STATUS_PROPERTY, DEFAULT_TASK_LIMIT,
};
use agent_console_error::ConsoleError;
use tokio::time::Instant;

use crate::notifier::Notifier;
use crate::Outcome;

pub const TASK_CACHE_TTL: Duration = Duration::from_secs(30);
pub const TASK_STATUS_UPDATED_MESSAGE: &str = "Task status updated";
pub const TASK_FETCH_FAILED_MESSAGE: &str = "Failed to load tasks";
pub const TASK_UPDATE_FAILED_MESSAGE: &str = "Failed to update task status";

/// Task list from the external tracker, cached per status filter.
#[derive(Clone)]
pub struct TaskListController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn IntegrationApi>,
    notifier: Arc<dyn Notifier>,
    enabled: AtomicBool,
    ttl: Duration,
    cache: StdMutex<HashMap<Option<String>, CachedTasks>>,
}

struct CachedTasks {
    fetched_at: Instant,
    tasks: Vec<NotionTask>,
}

impl TaskListController {
    pub fn new(api: Arc<dyn IntegrationApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_ttl(api, notifier, TASK_CACHE_TTL)
    }

    pub fn with_ttl(api: Arc<dyn IntegrationApi>, notifier: Arc<dyn Notifier>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                enabled: AtomicBool::new(false),
                ttl,
                cache: StdMutex::new(HashMap::new()),
            }),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Fetching is enabled only once an API key is stored.
    pub fn configure(&self, settings: &Settings) {
        self.set_enabled(settings.notion_api_key_set);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// `Ok(None)` when the integration is not configured. Results younger
    /// than the cache ttl are served without a request. A failed fetch is
    /// notified here and also returned so the caller can render its own
    /// error state.
    pub async fn tasks(
        &self,
        status_filter: Option<&str>,
    ) -> Result<Option<Vec<NotionTask>>, ConsoleError> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let key = status_filter
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        if let Some(tasks) = self.cached(&key) {
            tracing::debug!(status_filter = ?key, "serving cached tasks");
            return Ok(Some(tasks));
        }

        let list = self
            .inner
            .api
            .list_tasks(key.as_deref(), DEFAULT_TASK_LIMIT)
            .await
            .map_err(|err| {
                tracing::warn!(status_filter = ?key, error = %err, "task fetch failed");
                self.inner
                    .notifier
                    .error(&err.detail_or(TASK_FETCH_FAILED_MESSAGE));
                err
            })?;

        let mut cache = self.lock_cache();
        let ttl = self.inner.ttl;
        cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        cache.insert(
            key,
            CachedTasks {
                fetched_at: Instant::now(),
                tasks: list.tasks.clone(),
            },
        );
        Ok(Some(list.tasks))
    }

    pub async fn update_status(
        &self,
        page_id: &str,
        status: &str,
        status_property_name: Option<&str>,
    ) -> Outcome {
        let property = status_property_name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_STATUS_PROPERTY);
        match self.inner.api.update_status(page_id, status, property).await {
            Ok(response) => {
                tracing::info!(page_id, status, "task status updated");
                let message = if response.message.trim().is_empty() {
                    TASK_STATUS_UPDATED_MESSAGE
                } else {
                    response.message.as_str()
                };
                self.inner.notifier.success(message);
                self.invalidate();
                Outcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(page_id, status, error = %err, "task status update failed");
                self.inner
                    .notifier
                    .error(&err.detail_or(TASK_UPDATE_FAILED_MESSAGE));
                Outcome::Failed
            }
        }
    }

    pub fn invalidate(&self) {
        self.lock_cache().clear();
    }

    /// Number of filters with a cached result, stale or not.
    pub fn cached_filters(&self) -> usize {
        self.lock_cache().len()
    }

    fn cached(&self, key: &Option<String>) -> Option<Vec<NotionTask>> {
        let cache = self.lock_cache();
        cache
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.inner.ttl)
            .map(|entry| entry.tasks.clone())
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<Option<String>, CachedTasks>> {
        self.inner
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
