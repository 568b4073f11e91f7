use agent_console_credentials::ProviderId;
use agent_console_error::ConsoleError;
use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::SandboxApi;
use crate::http::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ResumeRequest {
    pub providers_set: Vec<ProviderId>,
}

fn conversation_segments<'a>(conversation_id: &'a str, action: &'a str) -> [&'a str; 4] {
    ["api", "conversations", conversation_id, action]
}

#[async_trait]
impl SandboxApi for ApiClient {
    async fn pause(&self, conversation_id: &str) -> Result<(), ConsoleError> {
        tracing::debug!(conversation_id, "pausing conversation sandbox");
        let request =
            self.request_segments(Method::POST, &conversation_segments(conversation_id, "stop"));
        self.send_empty(request).await
    }

    async fn resume(
        &self,
        conversation_id: &str,
        providers: &[ProviderId],
    ) -> Result<(), ConsoleError> {
        tracing::debug!(
            conversation_id,
            providers = providers.len(),
            "resuming conversation sandbox"
        );
        let body = ResumeRequest {
            providers_set: providers.to_vec(),
        };
        let request = self
            .request_segments(Method::POST, &conversation_segments(conversation_id, "start"))
            .json(&body);
        self.send_empty(request).await
    }
}
