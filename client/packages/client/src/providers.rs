use agent_console_credentials::ReconciliationRequest;
use agent_console_error::ConsoleError;
use async_trait::async_trait;
use reqwest::Method;

use crate::api::GitProviderApi;
use crate::http::ApiClient;

const ADD_GIT_PROVIDERS_PATH: &str = "/api/add-git-providers";

#[async_trait]
impl GitProviderApi for ApiClient {
    async fn reconcile(&self, request: &ReconciliationRequest) -> Result<(), ConsoleError> {
        tracing::debug!(
            disconnect_all = request.is_disconnect_all(),
            "sending provider tokens"
        );
        let builder = self
            .request(Method::POST, ADD_GIT_PROVIDERS_PATH)
            .json(&request.to_body());
        self.send_empty(builder).await
    }
}
