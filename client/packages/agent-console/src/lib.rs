//! Runtime side of the agent console: sandbox pause/resume, the git provider
//! credential form, the Notion integration controllers, and the status board
//! that folds every status source into one value.

pub mod cli;
pub mod credential_form;
pub mod integration;
pub mod notifier;
pub mod sandbox;
pub mod status_board;
pub mod tasks;

pub use credential_form::CredentialForm;
pub use integration::{
    ConnectionTestController, ConnectionTestState, ConnectionTestStatus, IntegrationSettingsForm,
};
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use sandbox::SandboxLifecycleController;
pub use status_board::StatusBoard;
pub use tasks::TaskListController;

/// How a user-triggered operation settled. Failures have already been
/// turned into a notification by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Guard rejected the call: nothing to send, or a request is in flight.
    Skipped,
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}
