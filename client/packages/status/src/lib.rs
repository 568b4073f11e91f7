//! Conversation runtime status: the independently updating signal read
//! models and the pure resolver that folds them into one status value.

pub mod resolver;
pub mod signals;

pub use resolver::{resolve, StatusColor};
pub use signals::{
    AgentLifecycleState, PauseRequestState, SandboxRunState, ServerActions, StatusSignals,
    TaskPollingState, TaskStatus,
};
