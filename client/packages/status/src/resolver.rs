use serde::{Deserialize, Serialize};

use crate::signals::{AgentLifecycleState, StatusSignals, TaskStatus};

/// The single status value presented for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Pausing,
    Starting,
    Stopped,
    TaskQueued,
    TaskInProgress,
    TaskReady,
    TaskError,
    Active,
    AwaitingInput,
    Idle,
    Error,
    /// Designated fallback for agent states this client does not know.
    Unknown,
}

impl StatusColor {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Pausing | Self::Starting | Self::TaskInProgress => "#FFD600",
            Self::Stopped => "#3C3C4A",
            Self::TaskQueued | Self::Idle => "#A3A3A3",
            Self::TaskReady | Self::Active => "#BCFF8C",
            Self::TaskError | Self::Error => "#FF684E",
            Self::AwaitingInput => "#4A9EFF",
            Self::Unknown => "#71717A",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pausing => "Pausing",
            Self::Starting => "Starting",
            Self::Stopped => "Stopped",
            Self::TaskQueued => "Task queued",
            Self::TaskInProgress => "Task in progress",
            Self::TaskReady => "Task ready",
            Self::TaskError => "Task failed",
            Self::Active => "Running",
            Self::AwaitingInput => "Waiting for input",
            Self::Idle => "Idle",
            Self::Error => "Error",
            Self::Unknown => "Unknown",
        }
    }

    fn for_task(status: Option<TaskStatus>) -> Self {
        match status {
            None | Some(TaskStatus::Queued) => Self::TaskQueued,
            Some(TaskStatus::InProgress) => Self::TaskInProgress,
            Some(TaskStatus::Ready) => Self::TaskReady,
            Some(TaskStatus::Error) => Self::TaskError,
        }
    }

    fn for_agent(state: &AgentLifecycleState) -> Self {
        match state {
            AgentLifecycleState::Loading | AgentLifecycleState::Init => Self::Starting,
            AgentLifecycleState::Running | AgentLifecycleState::UserConfirmed => Self::Active,
            AgentLifecycleState::AwaitingUserInput
            | AgentLifecycleState::AwaitingUserConfirmation => Self::AwaitingInput,
            AgentLifecycleState::Paused
            | AgentLifecycleState::Stopped
            | AgentLifecycleState::Finished
            | AgentLifecycleState::Rejected
            | AgentLifecycleState::UserRejected => Self::Idle,
            AgentLifecycleState::Error | AgentLifecycleState::RateLimited => Self::Error,
            AgentLifecycleState::Unknown(_) => Self::Unknown,
        }
    }
}

/// First matching rule wins: pausing, task, starting, stopped, agent state.
pub fn resolve(signals: &StatusSignals) -> StatusColor {
    if signals.is_pausing {
        return StatusColor::Pausing;
    }
    if signals.is_task {
        return StatusColor::for_task(signals.task_status);
    }
    if signals.is_starting_status {
        return StatusColor::Starting;
    }
    if signals.is_stop_status {
        return StatusColor::Stopped;
    }
    StatusColor::for_agent(&signals.agent_state)
}
