use serde::{Deserialize, Serialize};

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Execution phase of the coding agent, pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentLifecycleState {
    Loading,
    Init,
    Running,
    AwaitingUserInput,
    Paused,
    Stopped,
    Finished,
    Rejected,
    Error,
    RateLimited,
    AwaitingUserConfirmation,
    UserConfirmed,
    UserRejected,
    /// Any wire value this client does not recognise.
    Unknown(String),
}

impl AgentLifecycleState {
    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "loading" => Self::Loading,
            "init" => Self::Init,
            "running" => Self::Running,
            "awaiting_user_input" => Self::AwaitingUserInput,
            "paused" => Self::Paused,
            "stopped" => Self::Stopped,
            "finished" => Self::Finished,
            "rejected" => Self::Rejected,
            "error" => Self::Error,
            "rate_limited" => Self::RateLimited,
            "awaiting_user_confirmation" => Self::AwaitingUserConfirmation,
            "user_confirmed" => Self::UserConfirmed,
            "user_rejected" => Self::UserRejected,
            _ => Self::Unknown(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Loading => "loading",
            Self::Init => "init",
            Self::Running => "running",
            Self::AwaitingUserInput => "awaiting_user_input",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Finished => "finished",
            Self::Rejected => "rejected",
            Self::Error => "error",
            Self::RateLimited => "rate_limited",
            Self::AwaitingUserConfirmation => "awaiting_user_confirmation",
            Self::UserConfirmed => "user_confirmed",
            Self::UserRejected => "user_rejected",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Loading | Self::Init)
    }
}

impl Default for AgentLifecycleState {
    fn default() -> Self {
        Self::Loading
    }
}

impl From<String> for AgentLifecycleState {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AgentLifecycleState> for String {
    fn from(value: AgentLifecycleState) -> Self {
        value.as_str().to_string()
    }
}

/// Sandbox run state as persisted on the conversation record. A missing
/// value (`Option::None` at the call site) means the record is still loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SandboxRunState {
    Running,
    Stopped,
    Starting,
    Unknown(String),
}

impl SandboxRunState {
    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "starting" => Self::Starting,
            _ => Self::Unknown(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Starting => "STARTING",
            Self::Unknown(raw) => raw,
        }
    }

    /// Short label shown next to the status dot.
    pub fn label(state: Option<&Self>) -> &'static str {
        match state {
            Some(Self::Running) => "Running",
            Some(Self::Stopped) => "Stopped",
            _ => "Loading",
        }
    }

    /// Stop is offered only while running, start only while stopped.
    pub fn server_actions(state: Option<&Self>) -> ServerActions {
        ServerActions {
            can_stop: matches!(state, Some(Self::Running)),
            can_start: matches!(state, Some(Self::Stopped)),
        }
    }
}

impl From<String> for SandboxRunState {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SandboxRunState> for String {
    fn from(value: SandboxRunState) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerActions {
    pub can_stop: bool,
    pub can_start: bool,
}

/// Last known status of the external task bound to a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TaskStatus {
    Queued,
    InProgress,
    Ready,
    Error,
}

impl TaskStatus {
    /// Lenient mapping from tracker status strings. Unrecognised values are
    /// treated as work in progress.
    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "queued" | "todo" | "to_do" | "pending" | "backlog" | "waiting_for_sandbox" => {
                Self::Queued
            }
            "ready" | "done" | "completed" | "complete" | "finished" => Self::Ready,
            "error" | "failed" | "failure" | "cancelled" | "canceled" => Self::Error,
            _ => Self::InProgress,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPollingState {
    pub is_task: bool,
    pub task_status: Option<TaskStatus>,
}

/// True exactly while a pause mutation is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseRequestState {
    pub is_pausing: bool,
}

/// One snapshot of every input the resolver looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSignals {
    pub is_pausing: bool,
    pub is_task: bool,
    pub task_status: Option<TaskStatus>,
    pub is_starting_status: bool,
    pub is_stop_status: bool,
    pub agent_state: AgentLifecycleState,
}

impl StatusSignals {
    pub fn from_sources(
        agent_state: &AgentLifecycleState,
        sandbox: Option<&SandboxRunState>,
        task: &TaskPollingState,
        pause: &PauseRequestState,
    ) -> Self {
        Self {
            is_pausing: pause.is_pausing,
            is_task: task.is_task,
            task_status: task.task_status,
            is_starting_status: agent_state.is_starting(),
            is_stop_status: matches!(sandbox, Some(SandboxRunState::Stopped)),
            agent_state: agent_state.clone(),
        }
    }

    pub fn resolve(&self) -> crate::StatusColor {
        crate::resolve(self)
    }
}
