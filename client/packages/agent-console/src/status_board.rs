use std::sync::Arc;

use agent_console_status::{
    AgentLifecycleState, PauseRequestState, SandboxRunState, StatusColor, StatusSignals,
    TaskPollingState,
};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Latest value of each status source for one conversation.
///
/// Nothing is derived ahead of time: every read takes a fresh snapshot of
/// the four sources and resolves it, so updates may arrive in any order.
#[derive(Clone)]
pub struct StatusBoard {
    inner: Arc<Inner>,
}

struct Inner {
    agent: watch::Sender<AgentLifecycleState>,
    sandbox: watch::Sender<Option<SandboxRunState>>,
    task: watch::Sender<TaskPollingState>,
    pause: watch::Receiver<PauseRequestState>,
}

impl Inner {
    fn signals(&self) -> StatusSignals {
        StatusSignals::from_sources(
            &self.agent.borrow(),
            self.sandbox.borrow().as_ref(),
            &self.task.borrow(),
            &self.pause.borrow(),
        )
    }
}

impl StatusBoard {
    /// `pause` is usually `SandboxLifecycleController::subscribe()`.
    pub fn new(pause: watch::Receiver<PauseRequestState>) -> Self {
        let (agent, _) = watch::channel(AgentLifecycleState::default());
        let (sandbox, _) = watch::channel(None);
        let (task, _) = watch::channel(TaskPollingState::default());
        Self {
            inner: Arc::new(Inner {
                agent,
                sandbox,
                task,
                pause,
            }),
        }
    }

    pub fn set_agent_state(&self, state: AgentLifecycleState) {
        self.inner.agent.send_replace(state);
    }

    /// `None` while the conversation record is still loading.
    pub fn set_sandbox_state(&self, state: Option<SandboxRunState>) {
        self.inner.sandbox.send_replace(state);
    }

    pub fn set_task(&self, task: TaskPollingState) {
        self.inner.task.send_replace(task);
    }

    pub fn sandbox_state(&self) -> Option<SandboxRunState> {
        self.inner.sandbox.borrow().clone()
    }

    pub fn signals(&self) -> StatusSignals {
        self.inner.signals()
    }

    pub fn status(&self) -> StatusColor {
        self.signals().resolve()
    }

    /// The current status, then a freshly resolved one after every source
    /// update.
    pub fn changes(&self) -> impl Stream<Item = StatusColor> + Send + 'static {
        let mut pause = self.inner.pause.clone();
        pause.borrow_and_update();

        let updates: Vec<BoxStream<'static, ()>> = vec![
            WatchStream::from_changes(self.inner.agent.subscribe())
                .map(|_| ())
                .boxed(),
            WatchStream::from_changes(self.inner.sandbox.subscribe())
                .map(|_| ())
                .boxed(),
            WatchStream::from_changes(self.inner.task.subscribe())
                .map(|_| ())
                .boxed(),
            WatchStream::from_changes(pause).map(|_| ()).boxed(),
        ];

        let inner = Arc::clone(&self.inner);
        stream::once(async {})
            .chain(stream::select_all(updates))
            .map(move |()| inner.signals().resolve())
    }
}
