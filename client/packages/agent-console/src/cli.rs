use std::io::Write;
use std::sync::Arc;

use agent_console_client::{
    schema, ApiClient, ClientConfig, ConfigError, SettingsApi, DEFAULT_BASE_URL, ENV_BASE_URL,
    ENV_TOKEN,
};
use agent_console_credentials::ProviderId;
use agent_console_error::{ConsoleError, NotificationLevel};
use agent_console_status::{
    AgentLifecycleState, PauseRequestState, SandboxRunState, ServerActions, StatusColor,
    StatusSignals, TaskPollingState, TaskStatus,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::credential_form::CredentialForm;
use crate::integration::{ConnectionTestController, IntegrationSettingsForm};
use crate::notifier::{Notifier, RecordingNotifier};
use crate::sandbox::SandboxLifecycleController;
use crate::tasks::TaskListController;
use crate::Outcome;

#[derive(Parser, Debug)]
#[command(name = "agent-console", bin_name = "agent-console")]
#[command(about = "Conversation status, sandbox control, and integration settings", version)]
#[command(arg_required_else_help = true)]
pub struct AgentConsoleCli {
    #[command(subcommand)]
    command: Command,

    /// Backend base url.
    #[arg(long, short = 'e', global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    endpoint: String,

    #[arg(long, short = 't', global = true, env = ENV_TOKEN, hide_env_values = true)]
    token: Option<String>,

    #[arg(long, short = 'n', global = true)]
    no_token: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a conversation status from explicit signal values.
    Status(StatusArgs),
    /// Pause or resume a conversation sandbox.
    Sandbox(SandboxArgs),
    /// Save or clear git provider credentials.
    Providers(ProvidersArgs),
    /// Notion task integration.
    Notion(NotionArgs),
    /// Print the OpenAPI components for every wire type.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[arg(long, default_value = "loading")]
    agent_state: String,
    /// Sandbox run state; omit while the conversation is still loading.
    #[arg(long)]
    sandbox: Option<String>,
    /// Status of the bound task, if the conversation is a task.
    #[arg(long)]
    task_status: Option<String>,
    #[arg(long)]
    task: bool,
    #[arg(long)]
    pausing: bool,
}

#[derive(Args, Debug)]
pub struct SandboxArgs {
    #[command(subcommand)]
    command: SandboxCommand,
}

#[derive(Subcommand, Debug)]
pub enum SandboxCommand {
    Pause {
        conversation_id: String,
    },
    Resume {
        conversation_id: String,
        /// Linked providers; defaults to the providers connected in settings.
        #[arg(long = "provider", short = 'p')]
        providers: Vec<ProviderId>,
    },
}

#[derive(Args, Debug)]
pub struct ProvidersArgs {
    #[command(subcommand)]
    command: ProvidersCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// Show which providers are connected.
    List,
    /// Save provider tokens and hosts. Providers not named are sent empty.
    Save {
        /// `<provider>=<token>`, repeatable.
        #[arg(long = "set", value_parser = parse_provider_value)]
        tokens: Vec<(ProviderId, String)>,
        /// `<provider>=<host>`, repeatable.
        #[arg(long = "host", value_parser = parse_provider_value)]
        hosts: Vec<(ProviderId, String)>,
    },
    /// Clear one provider's token and host.
    Disconnect {
        #[arg(value_parser = parse_provider)]
        provider: ProviderId,
    },
    DisconnectAll,
}

#[derive(Args, Debug)]
pub struct NotionArgs {
    #[command(subcommand)]
    command: NotionCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotionCommand {
    Tasks {
        #[arg(long)]
        status_filter: Option<String>,
    },
    UpdateStatus {
        page_id: String,
        status: String,
        #[arg(long)]
        status_property: Option<String>,
    },
    /// Check the stored Notion credentials.
    Test,
    Save {
        #[arg(long, default_value = "")]
        api_key: String,
        #[arg(long, default_value = "")]
        database_id: String,
    },
    Disconnect,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print the JSON Schema of the provider save body instead.
    #[arg(long)]
    provider_tokens: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Console(#[from] ConsoleError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("{0}")]
    Failed(String),
    #[error("{0} integration is not configured")]
    NotConfigured(&'static str),
}

pub struct CliConfig {
    pub endpoint: String,
    pub token: Option<String>,
}

pub fn run_agent_console() -> Result<(), CliError> {
    let AgentConsoleCli {
        command,
        endpoint,
        token,
        no_token,
    } = AgentConsoleCli::parse();
    let config = CliConfig {
        endpoint,
        token: if no_token { None } else { token },
    };
    if let Err(err) = init_logging() {
        eprintln!("failed to init logging: {err}");
        return Err(err);
    }
    run_command(&command, &config)
}

pub fn init_logging() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_logfmt::builder()
                .layer()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|err| CliError::Runtime(err.to_string()))
}

pub fn run_command(command: &Command, cli: &CliConfig) -> Result<(), CliError> {
    match command {
        Command::Status(args) => run_status(args),
        Command::Schema(args) => run_schema(args),
        Command::Sandbox(args) => block_on(run_sandbox(&args.command, cli)),
        Command::Providers(args) => block_on(run_providers(&args.command, cli)),
        Command::Notion(args) => block_on(run_notion(&args.command, cli)),
    }
}

fn block_on<F>(future: F) -> Result<(), CliError>
where
    F: std::future::Future<Output = Result<(), CliError>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::Runtime(err.to_string()))?;
    runtime.block_on(future)
}

#[derive(Debug, Serialize)]
struct StatusReport {
    status: StatusColor,
    label: &'static str,
    color: &'static str,
    sandbox_label: &'static str,
    server_actions: ServerActions,
    signals: StatusSignals,
}

fn status_report(args: &StatusArgs) -> StatusReport {
    let agent_state = AgentLifecycleState::parse(&args.agent_state);
    let sandbox = args.sandbox.as_deref().map(SandboxRunState::parse);
    let task_status = args.task_status.as_deref().map(TaskStatus::parse);
    let task = TaskPollingState {
        is_task: args.task || task_status.is_some(),
        task_status,
    };
    let pause = PauseRequestState {
        is_pausing: args.pausing,
    };
    let signals = StatusSignals::from_sources(&agent_state, sandbox.as_ref(), &task, &pause);
    let status = signals.resolve();
    StatusReport {
        status,
        label: status.label(),
        color: status.hex(),
        sandbox_label: SandboxRunState::label(sandbox.as_ref()),
        server_actions: SandboxRunState::server_actions(sandbox.as_ref()),
        signals,
    }
}

fn run_status(args: &StatusArgs) -> Result<(), CliError> {
    write_json(&status_report(args))
}

fn run_schema(args: &SchemaArgs) -> Result<(), CliError> {
    if args.provider_tokens {
        return write_json(&schema::provider_tokens_json_schema());
    }
    write_stdout_line(&schema::openapi_json()?)
}

struct ClientContext {
    client: Arc<ApiClient>,
    notifier: RecordingNotifier,
}

impl ClientContext {
    fn new(cli: &CliConfig) -> Result<Self, CliError> {
        let config = ClientConfig::new(&cli.endpoint, cli.token.clone())?;
        tracing::debug!(endpoint = %config.base_url, "using backend");
        Ok(Self {
            client: Arc::new(ApiClient::new(config)?),
            notifier: RecordingNotifier::new(),
        })
    }

    fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(self.notifier.clone())
    }

    /// Prints success notifications; the first error becomes the command's
    /// error.
    fn finish(&self, outcome: Outcome) -> Result<(), CliError> {
        let mut failure = None;
        for notification in self.notifier.notifications() {
            match notification.level {
                NotificationLevel::Success => write_stdout_line(&notification.message)?,
                NotificationLevel::Error => {
                    failure.get_or_insert(notification.message);
                }
            }
        }
        match (outcome, failure) {
            (_, Some(message)) => Err(CliError::Failed(message)),
            (Outcome::Skipped, None) => write_stdout_line("nothing to do"),
            _ => Ok(()),
        }
    }
}

async fn run_sandbox(command: &SandboxCommand, cli: &CliConfig) -> Result<(), CliError> {
    let ctx = ClientContext::new(cli)?;
    let controller = SandboxLifecycleController::new(ctx.client.clone(), ctx.notifier());
    let handle = match command {
        SandboxCommand::Pause { conversation_id } => controller.pause(Some(conversation_id)),
        SandboxCommand::Resume {
            conversation_id,
            providers,
        } => {
            let providers = if providers.is_empty() {
                ctx.client.settings().await?.connections().connected()
            } else {
                providers.clone()
            };
            controller.resume(Some(conversation_id), providers)
        }
    };
    let outcome = match handle {
        Some(handle) => {
            handle.await?;
            Outcome::Succeeded
        }
        None => Outcome::Skipped,
    };
    ctx.finish(outcome)
}

async fn run_providers(command: &ProvidersCommand, cli: &CliConfig) -> Result<(), CliError> {
    let ctx = ClientContext::new(cli)?;
    match command {
        ProvidersCommand::List => {
            let connections = ctx.client.settings().await?.connections();
            let rows: Vec<_> = ProviderId::ALL
                .iter()
                .map(|provider| {
                    serde_json::json!({
                        "provider": provider,
                        "name": provider.display_name(),
                        "connected": connections.is_connected(*provider),
                        "host": connections.existing_host(*provider),
                    })
                })
                .collect();
            write_json(&rows)
        }
        ProvidersCommand::Save { tokens, hosts } => {
            let form = CredentialForm::new(ctx.client.clone(), ctx.notifier());
            for (provider, token) in tokens {
                form.set_token(*provider, token.as_str());
            }
            for (provider, host) in hosts {
                form.set_host(*provider, host.as_str());
            }
            let outcome = form.submit().await;
            ctx.finish(outcome)
        }
        ProvidersCommand::Disconnect { provider } => {
            let form = CredentialForm::new(ctx.client.clone(), ctx.notifier());
            let outcome = form.disconnect_provider(*provider).await;
            ctx.finish(outcome)
        }
        ProvidersCommand::DisconnectAll => {
            let form = CredentialForm::new(ctx.client.clone(), ctx.notifier());
            let outcome = form.disconnect_all().await;
            ctx.finish(outcome)
        }
    }
}

async fn run_notion(command: &NotionCommand, cli: &CliConfig) -> Result<(), CliError> {
    let ctx = ClientContext::new(cli)?;
    let connection = ConnectionTestController::new(ctx.client.clone(), ctx.notifier());
    match command {
        NotionCommand::Tasks { status_filter } => {
            let tasks = TaskListController::new(ctx.client.clone(), ctx.notifier());
            tasks.configure(&ctx.client.settings().await?);
            match tasks.tasks(status_filter.as_deref()).await? {
                Some(list) => write_json(&list),
                None => Err(CliError::NotConfigured("Notion")),
            }
        }
        NotionCommand::UpdateStatus {
            page_id,
            status,
            status_property,
        } => {
            let tasks = TaskListController::new(ctx.client.clone(), ctx.notifier());
            let outcome = tasks
                .update_status(page_id, status, status_property.as_deref())
                .await;
            ctx.finish(outcome)
        }
        NotionCommand::Test => {
            let outcome = connection.test().await;
            write_json(&connection.state())?;
            ctx.finish(outcome)
        }
        NotionCommand::Save {
            api_key,
            database_id,
        } => {
            let form = IntegrationSettingsForm::new(ctx.client.clone(), ctx.notifier(), connection);
            let outcome = form.save(api_key, database_id).await;
            ctx.finish(outcome)
        }
        NotionCommand::Disconnect => {
            let form = IntegrationSettingsForm::new(ctx.client.clone(), ctx.notifier(), connection);
            let outcome = form.disconnect().await;
            ctx.finish(outcome)
        }
    }
}

fn parse_provider(raw: &str) -> Result<ProviderId, String> {
    raw.parse::<ProviderId>().map_err(|err| err.to_string())
}

fn parse_provider_value(raw: &str) -> Result<(ProviderId, String), String> {
    let (provider, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <provider>=<value>, got {raw:?}"))?;
    let provider = provider.parse::<ProviderId>().map_err(|err| err.to_string())?;
    Ok((provider, value.to_string()))
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    write_stdout_line(&serde_json::to_string_pretty(value)?)
}

fn write_stdout_line(text: &str) -> Result<(), CliError> {
    let mut out = std::io::stdout();
    out.write_all(text.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
