use std::{io::Write, path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from, Settings},
    draft::fields_for,
    AlwaysConfirm, ClientError, ConfirmPrompt, ConsoleController, ConsoleTab,
    ConversationController, HttpAdminClient, HttpQueryClient, SubmitOutcome, EXAMPLE_QUESTIONS,
};
use shared::{domain::ResourceKind, protocol::ChartPeriod};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "courtiq", about = "CourtIQ club admin console")]
struct Cli {
    /// Admin API base url, overrides courtiq.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Natural-language query endpoint.
    #[arg(long)]
    query_url: Option<String>,
    /// Settings file to read instead of ./courtiq.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dashboard totals and the revenue chart.
    Stats {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// List one collection (members, coaches, courts, bookings).
    List { kind: ResourceKind },
    /// Create a record from `--field name=value` pairs.
    Create {
        kind: ResourceKind,
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Delete a record after confirmation.
    Delete {
        kind: ResourceKind,
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Ask a single analytics question.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive analytics chat.
    Chat,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

struct StdinConfirm;

#[async_trait]
impl ConfirmPrompt for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match BufReader::new(stdin()).read_line(&mut line).await {
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(err) => {
                tracing::warn!("confirmation prompt failed: {err}");
                false
            }
        }
    }
}

fn settings_for(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(url) = &cli.query_url {
        settings.query_url = url.clone();
    }
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn console_for(
    settings: &Settings,
    confirm: Arc<dyn ConfirmPrompt>,
) -> Result<Arc<ConsoleController>> {
    let api = HttpAdminClient::new(&settings.api_base_url, settings.request_timeout())
        .context("building admin client")?;
    Ok(ConsoleController::new(Arc::new(api), confirm))
}

fn conversation_for(settings: &Settings) -> Result<Arc<ConversationController>> {
    let api = HttpQueryClient::new(&settings.query_url, settings.request_timeout())
        .context("building query client")?;
    Ok(ConversationController::with_focus_delay(
        Arc::new(api),
        settings.focus_delay(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = settings_for(&cli)?;
    tracing::debug!(api = %settings.api_base_url, query = %settings.query_url, "settings loaded");

    match cli.command {
        Command::Stats { days } => {
            let period = ChartPeriod::try_from(days).map_err(|err| anyhow!(err))?;
            let console = console_for(&settings, Arc::new(AlwaysConfirm))?;
            console
                .select_tab(ConsoleTab::Dashboard)
                .await
                .context("loading dashboard")?;
            if period != ChartPeriod::default() {
                console
                    .select_chart_period(period)
                    .await
                    .context("loading revenue chart")?;
            }
            let state = console.snapshot().await;
            if let Some(stats) = &state.stats {
                render::print_stats(stats);
            }
            render::print_revenue(state.chart_period, &state.revenue);
        }
        Command::List { kind } => {
            let console = console_for(&settings, Arc::new(AlwaysConfirm))?;
            console
                .select_tab(ConsoleTab::Resource(kind))
                .await
                .with_context(|| format!("loading {kind}"))?;
            render::print_collection(&console.snapshot().await.collection(kind));
        }
        Command::Create { kind, fields } => {
            let console = console_for(&settings, Arc::new(AlwaysConfirm))?;
            console
                .select_tab(ConsoleTab::Resource(kind))
                .await
                .with_context(|| format!("loading {kind}"))?;
            console.open_create_form().await?;
            for (name, value) in &fields {
                console.update_draft_field(name, value).await?;
            }
            match console.submit_create().await {
                Ok(created) => println!("created {} #{}", kind.label(), created.id),
                Err(err) if err.is_validation() => {
                    eprintln!("{err}");
                    eprintln!("{} fields:", kind.label());
                    for field in fields_for(kind) {
                        let marker = if field.required { "*" } else { " " };
                        eprintln!("  {marker} {:<24} {}", field.name, field.label);
                    }
                    bail!("{} not created", kind.label());
                }
                Err(err) => return Err(err).context("create failed"),
            }
        }
        Command::Delete { kind, id, yes } => {
            let confirm: Arc<dyn ConfirmPrompt> = if yes {
                Arc::new(AlwaysConfirm)
            } else {
                Arc::new(StdinConfirm)
            };
            let console = console_for(&settings, confirm)?;
            match console.delete_entity(kind, id).await {
                Ok(client_core::DeleteOutcome::Deleted) => {
                    println!("deleted {} #{id}", kind.label())
                }
                Ok(client_core::DeleteOutcome::Declined) => println!("nothing deleted"),
                Err(ClientError::Api(err)) => bail!("server refused delete: {}", err.message),
                Err(err) => return Err(err).context("delete failed"),
            }
        }
        Command::Ask { question } => {
            let chat = conversation_for(&settings)?;
            let outcome = chat.submit_question(&question.join(" ")).await;
            if let SubmitOutcome::Ignored(reason) = outcome {
                bail!("question not sent: {reason:?}");
            }
            if let Some(turn) = chat.snapshot().await.turns.last() {
                render::print_turn(turn);
            }
        }
        Command::Chat => run_chat(conversation_for(&settings)?).await?,
    }

    Ok(())
}

async fn run_chat(chat: Arc<ConversationController>) -> Result<()> {
    println!("Ask about members, bookings, coaches or revenue.");
    println!("Commands: :examples, :ex <n>, :quit");
    let mut lines = BufReader::new(stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit" | ":q", _) => break,
            (":examples", _) => {
                for (i, example) in EXAMPLE_QUESTIONS.iter().enumerate() {
                    println!("  {i}: {example}");
                }
                continue;
            }
            (":ex", index) => {
                let index: usize = match index.trim().parse() {
                    Ok(index) => index,
                    Err(_) => {
                        println!("usage: :ex <n>");
                        continue;
                    }
                };
                if let Err(err) = chat.select_example(index).await {
                    println!("{err}");
                    continue;
                }
            }
            _ => chat.set_input(line).await,
        }

        let before = chat.snapshot().await.turns.len();
        if let SubmitOutcome::Ignored(_) = chat.submit_input().await {
            continue;
        }
        for turn in chat.snapshot().await.turns.iter().skip(before) {
            render::print_turn(turn);
        }
    }
    Ok(())
}
