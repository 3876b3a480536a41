use std::io::Write;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use talent_intake::config::{AppConfig, IntakeConfig};
use talent_intake::error::AppError;
use talent_intake::telemetry;
use talent_intake::workflows::intake::questions::decode;
use talent_intake::workflows::intake::remote::{
    HttpSessionClient, RemoteConversation, SavedSessionId,
};
use talent_intake::workflows::intake::{
    generate_questions, ConversationError, ConversationState, FileSessionStore,
    InMemorySessionStore, IntakeConversation, MessageRole, SessionStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const RESET_COMMAND: &str = "/reset";

#[derive(Parser, Debug)]
#[command(
    name = "TalentScout Intake",
    about = "Run the guided candidate intake conversation from the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chat with the intake assistant (default command)
    Chat(ChatArgs),
    /// Print the screening questions generated for a tech stack
    Questions(QuestionsArgs),
}

#[derive(Args, Debug, Default)]
struct ChatArgs {
    /// Drive the conversation through a remote session service at this base URL
    #[arg(long)]
    remote: Option<String>,
    /// Resume an existing remote session instead of the remembered one
    #[arg(long)]
    session_id: Option<String>,
    /// Override the configured local session key
    #[arg(long)]
    session_key: Option<String>,
    /// Discard any saved session before starting
    #[arg(long)]
    fresh: bool,
    /// Log at the configured level instead of warnings only
    #[arg(long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct QuestionsArgs {
    /// Comma-separated technologies, e.g. "Python, Django, PostgreSQL"
    #[arg(long)]
    stack: String,
}

enum Chat {
    Local(IntakeConversation<Arc<dyn SessionStore>>),
    Remote {
        conversation: RemoteConversation<HttpSessionClient>,
        saved: Option<SavedSessionId>,
    },
}

impl Chat {
    fn state(&self) -> &ConversationState {
        match self {
            Chat::Local(conversation) => conversation.state(),
            Chat::Remote { conversation, .. } => conversation.state(),
        }
    }

    async fn send(&mut self, input: &str) -> Result<(), ConversationError> {
        match self {
            Chat::Local(conversation) => conversation.handle_user_input(input).await.map(|_| ()),
            Chat::Remote { conversation, .. } => {
                conversation.handle_user_input(input).await?;
                self.remember_session();
                Ok(())
            }
        }
    }

    async fn reset(&mut self) {
        match self {
            Chat::Local(conversation) => conversation.reset(),
            Chat::Remote { conversation, .. } => {
                conversation.reset().await;
                self.remember_session();
            }
        }
    }

    /// Keep the remembered remote session id in step with the one in use.
    fn remember_session(&self) {
        let Chat::Remote {
            conversation,
            saved: Some(saved),
        } = self
        else {
            return;
        };
        if let Some(id) = conversation.session_id() {
            if let Err(err) = saved.save(id) {
                warn!(error = %err, "failed to remember remote session id");
            }
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Chat(ChatArgs::default()));

    match command {
        Command::Chat(args) => run_chat(args).await,
        Command::Questions(args) => {
            print_questions(&args.stack);
            Ok(())
        }
    }
}

fn open_store(config: &IntakeConfig) -> Arc<dyn SessionStore> {
    if config.storage_enabled {
        Arc::new(FileSessionStore::new(config.storage_dir.clone()))
    } else {
        Arc::new(InMemorySessionStore::default())
    }
}

async fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if !args.verbose {
        config.telemetry.log_level = "warn".to_string();
    }
    telemetry::init(&config.telemetry)?;

    let remote_url = args.remote.or_else(|| config.intake.api_url.clone());
    let mut chat = match remote_url {
        Some(url) => {
            let saved = config
                .intake
                .storage_enabled
                .then(|| SavedSessionId::in_dir(&config.intake.storage_dir));
            let session_id = match (&saved, args.session_id) {
                (_, Some(id)) => Some(id),
                (Some(saved), None) if args.fresh => {
                    saved.clear()?;
                    None
                }
                (Some(saved), None) => saved.load()?,
                (None, None) => None,
            };

            let conversation =
                RemoteConversation::connect(HttpSessionClient::new(url), session_id).await?;
            if let Some(id) = conversation.session_id() {
                info!(session = id, "connected to session service");
                eprintln!("(remote session {id})");
            }
            let chat = Chat::Remote {
                conversation,
                saved,
            };
            chat.remember_session();
            chat
        }
        None => {
            let store = open_store(&config.intake);
            let key = args
                .session_key
                .unwrap_or_else(|| config.intake.session_key.clone());
            if args.fresh {
                store.delete(&key)?;
            }
            Chat::Local(IntakeConversation::start(store, key, config.intake.pacing()))
        }
    };

    let mut printed = 0;
    print_new_messages(chat.state(), &mut printed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case(RESET_COMMAND) {
            chat.reset().await;
            printed = 0;
            print_new_messages(chat.state(), &mut printed);
            continue;
        }

        let was_completed = chat.state().is_completed;
        if let Err(err) = chat.send(input).await {
            warn!(error = %err, "turn rejected");
        }
        print_new_messages(chat.state(), &mut printed);

        if !was_completed && chat.state().is_completed {
            break;
        }
    }

    Ok(())
}

fn print_new_messages(state: &ConversationState, printed: &mut usize) {
    for message in state.messages.iter().skip(*printed) {
        if message.role == MessageRole::Assistant {
            println!("\n{}\n", message.content);
        }
    }
    *printed = state.messages.len();
}

fn print_questions(stack: &str) {
    for (index, encoded) in generate_questions(stack).iter().enumerate() {
        let question = decode(encoded);
        println!(
            "{}. [{}] {}",
            index + 1,
            question.difficulty.label(),
            question.text
        );
    }
}
