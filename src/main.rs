use clap::Parser;
use cluster_lib::attachments::{attach_file_text, classify_attachment, AttachmentKind};
use cluster_lib::config::Config;
use cluster_lib::history::{title_for, Chat, HistoryStore, MessageKind};
use cluster_lib::logging::{self, log_error, log_history};
use cluster_lib::responses::{fill, Bank};
use cluster_lib::{build_orchestrator, Session};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

const LOG_RETENTION_DAYS: i64 = 7;
const HISTORY_LIST_LIMIT: usize = 20;
const EMPTY_FILE_REPLY: &str = "I analyzed the file, but it appears to be empty.";

#[derive(Parser, Debug)]
#[command(name = "cluster", about = "Rule-based chat assistant with encyclopedia lookups.")]
struct Cli {
    /// Config file (TOML). Defaults to the per-user config location.
    #[arg(long, env = "CLUSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for reply selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Do not read or write chat history.
    #[arg(long, default_value_t = false)]
    no_history: bool,
}

/// REPL state: the live session plus the chat it is recorded under.
struct Repl {
    session: Session,
    history: Option<HistoryStore>,
    chat: Option<Chat>,
}

impl Repl {
    fn new_chat(&mut self) {
        self.chat = None;
        self.session.reset();
    }

    fn record(&mut self, user: &str, reply: &str) {
        let Some(store) = &self.history else { return };
        let title = title_for(self.session.orchestrator().lexicon(), user);

        let result = match self.chat.as_ref().map(|c| c.id.clone()) {
            Some(id) => store.retitle_if_placeholder(&id, &title).map(|_| id),
            None => store.create_chat(&title).map(|chat| {
                let id = chat.id.clone();
                self.chat = Some(chat);
                id
            }),
        };

        let saved = result.and_then(|chat_id| {
            store.append_message(&chat_id, MessageKind::User, user)?;
            store.append_message(&chat_id, MessageKind::Ai, reply)
        });
        if let Err(e) = saved {
            log_error(Some(self.session.id()), &format!("failed to save turn: {}", e));
        }
    }

    fn list_chats(&self) {
        let Some(store) = &self.history else {
            println!("History is disabled.");
            return;
        };
        match store.recent_chats(HISTORY_LIST_LIMIT) {
            Ok(chats) if chats.is_empty() => println!("No saved chats."),
            Ok(chats) => {
                for chat in chats {
                    println!("{}  {}", chat.id, chat.short_title());
                }
            }
            Err(e) => eprintln!("Could not list chats: {}", e),
        }
    }

    fn load_chat(&mut self, id: &str) {
        let Some(store) = &self.history else {
            println!("History is disabled.");
            return;
        };
        let loaded = store
            .get_chat(id)
            .and_then(|chat| Ok((chat, store.messages(id)?)));
        match loaded {
            Ok((Some(chat), messages)) => {
                for message in messages {
                    let who = match message.kind {
                        MessageKind::User => "you",
                        MessageKind::Ai => "cluster",
                    };
                    println!("{}> {}\n", who, message.content);
                }
                log_history(Some(self.session.id()), &format!("loaded chat {}", chat.id));
                self.session.reset();
                self.chat = Some(chat);
            }
            Ok((None, _)) => println!("No chat with id {}.", id),
            Err(e) => eprintln!("Could not load chat: {}", e),
        }
    }

    fn delete_chat(&mut self, id: &str) {
        let Some(store) = &self.history else {
            println!("History is disabled.");
            return;
        };
        match store.delete_chat(id) {
            Ok(true) => {
                log_history(Some(self.session.id()), &format!("deleted chat {}", id));
                if self.chat.as_ref().map(|c| c.id.as_str()) == Some(id) {
                    self.new_chat();
                }
                println!("Deleted.");
            }
            Ok(false) => println!("No chat with id {}.", id),
            Err(e) => eprintln!("Could not delete chat: {}", e),
        }
    }

    /// Runs one turn, cancelling it on Ctrl-C. Aborted turns print nothing.
    async fn turn(&mut self, input: &str) {
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let result = self.session.respond(input, &cancel).await;
        watcher.abort();

        if let Ok(reply) = result {
            println!("{}\n", reply);
            self.record(input, &reply);
        }
    }

    /// Reply for an attachment that cannot be turned into text, or the
    /// combined input to answer.
    fn attachment_input(&self, path: &Path, message: &str) -> Result<String, String> {
        let phrases = self.session.orchestrator().phrases();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        match classify_attachment(&name) {
            AttachmentKind::Image | AttachmentKind::Pdf => {
                Err(phrases.pick(Bank::ImageRecognitionError).to_string())
            }
            AttachmentKind::Unsupported(ext) => {
                Err(fill(phrases.pick(Bank::FileTypeUnsupported), "fileType", &ext))
            }
            AttachmentKind::Text => match std::fs::read_to_string(path) {
                Ok(text) if text.trim().is_empty() => Err(EMPTY_FILE_REPLY.to_string()),
                Ok(text) => Ok(attach_file_text(message, &name, &text)),
                Err(e) => {
                    log_error(Some(self.session.id()), &format!("failed to read {}: {}", path.display(), e));
                    Err(phrases.pick(Bank::OcrError).to_string())
                }
            },
        }
    }
}

fn print_help() {
    println!("Commands: /new, /history, /load <id>, /delete <id>, /file <path> [message], /quit");
    println!("Quote paths that contain spaces: /file \"my notes.txt\" summarize this");
}

/// Splits `/file` arguments into the path and the message. A path wrapped in
/// double quotes may contain spaces.
fn split_file_args(rest: &str) -> (&str, &str) {
    if let Some(quoted) = rest.strip_prefix('"') {
        if let Some((path, message)) = quoted.split_once('"') {
            return (path, message.trim());
        }
    }
    let (path, message) = rest.split_once(' ').unwrap_or((rest, ""));
    (path, message.trim())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }

    if let Some(dir) = config.log_dir() {
        if let Err(e) = logging::init_logging(&dir) {
            eprintln!("Failed to initialize file logging: {}", e);
        } else if let Ok(deleted) = logging::cleanup_old_logs(&dir, LOG_RETENTION_DAYS) {
            if deleted > 0 {
                log::info!("removed {} old log files", deleted);
            }
        }
    }

    let history = if cli.no_history {
        None
    } else {
        match config.history_path() {
            Some(path) => match HistoryStore::open(&path) {
                Ok(store) => Some(store),
                Err(e) => {
                    eprintln!("History disabled: {}", e);
                    None
                }
            },
            None => None,
        }
    };

    let orchestrator = Arc::new(build_orchestrator(&config)?);
    let mut repl = Repl {
        session: Session::new(orchestrator),
        history,
        chat: None,
    };

    println!("Cluster-AI ready. Type /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();
        match command {
            "/quit" | "/exit" => break,
            "/help" => print_help(),
            "/new" => {
                repl.new_chat();
                println!("Started a new chat.");
            }
            "/history" => repl.list_chats(),
            "/load" if !rest.is_empty() => repl.load_chat(rest),
            "/delete" if !rest.is_empty() => repl.delete_chat(rest),
            "/file" if !rest.is_empty() => {
                let (path, message) = split_file_args(rest);
                match repl.attachment_input(Path::new(path), message) {
                    Ok(combined) => repl.turn(&combined).await,
                    Err(reply) => println!("{}\n", reply),
                }
            }
            _ if command.starts_with('/') => print_help(),
            _ => repl.turn(input).await,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_args_plain_path() {
        assert_eq!(split_file_args("notes.txt summarize this"), ("notes.txt", "summarize this"));
        assert_eq!(split_file_args("notes.txt"), ("notes.txt", ""));
    }

    #[test]
    fn test_split_file_args_quoted_path_with_spaces() {
        assert_eq!(
            split_file_args("\"my notes.txt\"  summarize this"),
            ("my notes.txt", "summarize this")
        );
        assert_eq!(split_file_args("\"my notes.txt\""), ("my notes.txt", ""));
    }

    #[test]
    fn test_split_file_args_unclosed_quote_falls_back() {
        assert_eq!(split_file_args("\"my notes.txt"), ("\"my", "notes.txt"));
    }
}
