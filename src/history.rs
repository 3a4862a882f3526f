use crate::error::HistoryError;
use crate::lexicon::{Group, Lexicon};
use crate::matcher::fuzzy_contains_any;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

pub const INAPPROPRIATE_TITLE: &str = "Inappropriate Language";
pub const FRUSTRATION_TITLE: &str = "User Frustration Request";
const TITLE_PREVIEW_CHARS: usize = 28;

// ============ Records ============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub is_placeholder: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Chat {
    /// Title shortened for listings.
    pub fn short_title(&self) -> String {
        if self.title.chars().count() > TITLE_PREVIEW_CHARS {
            let head: String = self.title.chars().take(TITLE_PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.title.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    User,
    Ai,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Ai => "ai",
        }
    }

    pub fn from_str(s: &str) -> Option<MessageKind> {
        match s {
            "user" => Some(MessageKind::User),
            "ai" => Some(MessageKind::Ai),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredMessage {
    pub id: String,
    pub chat_id: String,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: String,
}

/// Title derived from a chat's opening message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTitle {
    pub text: String,
    pub placeholder: bool,
}

/// Moderated or frustrated openers get a placeholder title that the next
/// ordinary message replaces.
pub fn title_for(lexicon: &Lexicon, message: &str) -> ChatTitle {
    let placeholder = if fuzzy_contains_any(message, lexicon.phrases(Group::Explicit)) {
        Some(INAPPROPRIATE_TITLE)
    } else if fuzzy_contains_any(message, lexicon.phrases(Group::Frustration)) {
        Some(FRUSTRATION_TITLE)
    } else {
        None
    };

    match placeholder {
        Some(text) => ChatTitle { text: text.to_string(), placeholder: true },
        None => {
            let text = message.trim();
            ChatTitle {
                text: if text.is_empty() { "New Chat".to_string() } else { text.to_string() },
                placeholder: false,
            }
        }
    }
}

// ============ Store ============

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS chats (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        is_placeholder INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        chat_id TEXT NOT NULL REFERENCES chats(id),
        kind TEXT NOT NULL,
        content TEXT NOT NULL,
        timestamp TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_messages_chat ON messages(chat_id);
";

/// SQLite-backed chat history.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

impl HistoryStore {
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn with_connection<F, T>(&self, f: F) -> Result<T, HistoryError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        Ok(f(&conn)?)
    }

    pub fn create_chat(&self, title: &ChatTitle) -> Result<Chat, HistoryError> {
        let now = Utc::now().to_rfc3339();
        let chat = Chat {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.text.clone(),
            is_placeholder: title.placeholder,
            created_at: now.clone(),
            updated_at: now,
        };
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO chats (id, title, is_placeholder, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![chat.id, chat.title, chat.is_placeholder as i64, chat.created_at, chat.updated_at],
            )?;
            Ok(())
        })?;
        Ok(chat)
    }

    pub fn get_chat(&self, id: &str) -> Result<Option<Chat>, HistoryError> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, title, is_placeholder, created_at, updated_at FROM chats WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Chat {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        is_placeholder: row.get::<_, i64>(2)? != 0,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn append_message(
        &self,
        chat_id: &str,
        kind: MessageKind,
        content: &str,
    ) -> Result<StoredMessage, HistoryError> {
        if self.get_chat(chat_id)?.is_none() {
            return Err(HistoryError::ChatNotFound(chat_id.to_string()));
        }

        let message = StoredMessage {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            kind,
            content: content.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO messages (id, chat_id, kind, content, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![message.id, message.chat_id, message.kind.as_str(), message.content, message.timestamp],
            )?;
            conn.execute(
                "UPDATE chats SET updated_at = ?1 WHERE id = ?2",
                params![message.timestamp, chat_id],
            )?;
            Ok(())
        })?;
        Ok(message)
    }

    pub fn messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>, HistoryError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, kind, content, timestamp
                 FROM messages
                 WHERE chat_id = ?1
                 ORDER BY timestamp ASC, rowid ASC",
            )?;
            let rows = stmt.query_map([chat_id], |row| {
                let kind: String = row.get(2)?;
                Ok(StoredMessage {
                    id: row.get(0)?,
                    chat_id: row.get(1)?,
                    kind: MessageKind::from_str(&kind).unwrap_or(MessageKind::Ai),
                    content: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })?;
            rows.collect()
        })
    }

    /// Most recently active chats first.
    pub fn recent_chats(&self, limit: usize) -> Result<Vec<Chat>, HistoryError> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, is_placeholder, created_at, updated_at
                 FROM chats
                 ORDER BY updated_at DESC, rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map([limit as i64], |row| {
                Ok(Chat {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    is_placeholder: row.get::<_, i64>(2)? != 0,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?;
            rows.collect()
        })
    }

    /// Returns whether a chat was removed.
    pub fn delete_chat(&self, chat_id: &str) -> Result<bool, HistoryError> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM messages WHERE chat_id = ?1", params![chat_id])?;
            let removed = conn.execute("DELETE FROM chats WHERE id = ?1", params![chat_id])?;
            Ok(removed > 0)
        })
    }

    /// Replaces a placeholder title with an ordinary one. Returns whether the
    /// title changed.
    pub fn retitle_if_placeholder(&self, chat_id: &str, title: &ChatTitle) -> Result<bool, HistoryError> {
        if title.placeholder {
            return Ok(false);
        }
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE chats SET title = ?1, is_placeholder = 0 WHERE id = ?2 AND is_placeholder = 1",
                params![title.text, chat_id],
            )?;
            Ok(changed > 0)
        })
    }
}
