pub mod attachments;
pub mod composer;
pub mod config;
pub mod dbpedia;
pub mod detectors;
pub mod error;
pub mod history;
pub mod knowledge;
pub mod lexicon;
pub mod logging;
pub mod lookup;
pub mod matcher;
pub mod orchestrator;
pub mod query;
pub mod quotes;
pub mod responses;
pub mod snippets;
pub mod sources;
pub mod state;
pub mod wikidata;
pub mod wikipedia;

pub use config::Config;
pub use error::{Aborted, LookupError};
pub use orchestrator::{Intent, Orchestrator, Turn, INTENT_PRIORITY};
pub use sources::{KnowledgeSource, WebKnowledge};
pub use state::ConversationState;

use logging::{log_conversation, log_routing};
use responses::Phrases;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

// ============ App Initialization ============

/// Orchestrator wired to the public web services described by `config`.
pub fn build_orchestrator(config: &Config) -> Result<Orchestrator, LookupError> {
    let source = WebKnowledge::new(config)?;
    let phrases = match config.session.seed {
        Some(seed) => Phrases::with_seed(seed),
        None => Phrases::new(),
    };
    Ok(Orchestrator::new(Arc::new(source)).with_phrases(phrases))
}

// ============ Session ============

/// One conversation: an id, its state, and the orchestrator answering it.
pub struct Session {
    id: String,
    state: ConversationState,
    orchestrator: Arc<Orchestrator>,
}

impl Session {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let id = Uuid::new_v4().to_string();
        log_conversation(Some(&id), "session started");
        Self {
            id,
            state: ConversationState::new(),
            orchestrator,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Answers one turn. `Err(Aborted)` means the caller cancelled and
    /// nothing should be shown.
    pub async fn respond(&mut self, input: &str, cancel: &CancellationToken) -> Result<String, Aborted> {
        Ok(self.respond_turn(input, cancel).await?.text)
    }

    pub async fn respond_turn(&mut self, input: &str, cancel: &CancellationToken) -> Result<Turn, Aborted> {
        match self.orchestrator.respond(input, &mut self.state, cancel).await {
            Ok(turn) => {
                log_routing(
                    Some(&self.id),
                    &format!(
                        "intent={} frustration_streak={}",
                        turn.intent.as_str(),
                        self.state.frustration_streak
                    ),
                );
                Ok(turn)
            }
            Err(Aborted) => {
                log_conversation(Some(&self.id), "turn aborted");
                Err(Aborted)
            }
        }
    }

    /// Forgets the last topic and the frustration streak.
    pub fn reset(&mut self) {
        self.state.reset();
        log_conversation(Some(&self.id), "session reset");
    }
}
