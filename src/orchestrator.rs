use crate::attachments::{has_file_marker, marker_file_name};
use crate::composer::compose_structured;
use crate::detectors::{format_value, identify_code_snippet, solve_math, MathResult};
use crate::error::{Aborted, LookupError};
use crate::knowledge::{self, KnowledgeBase};
use crate::lexicon::{Group, GroupKind, Lexicon};
use crate::logging::{log_error, log_lookup};
use crate::lookup::lookup_questions;
use crate::matcher::fuzzy_contains_any;
use crate::query::{is_fact_question, is_only_fillers};
use crate::responses::{fill, Bank, Phrases};
use crate::snippets::{self, find_snippet, Snippet};
use crate::sources::{KnowledgeSource, SummaryRecord};
use crate::state::ConversationState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// ============ Intents ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    FileAnalysis,
    FollowUp,
    PositiveFeedback,
    Filler,
    Explicit,
    Frustration,
    Identity,
    Opinion,
    Planning,
    Math,
    CodeIdentification,
    LocalKnowledge,
    Greeting,
    CodeRequest,
    Quote,
    Farewell,
    Help,
    Sad,
    Happy,
    Angry,
    FactQuestion,
    Default,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::FileAnalysis => "file_analysis",
            Intent::FollowUp => "follow_up",
            Intent::PositiveFeedback => "positive_feedback",
            Intent::Filler => "filler",
            Intent::Explicit => "explicit",
            Intent::Frustration => "frustration",
            Intent::Identity => "identity",
            Intent::Opinion => "opinion",
            Intent::Planning => "planning",
            Intent::Math => "math",
            Intent::CodeIdentification => "code_identification",
            Intent::LocalKnowledge => "local_knowledge",
            Intent::Greeting => "greeting",
            Intent::CodeRequest => "code_request",
            Intent::Quote => "quote",
            Intent::Farewell => "farewell",
            Intent::Help => "help",
            Intent::Sad => "sad",
            Intent::Happy => "happy",
            Intent::Angry => "angry",
            Intent::FactQuestion => "fact_question",
            Intent::Default => "default",
        }
    }
}

/// Evaluation order of the intent checks. The first check that produces a
/// reply wins; `Intent::Default` answers when none does. Moderation comes
/// before frustration, frustration before identity, and the word-group scan
/// (greeting through angry) follows lexicon catalogue order.
pub const INTENT_PRIORITY: [Intent; 21] = [
    Intent::FileAnalysis,
    Intent::FollowUp,
    Intent::PositiveFeedback,
    Intent::Filler,
    Intent::Explicit,
    Intent::Frustration,
    Intent::Identity,
    Intent::Opinion,
    Intent::Planning,
    Intent::Math,
    Intent::CodeIdentification,
    Intent::LocalKnowledge,
    Intent::Greeting,
    Intent::CodeRequest,
    Intent::Quote,
    Intent::Farewell,
    Intent::Help,
    Intent::Sad,
    Intent::Happy,
    Intent::Angry,
    Intent::FactQuestion,
];

const FRUSTRATION_BREAK_AT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub intent: Intent,
    pub text: String,
}

/// Per-turn view of the input, computed once.
struct Utterance<'a> {
    raw: &'a str,
    fact_question: bool,
}

// ============ Orchestrator ============

/// Resolves one user turn into a reply. Holds only read-only tables and the
/// knowledge source; conversation state is passed in by the caller.
pub struct Orchestrator {
    lexicon: Lexicon,
    knowledge: KnowledgeBase,
    snippets: Vec<Snippet>,
    phrases: Phrases,
    source: Arc<dyn KnowledgeSource>,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            lexicon: Lexicon::default(),
            knowledge: knowledge::builtin(),
            snippets: snippets::builtin().to_vec(),
            phrases: Phrases::new(),
            source,
        }
    }

    pub fn with_phrases(mut self, phrases: Phrases) -> Self {
        self.phrases = phrases;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = snippets;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn phrases(&self) -> &Phrases {
        &self.phrases
    }

    fn matches(&self, group: Group, input: &str) -> bool {
        match group.kind() {
            GroupKind::Emoji => self.lexicon.contains_glyph(group, input),
            GroupKind::Word => {
                fuzzy_contains_any(input, self.lexicon.phrases(group))
            }
        }
    }

    /// Runs one turn. State is updated only when a reply is produced.
    pub async fn respond(
        &self,
        input: &str,
        state: &mut ConversationState,
        cancel: &CancellationToken,
    ) -> Result<Turn, Aborted> {
        let utterance = Utterance {
            raw: input,
            fact_question: is_fact_question(input, self.lexicon.phrases(Group::Greetings)),
        };
        let frustrated = self.matches(Group::Frustration, input);

        let mut turn = None;
        for intent in INTENT_PRIORITY {
            if let Some(text) = self.try_intent(intent, &utterance, state, cancel).await? {
                turn = Some(Turn { intent, text });
                break;
            }
        }
        let turn = turn.unwrap_or_else(|| Turn {
            intent: Intent::Default,
            text: self.phrases.pick(Bank::Default).to_string(),
        });

        if !frustrated {
            state.clear_frustration();
        }

        let is_follow_up = self.matches(Group::FollowUpQuery, input);
        let is_feedback = self.matches(Group::PositiveFeedback, input);
        if !is_follow_up && !is_feedback {
            state.remember(input);
        }

        Ok(turn)
    }

    async fn try_intent(
        &self,
        intent: Intent,
        utterance: &Utterance<'_>,
        state: &mut ConversationState,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, Aborted> {
        let input = utterance.raw;
        let pick = |bank: Bank| Some(self.phrases.pick(bank).to_string());

        let reply = match intent {
            Intent::FileAnalysis => {
                if has_file_marker(input) && self.matches(Group::FileAnalysis, input) {
                    let template = self.phrases.pick(Bank::FileAnalysisNotPossible);
                    Some(fill(template, "fileName", &marker_file_name(input)))
                } else {
                    None
                }
            }
            Intent::FollowUp => {
                if self.matches(Group::FollowUpQuery, input) {
                    Some(self.follow_up(state, cancel).await?)
                } else {
                    None
                }
            }
            Intent::PositiveFeedback if self.matches(Group::PositiveFeedback, input) => {
                pick(Bank::PositiveFeedback)
            }
            Intent::Filler if is_only_fillers(input, self.lexicon.phrases(Group::Fillers)) => {
                pick(Bank::FillerAcknowledgement)
            }
            Intent::Explicit if self.matches(Group::Explicit, input) => {
                state.clear_frustration();
                pick(Bank::Explicit)
            }
            Intent::Frustration => {
                if self.matches(Group::Frustration, input) {
                    let streak = state.bump_frustration();
                    let bank = if streak >= FRUSTRATION_BREAK_AT {
                        Bank::FrustrationBreak
                    } else if state.last_topic().is_some() {
                        Bank::FrustrationWithContext
                    } else {
                        Bank::FrustrationWithoutContext
                    };
                    pick(bank)
                } else {
                    None
                }
            }
            Intent::Identity if self.matches(Group::Identity, input) => pick(Bank::Identity),
            Intent::Opinion if self.matches(Group::Opinion, input) => pick(Bank::Opinion),
            Intent::Planning if self.matches(Group::Planning, input) => pick(Bank::Planning),
            Intent::Math => solve_math(input).map(|result| match result {
                MathResult::Arithmetic { value } => {
                    fill(self.phrases.pick(Bank::MathResult), "result", &format_value(value))
                }
                MathResult::Calculus => self.phrases.pick(Bank::Calculus).to_string(),
                MathResult::Error { message } => {
                    fill(self.phrases.pick(Bank::MathError), "error", &message)
                }
            }),
            Intent::CodeIdentification => identify_code_snippet(input).map(|language| {
                fill(self.phrases.pick(Bank::CodeIdentification), "language", language.as_str())
            }),
            Intent::LocalKnowledge => self
                .knowledge
                .find(input)
                .and_then(|entry| self.phrases.choose(&entry.answers))
                .cloned(),
            Intent::Greeting if self.matches(Group::Greetings, input) => {
                Some(self.greet(utterance, cancel).await?)
            }
            Intent::CodeRequest if self.matches(Group::CodeRequest, input) => {
                match find_snippet(&self.snippets, input) {
                    Some(snippet) => Some(snippet.to_markdown()),
                    None => pick(Bank::CodeHelp),
                }
            }
            Intent::Quote if self.matches(Group::QuoteRequest, input) => {
                Some(self.quote(cancel).await?)
            }
            Intent::Farewell if self.matches(Group::Farewells, input) => pick(Bank::Farewell),
            Intent::Help if self.matches(Group::HelpRequest, input) => pick(Bank::Help),
            Intent::Sad if !utterance.fact_question && self.matches(Group::SadEmoji, input) => {
                pick(Bank::Sad)
            }
            Intent::Happy
                if !utterance.fact_question
                    && self.matches(Group::HappyEmoji, input)
                    && !self.matches(Group::Greetings, input)
                    && !self.matches(Group::PositiveFeedback, input) =>
            {
                pick(Bank::Happy)
            }
            Intent::Angry if !utterance.fact_question && self.matches(Group::AngryEmoji, input) => {
                pick(Bank::Angry)
            }
            Intent::FactQuestion if utterance.fact_question => {
                self.answer_question(input, cancel).await?
            }
            _ => None,
        };

        Ok(reply)
    }

    async fn lookup(&self, input: &str, cancel: &CancellationToken) -> Result<Vec<SummaryRecord>, Aborted> {
        lookup_questions(
            self.source.as_ref(),
            input,
            self.lexicon.phrases(Group::Fillers),
            cancel,
        )
        .await
    }

    async fn follow_up(
        &self,
        state: &ConversationState,
        cancel: &CancellationToken,
    ) -> Result<String, Aborted> {
        let Some(topic) = state.last_topic() else {
            return Ok("What topic would you like me to elaborate on?".to_string());
        };

        let records = self.lookup(topic, cancel).await?;
        let intro = format!("Of course! To elaborate on \"{}\":", topic);
        let answer = compose_structured(&records, Some(&intro), &self.phrases);
        if answer.is_empty() {
            Ok(format!("I'm sorry, I couldn't find more details about \"{}\".", topic))
        } else {
            Ok(answer)
        }
    }

    async fn greet(&self, utterance: &Utterance<'_>, cancel: &CancellationToken) -> Result<String, Aborted> {
        let greeting = self.phrases.pick(Bank::Greeting);
        if !utterance.fact_question {
            return Ok(greeting.to_string());
        }

        let records = self.lookup(utterance.raw, cancel).await?;
        let intro = format!("{} Regarding your question,", greeting);
        let answer = compose_structured(&records, Some(&intro), &self.phrases);
        if answer.is_empty() {
            Ok(greeting.to_string())
        } else {
            Ok(answer)
        }
    }

    async fn quote(&self, cancel: &CancellationToken) -> Result<String, Aborted> {
        let quote = match self.source.quote(cancel).await {
            Ok(quote) => quote,
            Err(LookupError::Aborted) => return Err(Aborted),
            Err(e) => {
                log_error(None, &format!("quote failed: {}", e));
                None
            }
        };

        Ok(match quote {
            Some(quote) => {
                log_lookup(None, &format!("quote by {}", quote.author));
                let text = fill(self.phrases.pick(Bank::ApiQuote), "quote", &quote.content);
                fill(&text, "author", &quote.author)
            }
            None => self.phrases.pick(Bank::ApiError).to_string(),
        })
    }

    async fn answer_question(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, Aborted> {
        let friendly = self.matches(Group::Fillers, input) || self.matches(Group::HappyEmoji, input);
        let records = self.lookup(input, cancel).await?;
        if records.is_empty() {
            return Ok(None);
        }

        let intro = friendly.then(|| self.phrases.pick(Bank::FriendlyQuestion));
        let answer = compose_structured(&records, intro, &self.phrases);
        Ok(Some(answer).filter(|a| !a.is_empty()))
    }
}
