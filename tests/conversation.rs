use async_trait::async_trait;
use cluster_lib::knowledge::KnowledgeBase;
use cluster_lib::responses::{phrases, Bank, Phrases};
use cluster_lib::sources::{Quote, Summary};
use cluster_lib::{Aborted, Intent, KnowledgeSource, LookupError, Orchestrator, Session};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// In-memory source that knows about cars and octopuses and records every
/// query it receives.
#[derive(Default)]
struct FakeSource {
    queries: Mutex<Vec<String>>,
    abort: bool,
}

impl FakeSource {
    fn aborting() -> Self {
        Self { abort: true, ..Default::default() }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeSource for FakeSource {
    async fn primary_summary(
        &self,
        query: &str,
        _cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.abort {
            return Err(LookupError::Aborted);
        }
        let lower = query.to_lowercase();
        if lower.contains("car") {
            Ok(Some(Summary {
                title: "Car".to_string(),
                extract: "A car is a motor vehicle with wheels. It is used for transport.".to_string(),
            }))
        } else if lower.contains("octopus") {
            Ok(Some(Summary {
                title: "Octopus".to_string(),
                extract: "An octopus is a soft-bodied mollusc.".to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    async fn secondary_summary(
        &self,
        _topic: &str,
        _cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError> {
        Ok(None)
    }

    async fn tertiary_abstract(
        &self,
        _title: &str,
        _cancel: &CancellationToken,
    ) -> Result<Option<String>, LookupError> {
        Ok(None)
    }

    async fn quote(&self, _cancel: &CancellationToken) -> Result<Option<Quote>, LookupError> {
        Ok(Some(Quote {
            content: "Stay hungry.".to_string(),
            author: "Someone".to_string(),
        }))
    }
}

fn session_with(source: Arc<FakeSource>) -> Session {
    let orchestrator = Orchestrator::new(source)
        .with_knowledge(KnowledgeBase::empty())
        .with_phrases(Phrases::with_seed(5));
    Session::new(Arc::new(orchestrator))
}

async fn say(session: &mut Session, input: &str) -> String {
    session.respond(input, &CancellationToken::new()).await.unwrap()
}

#[tokio::test]
async fn test_greeting_with_question_answers_both() {
    let source = Arc::new(FakeSource::default());
    let mut session = session_with(source.clone());

    let reply = say(&mut session, "Hello, what is a car?").await;

    let greeting = phrases(Bank::Greeting)
        .iter()
        .find(|g| reply.starts_with(*g))
        .expect("reply opens with a greeting");
    assert!(reply.starts_with(&format!("{} Regarding your question,", greeting)));
    assert!(reply.contains("A car is a motor vehicle with wheels. It's used for transport."));
    assert_eq!(source.queries(), vec!["Hello, what is a car"]);
}

#[tokio::test]
async fn test_thanks_is_not_remembered() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    say(&mut session, "tell me about octopus").await;
    let reply = say(&mut session, "thanks!").await;

    assert!(phrases(Bank::PositiveFeedback).contains(&reply.as_str()));
    assert_eq!(session.state().last_input.as_deref(), Some("tell me about octopus"));
}

#[tokio::test]
async fn test_follow_up_without_topic() {
    let mut session = session_with(Arc::new(FakeSource::default()));
    let reply = say(&mut session, "elaborate").await;
    assert_eq!(reply, "What topic would you like me to elaborate on?");
}

#[tokio::test]
async fn test_follow_up_looks_up_stored_topic() {
    let source = Arc::new(FakeSource::default());
    let mut session = session_with(source.clone());

    session.respond_turn("octopus", &CancellationToken::new()).await.unwrap();
    let turn = session.respond_turn("tell me more", &CancellationToken::new()).await.unwrap();

    assert_eq!(turn.intent, Intent::FollowUp);
    assert!(turn.text.starts_with("Of course! To elaborate on \"octopus\":"));
    assert_eq!(source.queries().last().map(String::as_str), Some("octopus"));
    assert_eq!(session.state().last_input.as_deref(), Some("octopus"));
}

#[tokio::test]
async fn test_follow_up_miss_apologises() {
    let mut session = session_with(Arc::new(FakeSource::default()));
    say(&mut session, "zebra crossings").await;
    let reply = say(&mut session, "elaborate").await;
    assert_eq!(reply, "I'm sorry, I couldn't find more details about \"zebra crossings\".");
}

#[tokio::test]
async fn test_frustration_streak_suggests_break_on_third() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    let first = say(&mut session, "this is useless").await;
    assert!(phrases(Bank::FrustrationWithoutContext).contains(&first.as_str()));

    let second = say(&mut session, "so useless").await;
    assert!(phrases(Bank::FrustrationWithContext).contains(&second.as_str()));

    let third = say(&mut session, "still useless").await;
    assert!(phrases(Bank::FrustrationBreak).contains(&third.as_str()));
    assert_eq!(session.state().frustration_streak, 3);
}

#[tokio::test]
async fn test_feedback_turn_resets_frustration() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    say(&mut session, "this is useless").await;
    say(&mut session, "so useless").await;
    say(&mut session, "thanks!").await;
    assert_eq!(session.state().frustration_streak, 0);

    say(&mut session, "hmm").await;
    let reply = say(&mut session, "still useless").await;
    assert!(!phrases(Bank::FrustrationBreak).contains(&reply.as_str()));
    assert_eq!(session.state().frustration_streak, 1);
}

#[tokio::test]
async fn test_ordinary_turn_resets_frustration() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    say(&mut session, "this is useless").await;
    say(&mut session, "so useless").await;
    say(&mut session, "goodbye").await;
    assert_eq!(session.state().frustration_streak, 0);

    let reply = say(&mut session, "still useless").await;
    assert!(phrases(Bank::FrustrationWithContext).contains(&reply.as_str()));
}

#[tokio::test]
async fn test_quote_is_formatted() {
    let mut session = session_with(Arc::new(FakeSource::default()));
    let reply = say(&mut session, "give me a quote").await;
    assert!(reply.contains("\"Stay hungry.\""));
    assert!(reply.contains("Someone"));
}

#[tokio::test]
async fn test_abort_propagates_and_keeps_state() {
    let mut session = session_with(Arc::new(FakeSource::aborting()));
    say(&mut session, "goodbye").await;

    let result = session.respond("what is an octopus", &CancellationToken::new()).await;
    assert_eq!(result, Err(Aborted));
    assert_eq!(session.state().last_input.as_deref(), Some("goodbye"));
}

#[tokio::test]
async fn test_multi_question_uses_first_answer() {
    let source = Arc::new(FakeSource::default());
    let mut session = session_with(source.clone());

    let reply = say(&mut session, "what is an octopus and what is a car").await;

    assert!(reply.contains("soft-bodied mollusc"));
    assert!(!reply.contains("motor vehicle"));
    let mut queries = source.queries();
    queries.sort();
    assert_eq!(queries, vec!["what is a car", "what is an octopus"]);
}

#[tokio::test]
async fn test_reset_clears_state() {
    let mut session = session_with(Arc::new(FakeSource::default()));
    say(&mut session, "this is useless").await;
    session.reset();
    assert_eq!(session.state().last_input, None);
    assert_eq!(session.state().frustration_streak, 0);
}

#[tokio::test]
async fn test_sad_and_angry_emoji_do_not_hide_fact_questions() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    let sad = session
        .respond_turn("what is an octopus \u{1F622}", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(sad.intent, Intent::FactQuestion);
    assert!(sad.text.contains("soft-bodied mollusc"));
    assert!(!phrases(Bank::Sad).contains(&sad.text.as_str()));

    let angry = session
        .respond_turn("what is a car \u{1F621}", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(angry.intent, Intent::FactQuestion);
    assert!(angry.text.contains("motor vehicle"));
}

#[tokio::test]
async fn test_filler_in_question_gets_friendly_intro() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    let turn = session
        .respond_turn("what is an octopus hmm", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(turn.intent, Intent::FactQuestion);
    let intro = turn.text.split("\n\n").next().unwrap_or_default();
    assert!(phrases(Bank::FriendlyQuestion).contains(&intro));
    assert!(turn.text.contains("soft-bodied mollusc"));
}

#[tokio::test]
async fn test_plain_question_uses_structured_intro() {
    let mut session = session_with(Arc::new(FakeSource::default()));

    let turn = session
        .respond_turn("what is an octopus", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(turn.intent, Intent::FactQuestion);
    assert!(turn.text.contains("**Octopus**"));
}
