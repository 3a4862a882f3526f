// Multi-question lookup pipeline over a KnowledgeSource.
// Each sub-question tries the primary source, falls back to the secondary
// source keyed by the cleaned topic, and enriches a primary hit with the
// tertiary abstract.

use crate::error::{Aborted, LookupError};
use crate::logging::{log_error, log_lookup};
use crate::query::{extract_topic, split_questions};
use crate::sources::{KnowledgeSource, SummaryRecord};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

/// Converts a lookup outcome into "found / not found", keeping only
/// cancellation as an error.
fn recover<T>(result: Result<Option<T>, LookupError>, what: &str) -> Result<Option<T>, Aborted> {
    match result {
        Ok(value) => Ok(value),
        Err(LookupError::Aborted) => {
            log_lookup(None, &format!("{} aborted", what));
            Err(Aborted)
        }
        Err(e) => {
            log_error(None, &format!("{} failed: {}", what, e));
            Ok(None)
        }
    }
}

pub async fn resolve_question<S: AsRef<str>>(
    source: &dyn KnowledgeSource,
    question: &str,
    fillers: &[S],
    cancel: &CancellationToken,
) -> Result<Option<SummaryRecord>, Aborted> {
    let primary = recover(
        source.primary_summary(question, cancel).await,
        "primary summary",
    )?;

    if let Some(summary) = primary {
        log_lookup(None, &format!("primary hit for {:?}: {}", question, summary.title));
        let secondary_extract = recover(
            source.tertiary_abstract(&summary.title, cancel).await,
            "tertiary abstract",
        )?;
        return Ok(Some(SummaryRecord {
            title: summary.title,
            extract: summary.extract,
            secondary_extract,
        }));
    }

    let topic = extract_topic(question, fillers);
    let secondary = recover(
        source.secondary_summary(&topic, cancel).await,
        "secondary summary",
    )?;

    match secondary {
        Some(summary) => {
            log_lookup(None, &format!("secondary hit for {:?}: {}", topic, summary.title));
            Ok(Some(SummaryRecord {
                title: summary.title,
                extract: summary.extract,
                secondary_extract: None,
            }))
        }
        None => {
            log_lookup(None, &format!("no result for {:?}", question));
            Ok(None)
        }
    }
}

/// Resolves every sub-question of the input concurrently. Results keep input
/// order; unresolved sub-questions are dropped.
pub async fn lookup_questions<S: AsRef<str>>(
    source: &dyn KnowledgeSource,
    input: &str,
    fillers: &[S],
    cancel: &CancellationToken,
) -> Result<Vec<SummaryRecord>, Aborted> {
    let questions = split_questions(input);

    let outcomes = if questions.len() == 1 {
        vec![resolve_question(source, &questions[0], fillers, cancel).await]
    } else {
        join_all(
            questions
                .iter()
                .map(|q| resolve_question(source, q, fillers, cancel)),
        )
        .await
    };

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if let Some(record) = outcome? {
            records.push(record);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{Quote, Summary};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Scripted {
        calls: Mutex<Vec<String>>,
        fail_primary: bool,
        abort: bool,
    }

    impl Scripted {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KnowledgeSource for Scripted {
        async fn primary_summary(
            &self,
            query: &str,
            _cancel: &CancellationToken,
        ) -> Result<Option<Summary>, LookupError> {
            self.record(format!("primary:{}", query));
            if self.abort {
                return Err(LookupError::Aborted);
            }
            if self.fail_primary {
                return Err(LookupError::Malformed("test"));
            }
            if query.contains("newton") {
                Ok(Some(Summary {
                    title: "Isaac Newton".to_string(),
                    extract: "Isaac Newton was a physicist.".to_string(),
                }))
            } else {
                Ok(None)
            }
        }

        async fn secondary_summary(
            &self,
            topic: &str,
            _cancel: &CancellationToken,
        ) -> Result<Option<Summary>, LookupError> {
            self.record(format!("secondary:{}", topic));
            if topic == "cat" {
                Ok(Some(Summary {
                    title: "cat".to_string(),
                    extract: "small domesticated carnivore (Source: Wikidata)".to_string(),
                }))
            } else {
                Ok(None)
            }
        }

        async fn tertiary_abstract(
            &self,
            title: &str,
            _cancel: &CancellationToken,
        ) -> Result<Option<String>, LookupError> {
            self.record(format!("tertiary:{}", title));
            Ok(Some(format!("{} abstract.", title)))
        }

        async fn quote(&self, _cancel: &CancellationToken) -> Result<Option<Quote>, LookupError> {
            Ok(None)
        }
    }

    const FILLERS: [&str; 1] = ["ok"];

    #[tokio::test]
    async fn test_results_keep_question_order() {
        let source = Scripted::default();
        let records = lookup_questions(
            &source,
            "what is a cat and who is newton?",
            &FILLERS,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["cat", "Isaac Newton"]);
        assert_eq!(records[0].secondary_extract, None);
        assert_eq!(records[1].secondary_extract.as_deref(), Some("Isaac Newton abstract."));
    }

    #[tokio::test]
    async fn test_tertiary_only_after_primary_hit() {
        let source = Scripted::default();
        resolve_question(&source, "what is a cat", &FILLERS, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(source.calls(), vec!["primary:what is a cat", "secondary:cat"]);
    }

    #[tokio::test]
    async fn test_unresolved_questions_are_dropped() {
        let source = Scripted::default();
        let records = lookup_questions(&source, "what is zzzz", &FILLERS, &CancellationToken::new())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let source = Scripted { fail_primary: true, ..Default::default() };
        let record = resolve_question(&source, "what is a cat", &FILLERS, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(record.map(|r| r.title), Some("cat".to_string()));
    }

    #[tokio::test]
    async fn test_abort_propagates() {
        let source = Scripted { abort: true, ..Default::default() };
        let result = lookup_questions(&source, "what is a cat", &FILLERS, &CancellationToken::new()).await;
        assert_eq!(result, Err(Aborted));
        assert_eq!(source.calls(), vec!["primary:what is a cat"]);
    }
}
