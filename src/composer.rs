// Turns looked-up summaries into a structured, multi-part reply.

use crate::responses::{fill, Bank, Phrases};
use crate::sources::SummaryRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const EXPLANATION_SENTENCES: usize = 3;
const SECONDARY_SENTENCES: usize = 2;

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern"));

static REWORDINGS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)Wikipedia is a free encyclopedia", "Basically, Wikipedia tells us"),
        (r"(?i)\bit is\b", "It's"),
        (r"(?i)which means", "meaning"),
        (r"(?i), also known as", ", or simply"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("rewording pattern"), replacement))
    .collect()
});

static NAME_IS_A: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+ is an? ").expect("name pattern"));

/// Complete sentences of the text, or the whole text when it has no
/// terminal punctuation.
fn sentences(text: &str) -> Vec<&str> {
    let found: Vec<&str> = SENTENCE.find_iter(text).map(|m| m.as_str()).collect();
    if found.is_empty() {
        vec![text]
    } else {
        found
    }
}

fn reword(sentence: &str) -> String {
    let mut text = sentence.to_string();
    for (pattern, replacement) in REWORDINGS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    NAME_IS_A
        .replace_all(&text, |caps: &Captures| caps[0].to_lowercase())
        .trim()
        .to_string()
}

/// The first few sentences of an extract, lightly reworded.
pub fn rephrase(extract: &str) -> String {
    sentences(extract)
        .into_iter()
        .take(EXPLANATION_SENTENCES)
        .map(reword)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds intro, explanation, optional secondary excerpt and conclusion
/// from the first record. Empty when there is nothing to say.
pub fn compose_structured(
    records: &[SummaryRecord],
    custom_intro: Option<&str>,
    phrases: &Phrases,
) -> String {
    let Some(record) = records.first() else {
        return String::new();
    };
    if record.extract.is_empty() {
        return String::new();
    }

    let intro = match custom_intro.filter(|i| !i.is_empty()) {
        Some(intro) => intro.to_string(),
        None => fill(phrases.pick(Bank::StructuredIntro), "title", &record.title),
    };

    let explanation = rephrase(&record.extract);

    let secondary = match &record.secondary_extract {
        Some(text) if !text.is_empty() => {
            let excerpt = sentences(text)
                .into_iter()
                .take(SECONDARY_SENTENCES)
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" ");
            format!("\n\n{}\n\n*{}*", phrases.pick(Bank::SecondarySourceIntro), excerpt)
        }
        _ => String::new(),
    };

    let conclusion = phrases.pick(Bank::StructuredConclusion);

    format!("{}\n\n{}{}\n\n{}", intro, explanation, secondary, conclusion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::phrases;

    fn record(extract: &str, secondary: Option<&str>) -> SummaryRecord {
        SummaryRecord {
            title: "Car".to_string(),
            extract: extract.to_string(),
            secondary_extract: secondary.map(str::to_string),
        }
    }

    #[test]
    fn test_rephrase_keeps_three_sentences() {
        let text = "One. Two! Three? Four.";
        assert_eq!(rephrase(text), "One. Two! Three?");
    }

    #[test]
    fn test_rephrase_substitutions() {
        assert_eq!(
            rephrase("It is fast, which means quick. Octane, also known as fuel, burns."),
            "It's fast, meaning quick. Octane, or simply fuel, burns."
        );
        assert_eq!(rephrase("Python is a language."), "python is a language.");
        assert_eq!(rephrase("no terminal punctuation"), "no terminal punctuation");
    }

    #[test]
    fn test_compose_with_custom_intro_and_secondary() {
        let picker = Phrases::with_seed(3);
        let text = compose_structured(
            &[record("A car is a vehicle.", Some("First. Second. Third."))],
            Some("Intro line"),
            &picker,
        );

        let parts: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "Intro line");
        assert_eq!(parts[1], "A car is a vehicle.");
        assert!(phrases(Bank::SecondarySourceIntro).contains(&parts[2]));
        assert_eq!(parts[3], "*First. Second.*");
        assert!(phrases(Bank::StructuredConclusion).contains(&parts[4]));
    }

    #[test]
    fn test_compose_default_intro_names_title() {
        let picker = Phrases::with_seed(9);
        let text = compose_structured(&[record("Wheels.", None)], None, &picker);
        assert!(text.contains("**Car**"));
        assert_eq!(text.split("\n\n").count(), 3);
    }

    #[test]
    fn test_compose_empty_cases() {
        let picker = Phrases::with_seed(1);
        assert_eq!(compose_structured(&[], None, &picker), "");
        assert_eq!(compose_structured(&[record("", None)], None, &picker), "");
    }
}
