// Query decomposition and topic extraction for knowledge lookups.

use once_cell::sync::Lazy;
use regex::Regex;

const QUESTION_STARTERS: [&str; 10] = [
    "what", "who", "where", "when", "why", "which", "is", "can", "will", "there",
];

const QUESTION_PHRASES: [&str; 29] = [
    "can you tell me about", "can you tell me what is", "can you tell me who is",
    "what do you know about", "what is the meaning of",
    "what is a", "what is an", "what is the", "what is",
    "what's a", "what's an", "what's the", "what's",
    "who is a", "who is an", "who is the", "who is",
    "who's a", "who's an", "who's the", "who's",
    "who was", "where is", "what are", "what were",
    "what the", "define", "tell me about", "tell me",
];

const TRAILING_NOISE: [&str; 6] = ["saying", "mean", "is", "are", "was", "were"];

static QUESTION_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\sand\s|\?").expect("question split pattern"));

// Longest phrase first so "what is the meaning of" wins over "what is".
static SORTED_PHRASES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut phrases = QUESTION_PHRASES.to_vec();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));
    phrases
});

/// Splits on the word "and" or on "?", dropping empty pieces.
pub fn split_questions(input: &str) -> Vec<String> {
    QUESTION_SPLIT
        .split(input)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduces a question to the search term it is about.
pub fn extract_topic<S: AsRef<str>>(query: &str, fillers: &[S]) -> String {
    let mut topic = query.to_lowercase().trim().to_string();

    for phrase in SORTED_PHRASES.iter() {
        if topic.starts_with(&format!("{} ", phrase)) {
            topic = topic[phrase.len()..].trim().to_string();
            break;
        }
    }

    let topic = topic
        .strip_suffix(|c: char| c == '?' || c == '.')
        .unwrap_or(&topic)
        .trim()
        .to_string();

    let mut words: Vec<&str> = topic.split_whitespace().collect();
    while words.len() > 1 {
        let last = words[words.len() - 1];
        let is_noise = TRAILING_NOISE.contains(&last) || fillers.iter().any(|f| f.as_ref() == last);
        if !is_noise {
            break;
        }
        words.pop();
    }
    words.join(" ")
}

/// Whether the input, minus a leading greeting, opens with a question word.
pub fn is_fact_question<S: AsRef<str>>(input: &str, greetings: &[S]) -> bool {
    let lower = input.to_lowercase();
    let lower = lower.trim();

    let alternation = greetings
        .iter()
        .map(|g| regex::escape(g.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    let remainder = if alternation.is_empty() {
        lower.to_string()
    } else {
        match Regex::new(&format!(r"(?i)^({})[\s,!?]*", alternation)) {
            Ok(greeting) => greeting.replace(lower, "").trim().to_string(),
            Err(_) => lower.to_string(),
        }
    };

    QUESTION_STARTERS.iter().any(|word| {
        remainder.starts_with(&format!("{} ", word)) || remainder.starts_with(&format!("{}?", word))
    })
}

/// True for one to three tokens that are all filler words once punctuation
/// is stripped.
pub fn is_only_fillers<S: AsRef<str>>(input: &str, fillers: &[S]) -> bool {
    let lower = input.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if words.is_empty() || words.len() > 3 {
        return false;
    }
    words.iter().all(|word| {
        let bare: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        fillers.iter().any(|f| f.as_ref() == bare)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILLERS: [&str; 4] = ["ok", "okay", "hmm", "yeah"];
    const GREETINGS: [&str; 5] = ["hello", "hi", "hey", "greetings", "yo"];

    #[test]
    fn test_split_on_and_and_question_marks() {
        assert_eq!(
            split_questions("What is a cat AND who is Newton? where is Paris"),
            vec!["What is a cat", "who is Newton", "where is Paris"]
        );
        assert_eq!(split_questions("??"), Vec::<String>::new());
    }

    #[test]
    fn test_split_single_question_is_trimmed_input() {
        assert_eq!(split_questions("  octopus facts  "), vec!["octopus facts"]);
        // "and" inside a word is not a separator
        assert_eq!(split_questions("candy brands"), vec!["candy brands"]);
    }

    #[test]
    fn test_extract_topic_strips_longest_phrase() {
        assert_eq!(extract_topic("What is the meaning of life?", &FILLERS), "life");
        assert_eq!(extract_topic("what is a car", &FILLERS), "car");
        assert_eq!(extract_topic("Define photosynthesis.", &FILLERS), "photosynthesis");
    }

    #[test]
    fn test_extract_topic_drops_trailing_noise() {
        assert_eq!(extract_topic("who is alan turing ok", &FILLERS), "alan turing");
        assert_eq!(extract_topic("what does carpe diem mean", &FILLERS), "what does carpe diem");
        assert_eq!(extract_topic("tell me is", &FILLERS), "is");
    }

    #[test]
    fn test_fact_question_after_greeting() {
        assert!(is_fact_question("Hello, what is a car?", &GREETINGS));
        assert!(is_fact_question("hey!! who?", &GREETINGS));
        assert!(is_fact_question("Where is Rome", &GREETINGS));
        assert!(!is_fact_question("hello there", &GREETINGS));
        assert!(!is_fact_question("whatever", &GREETINGS));
    }

    #[test]
    fn test_only_fillers() {
        assert!(is_only_fillers("ok", &FILLERS));
        assert!(is_only_fillers("Hmm, okay...", &FILLERS));
        assert!(!is_only_fillers("ok ok ok ok", &FILLERS));
        assert!(!is_only_fillers("ok cool", &FILLERS));
        assert!(!is_only_fillers("   ", &FILLERS));
    }
}
