// Local knowledge base for common questions answered without any lookup.
// Consulted before the external sources; keywords are fuzzy matched.

use crate::matcher::fuzzy_contains_any;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub keywords: Vec<String>,
    pub answers: Vec<String>,
}

impl KnowledgeEntry {
    pub fn new(id: &str, keywords: &[&str], answers: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// First entry, in catalogue order, whose keywords match the input.
    pub fn find(&self, input: &str) -> Option<&KnowledgeEntry> {
        self.entries
            .iter()
            .find(|entry| fuzzy_contains_any(input, &entry.keywords))
    }
}

/// The built-in answers shipped with the binary.
pub fn builtin() -> KnowledgeBase {
    KnowledgeBase::new(vec![
        KnowledgeEntry::new(
            "purpose",
            &["your purpose", "what do you do", "what are you for"],
            &["My primary purpose is to be a helpful assistant. I can answer questions, provide information from various sources, and even help with tasks like math or coding."],
        ),
        KnowledgeEntry::new(
            "how_are_you",
            &["how are you", "how are you doing", "hows it going"],
            &[
                "As an AI, I don't have feelings, but I'm operating at full capacity and ready to help! How can I assist you today?",
                "I'm functioning perfectly, thank you for asking! What can I do for you?",
            ],
        ),
        KnowledgeEntry::new(
            "capabilities",
            &["what can you do", "your capabilities", "what are your features", "what are your skills"],
            &[
                "I can answer general knowledge questions, solve math problems, find inspirational quotes, read text files, and even help with some coding. What would you like to try?",
                "My skills include fetching data from Wikipedia and DBpedia, performing calculations, understanding user sentiment, and processing text from files. Feel free to test my capabilities!",
            ],
        ),
        KnowledgeEntry::new(
            "car_info",
            &["what is a car", "what is car", "explain car", "define car", "about cars", "tell me about cars"],
            &[
                "A car, or automobile, is a wheeled motor vehicle used for transportation. Most definitions of cars say that they run primarily on roads, seat one to eight people, have four wheels, and mainly transport people rather than goods.",
                "Simply put, a car is a private vehicle with four wheels and an engine, designed to carry a small number of people from one place to another.",
            ],
        ),
        KnowledgeEntry::new(
            "programming_info",
            &["what is programming", "explain programming", "define programming", "about programming", "what is coding"],
            &[
                "Programming is the process of creating a set of instructions that tell a computer how to perform a task. These instructions are written in a specific language, like Python, JavaScript, or C++, that the computer can understand.",
                "In simple terms, programming (or coding) is like writing a recipe for a computer to follow. You provide step-by-step commands, and the computer executes them to achieve a specific outcome, like running an application or a website.",
            ],
        ),
        KnowledgeEntry::new(
            "version",
            &["can you say about your version", "which version are you"],
            &[
                "Ahh! My version is Cluster-AI 3.0 max NLP (basic)",
                "My version is Cluster-AI 3.0 max NLP (basic)",
            ],
        ),
        KnowledgeEntry::new(
            "are_you_llm",
            &["are you llm", "are you an llm", "you an llm", "you are a large language model right"],
            &[
                "No, I'm not an LLM. I'm a basic NLP chatbot built entirely from keyword rules.",
                "Nope! I'm just a simple keyword-based AI, not a massive deep-learning model.",
                "I don't run on neural networks, just plain old rule-based logic.",
                "No, I'm lightweight and rule-based, not a large language model.",
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_entry_by_phrase() {
        let kb = builtin();
        assert_eq!(kb.find("Hey, how are you doing?").map(|e| e.id.as_str()), Some("how_are_you"));
        assert_eq!(kb.find("Are you an LLM?").map(|e| e.id.as_str()), Some("are_you_llm"));
        assert!(kb.find("tell me about octopuses").is_none());
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let entry = KnowledgeEntry::new("x", &["Big Word"], &["answer"]);
        assert_eq!(entry.keywords, vec!["big word".to_string()]);
    }

    #[test]
    fn test_empty_base_never_matches() {
        assert!(KnowledgeBase::empty().find("what is a car").is_none());
    }
}
