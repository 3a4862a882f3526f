// Canned response banks and the seedable picker that chooses among them.
// Templates carry `{placeholder}` slots filled with `fill`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    Greeting,
    CodeHelp,
    ApiQuote,
    Farewell,
    Help,
    MathResult,
    MathError,
    Calculus,
    PositiveFeedback,
    Explicit,
    FrustrationWithoutContext,
    FrustrationWithContext,
    FrustrationBreak,
    FriendlyQuestion,
    StructuredIntro,
    StructuredConclusion,
    SecondarySourceIntro,
    FillerAcknowledgement,
    Sad,
    Happy,
    Angry,
    Opinion,
    Identity,
    Planning,
    Default,
    ApiError,
    CodeIdentification,
    FileAnalysisNotPossible,
    OcrError,
    ImageRecognitionError,
    FileTypeUnsupported,
}

pub fn phrases(bank: Bank) -> &'static [&'static str] {
    match bank {
        Bank::Greeting => &[
            "Hello there! How can I assist you today?\u{1F600}",
            "Hi! What can I help you with?",
            "Greetings! How may I be of service?\u{263A}\u{FE0F}",
        ],
        Bank::CodeHelp => &[
            "I can provide some code snippets\u{1F9D1}\u{200D}\u{1F4BB}. What programming language or concept are you interested in? For example, you could ask for a 'python hello world' script.",
            "Of course! I have a library of code examples. What are you looking for? You can try asking for 'javascript fetch api'.",
            "I'd be happy to help with some code. What do you need a script for?",
        ],
        Bank::ApiQuote => &[
            "Here is a quote for you:\n\n> \"{quote}\"\n> \u{2014} {author}",
            "I found this inspirational quote:\n\n> \"{quote}\"\n> \u{2014} {author}",
        ],
        Bank::Farewell => &[
            "Goodbye! Have a great day. \u{1F44B}",
            "Farewell! Let me know if you need anything else.",
            "See you later! \u{1F60A}",
        ],
        Bank::Help => &[
            "I can help with a variety of topics, including generating code snippets. What do you need support with? \u{1F64B}",
            "Certainly. I can assist with programming questions, general knowledge, and more. What's on your mind?",
            "I'm here to help. What can I do for you?",
        ],
        Bank::MathResult => &[
            "The result is {result}. \u{1F9EE}",
            "I calculated it to be {result}.",
            "That comes out to {result}.",
        ],
        Bank::MathError => &[
            "I'm sorry, I encountered an error with that calculation: {error}",
        ],
        Bank::Calculus => &[
            "That looks like a calculus question! While I can handle basic arithmetic, advanced topics like differentiation and integration are still under development for me.",
        ],
        Bank::PositiveFeedback => &[
            "You're welcome! I'm glad I could help. \u{1F60A}",
            "Great! Let me know if you need anything else. \u{1F44D}",
            "Awesome! Is there anything else I can assist with? \u{2728}",
        ],
        Bank::Explicit => &[
            "I am not programmed to respond to inappropriate language. Please keep our conversation respectful.",
            "I cannot engage with this type of content. Let's focus on a different topic. \u{1F6AB}",
            "This line of questioning is not productive. How else can I help you?",
        ],
        Bank::FrustrationWithoutContext => &[
            "I understand this can be frustrating. Let's try to solve it together. Could you describe the issue in more detail?",
            "It sounds like you're having trouble. I'm here to help. What seems to be the problem?",
            "I'm sorry you're feeling frustrated. Let's take a step back. What were you trying to accomplish?",
        ],
        Bank::FrustrationWithContext => &[
            "I'm sorry the last response wasn't helpful. Could you tell me what was wrong so I can try again?",
            "I understand you're frustrated with my previous answer. How can I improve it for you?",
            "Apologies if that wasn't what you were looking for. What specifically was the issue with my last response?",
        ],
        Bank::FrustrationBreak => &[
            "It seems like you're still having trouble. Perhaps taking a short break would help clear your mind. I'll be here when you get back.",
            "I can sense your frustration. Sometimes stepping away for a moment is the best solution. Let's try again in a little while.",
            "I'm sorry I'm not being more helpful. Let's pause for a moment. I'll be ready to try again when you are.",
        ],
        Bank::FriendlyQuestion => &[
            "Ah, an interesting question! Let me see... here's what I found: \u{1F4A1}",
            "Okay, let's dive into that. Here is what I know: \u{1F9D0}",
            "Hmm, great question! I'll look that up for you. It seems that:",
        ],
        Bank::StructuredIntro => &[
            "Of course! Here\u{2019}s a quick introduction to **{title}**.",
            "Certainly. Let's break down the topic of **{title}**.",
        ],
        Bank::StructuredConclusion => &[
            "In conclusion, that's a brief overview of the topic. I hope this helps! \u{1F44D}",
            "And that's the gist of it! Let me know if you want to dive deeper on any point. \u{2705}",
        ],
        Bank::SecondarySourceIntro => &[
            "From a structured data perspective, DBpedia adds this summary:",
            "To provide a more technical viewpoint, here's what DBpedia says: \u{1F913}",
            "Additionally, the DBpedia knowledge base offers this abstract:",
        ],
        Bank::FillerAcknowledgement => &[
            "Take your time.",
            "I'm here when you're ready.",
            "Just let me know what you're thinking.",
        ],
        Bank::Sad => &[
            "It seems like you're feeling down. I'm here to listen if you want to talk. \u{1F61F}",
            "I'm sorry to hear that. I hope things get better for you soon. \u{1F625}",
            "Sending you some positive vibes. \u{1F614}",
        ],
        Bank::Happy => &[
            "I'm glad to see you're in a good mood! \u{1F604}",
            "That's great to hear! Your positivity is contagious! \u{1F60A}",
            "Awesome! Keep that great energy going! \u{2728}",
        ],
        Bank::Angry => &[
            "It sounds like you're upset. If there's anything I can do to help, please let me know. \u{1F620}",
            "I understand you're feeling angry. Sometimes taking a deep breath can help. \u{1F624}",
            "I'm sorry you're feeling this way. Let's try to work through it. \u{1F621}",
        ],
        Bank::Opinion => &[
            "As an AI, I don't have personal opinions, beliefs, or feelings. My goal is to provide information based on the data I was trained on. \u{1F916}",
            "That's a fascinating philosophical question! However, I'm a language model and don't possess consciousness or personal views. I can only process information.",
            "Questions like that are interesting to think about! My programming is focused on providing factual information, not forming personal opinions.",
        ],
        Bank::Identity => &[
            "I am Cluster-AI, a large language model designed to be a helpful and informative assistant.",
            "You're chatting with Cluster-AI. I'm a computer program created to help you with your questions. \u{1F4BB}",
            "I am an AI assistant. You can ask me questions, and I'll do my best to find the answers for you.",
        ],
        Bank::Planning => &[
            "I can provide you with information and options to help you make a decision, but I can't make personal plans or choices for you. What information would be helpful?",
            "That sounds like an important decision! While I can't make the choice for you, I can help you research or weigh the pros and cons. What are you trying to decide on? \u{2696}\u{FE0F}",
            "As an AI, I can't create personal plans. However, if you tell me your goal, I can offer information that might help you build your own plan.",
        ],
        Bank::Default => &[
            "I'm not sure how to respond to that yet. I am still learning. Could you rephrase your request?",
            "My apologies, I don't understand. Could you try asking in a different way? \u{1F615}",
            "I'm still in development and can't answer that. Please try another question.",
        ],
        Bank::ApiError => &[
            "I'm sorry, I had trouble fetching that information from my external service. Please try again later. \u{1F4E1}",
        ],
        Bank::CodeIdentification => &[
            "That looks like some {language} code! What would you like to do with it? I can try to explain it, or you can ask me for a different snippet. \u{1F913}",
            "I see you've pasted some {language} code. Is there anything specific you'd like to know about it? \u{1F914}",
            "Thanks for sharing that {language} snippet. Do you have a question about it, or would you like me to find a different example for you?",
        ],
        Bank::FileAnalysisNotPossible => &[
            "I've processed your file '{fileName}'. However, my capabilities are currently focused on answering specific questions or looking up topics. I can't perform general commands like 'summarize' or 'explain' on custom text just yet. \u{1F916}",
            "Thanks for the file '{fileName}'. While I can read it, I can't analyze or summarize its content directly. You could ask me a specific question about a topic mentioned in the file, and I can try to look that up for you!",
            "Got it. I have the content of '{fileName}'. My apologies, but my current programming doesn't allow for open-ended analysis of file content. I am designed to find answers to factual questions.",
        ],
        Bank::OcrError => &[
            "I'm sorry, I had trouble reading that file. It might be corrupted or in a format I can't process.",
            "Apologies, an error occurred during text extraction. Please try a different file.",
        ],
        Bank::ImageRecognitionError => &[
            "I can see the file you uploaded, but my pattern recognition for images is currently limited. I was unable to find any readable text in this one.",
            "Thanks for the image. My ability to understand the content of pictures is still developing, and I couldn't find any text to analyze here.",
        ],
        Bank::FileTypeUnsupported => &[
            "I see you've uploaded a {fileType} file. Unfortunately, I can't process this type of file at the moment. I can handle images, PDFs, and plain text files. \u{1F4C1}",
            "Thanks for the file. However, my capabilities are currently limited to images, PDFs, and text files. I'm unable to analyze a {fileType} file. \u{1F615}",
        ],
    }
}

/// Replaces the first `{key}` slot in a template.
pub fn fill(template: &str, key: &str, value: &str) -> String {
    template.replacen(&format!("{{{}}}", key), value, 1)
}

/// Random selection over response banks. Seed it for reproducible replies.
pub struct Phrases {
    rng: Mutex<StdRng>,
}

impl Phrases {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..len)
    }

    /// Picks any element of a non-empty slice; `None` for an empty one.
    pub fn choose<'a, T>(&self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            None
        } else {
            options.get(self.index(options.len()))
        }
    }

    pub fn pick(&self, bank: Bank) -> &'static str {
        self.choose(phrases(bank)).copied().unwrap_or("")
    }
}

impl Default for Phrases {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_choices() {
        let a = Phrases::with_seed(7);
        let b = Phrases::with_seed(7);
        for _ in 0..10 {
            assert_eq!(a.pick(Bank::Default), b.pick(Bank::Default));
        }
    }

    #[test]
    fn test_pick_stays_in_bank() {
        let picker = Phrases::with_seed(1);
        for _ in 0..20 {
            assert!(phrases(Bank::Greeting).contains(&picker.pick(Bank::Greeting)));
        }
        let empty: [&str; 0] = [];
        assert!(picker.choose(&empty).is_none());
    }

    #[test]
    fn test_fill_replaces_first_slot_only() {
        assert_eq!(fill("{x} and {x}", "x", "1"), "1 and {x}");
        assert_eq!(fill("The result is {result}.", "result", "4"), "The result is 4.");
    }
}
