// Word-group catalogue consulted by the fuzzy matcher.
// Groups are either plain words/phrases (fuzzy matched) or emoji glyph sets
// (matched verbatim against the raw input).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    QuestionWords,
    Greetings,
    CodeRequest,
    QuoteRequest,
    Farewells,
    HelpRequest,
    FollowUpQuery,
    PositiveFeedback,
    Explicit,
    Frustration,
    Opinion,
    Identity,
    Planning,
    Fillers,
    SadEmoji,
    FileAnalysis,
    HappyEmoji,
    AngryEmoji,
}

impl Group {
    /// Every group in catalogue order. The intent scan walks this order.
    pub const ALL: [Group; 18] = [
        Group::QuestionWords,
        Group::Greetings,
        Group::CodeRequest,
        Group::QuoteRequest,
        Group::Farewells,
        Group::HelpRequest,
        Group::FollowUpQuery,
        Group::PositiveFeedback,
        Group::Explicit,
        Group::Frustration,
        Group::Opinion,
        Group::Identity,
        Group::Planning,
        Group::Fillers,
        Group::SadEmoji,
        Group::FileAnalysis,
        Group::HappyEmoji,
        Group::AngryEmoji,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::QuestionWords => "question_words",
            Group::Greetings => "greetings",
            Group::CodeRequest => "code_request",
            Group::QuoteRequest => "quote_request",
            Group::Farewells => "farewells",
            Group::HelpRequest => "help_request",
            Group::FollowUpQuery => "follow_up_query",
            Group::PositiveFeedback => "positive_feedback",
            Group::Explicit => "explicit",
            Group::Frustration => "frustration",
            Group::Opinion => "opinion",
            Group::Identity => "identity",
            Group::Planning => "planning",
            Group::Fillers => "fillers",
            Group::SadEmoji => "sad_emoji",
            Group::FileAnalysis => "file_analysis",
            Group::HappyEmoji => "happy_emoji",
            Group::AngryEmoji => "angry_emoji",
        }
    }

    pub fn kind(&self) -> GroupKind {
        match self {
            Group::SadEmoji | Group::HappyEmoji | Group::AngryEmoji => GroupKind::Emoji,
            _ => GroupKind::Word,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    Word,
    Emoji,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub group: Group,
    pub kind: GroupKind,
    pub phrases: Vec<String>,
}

/// Read-only catalogue of word groups, built once at startup.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    pub fn new(entries: Vec<LexiconEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut e| {
                if e.kind == GroupKind::Word {
                    e.phrases = e.phrases.iter().map(|p| p.to_lowercase()).collect();
                }
                e
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn phrases(&self, group: Group) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.group == group)
            .map(|e| e.phrases.as_slice())
            .unwrap_or(&[])
    }

    /// Verbatim glyph containment, used for emoji groups.
    pub fn contains_glyph(&self, group: Group, input: &str) -> bool {
        self.phrases(group).iter().any(|g| input.contains(g.as_str()))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let entries = Group::ALL
            .iter()
            .map(|&group| LexiconEntry {
                group,
                kind: group.kind(),
                phrases: default_phrases(group).iter().map(|p| p.to_string()).collect(),
            })
            .collect();
        Self::new(entries)
    }
}

fn default_phrases(group: Group) -> &'static [&'static str] {
    match group {
        Group::QuestionWords => &[
            "what", "who", "where", "is", "can", "which", "there", "will",
            "i need to know about",
        ],
        Group::Greetings => &["hello", "hi", "hey", "greetings", "yo"],
        Group::CodeRequest => &["python", "script", "code", "program", "javascript", "java"],
        Group::QuoteRequest => &["quote", "inspire", "saying", "motivation", "inspirational"],
        Group::Farewells => &["bye", "goodbye", "see you", "later"],
        Group::HelpRequest => &["help", "assist", "support", "can you please help"],
        Group::FollowUpQuery => &[
            "more", "elaborate", "continue", "go on", "expand on that",
            "thats great i want to know more about the topic",
        ],
        Group::PositiveFeedback => &[
            "great", "fine", "wow", "nice", "awesome", "excellent", "fantastic",
            "wonderful", "amazing", "cool", "thanks", "thank you", "oh thats great",
        ],
        Group::Explicit => &[
            "tits", "boobs", "sex", "motherfucker", "fuck me", "can you sex",
            "please fuck", "dick", "vagina", "pussy", "asshole", "bitch", "porn",
        ],
        Group::Frustration => &[
            "fuck this", "fuck you", "fuck", "oh shit", "damn", "crap",
            "this is not working", "useless", "stupid", "error", "broken",
            "are you an idiot", "please do it right",
        ],
        Group::Opinion => &[
            "opinion", "think", "believe", "feel", "take over the world", "consciousness",
        ],
        Group::Identity => &[
            "who are you", "what are you", "your name", "are you an ai", "are you human",
        ],
        Group::Planning => &[
            "make a plan", "decide", "should i", "help me choose", "what should i do",
        ],
        Group::Fillers => &[
            "yeah", "ohh", "oh", "hmm", "ah", "okay", "ok", "alright", "right", "mm",
        ],
        Group::SadEmoji => &[
            "\u{1F972}", "\u{1F614}", "\u{1F61F}", "\u{2639}\u{FE0F}", "\u{1F97A}",
            "\u{1F979}", "\u{1F625}", "\u{1F622}", "\u{1F62D}", "\u{1F616}",
            "\u{1F61E}", "\u{1F613}",
        ],
        Group::FileAnalysis => &[
            "summarize", "explain", "analyze", "tldr", "tl;dr", "what does this mean",
            "what is this about", "rewrite", "do these",
        ],
        Group::HappyEmoji => &[
            "\u{1F600}", "\u{1F603}", "\u{1F604}", "\u{1F601}", "\u{1F606}",
            "\u{1F602}", "\u{1F60A}", "\u{263A}\u{FE0F}", "\u{1F638}", "\u{1F64C}",
            "\u{1F64B}", "\u{1F64B}\u{200D}\u{2642}\u{FE0F}",
        ],
        Group::AngryEmoji => &[
            "\u{1F612}", "\u{1F624}", "\u{1F621}", "\u{1F620}", "\u{1F92C}", "\u{1F47F}",
        ],
    }
}
