// Pure classifiers over raw input: arithmetic/calculus detection and
// pasted-code language identification.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// ============ Math ============

#[derive(Debug, Clone, PartialEq)]
pub enum MathResult {
    Arithmetic { value: f64 },
    Calculus,
    Error { message: String },
}

/// Renders an arithmetic value: integral values without a fractional part.
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

static ARITHMETIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?[0-9]+(?:\.[0-9]+)?)\s*([+\-*/])\s*(-?[0-9]+(?:\.[0-9]+)?)")
        .expect("arithmetic pattern")
});

const CALCULUS_TERMS: [&str; 3] = ["integrate", "differentiate", "derivative"];

const MATH_REWRITES: [(&str, &str); 9] = [
    ("what is", ""),
    ("what's", ""),
    ("calculate", ""),
    ("plus", "+"),
    ("minus", "-"),
    ("subtract", "-"),
    ("times", "*"),
    ("multiplied by", "*"),
    ("divided by", "/"),
];

fn normalize_expression(input: &str) -> String {
    let mut expression = input.to_lowercase();
    for (from, to) in MATH_REWRITES {
        expression = expression.replace(from, to);
    }
    let expression = expression.strip_suffix('?').unwrap_or(&expression);
    expression.trim().to_string()
}

fn round_result(value: f64) -> f64 {
    if value.fract() == 0.0 {
        value
    } else {
        (value * 10_000.0).round() / 10_000.0
    }
}

/// Detects a calculus mention or the first `a <op> b` expression in the input.
pub fn solve_math(input: &str) -> Option<MathResult> {
    let expression = normalize_expression(input);

    if CALCULUS_TERMS.iter().any(|t| expression.contains(t)) {
        return Some(MathResult::Calculus);
    }

    let caps = ARITHMETIC.captures(&expression)?;
    let lhs: f64 = caps[1].parse().ok()?;
    let rhs: f64 = caps[3].parse().ok()?;

    let value = match &caps[2] {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        "/" => {
            if rhs == 0.0 {
                return Some(MathResult::Error {
                    message: "division by zero is not allowed".to_string(),
                });
            }
            lhs / rhs
        }
        _ => return None,
    };

    Some(MathResult::Arithmetic { value: round_result(value) })
}

// ============ Code Snippet Language ============

const MIN_SNIPPET_CHARS: usize = 15;
const DEFINITIVE_BONUS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
    Html,
    Css,
    Sql,
    Shell,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Sql => "SQL",
            Language::Shell => "Bash/Shell",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hits {
    /// Every occurrence scores a point.
    Each,
    /// Presence scores a single point.
    Once,
}

struct Pattern {
    regex: Regex,
    hits: Hits,
    definitive: bool,
}

impl Pattern {
    fn new(source: &str, hits: Hits, definitive: bool) -> Self {
        Self {
            regex: Regex::new(source).expect("language pattern"),
            hits,
            definitive,
        }
    }

    fn score(&self, text: &str) -> usize {
        let count = match self.hits {
            Hits::Each => self.regex.find_iter(text).count(),
            Hits::Once => usize::from(self.regex.is_match(text)),
        };
        if count > 0 && self.definitive {
            count + DEFINITIVE_BONUS
        } else {
            count
        }
    }
}

static LANGUAGE_PATTERNS: Lazy<Vec<(Language, Vec<Pattern>)>> = Lazy::new(|| {
    use Hits::*;
    vec![
        (Language::Python, vec![
            Pattern::new(r"\b(def|class|import|from|elif|else:|except:|with|as|print|yield|lambda)\b", Each, false),
            Pattern::new(r"(?m)^\s*(def|class|if|elif|else|for|while|try|except|with)\b.*:\s*$", Each, false),
        ]),
        (Language::JavaScript, vec![
            Pattern::new(r"\b(function|const|let|var|async|await|=>|return|throw|fetch|Promise|require)\b", Each, false),
            Pattern::new(r"(?m)[{};]$", Once, false),
        ]),
        (Language::Html, vec![
            Pattern::new(r"(?i)<!DOCTYPE html>", Once, true),
            Pattern::new(r"(?i)<html", Once, false),
            Pattern::new(r"(?i)<head", Once, false),
            Pattern::new(r"(?i)<body", Once, false),
            Pattern::new(r"(?i)<div", Once, false),
            Pattern::new(r"(?i)<p", Once, false),
            Pattern::new(r"(?i)<a\s+href", Once, false),
        ]),
        (Language::Css, vec![
            Pattern::new(r"(?m)^\s*([#.]?[\w-]+)\s*\{", Each, false),
            Pattern::new(r"(?m):\s*.*;", Each, false),
            Pattern::new(r"\b(color|background|font-size|display|position|margin|padding)\b", Each, false),
        ]),
        (Language::Sql, vec![
            Pattern::new(r"(?i)\b(SELECT|FROM|WHERE|INSERT|INTO|UPDATE|DELETE|CREATE|TABLE|JOIN)\b", Each, false),
        ]),
        (Language::Shell, vec![
            Pattern::new(r"^#!/bin/(bash|sh|zsh)", Once, true),
            Pattern::new(r"\b(echo|ls|cd|grep|sed|awk|curl|git)\b", Each, false),
        ]),
    ]
});

static INDENTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s{2,}|^\t").expect("indentation pattern"));
static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<[a-z].*>").expect("html tag pattern"));

fn looks_like_code(text: &str) -> bool {
    text.contains('\n')
        || text.contains('{')
        || text.contains('}')
        || INDENTATION.is_match(text)
        || HTML_TAG.is_match(text)
}

/// Guesses the language of a pasted snippet, or `None` when the input does
/// not look like code or no language scores above one.
pub fn identify_code_snippet(input: &str) -> Option<Language> {
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_SNIPPET_CHARS || !looks_like_code(trimmed) {
        return None;
    }

    let mut best: Option<(Language, usize)> = None;
    for (language, patterns) in LANGUAGE_PATTERNS.iter() {
        let score: usize = patterns.iter().map(|p| p.score(trimmed)).sum();
        if score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((*language, score));
        }
    }

    match best {
        Some((language, score)) if score > 1 => Some(language),
        _ => None,
    }
}
