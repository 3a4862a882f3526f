// Fuzzy keyword matching: verbatim containment for phrases,
// bounded Levenshtein distance for single words.

/// Classic dynamic-programming edit distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    for (i, lc) in long.iter().enumerate() {
        let mut current = Vec::with_capacity(short.len() + 1);
        current.push(i + 1);
        for (j, sc) in short.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(lc != sc);
            current.push(insertion.min(deletion).min(substitution));
        }
        previous = current;
    }
    previous[short.len()]
}

/// Maximum distance tolerated for a single-word keyword, or `None` when the
/// keyword is too short to be matched fuzzily.
fn tolerance(keyword: &str) -> Option<usize> {
    let len = keyword.chars().count();
    if len < 3 {
        None
    } else if len > 5 {
        Some(2)
    } else {
        Some(1)
    }
}

/// True when any keyword matches the input. Short-circuits on the first hit.
pub fn fuzzy_contains_any<S: AsRef<str>>(input: &str, keywords: &[S]) -> bool {
    let lower = input.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();

    keywords.iter().any(|keyword| {
        let keyword = keyword.as_ref();
        if keyword.contains(' ') {
            return lower.contains(keyword);
        }
        match tolerance(keyword) {
            Some(max) => tokens.iter().any(|token| edit_distance(token, keyword) <= max),
            None => false,
        }
    })
}
