//! Small string helpers used by filtering, config parsing, and the UI.
//!
//! Kept dependency-free so the hot filtering path stays cheap.

/// Rank how well a text matches a query (lower is better).
///
/// Expects `query_lower` to be lowercase; the text is lowercased internally.
///
/// Ranking:
///
/// - 0: exact match
/// - 1: prefix match (`starts_with`)
/// - 2: substring match (`contains`)
/// - 3: no match
pub fn match_rank(text: &str, query_lower: &str) -> u8 {
    let n = text.to_lowercase();
    if !query_lower.is_empty() {
        if n == query_lower {
            return 0;
        }
        if n.starts_with(query_lower) {
            return 1;
        }
        if n.contains(query_lower) {
            return 2;
        }
    }
    3
}

/// What: Score `text` as an ordered subsequence match of `query_lower`.
///
/// Inputs:
/// - `text`: Candidate text (any case).
/// - `query_lower`: Lowercase query; whitespace is ignored.
///
/// Output:
/// - `Some(score)` when every query character appears in order (lower is closer);
///   `None` otherwise.
///
/// Details:
/// - Score is the number of skipped characters between the first and last matched
///   character plus the offset of the first match, so contiguous prefix matches score 0.
pub fn fuzzy_score(text: &str, query_lower: &str) -> Option<u32> {
    let mut wanted = query_lower.chars().filter(|c| !c.is_whitespace()).peekable();
    wanted.peek()?;
    let mut first: Option<u32> = None;
    let mut gaps: u32 = 0;
    let mut since_last: u32 = 0;
    for (pos, c) in text.chars().flat_map(char::to_lowercase).enumerate() {
        let Some(&w) = wanted.peek() else { break };
        if c == w {
            if first.is_none() {
                first = Some(pos as u32);
            } else {
                gaps += since_last;
            }
            since_last = 0;
            wanted.next();
        } else if first.is_some() {
            since_last += 1;
        }
    }
    if wanted.peek().is_some() {
        return None;
    }
    first.map(|f| f + gaps)
}

/// Strip a trailing `# comment` or `// comment` from a config value.
pub fn strip_inline_comment(val: &str) -> &str {
    let cut = [val.find(" #"), val.find("\t#"), val.find(" //")]
        .into_iter()
        .flatten()
        .min();
    match cut {
        Some(i) => val[..i].trim_end(),
        None => val,
    }
}

/// Interpret common truthy spellings (`true`, `1`, `yes`, `on`).
pub fn parse_bool(val: &str) -> bool {
    let lv = val.trim().to_ascii_lowercase();
    lv == "true" || lv == "1" || lv == "yes" || lv == "on"
}

/// Truncate `s` to at most `max` characters, appending an ellipsis when cut.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}
