//! Small text helpers shared by the model, prompts and encoders.

/// Punctuation beyond ASCII that shows up in CJK, Arabic, Indic and
/// typographic text.
const EXTRA_PUNCTUATION: &str = "，。、？！：；（）《》【】「」『』・〜·،؛؟;—«»–‐…′″।՝։ฯๆ¿¡“”‘’";

/// Placeholder for segments that carry no text.
pub const EMPTY_TEXT: &str = "...";

pub fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(ch)
}

/// Trims surrounding whitespace and removes every punctuation character.
pub fn strip_punctuation(s: &str) -> String {
    s.trim().chars().filter(|c| !is_punctuation(*c)).collect()
}

/// Collapses whitespace runs into single spaces and trims the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Normalized text, or [`EMPTY_TEXT`] when nothing visible remains.
pub fn or_placeholder(s: &str) -> String {
    let normalized = normalize_ws(s);
    if normalized.is_empty() {
        EMPTY_TEXT.to_string()
    } else {
        normalized
    }
}

/// Lowercased, punctuation-free form used to compare words.
pub fn match_key(s: &str) -> String {
    strip_punctuation(s).to_lowercase()
}
