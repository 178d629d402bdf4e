use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
}

fn special_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,;:!?()\-]").expect("special char regex is valid"))
}

/// Cleans and normalizes raw page text
///
/// Whitespace runs collapse to a single space, then every character other
/// than word characters, whitespace and basic punctuation (`.,;:!?()-`) is
/// replaced by a space. The result is trimmed; inner double spaces left by
/// the replacement are kept.
///
/// ```
/// use docsift::text::clean_text;
///
/// assert_eq!(clean_text("  Hello,\n\n world!  "), "Hello, world!");
/// assert_eq!(clean_text("a © b"), "a   b");
/// ```
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let collapsed = whitespace_re().replace_all(text, " ");
    let stripped = special_chars_re().replace_all(&collapsed, " ");
    stripped.trim().to_string()
}

/// Title-cases a string word by word
///
/// The first letter of every run of letters is upper-cased and the rest are
/// lower-cased, so `"testing the package"` becomes `"Testing The Package"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Returns the prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Hex-encoded SHA-256 digest of `content`
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("a\t\tb\n\nc"), "a b c");
    }

    #[test]
    fn test_clean_text_keeps_punctuation() {
        assert_eq!(clean_text("Hi (there): ok; yes? no! a-b."), "Hi (there): ok; yes? no! a-b.");
    }

    #[test]
    fn test_clean_text_replaces_symbols() {
        assert_eq!(clean_text("C++ & Rust"), "C     Rust");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_clean_text_keeps_unicode_letters() {
        assert_eq!(clean_text("Café  déjà"), "Café déjà");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("testing the package"), "Testing The Package");
        assert_eq!(title_case("API keys"), "Api Keys");
        assert_eq!(title_case("step-by-step"), "Step-By-Step");
        assert_eq!(title_case("3d models"), "3D Models");
    }

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = content_hash("https://example.com/docs");
        let b = content_hash("https://example.com/docs");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_hash("https://example.com/other"));
    }
}
