/// Splits text into sentences
///
/// A sentence ends at `.`, `!` or `?` when the next character is whitespace.
/// Sentences are trimmed and empty ones dropped.
///
/// ```
/// use docsift::text::split_sentences;
///
/// let sentences = split_sentences("One. Two!  Three? v1.2 is out");
/// assert_eq!(sentences, vec!["One.", "Two!", "Three?", "v1.2 is out"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let followed_by_space = matches!(chars.peek(), Some(&(_, next)) if next.is_whitespace());
        if !followed_by_space {
            continue;
        }

        push_trimmed(&mut sentences, &text[start..i + c.len_utf8()]);

        while let Some(&(_, next)) = chars.peek() {
            if next.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        start = chars.peek().map(|&(j, _)| j).unwrap_or(text.len());
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
