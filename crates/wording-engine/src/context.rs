//! Context snippets around a match
//!
//! Prefers the enclosing sentence; falls back to a fixed character window
//! when no closing sentence boundary exists or the sentence is too long.

/// Characters shown on each side of a match in window mode
pub const CONTEXT_WINDOW_CHARS: usize = 50;

/// Longest sentence returned as-is
pub const MAX_SENTENCE_CHARS: usize = 400;

/// Extract a display snippet for the byte span `start..end` of `text`
pub fn extract_context(text: &str, start: usize, end: usize) -> String {
    let (start, end) = clamp_span(text, start, end);

    if let Some((s, e)) = sentence_bounds(text, start, end) {
        let sentence = text[s..e].trim();
        if sentence.chars().count() <= MAX_SENTENCE_CHARS {
            return sentence.to_string();
        }
    }

    let (s, e) = window_bounds(text, start, end, CONTEXT_WINDOW_CHARS);
    text[s..e].trim().to_string()
}

/// Byte range of the sentence containing the span, if it is terminated
pub fn sentence_bounds(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let (start, end) = clamp_span(text, start, end);

    let mut sentence_start = 0;
    let mut next_char: Option<char> = text[start..].chars().next();
    for (i, c) in text[..start].char_indices().rev() {
        if is_terminator(c) && next_char.map_or(true, char::is_whitespace) {
            sentence_start = i + c.len_utf8();
            break;
        }
        next_char = Some(c);
    }

    let tail = &text[end..];
    let mut chars = tail.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let followed_by_space = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
        if followed_by_space {
            return Some((sentence_start, end + i + c.len_utf8()));
        }
    }

    None
}

/// Byte range covering `chars` characters either side of the span
pub fn window_bounds(text: &str, start: usize, end: usize, chars: usize) -> (usize, usize) {
    let (start, end) = clamp_span(text, start, end);

    let window_start = text[..start]
        .char_indices()
        .rev()
        .nth(chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let window_start = if chars == 0 { start } else { window_start };

    let window_end = text[end..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    (window_start, window_end)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Clamp a span to the text and to character boundaries
fn clamp_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let start = floor_boundary(text, start.min(text.len()));
    let end = ceil_boundary(text, end.min(text.len()));
    (start, end)
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
