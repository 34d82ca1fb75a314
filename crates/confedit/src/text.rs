//! Text helpers shared by the serialization views and page rendering.

/// Escape a string for safe inclusion in HTML bodies and attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Chunk of a natural sort key. Numeric runs compare by value and order ahead
/// of text runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalSortChunk {
    Number(u128),
    Text(String),
}

/// Split a string into case-folded text and numeric runs so embedded integers
/// compare numerically: "Item 2" sorts before "Item 10".
pub fn natural_sort_key(value: &str) -> Vec<NaturalSortChunk> {
    let mut key = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for ch in value.chars() {
        if ch.is_ascii_digit() {
            if !text.is_empty() {
                key.push(NaturalSortChunk::Text(std::mem::take(&mut text)));
            }
            digits.push(ch);
        } else {
            if !digits.is_empty() {
                key.push(number_chunk(std::mem::take(&mut digits)));
            }
            for lowered in ch.to_lowercase() {
                text.push(lowered);
            }
        }
    }

    if !digits.is_empty() {
        key.push(number_chunk(digits));
    }
    if !text.is_empty() {
        key.push(NaturalSortChunk::Text(text));
    }

    key
}

fn number_chunk(run: String) -> NaturalSortChunk {
    // Saturate instead of failing on absurdly long digit runs.
    let value = run.chars().fold(0u128, |acc, ch| {
        acc.saturating_mul(10)
            .saturating_add(ch.to_digit(10).unwrap_or(0) as u128)
    });
    NaturalSortChunk::Number(value)
}
