//! Char-offset string helpers. Cursor offsets coming from the rendering
//! layer count Unicode scalar values, never bytes.

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the char at `offset`, clamped to the end of the string
pub fn byte_index(s: &str, offset: usize) -> usize {
    s.char_indices()
        .nth(offset)
        .map(|(index, _)| index)
        .unwrap_or(s.len())
}

pub fn split_at_char(s: &str, offset: usize) -> (String, String) {
    let (head, tail) = s.split_at(byte_index(s, offset));
    (head.to_string(), tail.to_string())
}

pub fn insert_at_char(s: &str, offset: usize, insert: &str) -> String {
    let at = byte_index(s, offset);
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..at]);
    out.push_str(insert);
    out.push_str(&s[at..]);
    out
}

/// Remove `count` chars starting at `offset`
pub fn remove_chars(s: &str, offset: usize, count: usize) -> String {
    let start = byte_index(s, offset);
    let end = byte_index(s, offset + count);
    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..start]);
    out.push_str(&s[end..]);
    out
}

pub fn char_at(s: &str, offset: usize) -> Option<char> {
    s.chars().nth(offset)
}
