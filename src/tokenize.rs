//! Line splitting and quote-aware field tokenization.
//!
//! The tokenizer is a single-pass scan with an inside-quotes flag. It is
//! deliberately lenient: an unterminated quote never raises an error, the scan
//! simply reaches end of line and finalizes the current field as-is.

/// Splits `text` into physical lines, treating `\n`, `\r\n`, and a lone `\r`
/// as terminators. A trailing terminator does not produce a phantom empty
/// line; interior empty lines are preserved (callers filter them).
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(&text[start..idx]);
                idx += 1;
                start = idx;
            }
            b'\r' => {
                lines.push(&text[start..idx]);
                idx += 1;
                if bytes.get(idx) == Some(&b'\n') {
                    idx += 1;
                }
                start = idx;
            }
            _ => idx += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Splits one line into raw string fields.
///
/// Rules: a doubled quote inside a quoted region is an escaped literal quote;
/// a single quote toggles the inside-quotes flag and is not emitted; the
/// delimiter separates fields only outside quotes; end of line always emits
/// the final field, even when empty or still inside an open quote.
pub fn tokenize(line: &str, delimiter: char, quote: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == quote {
            if in_quotes && chars.peek() == Some(&quote) {
                current.push(quote);
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
