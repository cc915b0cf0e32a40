//! Text formats derived from stored pages: iCalendar events and vCards.

pub mod ics;
pub mod vcard;

pub use ics::{render_event, CalendarEvent};
pub use vcard::{render_card, ContactCard};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("missing {0} for download")]
    MissingField(&'static str),
    #[error("invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Escapes a TEXT value as both RFC 5545 and RFC 6350 require.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// URI and parameter values have no escape syntax, so control characters are dropped.
pub fn strip_controls(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_control()).collect()
}

/// Folds a content line at 75 octets without splitting a UTF-8 sequence.
pub(crate) fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;
    if line.len() <= LIMIT {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / LIMIT * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > LIMIT {
            folded.push_str("\r\n ");
            // the leading space counts toward the continuation line
            width = 1;
        }
        folded.push(ch);
        width += len;
    }
    folded
}

pub(crate) fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(
            escape_text("Suite 4, Floor 2; C:\\homes\nline two\r\nthree"),
            "Suite 4\\, Floor 2\\; C:\\\\homes\\nline two\\nthree"
        );
    }

    #[test]
    fn uri_values_lose_line_breaks() {
        assert_eq!(
            strip_controls("https://x.example/a.png\r\nX-INJECTED:1\t"),
            "https://x.example/a.pngX-INJECTED:1"
        );
    }

    #[test]
    fn folding_keeps_lines_within_limit() {
        let line = format!("DESCRIPTION:{}", "é".repeat(60));
        let folded = fold_line(&line);
        for segment in folded.split("\r\n") {
            assert!(segment.len() <= 75, "segment too long: {}", segment.len());
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn short_lines_are_untouched() {
        assert_eq!(fold_line("SUMMARY:Open House"), "SUMMARY:Open House");
    }
}
