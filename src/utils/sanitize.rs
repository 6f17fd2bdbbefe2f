//! Sanitizing of upstream text before it is echoed back to callers.
//!
//! Upstream error bodies are arbitrary: they may contain control characters
//! or be megabytes of HTML. Both are cleaned up here before a body snippet
//! lands in a dispatch result or a log line.

use crate::config::MAX_ERROR_DETAIL_LENGTH;

/// Removes control characters, keeping newlines, tabs and carriage returns.
pub fn sanitize_detail(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Sanitizes `text` and cuts it to `MAX_ERROR_DETAIL_LENGTH` characters.
///
/// A truncated result ends with a note giving the original length.
pub fn sanitize_and_truncate_detail(text: &str) -> String {
    truncate_chars(&sanitize_detail(text), MAX_ERROR_DETAIL_LENGTH)
}

/// Cuts `text` to at most `max` characters, room for the note included.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let total = text.chars().count();
    if total <= max {
        return text.to_string();
    }
    // Leave room for the truncation note
    let keep = max.saturating_sub(50);
    let head: String = text.chars().take(keep).collect();
    format!("{head}... (truncated, original length: {total} chars)")
}

/// `target` without credentials, query string or fragment.
///
/// Used wherever a URL that may carry secrets in its query is shown to a
/// caller or written to a log.
pub fn strip_query(target: &str) -> String {
    match url::Url::parse(target) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) => target
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_detail_removes_control_chars() {
        assert_eq!(
            sanitize_detail("Bad\x00Gateway\x1b[0m body"),
            "BadGateway[0m body"
        );
    }

    #[test]
    fn test_sanitize_detail_keeps_whitespace_and_unicode() {
        let input = "line one\nline\ttwo\r\n数据 🚀";
        assert_eq!(sanitize_detail(input), input);
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(sanitize_and_truncate_detail("HTTP 500"), "HTTP 500");
    }

    #[test]
    fn test_long_text_is_truncated_with_note() {
        let long = "x".repeat(MAX_ERROR_DETAIL_LENGTH + 500);
        let out = sanitize_and_truncate_detail(&long);
        assert!(out.chars().count() <= MAX_ERROR_DETAIL_LENGTH);
        assert!(out.ends_with(&format!(
            "(truncated, original length: {} chars)",
            MAX_ERROR_DETAIL_LENGTH + 500
        )));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let long = "数".repeat(200);
        let out = truncate_chars(&long, 100);
        assert!(out.starts_with(&"数".repeat(50)));
        assert!(out.contains("original length: 200 chars"));
    }

    #[test]
    fn test_strip_query_keeps_scheme_host_and_path() {
        assert_eq!(
            strip_query("https://user:pw@home.example.com/notice.php?qmsg_key=k&qq_number=1#top"),
            "https://home.example.com/notice.php"
        );
        assert_eq!(strip_query("not a url?key=k"), "not a url");
    }
}
