//! Formatting utilities (lightweight markup → Telegram HTML).

use std::sync::OnceLock;

use regex::Regex;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escaped_len(c: char) -> usize {
    match c {
        '&' => 5,
        '<' | '>' => 4,
        '"' => 6,
        other => other.len_utf8(),
    }
}

/// Split plain text into HTML-escaped pieces of at most `max_bytes` each.
///
/// Breaks after a newline or space when one falls in the back half of a
/// piece, otherwise mid-word. Never splits a character or an entity.
pub fn split_escaped(text: &str, max_bytes: usize) -> Vec<String> {
    // Room for the longest entity (`&quot;`).
    let max_bytes = max_bytes.max(6);

    let mut out = Vec::new();
    let mut start = 0usize;
    let mut used = 0usize;
    // (byte offset just after the break char, `used` at that point)
    let mut last_break: Option<(usize, usize)> = None;

    for (i, c) in text.char_indices() {
        let cost = escaped_len(c);
        if used + cost > max_bytes {
            let (cut, cut_used) = match last_break {
                Some((at, u)) if u * 2 >= max_bytes => (at, u),
                _ => (i, used),
            };
            out.push(escape_html(&text[start..cut]));
            start = cut;
            used -= cut_used;
            last_break = None;
        }
        used += cost;
        if c == '\n' || c == ' ' {
            last_break = Some((i + c.len_utf8(), used));
        }
    }

    if start < text.len() || out.is_empty() {
        out.push(escape_html(&text[start..]));
    }
    out
}

/// Render bot-authored markup to Telegram HTML.
///
/// Supported: `*bold*` and `_italic_`, single line only. Everything else is
/// escaped, so catalog content cannot inject tags.
pub fn render_markup(input: &str) -> String {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    static ITALIC: OnceLock<Regex> = OnceLock::new();

    let bold = BOLD.get_or_init(|| Regex::new(r"\*([^*\n]+)\*").expect("valid regex"));
    let italic =
        ITALIC.get_or_init(|| Regex::new(r"(^|[\s(])_([^_\n]+)_").expect("valid regex"));

    let text = escape_html(input);
    let text = bold.replace_all(&text, "<b>$1</b>");
    italic.replace_all(&text, "$1<i>$2</i>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_bold_and_italic() {
        assert_eq!(
            render_markup("🤖 *Welcome!*\n\nHow can we _help_?"),
            "🤖 <b>Welcome!</b>\n\nHow can we <i>help</i>?"
        );
    }

    #[test]
    fn leaves_snake_case_and_lone_stars_alone() {
        assert_eq!(render_markup("use reply_to_message"), "use reply_to_message");
        assert_eq!(render_markup("5 * 3 = 15"), "5 * 3 = 15");
    }

    #[test]
    fn short_text_is_one_piece() {
        assert_eq!(split_escaped("a < b", 100), vec!["a &lt; b".to_string()]);
        assert_eq!(split_escaped("", 100), vec![String::new()]);
    }

    #[test]
    fn pieces_fit_and_rejoin() {
        let text = "word & more ".repeat(500);
        let pieces = split_escaped(&text, 1000);
        assert!(pieces.len() > 1);
        assert!(pieces.iter().all(|p| p.len() <= 1000));
        assert_eq!(pieces.concat(), escape_html(&text));
    }

    #[test]
    fn prefers_whitespace_breaks() {
        let pieces = split_escaped("aaaa bbbb cccc", 12);
        assert_eq!(pieces, vec!["aaaa bbbb ".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn never_splits_multibyte_chars() {
        let text = "📩".repeat(10);
        let pieces = split_escaped(&text, 10);
        assert!(pieces.iter().all(|p| p.len() <= 10));
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn escapes_before_rendering() {
        assert_eq!(render_markup("*<b>*"), "<b>&lt;b&gt;</b>");
    }
}
