/*
 * frontmatter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document splitting: front matter vs. body.
//!
//! A document qualifies for splitting only when its first line is a `---`
//! fence. A malformed or unterminated header is not an error; the whole text
//! is then the body, exactly as written (no trimming or normalization — the
//! front-matter parser must see exactly what the author wrote).

use once_cell::sync::Lazy;
use regex::Regex;

/// An opening fence: `---` with optional trailing blanks, then a line break.
static OPEN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^---[ \t]*\r?\n").expect("valid fence regex"));

/// A closing fence: a line consisting solely of `---` (trailing blanks
/// tolerated). The break is optional so a fence at end of input closes too.
static CLOSE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^---[ \t]*(\r?\n|$)").expect("valid fence regex"));

/// Result of splitting a template document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult<'a> {
    /// The text strictly between the two fence lines, when a complete header
    /// was present.
    pub front_matter: Option<&'a str>,
    /// The template body. Equal to the whole input when no header was found.
    pub body: &'a str,
    /// 1-indexed line at which `body` starts in the original text.
    pub body_begin: usize,
}

/// Split a template document into an optional front-matter region and a body.
///
/// `body_begin` accounts for the two fence lines, every line break inside the
/// front matter, and the break consumed by the closing fence match itself.
/// Both `\n` and `\r\n` breaks are recognized.
pub fn split(text: &str) -> SplitResult<'_> {
    let whole = SplitResult {
        front_matter: None,
        body: text,
        body_begin: 1,
    };

    let Some(open) = OPEN_FENCE.find(text) else {
        return whole;
    };
    let rest = &text[open.end()..];
    let Some(close) = CLOSE_FENCE.find(rest) else {
        // Unterminated header: the opening fence is ordinary content.
        return whole;
    };

    let front_matter = &rest[..close.start()];
    let body = &rest[close.end()..];
    let body_begin = 2 + count_breaks(front_matter) + count_breaks(close.as_str());

    SplitResult {
        front_matter: Some(front_matter),
        body,
        body_begin,
    }
}

fn count_breaks(text: &str) -> usize {
    text.matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_fence_returns_input_unchanged() {
        let text = "hello {{name}}\n--- not a fence\n";
        let result = split(text);
        assert_eq!(result.front_matter, None);
        assert_eq!(result.body, text);
        assert_eq!(result.body_begin, 1);
    }

    #[test]
    fn leading_blank_line_disqualifies_header() {
        let text = "\n---\ntitle: x\n---\nbody";
        assert_eq!(split(text).front_matter, None);
    }

    #[test]
    fn unterminated_header_degrades_to_body() {
        let text = "---\ntitle: x\nno closing fence";
        let result = split(text);
        assert_eq!(result.front_matter, None);
        assert_eq!(result.body, text);
        assert_eq!(result.body_begin, 1);
    }

    #[test]
    fn well_formed_header_splits_exactly() {
        let result = split("---\ntitle: Hello\n---\nbody line\n");
        assert_eq!(result.front_matter, Some("title: Hello\n"));
        assert_eq!(result.body, "body line\n");
        assert_eq!(result.body_begin, 4);
    }

    #[test]
    fn empty_front_matter() {
        let result = split("---\n---\nbody");
        assert_eq!(result.front_matter, Some(""));
        assert_eq!(result.body, "body");
        assert_eq!(result.body_begin, 3);
    }

    #[test]
    fn multi_line_header_counts_every_break() {
        let result = split("---\na: 1\nb: 2\nc: 3\n---\nbody");
        assert_eq!(result.front_matter, Some("a: 1\nb: 2\nc: 3\n"));
        assert_eq!(result.body_begin, 6);
    }

    #[test]
    fn blank_line_before_closing_fence_is_tolerated() {
        let result = split("---\ntitle: x\n\n---\nbody");
        assert_eq!(result.front_matter, Some("title: x\n\n"));
        assert_eq!(result.body_begin, 5);
    }

    #[test]
    fn crlf_breaks_are_recognized() {
        let result = split("---\r\ntitle: x\r\n---\r\nbody");
        assert_eq!(result.front_matter, Some("title: x\r\n"));
        assert_eq!(result.body, "body");
        assert_eq!(result.body_begin, 4);
    }

    #[test]
    fn fence_with_trailing_spaces() {
        let result = split("---  \ntitle: x\n---\t\nbody");
        assert_eq!(result.front_matter, Some("title: x\n"));
        assert_eq!(result.body, "body");
    }

    #[test]
    fn closing_fence_at_end_of_input() {
        let result = split("---\ntitle: x\n---");
        assert_eq!(result.front_matter, Some("title: x\n"));
        assert_eq!(result.body, "");
        assert_eq!(result.body_begin, 3);
    }

    #[test]
    fn dashes_inside_front_matter_lines_are_not_fences() {
        let result = split("---\nitems:\n  - a\n  - b\n---\nbody");
        assert_eq!(result.front_matter, Some("items:\n  - a\n  - b\n"));
        assert_eq!(result.body, "body");
    }
}
