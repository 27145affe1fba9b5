//! Line-oriented comment stripping.
//!
//! `CommentFilter` is a small state machine fed one raw line at a time. It is
//! deliberately approximate: string literals are only considered when deciding
//! whether a trailing line-comment marker is real (even quote counts before
//! it), never when detecting block comments. Reference counts built on top of
//! it are advisory.

use std::borrow::Cow;

use super::language::CommentStyle;

/// State carried between lines of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Normal,
    /// Inside a block comment that closes at `end`.
    InsideBlockComment { end: &'static str },
}

/// Streaming comment stripper for a single file.
#[derive(Debug, Clone)]
pub struct CommentFilter {
    style: CommentStyle,
    state: FilterState,
}

impl CommentFilter {
    pub fn new(style: CommentStyle) -> Self {
        Self {
            style,
            state: FilterState::Normal,
        }
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Process the next raw line, returning the code left after comments are
    /// removed. The result is empty when the whole line is commented out.
    pub fn process<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        if let FilterState::InsideBlockComment { end } = self.state {
            // Text after the closing marker is dropped along with the comment.
            if line.contains(end) {
                self.state = FilterState::Normal;
            }
            return Cow::Borrowed("");
        }

        let trimmed = line.trim_start();
        for &(start, end) in self.style.block_markers() {
            let Some(after_start) = trimmed.strip_prefix(start) else {
                continue;
            };
            // Only whitespace precedes the start marker here.
            return match after_start.find(end) {
                Some(pos) => Cow::Borrowed(after_start[pos + end.len()..].trim()),
                None => {
                    self.state = FilterState::InsideBlockComment { end };
                    Cow::Borrowed("")
                }
            };
        }

        Cow::Borrowed(strip_line_comment(line, self.style.line_marker()))
    }

    /// Iterate over `source` line by line, filtering as it goes.
    pub fn lines(style: CommentStyle, source: &str) -> FilteredLines<'_> {
        FilteredLines {
            filter: CommentFilter::new(style),
            inner: source.lines().enumerate(),
        }
    }
}

/// Truncate `line` at the first line-comment marker preceded by balanced
/// single and double quotes. Lines without such a marker come back unchanged.
pub fn strip_line_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    let mut search_from = 0;
    while let Some(rel) = line[search_from..].find(marker) {
        let idx = search_from + rel;
        let before = &line[..idx];
        if before.matches('\'').count() % 2 == 0 && before.matches('"').count() % 2 == 0 {
            return before.trim_end();
        }
        search_from = idx + marker.len();
    }
    line
}

/// One line of a file after comment filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// The line exactly as read.
    pub raw: &'a str,
    /// The line with comments removed; empty if nothing is left.
    pub code: Cow<'a, str>,
}

/// Iterator returned by [`CommentFilter::lines`].
pub struct FilteredLines<'a> {
    filter: CommentFilter,
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Iterator for FilteredLines<'a> {
    type Item = FilteredLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, raw) = self.inner.next()?;
        let code = self.filter.process(raw);
        Some(FilteredLine {
            number: idx + 1,
            raw,
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(style: CommentStyle, source: &str) -> Vec<String> {
        CommentFilter::lines(style, source)
            .map(|l| l.code.into_owned())
            .collect()
    }

    #[test]
    fn test_plain_line_passes_through() {
        let mut f = CommentFilter::new(CommentStyle::Slash);
        assert_eq!(f.process("  fetch('/users');"), "  fetch('/users');");
        assert_eq!(f.state(), FilterState::Normal);
    }

    #[test]
    fn test_full_line_comment_is_emptied() {
        let mut f = CommentFilter::new(CommentStyle::Slash);
        assert_eq!(f.process("// GET /v1/users"), "");
        assert_eq!(f.process("    // indented"), "");
    }

    #[test]
    fn test_trailing_comment_is_stripped() {
        let mut f = CommentFilter::new(CommentStyle::Slash);
        assert_eq!(f.process("code(); // GET /v1/users"), "code();");
    }

    #[test]
    fn test_marker_inside_string_is_kept() {
        let mut f = CommentFilter::new(CommentStyle::Slash);
        assert_eq!(
            f.process(r#"get("http://api.test/users"); // note"#),
            r#"get("http://api.test/users");"#
        );
        assert_eq!(f.process("x = 'a//b'"), "x = 'a//b'");
    }

    #[test]
    fn test_hash_comments() {
        let mut f = CommentFilter::new(CommentStyle::Hash);
        assert_eq!(f.process("# call /orders/123"), "");
        assert_eq!(f.process("requests.get('/a')  # trailing"), "requests.get('/a')");
        assert_eq!(f.process("url = '/items#frag'"), "url = '/items#frag'");
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        let src = "/*\n * GET /v1/users\n */\nreal();";
        assert_eq!(run(CommentStyle::Slash, src), vec!["", "", "", "real();"]);
    }

    #[test]
    fn test_block_end_line_drops_trailing_text() {
        let src = "/* start\nend */ after('/x');\nnext();";
        assert_eq!(run(CommentStyle::Slash, src), vec!["", "", "next();"]);
    }

    #[test]
    fn test_single_line_block_keeps_text_after() {
        let mut f = CommentFilter::new(CommentStyle::Slash);
        assert_eq!(f.process("  /* note */ call('/a');"), "call('/a');");
        assert_eq!(f.state(), FilterState::Normal);
    }

    #[test]
    fn test_block_marker_mid_line_is_not_a_block() {
        // Only a line that starts with the marker opens a block.
        let mut f = CommentFilter::new(CommentStyle::Slash);
        assert_eq!(f.process("app.get('/files/*', h);"), "app.get('/files/*', h);");
        assert_eq!(f.state(), FilterState::Normal);
    }

    #[test]
    fn test_triple_quote_blocks() {
        let src = "\"\"\"\nGET /users\n\"\"\"\n'''one line''' x = 1\ncall()";
        assert_eq!(
            run(CommentStyle::Hash, src),
            vec!["", "", "", "x = 1", "call()"]
        );
    }

    #[test]
    fn test_triple_quote_end_must_match_start() {
        let mut f = CommentFilter::new(CommentStyle::Hash);
        assert_eq!(f.process("'''"), "");
        assert_eq!(f.process("\"\"\" still inside"), "");
        assert_eq!(
            f.state(),
            FilterState::InsideBlockComment { end: "'''" }
        );
        assert_eq!(f.process("'''"), "");
        assert_eq!(f.state(), FilterState::Normal);
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let lines: Vec<_> = CommentFilter::lines(CommentStyle::Slash, "a\nb\r\nc").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].raw, "b");
        assert_eq!(lines[2].number, 3);
    }
}
