//! Structural scanning over build descriptor text.
//!
//! Neither dialect is parsed into a tree. Instead the mutators locate the
//! regions they care about with the small state machines below, which know
//! just enough about literals and comments to skip braces and tags that
//! live inside them.

use std::ops::Range;

/// The two build descriptor syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `pom.xml`: start/end tag pairs.
    Tag,
    /// `build.gradle`: brace-delimited blocks.
    Brace,
}

/// Byte ranges the mutators must treat as opaque text: string literals and
/// comments, plus element content in the tag dialect. Sorted and
/// non-overlapping.
///
/// Unterminated literals extend to the end of the text.
pub fn literal_spans(text: &str, dialect: Dialect) -> Vec<Range<usize>> {
    match dialect {
        Dialect::Brace => brace_literal_spans(text),
        Dialect::Tag => tag_literal_spans(text),
    }
}

fn brace_literal_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < len {
        let rest = &bytes[i..];
        let end = if rest.starts_with(b"\"\"\"") {
            find_from(bytes, i + 3, b"\"\"\"").map_or(len, |e| e + 3)
        } else if rest.starts_with(b"'''") {
            find_from(bytes, i + 3, b"'''").map_or(len, |e| e + 3)
        } else if rest.starts_with(b"//") {
            find_from(bytes, i + 2, b"\n").unwrap_or(len)
        } else if rest.starts_with(b"/*") {
            find_from(bytes, i + 2, b"*/").map_or(len, |e| e + 2)
        } else if bytes[i] == b'"' || bytes[i] == b'\'' {
            quoted_end(bytes, i)
        } else {
            i += 1;
            continue;
        };
        spans.push(i..end);
        i = end;
    }

    spans
}

/// End (exclusive) of a single-line quoted string starting at `start`.
fn quoted_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Comments, CDATA sections and the character data of elements. Text only
/// counts as element content when it sits between two tags and carries
/// something other than whitespace; indentation between elements does not.
fn tag_literal_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = Vec::new();
    let mut seen_tag = false;
    let mut i = 0;

    while i < len {
        let rest = &bytes[i..];
        if rest.starts_with(b"<!--") {
            let end = find_from(bytes, i + 4, b"-->").map_or(len, |e| e + 3);
            spans.push(i..end);
            i = end;
        } else if rest.starts_with(b"<![CDATA[") {
            let end = find_from(bytes, i + 9, b"]]>").map_or(len, |e| e + 3);
            spans.push(i..end);
            i = end;
        } else if bytes[i] == b'<' {
            seen_tag = true;
            i = find_from(bytes, i + 1, b">").map_or(len, |e| e + 1);
        } else {
            let Some(end) = find_from(bytes, i, b"<") else {
                break;
            };
            if seen_tag && bytes[i..end].iter().any(|b| !b.is_ascii_whitespace()) {
                spans.push(i..end);
            }
            i = end;
        }
    }

    spans
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Walks positions in increasing order and reports where literals end.
struct SpanCursor<'a> {
    spans: &'a [Range<usize>],
    next: usize,
}

impl<'a> SpanCursor<'a> {
    fn new(spans: &'a [Range<usize>]) -> Self {
        Self { spans, next: 0 }
    }

    /// If `pos` falls inside a literal, the position just past it.
    fn skip(&mut self, pos: usize) -> Option<usize> {
        while self.next < self.spans.len() && self.spans[self.next].end <= pos {
            self.next += 1;
        }
        self.spans
            .get(self.next)
            .filter(|s| s.start <= pos)
            .map(|s| s.end)
    }
}

/// Whether `pos` lies inside one of `spans`.
pub fn in_literal(spans: &[Range<usize>], pos: usize) -> bool {
    let idx = spans.partition_point(|s| s.end <= pos);
    spans.get(idx).is_some_and(|s| s.start <= pos)
}

// ── Brace dialect ────────────────────────────────────────────────────────────

/// A top-level `keyword { ... }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BraceBlock {
    /// Offset of the keyword.
    pub start: usize,
    /// Offset of the opening `{`.
    pub open: usize,
    /// Offset of the matching `}`.
    pub close: usize,
}

impl BraceBlock {
    /// Offset just past the closing brace.
    pub fn end(&self) -> usize {
        self.close + 1
    }
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Find the first `keyword {` at nesting depth zero.
///
/// The keyword must stand alone: `dependencies` does not match
/// `dependencyManagement` or `project.dependencies`. Blocks of the same name
/// nested in other blocks (`buildscript { dependencies { } }`) are skipped.
pub fn find_block(text: &str, keyword: &str) -> Option<BraceBlock> {
    let spans = literal_spans(text, Dialect::Brace);
    let bytes = text.as_bytes();
    let key = keyword.as_bytes();
    let mut cursor = SpanCursor::new(&spans);
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = cursor.skip(i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && bytes[i..].starts_with(key) => {
                let boundary_before = i == 0 || !(is_ident(bytes[i - 1]) || bytes[i - 1] == b'.');
                let after = i + key.len();
                let boundary_after = after >= bytes.len() || !is_ident(bytes[after]);
                if boundary_before && boundary_after {
                    let mut j = after;
                    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j] == b'{' {
                        let close = close_with(bytes, &spans, j)?;
                        return Some(BraceBlock {
                            start: i,
                            open: j,
                            close,
                        });
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Offset of the `}` matching the `{` at `open`.
///
/// Counts every brace after the opening one and stops when the counter
/// would go negative. Braces inside literals and comments do not count.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let spans = literal_spans(text, Dialect::Brace);
    close_with(text.as_bytes(), &spans, open)
}

fn close_with(bytes: &[u8], spans: &[Range<usize>], open: usize) -> Option<usize> {
    let mut cursor = SpanCursor::new(spans);
    let mut depth = 0usize;
    let mut i = open + 1;

    while i < bytes.len() {
        if let Some(end) = cursor.skip(i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }

    None
}

// ── Tag dialect ──────────────────────────────────────────────────────────────

/// One `<tag>...</tag>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagElement {
    /// Offset of `<tag`.
    pub open_start: usize,
    /// Offset just past the opening tag's `>`.
    pub open_end: usize,
    /// Offset of `</tag>`.
    pub close_start: usize,
    /// Offset just past `</tag>`.
    pub close_end: usize,
}

impl TagElement {
    pub fn range(&self) -> Range<usize> {
        self.open_start..self.close_end
    }

    pub fn inner<'t>(&self, text: &'t str) -> &'t str {
        &text[self.open_end..self.close_start]
    }
}

/// Every `<tag>` element outside comments and CDATA, in document order.
///
/// Tags are paired by plain boundary search: each opening tag is closed by
/// the next `</tag>`.
pub fn find_elements(text: &str, tag: &str) -> Vec<TagElement> {
    let spans = literal_spans(text, Dialect::Tag);
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(element) = element_from(text, &spans, tag, from) {
        from = element.close_end;
        found.push(element);
    }

    found
}

/// First `<tag>` element outside comments and CDATA.
pub fn find_element(text: &str, tag: &str) -> Option<TagElement> {
    let spans = literal_spans(text, Dialect::Tag);
    element_from(text, &spans, tag, 0)
}

/// First `<tag>` element that does not sit inside any `excluded` element.
pub fn find_element_outside(text: &str, tag: &str, excluded: &[&str]) -> Option<TagElement> {
    let spans = literal_spans(text, Dialect::Tag);
    let fences: Vec<Range<usize>> = excluded
        .iter()
        .flat_map(|t| find_elements(text, t))
        .map(|e| e.range())
        .collect();

    let mut from = 0;
    while let Some(element) = element_from(text, &spans, tag, from) {
        if !fences.iter().any(|f| f.contains(&element.open_start)) {
            return Some(element);
        }
        from = element.open_end;
    }
    None
}

fn element_from(text: &str, spans: &[Range<usize>], tag: &str, from: usize) -> Option<TagElement> {
    let open_start = open_tag_from(text, spans, tag, from)?;
    let open_end = open_start + text[open_start..].find('>')? + 1;
    let closing = format!("</{tag}>");

    let mut search = open_end;
    loop {
        let close_start = search + text.get(search..)?.find(&closing)?;
        if in_literal(spans, close_start) {
            search = close_start + closing.len();
            continue;
        }
        return Some(TagElement {
            open_start,
            open_end,
            close_start,
            close_end: close_start + closing.len(),
        });
    }
}

fn open_tag_from(text: &str, spans: &[Range<usize>], tag: &str, from: usize) -> Option<usize> {
    let opening = format!("<{tag}");
    let mut search = from;

    loop {
        let pos = search + text.get(search..)?.find(&opening)?;
        let next = text.as_bytes().get(pos + opening.len()).copied();
        let whole_name = matches!(next, Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r'));
        if whole_name && !in_literal(spans, pos) {
            return Some(pos);
        }
        search = pos + opening.len();
    }
}

// ── Insertion helpers ────────────────────────────────────────────────────────

/// Offset of the start of the line containing `pos`.
pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// Leading whitespace of the line containing `pos`.
pub fn indentation_at(text: &str, pos: usize) -> &str {
    let start = line_start(text, pos);
    let line = &text[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Insert `block` (complete lines, newline-terminated) before whatever
/// starts at `pos`.
///
/// When `pos` is the first non-blank character of its line the block goes
/// on its own lines above it. Otherwise the line is broken at `pos`.
pub fn insert_lines_before(text: &str, pos: usize, block: &str) -> String {
    let start = line_start(text, pos);
    let mut out = String::with_capacity(text.len() + block.len() + 1);

    if text[start..pos].trim().is_empty() {
        out.push_str(&text[..start]);
        out.push_str(block);
        out.push_str(&text[start..]);
    } else {
        out.push_str(&text[..pos]);
        out.push('\n');
        out.push_str(block);
        out.push_str(&text[pos..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Literal detection
    // ========================================================================

    #[test]
    fn brace_spans_cover_every_literal_form() {
        let text = "a \"x{\" b 'y}' c \"\"\"{\n}\"\"\" d // {\ne /* } */ f";
        let spans = literal_spans(text, Dialect::Brace);
        let covered: Vec<&str> = spans.iter().map(|s| &text[s.clone()]).collect();
        assert_eq!(
            covered,
            vec!["\"x{\"", "'y}'", "\"\"\"{\n}\"\"\"", "// {", "/* } */"]
        );
    }

    #[test]
    fn escaped_quotes_stay_inside_the_literal() {
        let text = r#"x = "a\"}" }"#;
        let spans = literal_spans(text, Dialect::Brace);
        assert_eq!(&text[spans[0].clone()], r#""a\"}""#);
    }

    #[test]
    fn tag_spans_cover_element_text_but_not_indentation() {
        let text = "<project>\n    <name>Orders  &amp;  Billing</name>\n    <x/>\n</project>";
        let spans = literal_spans(text, Dialect::Tag);
        let covered: Vec<&str> = spans.iter().map(|s| &text[s.clone()]).collect();
        assert_eq!(covered, vec!["Orders  &amp;  Billing"]);
    }

    #[test]
    fn text_outside_any_element_is_not_content() {
        assert!(literal_spans("plain   words", Dialect::Tag).is_empty());
        assert!(literal_spans("<a/>trailing  words", Dialect::Tag).is_empty());
    }

    #[test]
    fn tag_spans_cover_comments_and_cdata() {
        let text = "<a><!-- <b> --><![CDATA[</a>]]></a>";
        let spans = literal_spans(text, Dialect::Tag);
        assert_eq!(spans.len(), 2);
        assert!(in_literal(&spans, text.find("<b>").unwrap()));
        assert!(!in_literal(&spans, 0));
    }

    // ========================================================================
    // Brace blocks
    // ========================================================================

    #[test]
    fn nested_blocks_close_at_the_true_brace() {
        let text = "dependencies {\n  implementation('x') {\n    exclude group: 'y'\n  }\n}\ntail";
        let block = find_block(text, "dependencies").unwrap();
        assert_eq!(block.start, 0);
        assert_eq!(&text[block.end()..], "\ntail");
    }

    #[test]
    fn naive_first_close_would_be_wrong() {
        let text = "dependencies { a { } b }";
        let block = find_block(text, "dependencies").unwrap();
        assert_ne!(block.close, text.find('}').unwrap());
        assert_eq!(block.close, text.len() - 1);
    }

    #[test]
    fn braces_in_strings_and_comments_are_ignored() {
        let text = "dependencies {\n  // }\n  implementation \"a:b:{1}\"\n  /* { */\n}\n";
        let block = find_block(text, "dependencies").unwrap();
        assert_eq!(block.close, text.rfind('}').unwrap());
    }

    #[test]
    fn keyword_must_stand_alone_at_top_level() {
        let text = "buildscript { dependencies { } }\ndependencyManagement { }\ndependencies {\n}\n";
        let block = find_block(text, "dependencies").unwrap();
        assert_eq!(block.start, text.rfind("dependencies").unwrap());
        assert!(find_block("project.dependencies { }", "dependencies").is_none());
    }

    #[test]
    fn keyword_in_comment_is_not_a_block() {
        let text = "// plugins {\nrepositories { }\n";
        assert!(find_block(text, "plugins").is_none());
    }

    #[test]
    fn unbalanced_block_has_no_close() {
        assert!(find_block("dependencies {\n  a {\n}", "dependencies").is_none());
        assert_eq!(matching_close("{ { }", 0), None);
    }

    // ========================================================================
    // Tag elements
    // ========================================================================

    #[test]
    fn element_requires_whole_tag_name() {
        let text = "<dependencyManagement><dependencies></dependencies></dependencyManagement>";
        let el = find_element(text, "dependencies").unwrap();
        assert_eq!(el.open_start, "<dependencyManagement>".len());
        assert!(find_element(text, "dependency").is_none());
    }

    #[test]
    fn element_outside_skips_fenced_regions() {
        let text = "<project>\n<dependencyManagement><dependencies>A</dependencies></dependencyManagement>\n<dependencies>B</dependencies>\n</project>";
        let el = find_element_outside(text, "dependencies", &["dependencyManagement"]).unwrap();
        assert_eq!(el.inner(text), "B");
    }

    #[test]
    fn commented_tags_are_not_elements() {
        let text = "<!-- <build></build> --><x/>";
        assert!(find_element(text, "build").is_none());
    }

    #[test]
    fn attributes_on_opening_tag_are_allowed() {
        let text = "<project xmlns=\"x\">\n</project>";
        let el = find_element(text, "project").unwrap();
        assert_eq!(el.inner(text), "\n");
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    #[test]
    fn insert_on_own_line_when_anchor_starts_line() {
        let text = "a\n    </x>\n";
        let pos = text.find("</x>").unwrap();
        assert_eq!(insert_lines_before(text, pos, "    b\n"), "a\n    b\n    </x>\n");
        assert_eq!(indentation_at(text, pos), "    ");
    }

    #[test]
    fn insert_breaks_line_when_anchor_is_mid_line() {
        let text = "<x></x>";
        let pos = text.find("</x>").unwrap();
        assert_eq!(insert_lines_before(text, pos, "b\n"), "<x>\nb\n</x>");
    }
}
