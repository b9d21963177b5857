//! Whitespace normalization for patched build descriptors.
//!
//! Lossy on purpose: interior runs of blanks collapse to one space and at
//! most one empty line survives between content lines. Literal and comment
//! regions are copied verbatim, and leading indentation is kept as written.

use super::scanner::{Dialect, literal_spans};

pub fn normalize(text: &str, dialect: Dialect) -> String {
    let spans = literal_spans(text, dialect);
    let mut out = String::with_capacity(text.len());
    let mut state = LineState::default();
    let mut pos = 0;

    for span in &spans {
        state.push_code(&text[pos..span.start], &mut out);
        state.push_verbatim(&text[span.clone()], &mut out);
        pos = span.end;
    }
    state.push_code(&text[pos..], &mut out);

    let trimmed = out.trim_end_matches(['\n', ' ', '\t']).len();
    out.truncate(trimmed);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[derive(Default)]
struct LineState {
    /// Non-blank content already emitted on the current line.
    mid_line: bool,
    indent: String,
    pending_blank: bool,
    newlines: usize,
}

impl LineState {
    fn push_code(&mut self, code: &str, out: &mut String) {
        let mut chars = code.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    self.indent.clear();
                    self.pending_blank = false;
                    self.mid_line = false;
                    self.newlines += 1;
                    if !out.is_empty() && self.newlines <= 2 {
                        out.push('\n');
                    }
                }
                ' ' | '\t' | '\r' => {
                    if self.mid_line {
                        self.pending_blank = true;
                    } else {
                        self.indent.push(c);
                    }
                }
                _ => {
                    self.flush(out);
                    out.push(c);
                }
            }
        }
    }

    fn push_verbatim(&mut self, literal: &str, out: &mut String) {
        self.flush(out);
        out.push_str(literal);
    }

    fn flush(&mut self, out: &mut String) {
        if self.mid_line {
            if self.pending_blank {
                out.push(' ');
            }
        } else {
            out.push_str(&self.indent);
            self.indent.clear();
        }
        self.pending_blank = false;
        self.mid_line = true;
        self.newlines = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_interior_runs_but_keeps_indentation() {
        let text = "plugins {\n    id    'java'   \n}\n";
        assert_eq!(normalize(text, Dialect::Brace), "plugins {\n    id 'java'\n}\n");
    }

    #[test]
    fn keeps_at_most_one_blank_line() {
        let text = "a\n\n\n\n   \nb\n";
        assert_eq!(normalize(text, Dialect::Brace), "a\n\nb\n");
    }

    #[test]
    fn literals_are_untouched() {
        let text = "x = \"a    b\"  // keep   this\ny = '''\n\n\n\n'''\n";
        assert_eq!(
            normalize(text, Dialect::Brace),
            "x = \"a    b\" // keep   this\ny = '''\n\n\n\n'''\n"
        );
    }

    #[test]
    fn xml_comments_and_cdata_are_untouched() {
        let text = "<a>  <!--  x  -->\n<![CDATA[  y  ]]></a>";
        assert_eq!(
            normalize(text, Dialect::Tag),
            "<a> <!--  x  -->\n<![CDATA[  y  ]]></a>\n"
        );
    }

    #[test]
    fn element_text_is_untouched() {
        let text = "<project>\n    <description>Orders  &amp;  &lt;Billing&gt;   API</description>\n</project>\n";
        assert_eq!(normalize(text, Dialect::Tag), text);
    }

    #[test]
    fn drops_leading_blank_lines_and_ends_with_one_newline() {
        assert_eq!(normalize("\n\n  a\n\n\n", Dialect::Tag), "  a\n");
        assert_eq!(normalize("", Dialect::Tag), "");
    }

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(normalize("a\r\nb\r\n", Dialect::Brace), "a\nb\n");
    }

    #[test]
    fn normalization_is_idempotent() {
        let text = "  a   b \n\n\n\t c  'x  y'\n/* z\n\n\n */  d   \n";
        let once = normalize(text, Dialect::Brace);
        assert_eq!(normalize(&once, Dialect::Brace), once);
    }
}
