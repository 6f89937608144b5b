//! # Markup Serializer
//!
//! Converts tagged characters back into markup. On parser output this is a
//! right inverse of [`crate::parser::Parser::parse`]: parsing the serialized
//! text yields the same tagged characters again.
//!
//! The serializer tracks the string of currently open format codes. Each
//! character closes the open codes that are not a prefix of its own tags and
//! opens the ones it is missing, so nested commands come out properly nested.

use crate::tables::{FormatTag, ListKind, MarkupTables};
use crate::tagged::{TaggedChar, HEADING_MARKER};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A bold line directly before a list becomes that list's caption
static CAPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\\textbf\{(.+)\}( *)\n\\begin\{(enum|itemz)\}$")
        .expect("caption pattern is valid")
});

/// Tagged-character to markup serializer over a set of markup tables
pub struct Serializer<'t> {
    tables: &'t MarkupTables,
}

impl<'t> Serializer<'t> {
    pub fn new(tables: &'t MarkupTables) -> Self {
        Self { tables }
    }

    pub fn serialize(&self, chars: &[TaggedChar]) -> String {
        let mut state = SerializeState {
            tables: self.tables,
            out: String::new(),
            open: String::new(),
            lists: Vec::new(),
            heading_open: false,
            after_item: false,
            prev: None,
        };
        for c in chars {
            state.write_char(c);
        }
        state.finish();

        let markup = normalize(&state.out);
        debug!(chars = chars.len(), markup_len = markup.len(), "Serialized markup");
        markup
    }
}

impl Default for Serializer<'static> {
    fn default() -> Self {
        Self::new(MarkupTables::standard())
    }
}

/// Serialize with the standard tables
pub fn serialize(chars: &[TaggedChar]) -> String {
    Serializer::default().serialize(chars)
}

fn normalize(markup: &str) -> String {
    CAPTION
        .replace_all(markup, "\\begin{${3}}[${1}]${2}")
        .replace("...", "\\ldots{}")
}

struct SerializeState<'t> {
    tables: &'t MarkupTables,
    out: String,
    open: String,
    lists: Vec<ListKind>,
    heading_open: bool,
    /// The last thing written was a list item marker
    after_item: bool,
    prev: Option<char>,
}

impl SerializeState<'_> {
    fn write_char(&mut self, c: &TaggedChar) {
        if let Some(spaces) = c.soft_break_spaces() {
            // Only the formats in front of the break code stay open across it
            let scope = match c.tags.find(FormatTag::Newline.code()) {
                Some(at) => &c.tags[..at],
                None => c.tags.as_str(),
            };
            self.close_to(scope);
            self.open_to(scope);
            self.out.push('\n');
            self.out.extend(std::iter::repeat(' ').take(spaces as usize));
            self.after_item = false;
            self.prev = Some(c.glyph);
            return;
        }

        self.close_to(&c.tags);

        if let Some(level) = c.leading_level().filter(|level| *level >= 1) {
            if self.enter_structure(c.glyph, level) {
                self.after_item = c.glyph != HEADING_MARKER;
                self.prev = Some(c.glyph);
                return;
            }
        }
        self.after_item = false;

        if self.prev == Some('\n') {
            self.close_lists();
        }

        self.open_to(&c.tags);

        if c.glyph == '\n' && self.heading_open {
            self.out.push('}');
            self.heading_open = false;
        }

        let glyph = self.smarten(c.glyph);
        match self.tables.markup_for(glyph) {
            Some(markup) => {
                self.out.push_str(markup);
                if self.open.contains(FormatTag::EmptyArg.code()) {
                    self.out.push_str("{}");
                }
            }
            None => self.out.push(glyph),
        }
        self.prev = Some(c.glyph);
    }

    /// Close open codes until they are a prefix of `tags`
    fn close_to(&mut self, tags: &str) {
        while self.open.len() > tags.len() || !tags.starts_with(self.open.as_str()) {
            self.close_innermost();
        }
    }

    /// Open the codes of `tags` past the currently open prefix
    fn open_to(&mut self, tags: &str) {
        let missing: Vec<char> = tags[self.open.len()..].chars().collect();
        for code in missing {
            self.open.push(code);
            if let Some(command) = FormatTag::from_code(code).and_then(FormatTag::command) {
                self.out.push('\\');
                self.out.push_str(command);
                self.out.push('{');
            }
        }
    }

    fn close_innermost(&mut self) {
        if let Some(code) = self.open.pop() {
            if FormatTag::from_code(code).and_then(FormatTag::command).is_some() {
                self.out.push('}');
            }
        }
    }

    /// Emit a heading or list marker; false when the glyph is not a marker
    fn enter_structure(&mut self, glyph: char, level: u32) -> bool {
        if glyph == HEADING_MARKER {
            let Some(command) = self.tables.heading_command(level) else {
                return false;
            };
            // A heading right after `\item` belongs to that item
            if !self.after_item {
                self.close_lists();
            }
            self.close_heading();
            self.out.push('\\');
            self.out.push_str(command);
            self.out.push('{');
            self.heading_open = true;
            return true;
        }

        let Some(kind) = ListKind::from_marker(glyph) else {
            return false;
        };
        let level = level as usize;
        while self.lists.len() > level
            || (self.lists.len() == level && self.lists.last() != Some(&kind))
        {
            self.end_list();
        }
        while self.lists.len() < level {
            self.start_line();
            self.out.push_str("\\begin{");
            self.out.push_str(kind.environment());
            self.out.push_str("}\n");
            self.lists.push(kind);
        }
        if kind != ListKind::Indent {
            self.start_line();
            self.out.push_str("\\item ");
        }
        true
    }

    fn start_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn end_list(&mut self) {
        if let Some(kind) = self.lists.pop() {
            self.start_line();
            self.out.push_str("\\end{");
            self.out.push_str(kind.environment());
            self.out.push_str("}\n");
        }
    }

    fn close_lists(&mut self) {
        while !self.lists.is_empty() {
            self.end_list();
        }
    }

    fn close_heading(&mut self) {
        if self.heading_open {
            self.out.push('}');
            self.heading_open = false;
        }
    }

    /// Straight quotes become curly ones depending on the previous glyph
    fn smarten(&self, glyph: char) -> char {
        let opening = matches!(self.prev, None | Some(' ') | Some('\n'));
        match (glyph, opening) {
            ('"', true) => '“',
            ('"', false) => '”',
            ('\'', true) => '‘',
            ('\'', false) => '’',
            _ => glyph,
        }
    }

    fn finish(&mut self) {
        while !self.open.is_empty() {
            self.close_innermost();
        }
        self.close_heading();
        self.close_lists();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(glyph: char, tags: &str) -> TaggedChar {
        TaggedChar::new(glyph, tags)
    }

    #[test]
    fn test_bold() {
        assert_eq!(serialize(&[tc('H', "b"), tc('i', "b")]), "\\textbf{Hi}");
    }

    #[test]
    fn test_nesting_closes_innermost_first() {
        let chars = [tc('a', "b"), tc('b', "bi"), tc('c', "")];
        assert_eq!(serialize(&chars), "\\textbf{a\\emph{b}}c");
    }

    #[test]
    fn test_list() {
        let chars = [
            TaggedChar::marker('*', 1),
            tc('a', ""),
            tc('\n', ""),
            TaggedChar::marker('*', 1),
            tc('b', ""),
            tc('\n', ""),
            tc('x', ""),
        ];
        assert_eq!(
            serialize(&chars),
            "\\begin{itemz}\n\\item a\n\\item b\n\\end{itemz}\nx"
        );
    }

    #[test]
    fn test_list_closed_at_end_of_document() {
        let chars = [TaggedChar::marker('#', 1), tc('a', "")];
        assert_eq!(serialize(&chars), "\\begin{enum}\n\\item a\n\\end{enum}\n");
    }

    #[test]
    fn test_nested_lists_end_on_separate_lines() {
        let chars = [
            TaggedChar::marker('#', 1),
            tc('a', ""),
            tc('\n', ""),
            TaggedChar::marker('*', 2),
            tc('b', ""),
        ];
        assert_eq!(
            serialize(&chars),
            "\\begin{enum}\n\\item a\n\\begin{itemz}\n\\item b\n\\end{itemz}\n\\end{enum}\n"
        );
    }

    #[test]
    fn test_quotation_has_no_items() {
        let chars = [
            TaggedChar::marker('_', 1),
            tc('a', ""),
            tc('\n', ""),
            TaggedChar::marker('_', 1),
            tc('b', ""),
            tc('\n', ""),
        ];
        assert_eq!(
            serialize(&chars),
            "\\begin{quotation}\na\nb\n\\end{quotation}\n"
        );
    }

    #[test]
    fn test_heading_closes_at_newline() {
        let chars = [
            TaggedChar::marker('h', 2),
            tc('T', ""),
            tc('\n', ""),
            tc('x', ""),
        ];
        assert_eq!(serialize(&chars), "\\section*{T}\nx");
        assert_eq!(
            serialize(&[TaggedChar::marker('h', 5), tc('P', "")]),
            "\\paragraph{P}"
        );
    }

    #[test]
    fn test_soft_break_keeps_formats_open() {
        let chars = [
            TaggedChar::marker('*', 1),
            tc('a', "b"),
            TaggedChar::new(' ', "bn2"),
            tc('b', "b"),
        ];
        assert_eq!(
            serialize(&chars),
            "\\begin{itemz}\n\\item \\textbf{a\n  b}\n\\end{itemz}\n"
        );
    }

    #[test]
    fn test_soft_break_between_formatted_runs() {
        let chars = [
            TaggedChar::marker('*', 1),
            tc('a', "b"),
            TaggedChar::new(' ', "n2"),
            tc('b', "b"),
        ];
        assert_eq!(
            serialize(&chars),
            "\\begin{itemz}\n\\item \\textbf{a}\n  \\textbf{b}\n\\end{itemz}\n"
        );
    }

    #[test]
    fn test_heading_inside_list_item() {
        let chars = [
            TaggedChar::marker('*', 1),
            TaggedChar::marker('h', 2),
            tc('T', ""),
            tc('\n', ""),
        ];
        assert_eq!(
            serialize(&chars),
            "\\begin{itemz}\n\\item \\section*{T}\n\\end{itemz}\n"
        );
    }

    #[test]
    fn test_reverse_map_and_empty_arg() {
        assert_eq!(serialize(&[tc('é', "")]), "\\'{e}");
        assert_eq!(serialize(&[tc('_', "{")]), "\\_{}");
        assert_eq!(serialize(&[tc('_', "")]), "\\_");
        assert_eq!(serialize(&[tc('—', "")]), "---");
    }

    #[test]
    fn test_smart_quotes() {
        let chars: Vec<TaggedChar> = "say \"hi\"".chars().map(TaggedChar::plain).collect();
        assert_eq!(serialize(&chars), "say ``hi''");
    }

    #[test]
    fn test_normalization() {
        let chars: Vec<TaggedChar> = "wait...".chars().map(TaggedChar::plain).collect();
        assert_eq!(serialize(&chars), "wait\\ldots{}");

        let mut chars: Vec<TaggedChar> = "Steps".chars().map(|c| tc(c, "b")).collect();
        chars.push(tc('\n', ""));
        chars.push(TaggedChar::marker('#', 1));
        chars.push(tc('a', ""));
        assert_eq!(
            serialize(&chars),
            "\\begin{enum}[Steps]\n\\item a\n\\end{enum}\n"
        );
    }

    #[test]
    fn test_unknown_marker_is_verbatim() {
        assert_eq!(serialize(&[TaggedChar::marker('h', 9)]), "h");
    }
}
