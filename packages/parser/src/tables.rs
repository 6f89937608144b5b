//! # Markup Tables
//!
//! Fixed mappings between tag codes, markup commands and pad attributes.
//!
//! Format tags and list kinds are closed sets and live on their enums. The
//! command/character tables (headings, symbols, accents, ligatures and the
//! reverse character map) are gathered in [`MarkupTables`], built once and
//! handed to the parser and serializer by reference.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

static STANDARD: Lazy<MarkupTables> = Lazy::new(MarkupTables::default);

const ACCENTABLE_LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Inline formatting carried as a single-letter tag code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatTag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Soft line break inside a list; the code is followed by a base-36
    /// digit holding the number of spaces after the break.
    Newline,
    /// Command written with an explicit empty argument, e.g. `\_{}`
    EmptyArg,
}

impl FormatTag {
    pub const ALL: [FormatTag; 6] = [
        FormatTag::Bold,
        FormatTag::Italic,
        FormatTag::Underline,
        FormatTag::Strikethrough,
        FormatTag::Newline,
        FormatTag::EmptyArg,
    ];

    pub fn code(self) -> char {
        match self {
            FormatTag::Bold => 'b',
            FormatTag::Italic => 'i',
            FormatTag::Underline => 'u',
            FormatTag::Strikethrough => 's',
            FormatTag::Newline => 'n',
            FormatTag::EmptyArg => '{',
        }
    }

    /// Markup command wrapping text with this format, if it has one
    pub fn command(self) -> Option<&'static str> {
        match self {
            FormatTag::Bold => Some("textbf"),
            FormatTag::Italic => Some("emph"),
            FormatTag::Underline => Some("underline"),
            FormatTag::Strikethrough => Some("sout"),
            FormatTag::Newline | FormatTag::EmptyArg => None,
        }
    }

    /// Pad attribute key for this format
    pub fn attribute(self) -> &'static str {
        match self {
            FormatTag::Bold => "bold",
            FormatTag::Italic => "italic",
            FormatTag::Underline => "underline",
            FormatTag::Strikethrough => "strikethrough",
            FormatTag::Newline => "newline",
            FormatTag::EmptyArg => "emptyarg",
        }
    }

    pub fn has_argument(self) -> bool {
        matches!(self, FormatTag::Newline)
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.code() == code)
    }

    pub fn from_command(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.command() == Some(name))
    }

    pub fn from_attribute(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.attribute() == key)
    }
}

/// List environments and their line markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Number,
    Bullet,
    Indent,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::Number, ListKind::Bullet, ListKind::Indent];

    /// Glyph of the tagged character marking a list line
    pub fn marker(self) -> char {
        match self {
            ListKind::Number => '#',
            ListKind::Bullet => '*',
            ListKind::Indent => '_',
        }
    }

    /// List type as it appears in the pad's `list` attribute value
    pub fn attribute_name(self) -> &'static str {
        match self {
            ListKind::Number => "number",
            ListKind::Bullet => "bullet",
            ListKind::Indent => "indent",
        }
    }

    pub fn environment(self) -> &'static str {
        match self {
            ListKind::Number => "enum",
            ListKind::Bullet => "itemz",
            ListKind::Indent => "quotation",
        }
    }

    pub fn from_marker(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.marker() == glyph)
    }

    pub fn from_environment(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.environment() == name)
    }

    /// Split a `list` attribute value such as `bullet2` into kind and level
    pub fn from_attribute_value(value: &str) -> Option<(Self, u32)> {
        Self::ALL.into_iter().find_map(|kind| {
            let level = value.strip_prefix(kind.attribute_name())?;
            level.parse().ok().map(|level| (kind, level))
        })
    }

    /// Value written to the pad's `list` attribute
    pub fn attribute_value(self, level: u32) -> String {
        format!("{}{}", self.attribute_name(), level)
    }
}

/// Command and character tables shared by the parser and serializer
#[derive(Debug, Clone)]
pub struct MarkupTables {
    headings: Vec<(&'static str, u32)>,
    symbols: Vec<(&'static str, char)>,
    accents: Vec<(&'static str, char)>,
    ligatures: Vec<(&'static str, char)>,
    reverse: HashMap<char, String>,
}

impl MarkupTables {
    /// Process-wide default tables
    pub fn standard() -> &'static MarkupTables {
        &STANDARD
    }

    pub fn heading_level(&self, command: &str) -> Option<u32> {
        self.headings
            .iter()
            .find(|(name, _)| *name == command)
            .map(|(_, level)| *level)
    }

    pub fn heading_command(&self, level: u32) -> Option<&'static str> {
        self.headings
            .iter()
            .find(|(_, l)| *l == level)
            .map(|(name, _)| *name)
    }

    /// Character produced by a symbol command (`ldots`, `ae`, `_`)
    pub fn symbol(&self, command: &str) -> Option<char> {
        lookup(&self.symbols, command)
    }

    /// Combining mark applied by an accent command
    pub fn accent(&self, command: &str) -> Option<char> {
        lookup(&self.accents, command)
    }

    pub fn ligature(&self, text: &str) -> Option<char> {
        lookup(&self.ligatures, text)
    }

    /// Whether `\name{` opens a scope the parser tracks
    pub fn is_scoped_command(&self, name: &str) -> bool {
        FormatTag::from_command(name).is_some()
            || self.heading_level(name).is_some()
            || self.symbol(name).is_some()
            || self.accent(name).is_some()
    }

    /// Markup spelling of a character that cannot be written verbatim
    pub fn markup_for(&self, glyph: char) -> Option<&str> {
        self.reverse.get(&glyph).map(String::as_str)
    }
}

impl Default for MarkupTables {
    fn default() -> Self {
        let headings = vec![
            ("section*", 2),
            ("subsection*", 3),
            ("subsubsection*", 4),
            ("paragraph", 5),
        ];
        let symbols = vec![("ldots", '…'), ("ae", 'æ'), ("_", '_')];
        let accents = vec![
            ("`", '\u{0300}'),
            ("'", '\u{0301}'),
            ("^", '\u{0302}'),
            ("~", '\u{0303}'),
            ("=", '\u{0304}'),
            ("\"", '\u{0308}'),
            ("v", '\u{030C}'),
            ("c", '\u{0327}'),
        ];
        let ligatures = vec![
            ("``", '“'),
            ("''", '”'),
            ("`", '‘'),
            ("'", '’'),
            ("---", '—'),
            ("--", '–'),
        ];

        let mut reverse = HashMap::new();
        for (command, glyph) in &symbols {
            let markup = if is_symbol_name(command) {
                format!("\\{}", command)
            } else {
                format!("\\{}{{}}", command)
            };
            reverse.insert(*glyph, markup);
        }
        for (command, mark) in &accents {
            for letter in ACCENTABLE_LETTERS.chars() {
                if let Some(composed) = compose(letter, *mark) {
                    reverse.insert(composed, format!("\\{}{{{}}}", command, letter));
                }
            }
        }
        for (text, glyph) in &ligatures {
            reverse.insert(*glyph, text.to_string());
        }

        Self {
            headings,
            symbols,
            accents,
            ligatures,
            reverse,
        }
    }
}

/// True for single-character command names that are not letters, e.g. `_`
pub fn is_symbol_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(c), None) if !c.is_ascii_alphabetic() && c != '*'
    )
}

/// NFC-compose a base character with a combining mark, if the result is a
/// single character
pub fn compose(base: char, mark: char) -> Option<char> {
    let composed: String = [base, mark].iter().collect::<String>().nfc().collect();
    let mut chars = composed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn lookup(table: &[(&'static str, char)], key: &str) -> Option<char> {
    table.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag_bijection() {
        for tag in FormatTag::ALL {
            assert_eq!(FormatTag::from_code(tag.code()), Some(tag));
            assert_eq!(FormatTag::from_attribute(tag.attribute()), Some(tag));
            if let Some(command) = tag.command() {
                assert_eq!(FormatTag::from_command(command), Some(tag));
            }
        }
        assert_eq!(FormatTag::from_command("textit"), None);
    }

    #[test]
    fn test_list_attribute_value() {
        assert_eq!(
            ListKind::from_attribute_value("bullet2"),
            Some((ListKind::Bullet, 2))
        );
        assert_eq!(
            ListKind::from_attribute_value("number1"),
            Some((ListKind::Number, 1))
        );
        assert_eq!(ListKind::from_attribute_value("checkbox1"), None);
        assert_eq!(ListKind::Indent.attribute_value(3), "indent3");
    }

    #[test]
    fn test_reverse_map() {
        let tables = MarkupTables::standard();
        assert_eq!(tables.markup_for('é'), Some("\\'{e}"));
        assert_eq!(tables.markup_for('Ç'), Some("\\c{C}"));
        assert_eq!(tables.markup_for('…'), Some("\\ldots{}"));
        assert_eq!(tables.markup_for('_'), Some("\\_"));
        assert_eq!(tables.markup_for('—'), Some("---"));
        assert_eq!(tables.markup_for('x'), None);
    }

    #[test]
    fn test_headings() {
        let tables = MarkupTables::standard();
        assert_eq!(tables.heading_level("subsection*"), Some(3));
        assert_eq!(tables.heading_command(5), Some("paragraph"));
        assert_eq!(tables.heading_command(1), None);
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose('o', '\u{0308}'), Some('ö'));
        assert_eq!(compose('q', '\u{0301}'), None);
    }
}
