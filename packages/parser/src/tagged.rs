//! # Tagged Characters
//!
//! The intermediate document model: every character of a document paired
//! with the codes of the formats and structure applied to it.
//!
//! ```text
//! \textbf{Hi}  =>  [('H', "b"), ('i', "b")]
//! \item x      =>  [('*', "1"), ('x', "")]
//! ```
//!
//! Codes are stored in scope-open order (outermost first) so the serializer
//! can tell which scopes to close by comparing tag prefixes.

use crate::tables::FormatTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Glyph used for heading markers
pub const HEADING_MARKER: char = 'h';

/// Largest space count a soft-break tag can carry (one base-36 digit)
pub const MAX_SOFT_BREAK_SPACES: u32 = 35;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedChar {
    pub glyph: char,
    pub tags: String,
}

/// One decoded entry of a tag string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Format(FormatTag),
    /// `n<d>`: soft break followed by `d` spaces
    SoftBreak(u32),
    /// Decimal structure level (list depth or heading level)
    Level(u32),
    Unknown(char),
}

impl TaggedChar {
    pub fn new(glyph: char, tags: impl Into<String>) -> Self {
        Self {
            glyph,
            tags: tags.into(),
        }
    }

    pub fn plain(glyph: char) -> Self {
        Self::new(glyph, String::new())
    }

    /// Structural marker such as `('*', "2")` or `('h', "3")`
    pub fn marker(glyph: char, level: u32) -> Self {
        Self::new(glyph, level.to_string())
    }

    /// Soft line break inside a list, remembering the indentation after it
    pub fn soft_break(spaces: u32) -> Self {
        let spaces = spaces.min(MAX_SOFT_BREAK_SPACES);
        let digit = char::from_digit(spaces, 36).unwrap_or('0');
        Self::new(' ', format!("{}{}", FormatTag::Newline.code(), digit))
    }

    pub fn tag_list(&self) -> TagIter<'_> {
        TagIter {
            chars: self.tags.chars().peekable(),
        }
    }

    /// Level from the leading digits of the tags, if any
    pub fn leading_level(&self) -> Option<u32> {
        let digits: String = self
            .tags
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// The first structural level found anywhere in the tags
    pub fn level(&self) -> Option<u32> {
        self.tag_list().find_map(|tag| match tag {
            Tag::Level(level) => Some(level),
            _ => None,
        })
    }

    pub fn is_structural(&self) -> bool {
        self.level().is_some()
    }

    /// Space count when this character carries a soft-break tag
    pub fn soft_break_spaces(&self) -> Option<u32> {
        self.tag_list().find_map(|tag| match tag {
            Tag::SoftBreak(spaces) => Some(spaces),
            _ => None,
        })
    }

    pub fn has_format(&self, format: FormatTag) -> bool {
        self.tag_list().any(|tag| tag == Tag::Format(format))
    }
}

impl fmt::Display for TaggedChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.glyph, self.tags)
    }
}

pub struct TagIter<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl Iterator for TagIter<'_> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        let c = self.chars.next()?;

        if let Some(mut level) = c.to_digit(10) {
            while let Some(digit) = self.chars.peek().and_then(|d| d.to_digit(10)) {
                level = level.saturating_mul(10).saturating_add(digit);
                self.chars.next();
            }
            return Some(Tag::Level(level));
        }

        match FormatTag::from_code(c) {
            Some(FormatTag::Newline) => {
                match self.chars.peek().and_then(|d| d.to_digit(36)) {
                    Some(spaces) => {
                        self.chars.next();
                        Some(Tag::SoftBreak(spaces))
                    }
                    None => Some(Tag::Format(FormatTag::Newline)),
                }
            }
            Some(format) => Some(Tag::Format(format)),
            None => Some(Tag::Unknown(c)),
        }
    }
}

/// Flatten tagged characters back to their glyphs
pub fn glyphs(chars: &[TaggedChar]) -> String {
    chars.iter().map(|c| c.glyph).collect()
}
