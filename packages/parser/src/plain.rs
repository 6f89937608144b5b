//! Plain-text codec.
//!
//! Plain documents carry a single kind of structure: leading tabs. A run of
//! tabs at the start of a line becomes one indent marker whose level is the
//! run length, so plain files share the indent list model with markup.

use crate::tables::ListKind;
use crate::tagged::TaggedChar;

pub fn to_tagged(text: &str) -> Vec<TaggedChar> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut line_start = true;

    while let Some(c) = chars.next() {
        if line_start && c == '\t' {
            let mut tabs = 1;
            while chars.next_if_eq(&'\t').is_some() {
                tabs += 1;
            }
            out.push(TaggedChar::marker(ListKind::Indent.marker(), tabs));
            line_start = false;
            continue;
        }
        out.push(TaggedChar::plain(c));
        line_start = c == '\n';
    }
    out
}

pub fn to_text(chars: &[TaggedChar]) -> String {
    let mut out = String::with_capacity(chars.len());
    for c in chars {
        match c.leading_level() {
            Some(level) if c.glyph == ListKind::Indent.marker() => {
                out.extend(std::iter::repeat('\t').take(level as usize));
            }
            _ => out.push(c.glyph),
        }
    }
    out
}
