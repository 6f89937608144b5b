//! Attributed-text reader: pad text plus attribution ops back to tagged
//! characters.

use crate::error::ChangesetResult;
use crate::ops::OpIter;
use crate::pool::{Attribute, AttributePool};
use texpad_parser::{FormatTag, ListKind, TaggedChar};
use tracing::warn;

/// Decode a pad's text and attribution string into tagged characters.
///
/// Unknown attribute ids are skipped with a warning; characters not covered
/// by the attribution stay untagged.
pub fn decode<P: AttributePool + ?Sized>(
    text: &str,
    attribution: &str,
    pool: &P,
) -> ChangesetResult<Vec<TaggedChar>> {
    let mut chars: Vec<TaggedChar> = text.chars().map(TaggedChar::plain).collect();
    let text_len = chars.len();
    let mut index = 0;

    'ops: for op in OpIter::new(attribution) {
        let op = op?;
        for _ in 0..op.chars {
            let Some(c) = chars.get_mut(index) else {
                warn!(index, text_len, "Attribution runs past the end of the text");
                break 'ops;
            };
            for id in &op.attribs {
                match pool.lookup(*id) {
                    Some(attribute) => apply_attribute(c, &attribute),
                    None => warn!(id, index, "Unknown attribute id, skipping"),
                }
            }
            index += 1;
        }
    }
    Ok(chars)
}

fn apply_attribute(c: &mut TaggedChar, attribute: &Attribute) {
    if let Some(format) = FormatTag::from_attribute(&attribute.key) {
        if !attribute.value.is_empty() {
            c.tags.push(format.code());
            if format.has_argument() {
                c.tags.push_str(&attribute.value);
            }
        }
        return;
    }
    match attribute.key.as_str() {
        "list" => {
            if let Some((kind, level)) = ListKind::from_attribute_value(&attribute.value) {
                *c = TaggedChar::marker(kind.marker(), level);
            }
        }
        "heading" => {
            let mut value = attribute.value.chars();
            if let Some(glyph) = value.next() {
                *c = TaggedChar::new(glyph, value.as_str());
            }
        }
        _ => {}
    }
}
