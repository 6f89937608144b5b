//! # Attributed Text
//!
//! Reference implementation of how a pad host applies a changeset to its
//! stored text and attribution. Used by the in-memory document store and by
//! the delta correctness tests.

use crate::changeset::Changeset;
use crate::error::{ChangesetError, ChangesetResult};
use crate::ops::{attrib_prefix, push_run, OpIter, OpKind};
use crate::pool::AttributePool;
use crate::reader;
use serde::{Deserialize, Serialize};
use texpad_parser::TaggedChar;

/// Pad text with its attribution ops
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedText {
    pub text: String,
    pub attribs: String,
}

type AttributedChar = (char, Vec<u32>);

impl AttributedText {
    /// Unattributed text
    pub fn new(text: &str) -> Self {
        let chars: Vec<AttributedChar> = text.chars().map(|c| (c, Vec::new())).collect();
        Self::collapse(&chars)
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tagged_chars<P: AttributePool + ?Sized>(
        &self,
        pool: &P,
    ) -> ChangesetResult<Vec<TaggedChar>> {
        reader::decode(&self.text, &self.attribs, pool)
    }

    /// Apply a changeset, producing the next document state.
    ///
    /// Keep runs with attributes replace existing attributes of the same key;
    /// an empty value removes the key.
    pub fn apply<P: AttributePool + ?Sized>(
        &self,
        changeset: &Changeset,
        pool: &P,
    ) -> ChangesetResult<AttributedText> {
        let source = self.expand()?;
        if source.len() != changeset.old_len {
            return Err(ChangesetError::LengthMismatch {
                expected: changeset.old_len,
                actual: source.len(),
            });
        }

        let mut bank = changeset.bank.chars();
        let mut taken = 0;
        let mut out: Vec<AttributedChar> = Vec::with_capacity(changeset.new_len);
        let mut pos = 0;

        for op in changeset.ops() {
            let op = op?;
            match op.kind {
                OpKind::Keep | OpKind::Remove => {
                    let end = pos + op.chars;
                    let Some(run) = source.get(pos..end) else {
                        return Err(ChangesetError::malformed(
                            pos,
                            format!("run of {} passes the end of the document", op.chars),
                        ));
                    };
                    check_lines(run.iter().map(|(c, _)| *c), op.lines, pos)?;
                    if op.kind == OpKind::Keep {
                        for (c, attribs) in run {
                            let mut attribs = attribs.clone();
                            merge_attribs(&mut attribs, &op.attribs, pool);
                            out.push((*c, attribs));
                        }
                    }
                    pos = end;
                }
                OpKind::Insert => {
                    let text: Vec<char> = bank.by_ref().take(op.chars).collect();
                    taken += text.len();
                    if text.len() < op.chars {
                        return Err(ChangesetError::BankExhausted { available: taken });
                    }
                    check_lines(text.iter().copied(), op.lines, out.len())?;
                    out.extend(text.into_iter().map(|c| (c, op.attribs.clone())));
                }
            }
        }
        out.extend_from_slice(&source[pos..]);

        if bank.next().is_some() {
            return Err(ChangesetError::malformed(
                changeset.ops.len(),
                "bank holds characters no insert consumed",
            ));
        }
        if out.len() != changeset.new_len {
            return Err(ChangesetError::LengthMismatch {
                expected: changeset.new_len,
                actual: out.len(),
            });
        }
        Ok(Self::collapse(&out))
    }

    /// Per-character attribute ids; characters past the ops have none
    fn expand(&self) -> ChangesetResult<Vec<AttributedChar>> {
        let mut chars = self.text.chars();
        let mut out = Vec::with_capacity(self.text.len());
        for op in OpIter::new(&self.attribs) {
            let op = op?;
            for c in chars.by_ref().take(op.chars) {
                out.push((c, op.attribs.clone()));
            }
        }
        out.extend(chars.map(|c| (c, Vec::new())));
        Ok(out)
    }

    /// Regroup characters into attribution runs of identical attributes
    fn collapse(chars: &[AttributedChar]) -> Self {
        let mut text = String::with_capacity(chars.len());
        let mut attribs = String::new();
        let mut start = 0;
        while start < chars.len() {
            let ids = &chars[start].1;
            let end = chars[start..]
                .iter()
                .position(|(_, other)| other != ids)
                .map_or(chars.len(), |offset| start + offset);
            let run: String = chars[start..end].iter().map(|(c, _)| *c).collect();
            push_run(&mut attribs, OpKind::Insert, &attrib_prefix(ids), &run);
            text.push_str(&run);
            start = end;
        }
        Self { text, attribs }
    }
}

fn check_lines(run: impl Iterator<Item = char>, lines: usize, pos: usize) -> ChangesetResult<()> {
    let found = run.filter(|c| *c == '\n').count();
    if found != lines {
        return Err(ChangesetError::malformed(
            pos,
            format!("run declares {} newlines but covers {}", lines, found),
        ));
    }
    Ok(())
}

fn merge_attribs<P: AttributePool + ?Sized>(current: &mut Vec<u32>, updates: &[u32], pool: &P) {
    for id in updates {
        let Some(update) = pool.lookup(*id) else {
            continue;
        };
        current.retain(|existing| {
            pool.lookup(*existing)
                .map_or(true, |attribute| attribute.key != update.key)
        });
        if !update.value.is_empty() {
            current.push(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::MemoryAttributePool;

    #[test]
    fn test_new_collapses_lines() {
        let text = AttributedText::new("ab\ncd\nef");
        assert_eq!(text.attribs, "|2+6+2");
    }

    #[test]
    fn test_apply_keep_remove_insert() {
        let pool = MemoryAttributePool::new();
        let doc = AttributedText::new("abc");
        let changeset: Changeset = "Z:3>0=1-1+1$x".parse().unwrap();
        let next = doc.apply(&changeset, &pool).unwrap();
        assert_eq!(next.text, "axc");
        assert_eq!(next.attribs, "+3");
    }

    #[test]
    fn test_apply_attributed_insert() {
        let mut pool = MemoryAttributePool::new();
        pool.get_or_create("bold", "true");
        let doc = AttributedText::new("a\n");
        let changeset: Changeset = "Z:2>2=1*0+2$Hi".parse().unwrap();
        let next = doc.apply(&changeset, &pool).unwrap();
        assert_eq!(next.text, "aHi\n");
        assert_eq!(next.attribs, "+1*0+2|1+1");
    }

    #[test]
    fn test_keep_with_attributes_replaces_same_key() {
        let mut pool = MemoryAttributePool::new();
        let bold = pool.get_or_create("bold", "true");
        let unbold = pool.get_or_create("bold", "");
        let doc = AttributedText {
            text: "ab".into(),
            attribs: format!("*{}+2", bold),
        };
        let changeset: Changeset = format!("Z:2>0*{}=1$", unbold).parse().unwrap();
        let next = doc.apply(&changeset, &pool).unwrap();
        assert_eq!(next.attribs, "+1*0+1");
    }

    #[test]
    fn test_apply_errors() {
        let pool = MemoryAttributePool::new();
        let doc = AttributedText::new("abc");

        let wrong_len: Changeset = "Z:4>0$".parse().unwrap();
        assert!(matches!(
            doc.apply(&wrong_len, &pool),
            Err(ChangesetError::LengthMismatch { .. })
        ));

        let short_bank: Changeset = "Z:3>2+2$x".parse().unwrap();
        assert!(matches!(
            doc.apply(&short_bank, &pool),
            Err(ChangesetError::BankExhausted { available: 1 })
        ));

        let bad_lines: Changeset = "Z:3>0|1=1$".parse().unwrap();
        assert!(matches!(
            doc.apply(&bad_lines, &pool),
            Err(ChangesetError::Malformed { .. })
        ));

        let past_end: Changeset = "Z:3<0=4$".parse().unwrap();
        assert!(doc.apply(&past_end, &pool).is_err());
    }
}
