//! # Delta Encoder
//!
//! Computes the changeset that turns one tagged-character document into
//! another.
//!
//! ```text
//! from ──┐
//!        ├─ minimal Myers diff ─→ equal / replace / insert / delete spans
//! to   ──┘                                   │
//!                                            ↓
//!                      keep / remove runs, attributed insert runs + bank
//! ```
//!
//! Inserted characters are grouped into runs sharing identical tags. Their
//! tags are translated into pool attributes: inline formats become
//! `<attribute>=true`, and list or heading markers become the pad's line
//! marker attributes with a `*` placeholder in the bank.

use crate::changeset::Changeset;
use crate::error::{ChangesetError, ChangesetResult};
use crate::ops::{push_run, OpKind};
use crate::pool::AttributePool;
use crate::radix::to_base36;
use imara_diff::{Algorithm, Diff, InternedInput, Interner};
use std::ops::Range;
use texpad_parser::{FormatTag, ListKind, Tag, TaggedChar, HEADING_MARKER};
use tracing::{debug, error, instrument, warn};

/// Bank character standing in for a line marker
pub const PLACEHOLDER: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Equal,
    Replace,
    Insert,
    Delete,
}

/// A diff span with ranges into the old and new sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub before: Range<usize>,
    pub after: Range<usize>,
}

/// Exact minimal diff over tagged characters; tags are part of identity
pub fn diff_spans(from: &[TaggedChar], to: &[TaggedChar]) -> Vec<Span> {
    let mut input = InternedInput {
        before: Vec::new(),
        after: Vec::new(),
        interner: Interner::new(from.len() + to.len()),
    };
    input.update_before(from.iter());
    input.update_after(to.iter());
    let diff = Diff::compute(Algorithm::MyersMinimal, &input);

    let mut spans = Vec::new();
    let (mut old, mut new) = (0, 0);
    for hunk in diff.hunks() {
        let before = hunk.before.start as usize..hunk.before.end as usize;
        let after = hunk.after.start as usize..hunk.after.end as usize;
        if before.start > old {
            spans.push(Span {
                kind: SpanKind::Equal,
                before: old..before.start,
                after: new..after.start,
            });
        }
        let kind = match (before.is_empty(), after.is_empty()) {
            (false, false) => SpanKind::Replace,
            (true, false) => SpanKind::Insert,
            (false, true) => SpanKind::Delete,
            (true, true) => continue,
        };
        old = before.end;
        new = after.end;
        spans.push(Span {
            kind,
            before,
            after,
        });
    }
    if old < from.len() {
        spans.push(Span {
            kind: SpanKind::Equal,
            before: old..from.len(),
            after: new..to.len(),
        });
    }
    spans
}

/// Changeset turning `from` into `to`, or `None` when they are identical
#[instrument(skip_all, fields(from_len = from.len(), to_len = to.len()))]
pub fn encode<P: AttributePool + ?Sized>(
    from: &[TaggedChar],
    to: &[TaggedChar],
    pool: &mut P,
) -> ChangesetResult<Option<Changeset>> {
    if from == to {
        return Ok(None);
    }

    let mut encoder = Encoder {
        pool,
        to,
        ops: String::new(),
        bank: String::new(),
        counters: Vec::new(),
        last_list: 0,
        kept: 0,
        removed: 0,
        inserted: 0,
    };

    for span in diff_spans(from, to) {
        match span.kind {
            SpanKind::Equal => {
                if span.before.end != from.len() || span.after.end != to.len() {
                    encoder.keep(&from[span.before]);
                }
            }
            SpanKind::Delete => encoder.remove(&from[span.before]),
            SpanKind::Replace => {
                encoder.remove(&from[span.before]);
                encoder.insert(span.after);
            }
            SpanKind::Insert => encoder.insert(span.after),
        }
    }

    encoder.finish(from.len()).map(Some)
}

/// Changeset replacing `len` characters at `start` of `original`.
///
/// Offsets count characters, not bytes.
pub fn encode_replace(
    original: &str,
    start: usize,
    len: usize,
    replacement: &str,
) -> ChangesetResult<Changeset> {
    let chars: Vec<char> = original.chars().collect();
    let end = start.saturating_add(len);
    if end > chars.len() {
        return Err(ChangesetError::OutOfRange {
            start,
            end,
            len: chars.len(),
        });
    }

    let prefix: String = chars[..start].iter().collect();
    let removed: String = chars[start..end].iter().collect();
    let mut ops = String::new();
    push_run(&mut ops, OpKind::Keep, "", &prefix);
    push_run(&mut ops, OpKind::Remove, "", &removed);
    push_run(&mut ops, OpKind::Insert, "", replacement);

    Ok(Changeset {
        old_len: chars.len(),
        new_len: chars.len() - len + replacement.chars().count(),
        ops,
        bank: replacement.to_string(),
    })
}

struct Encoder<'a, P: ?Sized> {
    pool: &'a mut P,
    to: &'a [TaggedChar],
    ops: String,
    bank: String,
    /// Per-level list item counters for `start` ordinals
    counters: Vec<u32>,
    /// Index in `to` of the last inserted list marker
    last_list: usize,
    kept: usize,
    removed: usize,
    inserted: usize,
}

impl<P: AttributePool + ?Sized> Encoder<'_, P> {
    fn keep(&mut self, chars: &[TaggedChar]) {
        push_run(&mut self.ops, OpKind::Keep, "", &texpad_parser::glyphs(chars));
        self.kept += chars.len();
    }

    fn remove(&mut self, chars: &[TaggedChar]) {
        push_run(&mut self.ops, OpKind::Remove, "", &texpad_parser::glyphs(chars));
        self.removed += chars.len();
    }

    fn insert(&mut self, range: Range<usize>) {
        let mut at = range.start;
        while at < range.end {
            let start = at;
            at += 1;
            if !self.to[start].is_structural() {
                while at < range.end && self.to[at].tags == self.to[start].tags {
                    at += 1;
                }
            }
            self.insert_run(start..at);
        }
    }

    fn insert_run(&mut self, run: Range<usize>) {
        let first = &self.to[run.start];
        let mut prefix = String::new();
        let mut structural = false;

        for tag in first.tag_list() {
            match tag {
                Tag::Format(FormatTag::Newline) | Tag::Unknown(_) => {
                    warn!(glyph = %first.glyph, tags = %first.tags, "Unknown tag code, skipping");
                }
                Tag::Format(format) => self.put(&mut prefix, format.attribute(), "true"),
                Tag::SoftBreak(spaces) => {
                    let value = to_base36(spaces as usize);
                    self.put(&mut prefix, FormatTag::Newline.attribute(), &value);
                }
                Tag::Level(level) => {
                    structural |= self.put_line_marker(&mut prefix, run.start, level);
                }
            }
        }

        let text = if structural {
            PLACEHOLDER.to_string()
        } else {
            texpad_parser::glyphs(&self.to[run])
        };
        push_run(&mut self.ops, OpKind::Insert, &prefix, &text);
        self.inserted += text.chars().count();
        self.bank.push_str(&text);
    }

    /// Heading or list attributes for the marker at `at`; false if the
    /// glyph is not a known marker
    fn put_line_marker(&mut self, prefix: &mut String, at: usize, level: u32) -> bool {
        let glyph = self.to[at].glyph;
        if glyph == HEADING_MARKER {
            self.put(prefix, "heading", &format!("{}{}", HEADING_MARKER, level));
            self.put(prefix, "insertorder", "first");
            self.put(prefix, "lmkr", "1");
            return true;
        }

        let Some(kind) = ListKind::from_marker(glyph) else {
            warn!(glyph = %glyph, level, "Level on a non-marker character, skipping");
            return false;
        };

        // A line break before the previous line's own newline restarts numbering
        let reset_until = at.saturating_sub(1);
        if self
            .to
            .iter()
            .take(reset_until)
            .skip(self.last_list)
            .any(|c| c.glyph == '\n')
        {
            self.counters.clear();
        }
        self.last_list = at;
        self.counters.resize(level as usize, 0);

        self.put(prefix, "list", &kind.attribute_value(level));
        self.put(prefix, "lmkr", "1");
        if let Some(top) = self.counters.last_mut() {
            *top += 1;
            let ordinal = top.to_string();
            self.put(prefix, "start", &ordinal);
        }
        true
    }

    fn put(&mut self, prefix: &mut String, key: &str, value: &str) {
        let id = self.pool.get_or_create(key, value);
        prefix.push('*');
        prefix.push_str(&to_base36(id as usize));
    }

    fn finish(self, old_len: usize) -> ChangesetResult<Changeset> {
        let new_len = self.to.len();
        let bank_len = self.bank.chars().count();
        if bank_len != self.inserted {
            error!(bank_len, inserted = self.inserted, "Bank does not match inserted runs");
            return Err(ChangesetError::InconsistentDelta(format!(
                "bank holds {} characters but runs insert {}",
                bank_len, self.inserted
            )));
        }
        let consumed = self.kept + self.removed;
        let produced = self.kept + self.inserted;
        if consumed > old_len || produced > new_len || old_len - consumed != new_len - produced {
            error!(
                kept = self.kept,
                removed = self.removed,
                inserted = self.inserted,
                old_len,
                new_len,
                "Changeset length accounting is off"
            );
            return Err(ChangesetError::InconsistentDelta(format!(
                "kept {} removed {} inserted {} for lengths {} -> {}",
                self.kept, self.removed, self.inserted, old_len, new_len
            )));
        }

        debug!(ops = %self.ops, bank_len, "Encoded changeset");
        Ok(Changeset {
            old_len,
            new_len,
            ops: self.ops,
            bank: self.bank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Attribute, MemoryAttributePool};

    fn plain(text: &str) -> Vec<TaggedChar> {
        text.chars().map(TaggedChar::plain).collect()
    }

    #[test]
    fn test_identical_documents_encode_to_none() {
        let mut pool = MemoryAttributePool::new();
        let doc = plain("same\n");
        assert_eq!(encode(&doc, &doc, &mut pool).unwrap(), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_append_one_char() {
        let mut pool = MemoryAttributePool::new();
        let changeset = encode(&plain("a"), &plain("ab"), &mut pool).unwrap().unwrap();
        assert_eq!(changeset.to_string(), "Z:1>1=1+1$b");
    }

    #[test]
    fn test_delete_with_newlines() {
        let mut pool = MemoryAttributePool::new();
        let changeset = encode(&plain("x\ny\nz"), &plain("z"), &mut pool)
            .unwrap()
            .unwrap();
        assert_eq!(changeset.to_string(), "Z:5<4|2-4$");
    }

    #[test]
    fn test_bold_insert_uses_pool() {
        let mut pool = MemoryAttributePool::new();
        let to = vec![TaggedChar::new('H', "b"), TaggedChar::new('i', "b")];
        let changeset = encode(&[], &to, &mut pool).unwrap().unwrap();
        assert_eq!(changeset.to_string(), "Z:0>2*0+2$Hi");
        assert_eq!(pool.lookup(0), Some(Attribute::new("bold", "true")));
    }

    #[test]
    fn test_heading_marker() {
        let mut pool = MemoryAttributePool::new();
        let to = vec![TaggedChar::marker('h', 2), TaggedChar::plain('T')];
        let changeset = encode(&[], &to, &mut pool).unwrap().unwrap();
        assert_eq!(changeset.to_string(), "Z:0>2*0*1*2+1+1$*T");
        assert_eq!(pool.lookup(0), Some(Attribute::new("heading", "h2")));
        assert_eq!(pool.lookup(1), Some(Attribute::new("insertorder", "first")));
        assert_eq!(pool.lookup(2), Some(Attribute::new("lmkr", "1")));
    }

    #[test]
    fn test_list_ordinals() {
        let mut pool = MemoryAttributePool::new();
        let mut to = Vec::new();
        for item in ["a\n", "b\n", "\n"] {
            if item != "\n" {
                to.push(TaggedChar::marker('#', 1));
            }
            to.extend(plain(item));
        }
        to.push(TaggedChar::marker('#', 1));
        to.extend(plain("c\n"));

        let changeset = encode(&[], &to, &mut pool).unwrap().unwrap();
        let mut start = |n: &str| pool.get_or_create("start", n);
        let (one, two) = (start("1"), start("2"));
        let ops = changeset.ops;
        let first = format!("*{}+1", to_base36(one as usize));
        let second = format!("*{}+1", to_base36(two as usize));
        assert_eq!(ops.matches(&first).count(), 2, "{}", ops);
        assert_eq!(ops.matches(&second).count(), 1, "{}", ops);
    }

    #[test]
    fn test_soft_break_attribute() {
        let mut pool = MemoryAttributePool::new();
        let to = vec![TaggedChar::soft_break(3)];
        let changeset = encode(&[], &to, &mut pool).unwrap().unwrap();
        assert_eq!(changeset.to_string(), "Z:0>1*0+1$ ");
        assert_eq!(pool.lookup(0), Some(Attribute::new("newline", "3")));
    }

    #[test]
    fn test_encode_replace() {
        assert_eq!(
            encode_replace("abc", 1, 1, "x").unwrap().to_string(),
            "Z:3>0=1-1+1$x"
        );
        assert_eq!(
            encode_replace("line one\nline two\n", 5, 3, "1")
                .unwrap()
                .to_string(),
            "Z:i<2=5-3+1$1"
        );
        assert!(matches!(
            encode_replace("abc", 2, 5, ""),
            Err(ChangesetError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_encode_replace_matches_full_encode() {
        let mut pool = MemoryAttributePool::new();
        let cases = [
            ("line one\nline two\n", 5, 3, "1", "line 1\nline two\n"),
            ("abc", 1, 1, "x", "axc"),
            ("hello\n", 5, 0, " xyz", "hello xyz\n"),
            ("keep this\nand this\n", 4, 5, "", "keep\nand this\n"),
        ];
        for (original, start, len, replacement, spliced) in cases {
            let full = encode(&plain(original), &plain(spliced), &mut pool)
                .unwrap()
                .unwrap();
            let targeted = encode_replace(original, start, len, replacement).unwrap();
            assert_eq!(targeted.to_string(), full.to_string(), "{:?}", original);
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_diff_spans_cover_both_sequences() {
        let from = plain("kitten");
        let to = plain("sitting");
        let spans = diff_spans(&from, &to);
        assert_eq!(spans.first().unwrap().before.start, 0);
        assert_eq!(spans.last().unwrap().before.end, from.len());
        assert_eq!(spans.last().unwrap().after.end, to.len());
        for pair in spans.windows(2) {
            assert_eq!(pair[0].before.end, pair[1].before.start);
            assert_eq!(pair[0].after.end, pair[1].after.start);
        }
    }
}
