//! # Operation Lexer
//!
//! Changeset bodies and attribution strings share one op grammar:
//!
//! ```text
//! [*<attrib>]* [|<lines>] (=|-|+)<chars>
//! ```
//!
//! All numbers are base 36. `|` gives the number of newlines inside the run;
//! every run that contains newlines is split so that the first part ends on
//! the last newline (see [`push_run`]).

use crate::error::{ChangesetError, ChangesetResult};
use crate::radix::{parse_base36, to_base36};
use logos::{Logos, SpannedIter};

fn number(slice: &str) -> Option<usize> {
    parse_base36(&slice[1..])
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpToken {
    #[regex(r"\*[0-9a-z]+", |lex| number(lex.slice()).and_then(|n| u32::try_from(n).ok()))]
    Attrib(u32),

    #[regex(r"\|[0-9a-z]+", |lex| number(lex.slice()))]
    Lines(usize),

    #[regex(r"=[0-9a-z]+", |lex| number(lex.slice()))]
    Keep(usize),

    #[regex(r"-[0-9a-z]+", |lex| number(lex.slice()))]
    Remove(usize),

    #[regex(r"\+[0-9a-z]+", |lex| number(lex.slice()))]
    Insert(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Keep,
    Remove,
    Insert,
}

impl OpKind {
    pub fn symbol(self) -> char {
        match self {
            OpKind::Keep => '=',
            OpKind::Remove => '-',
            OpKind::Insert => '+',
        }
    }
}

/// One decoded run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub kind: OpKind,
    pub chars: usize,
    pub lines: usize,
    pub attribs: Vec<u32>,
}

/// Iterator over the ops of a changeset body or attribution string
pub struct OpIter<'a> {
    source: &'a str,
    tokens: SpannedIter<'a, OpToken>,
    /// End of the last token consumed
    end: usize,
    done: bool,
}

impl<'a> OpIter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: OpToken::lexer(source).spanned(),
            end: 0,
            done: false,
        }
    }

    fn fail(&mut self, pos: usize, message: String) -> Option<ChangesetResult<Op>> {
        self.done = true;
        Some(Err(ChangesetError::malformed(pos, message)))
    }
}

impl Iterator for OpIter<'_> {
    type Item = ChangesetResult<Op>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut attribs = Vec::new();
        let mut lines = 0;
        let mut op_start = None;

        loop {
            let Some((token, span)) = self.tokens.next() else {
                return match op_start {
                    Some(pos) => self.fail(pos, "attributes or line count without an op".into()),
                    None if self.end < self.source.len() => {
                        let text = &self.source[self.end..];
                        self.fail(self.end, format!("unexpected `{}`", text))
                    }
                    None => None,
                };
            };
            self.end = span.end;
            let token = match token {
                Ok(token) => token,
                Err(()) => {
                    let text = &self.source[span.clone()];
                    return self.fail(span.start, format!("unexpected `{}`", text));
                }
            };
            op_start.get_or_insert(span.start);

            let (kind, chars) = match token {
                OpToken::Attrib(id) => {
                    attribs.push(id);
                    continue;
                }
                OpToken::Lines(count) => {
                    lines = count;
                    continue;
                }
                OpToken::Keep(chars) => (OpKind::Keep, chars),
                OpToken::Remove(chars) => (OpKind::Remove, chars),
                OpToken::Insert(chars) => (OpKind::Insert, chars),
            };
            return Some(Ok(Op {
                kind,
                chars,
                lines,
                attribs,
            }));
        }
    }
}

/// Render attribute ids as an op prefix (`*0*3`)
pub fn attrib_prefix(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| format!("*{}", to_base36(*id as usize)))
        .collect()
}

/// Append `text` as one or two runs of `kind`, split after the last newline.
///
/// The attribute prefix is written before each emitted part.
pub fn push_run(out: &mut String, kind: OpKind, attribs: &str, text: &str) {
    let mut chars = 0;
    let mut lines = 0;
    let mut through_last_newline = 0;
    for c in text.chars() {
        chars += 1;
        if c == '\n' {
            lines += 1;
            through_last_newline = chars;
        }
    }

    if lines > 0 {
        out.push_str(attribs);
        out.push('|');
        out.push_str(&to_base36(lines));
        out.push(kind.symbol());
        out.push_str(&to_base36(through_last_newline));
    }
    let rest = chars - through_last_newline;
    if rest > 0 {
        out.push_str(attribs);
        out.push(kind.symbol());
        out.push_str(&to_base36(rest));
    }
}
