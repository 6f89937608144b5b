//! The changeset value type and its wire format:
//! `Z:<oldLen36>(>|<)<delta36><ops>$<bank>`.

use crate::error::{ChangesetError, ChangesetResult};
use crate::ops::OpIter;
use crate::radix::{parse_base36, to_base36};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    pub old_len: usize,
    pub new_len: usize,
    /// Op body between the header and `$`
    pub ops: String,
    /// Text of all inserted runs, in order
    pub bank: String,
}

impl Changeset {
    pub fn ops(&self) -> OpIter<'_> {
        OpIter::new(&self.ops)
    }
}

impl fmt::Display for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, delta) = if self.new_len >= self.old_len {
            ('>', self.new_len - self.old_len)
        } else {
            ('<', self.old_len - self.new_len)
        };
        write!(
            f,
            "Z:{}{}{}{}${}",
            to_base36(self.old_len),
            sign,
            to_base36(delta),
            self.ops,
            self.bank
        )
    }
}

impl FromStr for Changeset {
    type Err = ChangesetError;

    fn from_str(s: &str) -> ChangesetResult<Self> {
        let rest = s
            .strip_prefix("Z:")
            .ok_or_else(|| ChangesetError::malformed(0, "missing `Z:` header"))?;
        let offset = |rest: &str| s.len() - rest.len();

        let (old_len, rest) = take_number(rest, offset(rest))?;

        let mut chars = rest.chars();
        let sign = chars
            .next()
            .ok_or_else(|| ChangesetError::malformed(offset(rest), "missing length delta"))?;
        let sign_pos = offset(rest);
        let rest = chars.as_str();

        let (delta, rest) = take_number(rest, offset(rest))?;

        let new_len = match sign {
            '>' => old_len.checked_add(delta),
            '<' => old_len.checked_sub(delta),
            other => {
                return Err(ChangesetError::malformed(
                    sign_pos,
                    format!("expected `>` or `<`, found `{}`", other),
                ))
            }
        }
        .ok_or_else(|| ChangesetError::malformed(sign_pos, "length delta out of range"))?;

        let (ops, bank) = rest
            .split_once('$')
            .ok_or_else(|| ChangesetError::malformed(s.len(), "missing `$` before bank"))?;

        Ok(Changeset {
            old_len,
            new_len,
            ops: ops.to_string(),
            bank: bank.to_string(),
        })
    }
}

fn take_number(text: &str, pos: usize) -> ChangesetResult<(usize, &str)> {
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c.is_ascii_lowercase()))
        .unwrap_or(text.len());
    let value = parse_base36(&text[..end])
        .ok_or_else(|| ChangesetError::malformed(pos, "expected a base-36 number"))?;
    Ok((value, &text[end..]))
}
