//! # Markup Parser
//!
//! Converts markup source into tagged characters in a single left-to-right
//! scan. Text between recognised tokens is copied verbatim; each token either
//! changes parser state or, when it means nothing in its position, is copied
//! verbatim too. The parser never fails.
//!
//! Effects that depend on a closing delimiter are applied retroactively:
//! when `}` closes `\textbf{`, the bold code is prepended to every character
//! emitted since the scope opened. State is two explicit stacks (brace scopes
//! and list frames) over a growable output buffer.

use crate::tables::{compose, is_symbol_name, FormatTag, ListKind, MarkupTables};
use crate::tagged::{TaggedChar, HEADING_MARKER, MAX_SOFT_BREAK_SPACES};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Alternatives in priority order: `\begin{..}`, `\end{..}`, `\name{`,
/// bare escape, `\item`, braces, `]`, newline plus indentation, ligature run.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^\\begin\{([a-zA-Z*]+)\}([\[\n]?)",
        r"|^\\end\{([a-zA-Z*]+)\}\n?",
        r"|\\([a-zA-Z*]+|[^a-zA-Z*])\{",
        r"|\\([^a-zA-Z*])",
        r"|^(\\item ?)",
        r"|[{}]",
        r"|\]",
        r"|\n *",
        r"|[`'-]+",
    ))
    .expect("markup token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'s> {
    Begin { env: &'s str, caption: bool },
    End { env: &'s str },
    Command { name: &'s str },
    Escape { name: &'s str },
    Item,
    OpenBrace,
    CloseBrace,
    CloseBracket,
    LineBreak { spaces: u32 },
    Ligature(&'s str),
}

impl<'s> Token<'s> {
    fn classify(caps: &Captures<'s>, text: &'s str) -> Self {
        if let Some(env) = caps.get(1) {
            let caption = caps.get(2).is_some_and(|m| m.as_str() == "[");
            return Token::Begin {
                env: env.as_str(),
                caption,
            };
        }
        if let Some(env) = caps.get(3) {
            return Token::End { env: env.as_str() };
        }
        if let Some(name) = caps.get(4) {
            return Token::Command {
                name: name.as_str(),
            };
        }
        if let Some(name) = caps.get(5) {
            return Token::Escape {
                name: name.as_str(),
            };
        }
        if caps.get(6).is_some() {
            return Token::Item;
        }
        match text {
            "{" => Token::OpenBrace,
            "}" => Token::CloseBrace,
            "]" => Token::CloseBracket,
            _ if text.starts_with('\n') => Token::LineBreak {
                spaces: (text.len() - 1) as u32,
            },
            _ => Token::Ligature(text),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Scope<'s> {
    /// Plain `{` or an unrecognised command; its braces stay literal
    Neutral,
    Command { name: &'s str, start: usize },
    /// `[` after `\begin{enum}` or `\begin{itemz}`, closed by `]`
    Caption { start: usize },
}

#[derive(Debug, Clone, Copy)]
struct ListFrame {
    kind: ListKind,
    start: usize,
}

/// Markup to tagged-character parser over a set of markup tables
pub struct Parser<'t> {
    tables: &'t MarkupTables,
}

impl<'t> Parser<'t> {
    pub fn new(tables: &'t MarkupTables) -> Self {
        Self { tables }
    }

    pub fn parse(&self, source: &str) -> Vec<TaggedChar> {
        let mut state = ParseState::new(self.tables);
        let mut last = 0;

        for caps in TOKEN.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            state.push_text(&source[last..whole.start()]);

            let token = Token::classify(&caps, whole.as_str());
            if !state.handle(token) {
                state.push_text(whole.as_str());
            }
            last = whole.end();
        }
        state.push_text(&source[last..]);

        let out = state.finish();
        debug!(
            source_len = source.len(),
            chars = out.len(),
            "Parsed markup"
        );
        out
    }
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Self::new(MarkupTables::standard())
    }
}

/// Parse markup with the standard tables
pub fn parse(source: &str) -> Vec<TaggedChar> {
    Parser::default().parse(source)
}

struct ParseState<'s, 't> {
    tables: &'t MarkupTables,
    out: Vec<TaggedChar>,
    scopes: Vec<Scope<'s>>,
    lists: Vec<ListFrame>,
}

impl<'s, 't> ParseState<'s, 't> {
    fn new(tables: &'t MarkupTables) -> Self {
        Self {
            tables,
            out: Vec::new(),
            scopes: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        self.out.extend(text.chars().map(TaggedChar::plain));
    }

    fn depth(&self) -> u32 {
        self.lists.len() as u32
    }

    /// Returns false when the token should be copied as literal text
    fn handle(&mut self, token: Token<'s>) -> bool {
        match token {
            Token::Escape { name } => match self.tables.symbol(name) {
                Some(symbol) if name != "{" && name != "}" => {
                    self.out.push(TaggedChar::plain(symbol));
                    true
                }
                _ => false,
            },
            Token::OpenBrace => {
                self.scopes.push(Scope::Neutral);
                false
            }
            Token::CloseBrace => match self.scopes.last().copied() {
                Some(Scope::Command { name, start }) => {
                    self.scopes.pop();
                    self.close_command(name, start);
                    true
                }
                Some(Scope::Neutral) => {
                    self.scopes.pop();
                    false
                }
                // An open caption waits for its `]`
                Some(Scope::Caption { .. }) | None => false,
            },
            Token::CloseBracket => match self.scopes.last().copied() {
                Some(Scope::Caption { start }) => {
                    self.scopes.pop();
                    self.apply_format(FormatTag::Bold, start);
                    true
                }
                _ => false,
            },
            Token::Item => match self.lists.last().copied() {
                Some(frame) => {
                    self.restore_line_break();
                    let depth = self.depth();
                    self.out.push(TaggedChar::marker(frame.kind.marker(), depth));
                    true
                }
                None => false,
            },
            Token::Command { name } => {
                if self.tables.is_scoped_command(name) {
                    self.scopes.push(Scope::Command {
                        name,
                        start: self.out.len(),
                    });
                    true
                } else {
                    self.scopes.push(Scope::Neutral);
                    false
                }
            }
            Token::Begin { env, caption } => {
                let Some(kind) = ListKind::from_environment(env) else {
                    return false;
                };
                self.restore_line_break();
                self.lists.push(ListFrame {
                    kind,
                    start: self.out.len(),
                });
                if kind == ListKind::Indent {
                    let depth = self.depth();
                    self.out.push(TaggedChar::marker(kind.marker(), depth));
                    if caption {
                        self.out.push(TaggedChar::plain('['));
                    }
                } else if caption {
                    self.scopes.push(Scope::Caption {
                        start: self.out.len(),
                    });
                }
                true
            }
            Token::End { env } => {
                self.restore_line_break();
                match self.lists.last().copied() {
                    Some(frame) if frame.kind.environment() == env => {
                        self.lists.pop();
                        if frame.kind == ListKind::Indent {
                            self.mark_quotation_lines(frame.start);
                        }
                        true
                    }
                    _ => false,
                }
            }
            Token::LineBreak { spaces } => match self.lists.last() {
                Some(frame) if frame.kind != ListKind::Indent => {
                    self.out.push(TaggedChar::soft_break(spaces));
                    let excess = spaces.saturating_sub(MAX_SOFT_BREAK_SPACES);
                    for _ in 0..excess {
                        self.out.push(TaggedChar::plain(' '));
                    }
                    true
                }
                _ => false,
            },
            Token::Ligature(text) => match self.tables.ligature(text) {
                Some(glyph) => {
                    self.out.push(TaggedChar::plain(glyph));
                    true
                }
                None => false,
            },
        }
    }

    /// Apply the effect of a command scope closing over `out[start..]`
    fn close_command(&mut self, name: &str, start: usize) {
        if let Some(level) = self.tables.heading_level(name) {
            self.out
                .insert(start, TaggedChar::marker(HEADING_MARKER, level));
        } else if let Some(symbol) = self.tables.symbol(name) {
            let tags = if is_symbol_name(name) {
                FormatTag::EmptyArg.code().to_string()
            } else {
                String::new()
            };
            self.out.push(TaggedChar::new(symbol, tags));
        } else if let Some(mark) = self.tables.accent(name) {
            let composed = self
                .out
                .last()
                .and_then(|prev| compose(prev.glyph, mark));
            match (composed, self.out.last_mut()) {
                (Some(glyph), Some(prev)) => prev.glyph = glyph,
                _ => self.out.push(TaggedChar::plain(mark)),
            }
        } else if let Some(format) = FormatTag::from_command(name) {
            self.apply_format(format, start);
        }
    }

    fn apply_format(&mut self, format: FormatTag, start: usize) {
        for c in self.out.iter_mut().skip(start) {
            c.tags.insert(0, format.code());
        }
    }

    /// A soft break directly before `\item` or `\end` is a real line end
    fn restore_line_break(&mut self) {
        if let Some(last) = self.out.last_mut() {
            if last.soft_break_spaces().is_some() {
                *last = TaggedChar::plain('\n');
            }
        }
    }

    /// Give every line of a closed quotation its own indent marker
    fn mark_quotation_lines(&mut self, start: usize) {
        let level = self.depth() + 1;
        let end = self.out.len().saturating_sub(1);
        let mut at = end;
        while at > start {
            at -= 1;
            let next_is_structural = self
                .out
                .get(at + 1)
                .is_some_and(|next| next.is_structural());
            if self.out[at].glyph == '\n' && !next_is_structural {
                self.out
                    .insert(at + 1, TaggedChar::marker(ListKind::Indent.marker(), level));
            }
        }
    }

    /// Close scopes left open at end of input as if their delimiter was seen
    fn finish(mut self) -> Vec<TaggedChar> {
        while let Some(scope) = self.scopes.pop() {
            match scope {
                Scope::Command { name, start } => self.close_command(name, start),
                Scope::Caption { start } => self.apply_format(FormatTag::Bold, start),
                Scope::Neutral => {}
            }
        }
        self.out
    }
}
