use crate::token::Token;
use jackc_err::lex_err::{LexErr, LexErrTy};
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

/// Symbols, then string literals, then runs of word characters. A string
/// literal may not contain a quote or span lines.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[{}()\[\].,;+\-*/&|<>=~]|"[^"\n]*"|\w+"#).expect("token pattern is valid")
});

/// Splits a whole source file into tokens up front, then hands them out one
/// at a time. The sequence can be rewound with `reset()`.
#[derive(Debug, Default)]
pub struct Lexer {
    tokens: Vec<Token>,

    /// Number of tokens advanced over. The current token sits at
    /// `cursor - 1`, and `cursor == tokens.len() + 1` means exhausted.
    cursor: usize,
}

impl Lexer {
    pub fn new(src: &str) -> Result<Lexer, LexErr> {
        let mut tokens = Vec::new();

        for (n, raw) in src.lines().enumerate() {
            let trimmed = raw.trim_start();
            if trimmed.starts_with('/') || trimmed.starts_with('*') {
                continue;
            }

            let line = strip_comments(raw);
            lex_line(&line, n + 1, &mut tokens)?;
        }

        trace!("lexed {} tokens", tokens.len());
        Ok(Lexer { tokens, cursor: 0 })
    }

    /// Moves to the next token and returns it, or `None` once every token
    /// has been handed out.
    pub fn advance(&mut self) -> Option<&Token> {
        if self.cursor <= self.tokens.len() {
            self.cursor += 1;
        }
        self.current_token()
    }

    /// The token most recently returned by `advance()`.
    pub fn current_token(&self) -> Option<&Token> {
        self.cursor
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Removes a trailing `//` comment and any `/* ... */` spans from one line.
/// Comment markers inside string literals are left alone. Removed block
/// comment text is blanked rather than dropped so columns stay put.
fn strip_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut in_str = false;

    while let Some(c) = chars.next() {
        if in_str {
            in_str = c != '"';
            out.push(c);
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_str = true;
                out.push(c);
            }
            ('/', Some('/')) => break,
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");

                // An unclosed block comment runs to the end of the line.
                let mut prev = ' ';
                for ch in chars.by_ref() {
                    out.push(' ');
                    if prev == '*' && ch == '/' {
                        break;
                    }
                    prev = ch;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn lex_line(line: &str, line_num: usize, tokens: &mut Vec<Token>) -> Result<(), LexErr> {
    let mut last = 0;

    for m in TOKEN_RE.find_iter(line) {
        check_gap(line, last, m.start(), line_num)?;
        check_word(m.as_str(), line_num, column(line, m.start()))?;
        tokens.push(Token::new(m.as_str(), line_num, column(line, m.start())));
        last = m.end();
    }

    check_gap(line, last, line.len(), line_num)
}

/// Text between two matches may only be whitespace.
fn check_gap(line: &str, start: usize, end: usize, line_num: usize) -> Result<(), LexErr> {
    let gap = &line[start..end];

    match gap.char_indices().find(|&(_, c)| !c.is_whitespace()) {
        None => Ok(()),
        Some((i, '"')) => Err(LexErr::new(
            line_num,
            column(line, start + i),
            LexErrTy::UnterminatedString(line[start + i..].trim_end().to_string()),
        )),
        Some((i, c)) => Err(LexErr::new(
            line_num,
            column(line, start + i),
            LexErrTy::UnknownChar(c),
        )),
    }
}

/// A word is either all digits or an identifier that doesn't start with one.
fn check_word(word: &str, line_num: usize, pos: usize) -> Result<(), LexErr> {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() && !chars.all(|c| c.is_ascii_digit()) => Err(
            LexErr::new(line_num, pos, LexErrTy::BadIdent(word.to_string())),
        ),
        _ => Ok(()),
    }
}

/// 1-based character column of a byte offset.
fn column(line: &str, byte: usize) -> usize {
    line[..byte].chars().count() + 1
}
