use crate::{lex::Lexer, token::Token};
use jackc_err::{
    lex_err::LexErr,
    parse_err::{ParseErr, ParseErrTy},
};

/// Forward-only view over a lexer's tokens used by the parser. The stream is
/// primed on creation, so `curr()` is the first token of the file.
///
/// Grammar rules inspect the current token with `curr()`, `is_symbol()` or
/// `is_keyword()`, and move past it with `expect()`, `optional()` or
/// `consume()`. Running out of tokens where one is required is reported as
/// `UnexpectedEof` at the end of the last token.
#[derive(Debug, Default)]
pub struct TokenStream {
    lexer: Lexer,
    eof_line: usize,
    eof_pos: usize,
}

impl TokenStream {
    pub fn new(mut lexer: Lexer) -> TokenStream {
        let (eof_line, eof_pos) = match lexer.tokens().last() {
            Some(t) => (t.line, t.end_pos()),
            None => (1, 1),
        };

        lexer.reset();
        lexer.advance();

        TokenStream {
            lexer,
            eof_line,
            eof_pos,
        }
    }

    /// Lexes `src` and wraps the result.
    pub fn from_source(src: &str) -> Result<TokenStream, LexErr> {
        Ok(TokenStream::new(Lexer::new(src)?))
    }

    pub fn curr(&self) -> Option<&Token> {
        self.lexer.current_token()
    }

    /// The current lexeme, if any.
    pub fn lexeme(&self) -> Option<&str> {
        self.curr().map(|t| t.lexeme.as_str())
    }

    pub fn at_end(&self) -> bool {
        self.curr().is_none()
    }

    pub fn consume(&mut self) {
        self.lexer.advance();
    }

    pub fn is_symbol(&self, sym: &str) -> bool {
        self.curr().map_or(false, |t| t.is_symbol(sym))
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        self.curr().map_or(false, |t| t.is_keyword(kw))
    }

    /// Consumes the current token if it is the given keyword or symbol,
    /// returning it. Anything else is a mismatch.
    pub fn expect(&mut self, lexeme: &str) -> Result<Token, ParseErr> {
        match self.curr().cloned() {
            Some(t) if t.is_symbol(lexeme) || t.is_keyword(lexeme) => {
                self.consume();
                Ok(t)
            }
            Some(t) => Err(ParseErr::new(
                t.line,
                t.pos,
                ParseErrTy::TknMismatch(lexeme.to_string(), t.lexeme),
            )),
            None => Err(self.eof_err(lexeme)),
        }
    }

    /// Consumes the current token only if it is the given keyword or symbol.
    pub fn optional(&mut self, lexeme: &str) -> bool {
        if self.is_symbol(lexeme) || self.is_keyword(lexeme) {
            self.consume();
            return true;
        }
        false
    }

    pub fn expect_ident(&mut self) -> Result<Token, ParseErr> {
        match self.curr().cloned() {
            Some(t) if t.is_ident() => {
                self.consume();
                Ok(t)
            }
            Some(t) => Err(ParseErr::new(
                t.line,
                t.pos,
                ParseErrTy::ExpectedIdent(t.lexeme),
            )),
            None => Err(self.eof_err("identifier")),
        }
    }

    /// Builds an error of the given kind at the current token, or an
    /// end-of-input error naming `expected` if the stream is exhausted.
    pub fn err_here<F>(&self, expected: &str, ty: F) -> ParseErr
    where
        F: FnOnce(String) -> ParseErrTy,
    {
        match self.curr() {
            Some(t) => ParseErr::new(t.line, t.pos, ty(t.lexeme.clone())),
            None => self.eof_err(expected),
        }
    }

    pub fn eof_err(&self, expected: &str) -> ParseErr {
        ParseErr::new(
            self.eof_line,
            self.eof_pos,
            ParseErrTy::UnexpectedEof(expected.to_string()),
        )
    }
}
