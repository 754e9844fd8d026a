use crate::err::JackErr;
use log::error;
use std::{error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrTy {
    /// Expected token, found token.
    TknMismatch(String, String),
    ExpectedIdent(String),
    ExpectedType(String),
    InvalidTerm(String),
    InvalidSubroutineKind(String),
    /// Expected token, found end of input.
    UnexpectedEof(String),
    TrailingTokens(String),
    UndeclSym(String),
    DuplicateSymbol(String),
    IntOutOfRange(String),
    /// Length of a string constant that doesn't fit a VM constant.
    StrTooLong(usize),
    /// A string constant character whose code doesn't fit a VM constant.
    CharOutOfRange(char),
    /// More variables of one kind than a segment index can address.
    TooManySymbols(String),
    /// Token at which a call goes past the most arguments `call` can take.
    TooManyArgs(String),
    NestingTooDeep(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseErr {
    pub line: usize,
    pub pos: usize,
    pub ty: ParseErrTy,
}

impl ParseErr {
    pub fn new(line: usize, pos: usize, ty: ParseErrTy) -> ParseErr {
        ParseErr { line, pos, ty }
    }
}

impl JackErr for ParseErr {
    fn emit(&self) {
        error!("jackc: Parse error - {}", self.to_msg());
    }

    fn to_msg(&self) -> String {
        let str_pos = format!("[Line {}:{}]", self.line, self.pos);

        match self.ty {
            ParseErrTy::TknMismatch(ref expected, ref found) => format!(
                "{} Expected token '{}', but found '{}'",
                str_pos, expected, found
            ),
            ParseErrTy::ExpectedIdent(ref found) => format!(
                "{} Identifier expected, found '{}'. Is this a reserved word?",
                str_pos, found
            ),
            ParseErrTy::ExpectedType(ref found) => {
                format!("{} Type name expected, found '{}'", str_pos, found)
            }
            ParseErrTy::InvalidTerm(ref found) => {
                format!("{} '{}' cannot start an expression term", str_pos, found)
            }
            ParseErrTy::InvalidSubroutineKind(ref found) => format!(
                "{} Expected 'constructor', 'function' or 'method', found '{}'",
                str_pos, found
            ),
            ParseErrTy::UnexpectedEof(ref expected) => format!(
                "{} Unexpected end of file, expected '{}'",
                str_pos, expected
            ),
            ParseErrTy::TrailingTokens(ref found) => format!(
                "{} Unexpected token '{}' after the end of the class",
                str_pos, found
            ),
            ParseErrTy::UndeclSym(ref found) => {
                format!("{} Undeclared symbol '{}' found", str_pos, found)
            }
            ParseErrTy::DuplicateSymbol(ref found) => {
                format!("{} Symbol '{}' is already declared in this scope", str_pos, found)
            }
            ParseErrTy::IntOutOfRange(ref found) => format!(
                "{} Integer constant '{}' is out of range 0..=32767",
                str_pos, found
            ),
            ParseErrTy::StrTooLong(len) => format!(
                "{} String constant of length {} is longer than 32767",
                str_pos, len
            ),
            ParseErrTy::CharOutOfRange(ch) => format!(
                "{} Character '{}' in string constant is out of range 0..=32767",
                str_pos, ch
            ),
            ParseErrTy::TooManySymbols(ref kind) => format!(
                "{} Too many {} variables, at most 32767 are allowed",
                str_pos, kind
            ),
            ParseErrTy::TooManyArgs(ref found) => format!(
                "{} Too many arguments at '{}', at most 32767 are allowed",
                str_pos, found
            ),
            ParseErrTy::NestingTooDeep(ref found) => format!(
                "{} Nesting too deep at '{}'",
                str_pos, found
            ),
        }
    }
}

impl fmt::Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_msg())
    }
}

impl error::Error for ParseErr {}
