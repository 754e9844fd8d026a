use crate::err::JackErr;
use log::error;
use std::{error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrTy {
    UnknownChar(char),
    UnterminatedString(String),
    /// A word starting with a digit that isn't all digits.
    BadIdent(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexErr {
    pub line: usize,
    pub pos: usize,
    pub ty: LexErrTy,
}

impl LexErr {
    pub fn new(line: usize, pos: usize, ty: LexErrTy) -> LexErr {
        LexErr { line, pos, ty }
    }
}

impl JackErr for LexErr {
    fn emit(&self) {
        error!("jackc: Lex error - {}", self.to_msg());
    }

    fn to_msg(&self) -> String {
        let str_pos = format!("[Line {}:{}]", self.line, self.pos);

        match self.ty {
            LexErrTy::UnknownChar(ref ch) => format!("{} Unrecognized character '{}'", str_pos, ch),
            LexErrTy::UnterminatedString(ref found) => {
                format!("{} Unterminated string literal '{}'", str_pos, found)
            }
            LexErrTy::BadIdent(ref found) => format!(
                "{} Identifier '{}' cannot start with a digit",
                str_pos, found
            ),
        }
    }
}

impl fmt::Display for LexErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_msg())
    }
}

impl error::Error for LexErr {}
