use crate::{err::JackErr, lex_err::LexErr, parse_err::ParseErr};
use log::error;
use std::{error, fmt, io};

#[derive(Debug, Clone, PartialEq)]
pub enum CompileErrTy {
    Io(String),
    Lex(LexErr),
    Parse(ParseErr),
}

/// Failure to compile one source file, tagged with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileErr {
    pub file: String,
    pub ty: CompileErrTy,
}

impl CompileErr {
    pub fn new(file: &str, t: CompileErrTy) -> CompileErr {
        CompileErr {
            file: file.to_string(),
            ty: t,
        }
    }

    pub fn io(file: &str, e: &io::Error) -> CompileErr {
        CompileErr::new(file, CompileErrTy::Io(e.to_string()))
    }
}

impl JackErr for CompileErr {
    fn emit(&self) {
        error!("jackc: {}", self.to_msg());
    }

    fn to_msg(&self) -> String {
        match self.ty {
            CompileErrTy::Io(ref msg) => format!("{}: I/O error - {}", self.file, msg),
            CompileErrTy::Lex(ref e) => format!("{}: Lex error - {}", self.file, e.to_msg()),
            CompileErrTy::Parse(ref e) => format!("{}: Parse error - {}", self.file, e.to_msg()),
        }
    }
}

impl fmt::Display for CompileErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_msg())
    }
}

impl error::Error for CompileErr {}

impl From<LexErr> for CompileErrTy {
    fn from(e: LexErr) -> Self {
        CompileErrTy::Lex(e)
    }
}

impl From<ParseErr> for CompileErrTy {
    fn from(e: ParseErr) -> Self {
        CompileErrTy::Parse(e)
    }
}
