pub mod cursor;
pub mod lex;
pub mod parser;
pub mod reserved;
pub mod symtab;
pub mod token;

mod expr;
mod stmt;

use jackc_bytecode::instr::Instr;
use jackc_err::compile_err::CompileErrTy;

/// Lexes and compiles the source of one class.
pub fn compile_source(src: &str) -> Result<Vec<Instr>, CompileErrTy> {
    let lexer = lex::Lexer::new(src)?;
    let mut parser = parser::Parser::new(lexer);
    Ok(parser.compile_class()?)
}
