use crate::{
    cursor::TokenStream,
    lex::Lexer,
    reserved::is_primitive_type,
    symtab::{SymKind, SymTab, SymTabErr, Symbol},
    token::Token,
};
use jackc_bytecode::{
    instr::Instr,
    opc::{ArithOp, Segment},
};
use jackc_err::parse_err::{ParseErr, ParseErrTy};
use log::debug;
use std::mem;

pub type ParserResult = Result<Vec<Instr>, ParseErr>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubKind {
    Constructor,
    Function,
    Method,
}

impl Default for SubKind {
    fn default() -> SubKind {
        SubKind::Function
    }
}

/// [`Parser`] is a single-pass recursive descent compiler for one class. No
/// syntax tree is built: every grammar rule records the declarations it sees
/// in the symbol table and appends VM instructions to `code` as soon as it
/// recognizes its input.
///
/// Rule methods take the token stream as an explicit argument and share the
/// per-class session state held here: the symbol table, the `if` and `while`
/// label counters and the output. Each rule documents the production it
/// parses. A rule either matches its whole production or returns the first
/// error it finds, and the error aborts the class.
#[derive(Debug, Default)]
pub struct Parser {
    /// Tokens for the whole file, handed to the rule methods by `compile_class`.
    ts: TokenStream,

    /// Name of the class being compiled, used to qualify subroutine names.
    class_name: String,

    symtab: SymTab,

    /// Instructions emitted so far.
    code: Vec<Instr>,

    /// Next free number for `IF_` labels.
    if_cnt: usize,

    /// Next free number for `WHILE_` labels.
    while_cnt: usize,

    /// Kind of the subroutine currently being compiled. Decides what
    /// `return` emits.
    sub_kind: SubKind,

    /// Terms and blocks currently open.
    pub(crate) nesting: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        Parser {
            ts: TokenStream::new(lexer),
            ..Parser::default()
        }
    }

    /// A parser with no input, already inside class `name`. Rules can be
    /// driven directly against any token stream.
    pub fn for_class(name: &str) -> Parser {
        Parser {
            class_name: name.to_string(),
            ..Parser::default()
        }
    }

    /// Main entry point. Compiles the one class in the input and returns its
    /// instructions. Nothing may follow the class's closing brace.
    pub fn compile_class(&mut self) -> ParserResult {
        let mut ts = mem::take(&mut self.ts);
        self.class(&mut ts)?;

        if let Some(t) = ts.curr() {
            return Err(ParseErr::new(
                t.line,
                t.pos,
                ParseErrTy::TrailingTokens(t.lexeme.clone()),
            ));
        }

        Ok(mem::take(&mut self.code))
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn symtab(&self) -> &SymTab {
        &self.symtab
    }

    pub fn symtab_mut(&mut self) -> &mut SymTab {
        &mut self.symtab
    }

    /// Instructions emitted so far.
    pub fn code(&self) -> &[Instr] {
        &self.code
    }

    /// Parses a class.
    ///
    /// class ::= "class" IDENT "{" { classvardec } { subroutinedec } "}" ;
    pub fn class(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("class")?;
        self.class_name = ts.expect_ident()?.lexeme;
        debug!("compiling class {}", self.class_name);

        ts.expect("{")?;

        while ts.is_keyword("static") || ts.is_keyword("field") {
            self.class_var_dec(ts)?;
        }

        while ts.is_keyword("constructor") || ts.is_keyword("function") || ts.is_keyword("method")
        {
            self.subroutine_dec(ts)?;
        }

        ts.expect("}")?;
        Ok(())
    }

    /// Parses static and field declarations. Nothing is emitted.
    ///
    /// classvardec ::= ( "static" | "field" ) type IDENT { "," IDENT } ";" ;
    pub fn class_var_dec(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        let kind = if ts.optional("static") {
            SymKind::Static
        } else {
            ts.expect("field")?;
            SymKind::Field
        };
        let ty = self.type_name(ts)?;

        loop {
            let name = ts.expect_ident()?;
            self.symtab
                .declare_class_var(&name.lexeme, &ty, kind)
                .map_err(|e| declare_err(&name, e))?;

            if !ts.optional(",") {
                break;
            }
        }

        ts.expect(";")?;
        Ok(())
    }

    /// Parses a constructor, function or method, including its body.
    ///
    /// subroutinedec ::= ( "constructor" | "function" | "method" )
    ///                   ( "void" | type ) IDENT "(" [ paramlist ] ")" subroutinebody ;
    pub fn subroutine_dec(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        let kind = match ts.lexeme() {
            Some("constructor") => SubKind::Constructor,
            Some("function") => SubKind::Function,
            Some("method") => SubKind::Method,
            _ => {
                return Err(ts.err_here("subroutine", ParseErrTy::InvalidSubroutineKind));
            }
        };
        ts.consume();

        if !ts.optional("void") {
            self.type_name(ts)?;
        }
        let name = ts.expect_ident()?;

        self.symtab.clear_subroutine_scope();
        self.sub_kind = kind;

        ts.expect("(")?;
        self.param_list(ts, kind == SubKind::Method)?;
        ts.expect(")")?;

        self.subroutine_body(ts, &name.lexeme)?;
        self.symtab.clear_subroutine_scope();
        Ok(())
    }

    /// Parses a possibly empty parameter list. Stops before the closing paren.
    ///
    /// paramlist ::= type IDENT { "," type IDENT } ;
    pub fn param_list(&mut self, ts: &mut TokenStream, is_method: bool) -> Result<(), ParseErr> {
        if ts.is_symbol(")") {
            return Ok(());
        }

        loop {
            let ty = self.type_name(ts)?;
            let name = ts.expect_ident()?;
            self.symtab
                .declare_param(&name.lexeme, &ty, is_method)
                .map_err(|e| declare_err(&name, e))?;

            if !ts.optional(",") {
                return Ok(());
            }
        }
    }

    /// Parses a subroutine body. The `function` header can only be written
    /// once every local is declared, so it goes out after the var decls,
    /// followed by the constructor or method preamble.
    ///
    /// subroutinebody ::= "{" { vardec } statements "}" ;
    pub fn subroutine_body(&mut self, ts: &mut TokenStream, name: &str) -> Result<(), ParseErr> {
        ts.expect("{")?;

        while ts.is_keyword("var") {
            self.var_dec(ts)?;
        }

        let full_name = format!("{}.{}", self.class_name, name);
        let nlocals = self.symtab.var_count(SymKind::Local);
        self.push_instr(Instr::function(&full_name, nlocals));

        match self.sub_kind {
            SubKind::Constructor => {
                let nfields = self.symtab.field_count();
                self.push_instr(Instr::push(Segment::Constant, nfields));
                self.push_instr(Instr::call("Memory.alloc", 1));
                self.push_instr(Instr::pop(Segment::Pointer, 0));
            }
            SubKind::Method => {
                self.push_instr(Instr::push(Segment::Argument, 0));
                self.push_instr(Instr::pop(Segment::Pointer, 0));
            }
            SubKind::Function => (),
        }

        self.statements(ts)?;
        ts.expect("}")?;

        debug!("compiled {} ({} locals)", full_name, nlocals);
        Ok(())
    }

    /// Parses local variable declarations. Nothing is emitted.
    ///
    /// vardec ::= "var" type IDENT { "," IDENT } ";" ;
    pub fn var_dec(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("var")?;
        let ty = self.type_name(ts)?;

        loop {
            let name = ts.expect_ident()?;
            self.symtab
                .declare_local(&name.lexeme, &ty)
                .map_err(|e| declare_err(&name, e))?;

            if !ts.optional(",") {
                break;
            }
        }

        ts.expect(";")?;
        Ok(())
    }

    /// type ::= "int" | "char" | "boolean" | IDENT ;
    fn type_name(&mut self, ts: &mut TokenStream) -> Result<String, ParseErr> {
        match ts.curr().cloned() {
            Some(t) if is_primitive_type(&t.lexeme) || t.is_ident() => {
                ts.consume();
                Ok(t.lexeme)
            }
            _ => Err(ts.err_here("type", ParseErrTy::ExpectedType)),
        }
    }

    pub(crate) fn push_instr(&mut self, instr: Instr) {
        self.code.push(instr);
    }

    pub(crate) fn push_arith(&mut self, op: ArithOp) {
        self.code.push(Instr::Arith(op));
    }

    /// Drops every instruction emitted after `mark`.
    pub(crate) fn truncate_code(&mut self, mark: usize) {
        self.code.truncate(mark);
    }

    pub(crate) fn sub_kind(&self) -> SubKind {
        self.sub_kind
    }

    /// Resolves a variable reference or fails with an undeclared symbol error
    /// at the referencing token.
    pub(crate) fn lookup(&self, tkn: &Token) -> Result<Symbol, ParseErr> {
        self.symtab.resolve(&tkn.lexeme).cloned().ok_or_else(|| {
            ParseErr::new(
                tkn.line,
                tkn.pos,
                ParseErrTy::UndeclSym(tkn.lexeme.clone()),
            )
        })
    }

    pub(crate) fn push_var(&mut self, sym: &Symbol) {
        self.push_instr(Instr::push(segment_of(sym.kind), sym.index));
    }

    pub(crate) fn pop_var(&mut self, sym: &Symbol) {
        self.push_instr(Instr::pop(segment_of(sym.kind), sym.index));
    }

    /// Reserves two `IF_` labels.
    pub(crate) fn new_if_lbls(&mut self) -> (String, String) {
        let n = self.if_cnt;
        self.if_cnt += 2;
        (build_lbl("IF", n), build_lbl("IF", n + 1))
    }

    /// Reserves two `WHILE_` labels.
    pub(crate) fn new_while_lbls(&mut self) -> (String, String) {
        let n = self.while_cnt;
        self.while_cnt += 2;
        (build_lbl("WHILE", n), build_lbl("WHILE", n + 1))
    }
}

pub fn segment_of(kind: SymKind) -> Segment {
    match kind {
        SymKind::Static => Segment::Static,
        SymKind::Field => Segment::This,
        SymKind::Argument => Segment::Argument,
        SymKind::Local => Segment::Local,
    }
}

fn build_lbl(prefix: &str, n: usize) -> String {
    format!("{}_{}", prefix, n)
}

fn declare_err(tkn: &Token, e: SymTabErr) -> ParseErr {
    let ty = match e {
        SymTabErr::Duplicate(name) => ParseErrTy::DuplicateSymbol(name),
        SymTabErr::NotClassKind(kind) => {
            ParseErrTy::TknMismatch("static' or 'field".to_string(), kind.to_string())
        }
        SymTabErr::TooMany(kind) => ParseErrTy::TooManySymbols(kind.to_string()),
    };
    ParseErr::new(tkn.line, tkn.pos, ty)
}
