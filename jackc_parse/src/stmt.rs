use crate::{
    cursor::TokenStream,
    expr::MAX_NESTING,
    parser::{Parser, SubKind},
};
use jackc_bytecode::{
    instr::Instr,
    opc::{ArithOp, Segment},
};
use jackc_err::parse_err::{ParseErr, ParseErrTy};

impl Parser {
    /// Parses statements until a token that cannot start one, normally the
    /// closing brace of the enclosing block.
    ///
    /// statements ::= { letstmt | ifstmt | whilestmt | dostmt | retstmt } ;
    pub fn statements(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        loop {
            match ts.lexeme() {
                Some("let") => self.let_stmt(ts)?,
                Some("if") => self.if_stmt(ts)?,
                Some("while") => self.while_stmt(ts)?,
                Some("do") => self.do_stmt(ts)?,
                Some("return") => self.ret_stmt(ts)?,
                _ => return Ok(()),
            }
        }
    }

    /// Parses an assignment. An array element target is addressed before the
    /// right hand side is evaluated, and the value is staged through `temp 0`
    /// so evaluating the right hand side can't clobber `pointer 1`.
    ///
    /// letstmt ::= "let" IDENT [ "[" expr "]" ] "=" expr ";" ;
    pub fn let_stmt(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("let")?;
        let name = ts.expect_ident()?;
        let sym = self.lookup(&name)?;

        if ts.optional("[") {
            self.push_var(&sym);
            self.expression(ts)?;
            ts.expect("]")?;
            self.push_arith(ArithOp::Add);

            ts.expect("=")?;
            self.expression(ts)?;
            ts.expect(";")?;

            self.push_instr(Instr::pop(Segment::Temp, 0));
            self.push_instr(Instr::pop(Segment::Pointer, 1));
            self.push_instr(Instr::push(Segment::Temp, 0));
            self.push_instr(Instr::pop(Segment::That, 0));
        } else {
            ts.expect("=")?;
            self.expression(ts)?;
            ts.expect(";")?;
            self.pop_var(&sym);
        }

        Ok(())
    }

    /// ifstmt ::= "if" "(" expr ")" "{" statements "}" [ "else" "{" statements "}" ] ;
    pub fn if_stmt(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("if")?;
        let (else_lbl, end_lbl) = self.new_if_lbls();

        ts.expect("(")?;
        self.expression(ts)?;
        ts.expect(")")?;
        self.push_arith(ArithOp::Not);
        self.push_instr(Instr::IfGoto(else_lbl.clone()));

        self.block(ts)?;

        if ts.optional("else") {
            self.push_instr(Instr::Goto(end_lbl.clone()));
            self.push_instr(Instr::Label(else_lbl));
            self.block(ts)?;
            self.push_instr(Instr::Label(end_lbl));
        } else {
            self.push_instr(Instr::Label(else_lbl));
        }

        Ok(())
    }

    /// whilestmt ::= "while" "(" expr ")" "{" statements "}" ;
    pub fn while_stmt(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("while")?;
        let (top_lbl, end_lbl) = self.new_while_lbls();

        self.push_instr(Instr::Label(top_lbl.clone()));
        ts.expect("(")?;
        self.expression(ts)?;
        ts.expect(")")?;
        self.push_arith(ArithOp::Not);
        self.push_instr(Instr::IfGoto(end_lbl.clone()));

        self.block(ts)?;

        self.push_instr(Instr::Goto(top_lbl));
        self.push_instr(Instr::Label(end_lbl));
        Ok(())
    }

    /// Every subroutine leaves exactly one value behind, so the result of the
    /// call is always popped.
    ///
    /// dostmt ::= "do" subroutinecall ";" ;
    pub fn do_stmt(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("do")?;
        let name = ts.expect_ident()?;
        self.subroutine_call(ts, &name)?;
        ts.expect(";")?;

        self.push_instr(Instr::pop(Segment::Temp, 0));
        Ok(())
    }

    /// Void subroutines return 0. Constructors always return `this`: an
    /// explicit return value is parsed but its code is dropped.
    ///
    /// retstmt ::= "return" [ expr ] ";" ;
    pub fn ret_stmt(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("return")?;
        let has_expr = !ts.is_symbol(";");

        if self.sub_kind() == SubKind::Constructor {
            if has_expr {
                let mark = self.code().len();
                self.expression(ts)?;
                self.truncate_code(mark);
            }
            self.push_instr(Instr::push(Segment::Pointer, 0));
        } else if has_expr {
            self.expression(ts)?;
        } else {
            self.push_instr(Instr::push(Segment::Constant, 0));
        }

        ts.expect(";")?;
        self.push_instr(Instr::Return);
        Ok(())
    }

    /// block ::= "{" statements "}" ;
    fn block(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        ts.expect("{")?;
        if self.nesting >= MAX_NESTING {
            return Err(ts.err_here("}", ParseErrTy::NestingTooDeep));
        }

        self.nesting += 1;
        let res = self.statements(ts);
        self.nesting -= 1;
        res?;

        ts.expect("}")?;
        Ok(())
    }
}
