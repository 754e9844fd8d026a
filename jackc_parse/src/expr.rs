use crate::{
    cursor::TokenStream,
    parser::Parser,
    symtab::CallTarget,
    token::{Token, TokenCategory},
};
use jackc_bytecode::{
    instr::Instr,
    opc::{ArithOp, Segment},
};
use jackc_err::parse_err::{ParseErr, ParseErrTy};
use std::convert::TryFrom;

/// Largest integer constant the target word can hold.
const INT_MAX: u16 = 32767;

/// Deepest chain of nested terms accepted before giving up.
pub(crate) const MAX_NESTING: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq)]
enum BinOp {
    Arith(ArithOp),
    /// Operators with no VM instruction, implemented by an OS routine
    /// taking both operands.
    Builtin(&'static str),
}

fn binary_op(tkn: &Token) -> Option<BinOp> {
    if tkn.category() != TokenCategory::Symbol {
        return None;
    }

    let op = match tkn.lexeme.as_str() {
        "+" => BinOp::Arith(ArithOp::Add),
        "-" => BinOp::Arith(ArithOp::Sub),
        "=" => BinOp::Arith(ArithOp::Eq),
        ">" => BinOp::Arith(ArithOp::Gt),
        "<" => BinOp::Arith(ArithOp::Lt),
        "&" => BinOp::Arith(ArithOp::And),
        "|" => BinOp::Arith(ArithOp::Or),
        "*" => BinOp::Builtin("Math.multiply"),
        "/" => BinOp::Builtin("Math.divide"),
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parses an expression. There is no operator precedence: operands and
    /// operators are emitted strictly left to right, each operator after its
    /// right operand.
    ///
    /// expr ::= term { op term } ;
    pub fn expression(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        self.term(ts)?;

        while let Some(op) = ts.curr().and_then(binary_op) {
            ts.consume();
            self.term(ts)?;

            match op {
                BinOp::Arith(a) => self.push_arith(a),
                BinOp::Builtin(target) => self.push_instr(Instr::call(target, 2)),
            }
        }

        Ok(())
    }

    /// term ::= INTCONST | STRCONST | "true" | "false" | "null" | "this"
    ///        | IDENT | IDENT "[" expr "]" | subroutinecall
    ///        | "(" expr ")" | ( "-" | "~" ) term ;
    pub fn term(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        if self.nesting >= MAX_NESTING {
            return Err(ts.err_here("term", ParseErrTy::NestingTooDeep));
        }

        self.nesting += 1;
        let res = self.nested_term(ts);
        self.nesting -= 1;
        res
    }

    fn nested_term(&mut self, ts: &mut TokenStream) -> Result<(), ParseErr> {
        let tkn = match ts.curr() {
            Some(t) => t.clone(),
            None => return Err(ts.eof_err("term")),
        };
        ts.consume();

        match tkn.category() {
            TokenCategory::IntConst => {
                let n = int_const(&tkn)?;
                self.push_instr(Instr::push(Segment::Constant, n));
            }
            TokenCategory::StrConst => self.string_const(&tkn)?,
            TokenCategory::Keyword => self.keyword_const(&tkn)?,
            TokenCategory::Symbol => match tkn.lexeme.as_str() {
                "(" => {
                    self.expression(ts)?;
                    ts.expect(")")?;
                }
                "-" => {
                    self.term(ts)?;
                    self.push_arith(ArithOp::Neg);
                }
                "~" => {
                    self.term(ts)?;
                    self.push_arith(ArithOp::Not);
                }
                _ => return Err(invalid_term(&tkn)),
            },
            TokenCategory::Identifier => {
                if ts.optional("[") {
                    let sym = self.lookup(&tkn)?;
                    self.push_var(&sym);
                    self.expression(ts)?;
                    ts.expect("]")?;

                    self.push_arith(ArithOp::Add);
                    self.push_instr(Instr::pop(Segment::Pointer, 1));
                    self.push_instr(Instr::push(Segment::That, 0));
                } else if ts.is_symbol("(") || ts.is_symbol(".") {
                    self.subroutine_call(ts, &tkn)?;
                } else {
                    let sym = self.lookup(&tkn)?;
                    self.push_var(&sym);
                }
            }
        }

        Ok(())
    }

    /// Parses the rest of a call whose leading name has already been
    /// consumed. An unqualified call is a method call on `this`. A qualifier
    /// naming a variable makes a method call on that object, any other
    /// qualifier is taken to be a class name.
    ///
    /// subroutinecall ::= IDENT "(" exprlist ")"
    ///                  | IDENT "." IDENT "(" exprlist ")" ;
    pub fn subroutine_call(&mut self, ts: &mut TokenStream, name: &Token) -> Result<(), ParseErr> {
        if !ts.optional(".") {
            self.push_instr(Instr::push(Segment::Pointer, 0));
            let nargs = self.arg_list(ts, name, true)?;
            let target = format!("{}.{}", self.class_name(), name.lexeme);
            self.push_instr(Instr::call(&target, nargs));
            return Ok(());
        }

        let sub = ts.expect_ident()?;
        match self.symtab().resolve_call_target(&name.lexeme) {
            CallTarget::Variable(sym) => {
                self.push_var(&sym);
                let nargs = self.arg_list(ts, &sub, true)?;
                let target = format!("{}.{}", sym.ty, sub.lexeme);
                self.push_instr(Instr::call(&target, nargs));
            }
            CallTarget::Class(class) => {
                let nargs = self.arg_list(ts, &sub, false)?;
                let target = format!("{}.{}", class, sub.lexeme);
                self.push_instr(Instr::call(&target, nargs));
            }
        }

        Ok(())
    }

    /// Parses zero or more comma separated expressions and returns how many
    /// there were. Stops before the closing paren. The count never exceeds
    /// 32767: the expression that would go past it is an error.
    ///
    /// exprlist ::= [ expr { "," expr } ] ;
    pub fn expression_list(&mut self, ts: &mut TokenStream) -> Result<u16, ParseErr> {
        if ts.is_symbol(")") {
            return Ok(0);
        }

        let mut n = 0;
        loop {
            if n == INT_MAX {
                return Err(ts.err_here("expression", ParseErrTy::TooManyArgs));
            }
            self.expression(ts)?;
            n += 1;

            if !ts.optional(",") {
                return Ok(n);
            }
        }
    }

    /// "(" exprlist ")". The count includes the receiver when there is one.
    fn arg_list(
        &mut self,
        ts: &mut TokenStream,
        name: &Token,
        receiver: bool,
    ) -> Result<u16, ParseErr> {
        ts.expect("(")?;
        let n = self.expression_list(ts)?;
        ts.expect(")")?;

        if !receiver {
            return Ok(n);
        }
        match n.checked_add(1) {
            Some(n) if n <= INT_MAX => Ok(n),
            _ => Err(ParseErr::new(
                name.line,
                name.pos,
                ParseErrTy::TooManyArgs(name.lexeme.clone()),
            )),
        }
    }

    /// Builds the string at run time one character at a time. The length and
    /// every UTF-16 unit must fit a constant.
    fn string_const(&mut self, tkn: &Token) -> Result<(), ParseErr> {
        let text = tkn.text();
        let units: Vec<u16> = text.encode_utf16().collect();

        let len = match u16::try_from(units.len()) {
            Ok(len) if len <= INT_MAX => len,
            _ => {
                return Err(ParseErr::new(
                    tkn.line,
                    tkn.pos,
                    ParseErrTy::StrTooLong(units.len()),
                ))
            }
        };
        if let Some(ch) = text.chars().find(|&c| u32::from(c) > u32::from(INT_MAX)) {
            return Err(ParseErr::new(
                tkn.line,
                tkn.pos,
                ParseErrTy::CharOutOfRange(ch),
            ));
        }

        self.push_instr(Instr::push(Segment::Constant, len));
        self.push_instr(Instr::call("String.new", 1));

        for c in units {
            self.push_instr(Instr::push(Segment::Constant, c));
            self.push_instr(Instr::call("String.appendChar", 2));
        }
        Ok(())
    }

    fn keyword_const(&mut self, tkn: &Token) -> Result<(), ParseErr> {
        match tkn.lexeme.as_str() {
            "true" => {
                self.push_instr(Instr::push(Segment::Constant, 0));
                self.push_arith(ArithOp::Not);
            }
            "false" | "null" => self.push_instr(Instr::push(Segment::Constant, 0)),
            "this" => self.push_instr(Instr::push(Segment::Pointer, 0)),
            _ => return Err(invalid_term(tkn)),
        }
        Ok(())
    }
}

fn int_const(tkn: &Token) -> Result<u16, ParseErr> {
    match tkn.lexeme.parse::<u16>() {
        Ok(n) if n <= INT_MAX => Ok(n),
        _ => Err(ParseErr::new(
            tkn.line,
            tkn.pos,
            ParseErrTy::IntOutOfRange(tkn.lexeme.clone()),
        )),
    }
}

fn invalid_term(tkn: &Token) -> ParseErr {
    ParseErr::new(
        tkn.line,
        tkn.pos,
        ParseErrTy::InvalidTerm(tkn.lexeme.clone()),
    )
}

#[cfg(test)]
mod tests {
    use crate::{cursor::TokenStream, parser::Parser, symtab::SymKind};
    use jackc_bytecode::printer::prog_to_string;
    use jackc_err::parse_err::{ParseErr, ParseErrTy};

    /// A method of `Robot` with field `speed`, static `made`, arguments `x`
    /// and `y` after `this`, and locals `obj` (a Robot) and `arr`.
    fn parser() -> Parser {
        let mut p = Parser::for_class("Robot");
        let st = p.symtab_mut();
        st.declare_class_var("speed", "int", SymKind::Field).unwrap();
        st.declare_class_var("made", "int", SymKind::Static).unwrap();
        st.declare_param("x", "int", true).unwrap();
        st.declare_param("y", "int", true).unwrap();
        st.declare_local("obj", "Robot").unwrap();
        st.declare_local("arr", "Array").unwrap();
        p
    }

    fn try_expr(src: &str) -> Result<String, ParseErr> {
        let mut p = parser();
        let mut ts = TokenStream::from_source(src).unwrap();
        p.expression(&mut ts)?;
        assert!(ts.at_end(), "unparsed input at {:?}", ts.curr());
        Ok(prog_to_string(p.code()))
    }

    fn expr(src: &str) -> String {
        try_expr(src).unwrap()
    }

    #[test]
    fn multiply_arguments() {
        assert_eq!(
            expr("x * y"),
            "push argument 1\npush argument 2\ncall Math.multiply 2\n"
        );
    }

    #[test]
    fn strictly_left_to_right() {
        assert_eq!(
            expr("1 + 2 * 3"),
            "push constant 1
push constant 2
add
push constant 3
call Math.multiply 2
"
        );
    }

    #[test]
    fn parens_group() {
        assert_eq!(
            expr("1 + (2 / 3)"),
            "push constant 1
push constant 2
push constant 3
call Math.divide 2
add
"
        );
    }

    #[test]
    fn unary_binds_to_term() {
        assert_eq!(
            expr("-x - ~y"),
            "push argument 1
neg
push argument 2
not
sub
"
        );
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(
            expr("(x < 1) | (y > 2) & (x = y)"),
            "push argument 1
push constant 1
lt
push argument 2
push constant 2
gt
or
push argument 1
push argument 2
eq
and
"
        );
    }

    #[test]
    fn keyword_constants() {
        assert_eq!(expr("true"), "push constant 0\nnot\n");
        assert_eq!(expr("false"), "push constant 0\n");
        assert_eq!(expr("null"), "push constant 0\n");
        assert_eq!(expr("this"), "push pointer 0\n");
    }

    #[test]
    fn variable_segments() {
        assert_eq!(expr("speed"), "push this 0\n");
        assert_eq!(expr("made"), "push static 0\n");
        assert_eq!(expr("y"), "push argument 2\n");
        assert_eq!(expr("arr"), "push local 1\n");
    }

    #[test]
    fn string_constant() {
        assert_eq!(
            expr("\"Hi\""),
            "push constant 2
call String.new 1
push constant 72
call String.appendChar 2
push constant 105
call String.appendChar 2
"
        );
        assert_eq!(expr("\"\""), "push constant 0\ncall String.new 1\n");
    }

    #[test]
    fn array_read() {
        assert_eq!(
            expr("arr[x + 1]"),
            "push local 1
push argument 1
push constant 1
add
add
pop pointer 1
push that 0
"
        );
    }

    #[test]
    fn method_call_on_variable() {
        assert_eq!(expr("obj.run()"), "push local 0\ncall Robot.run 1\n");
        assert_eq!(
            expr("obj.move(x, 3)"),
            "push local 0\npush argument 1\npush constant 3\ncall Robot.move 3\n"
        );
    }

    #[test]
    fn function_call_on_class() {
        assert_eq!(
            expr("Math.max(x, y)"),
            "push argument 1\npush argument 2\ncall Math.max 2\n"
        );
        assert_eq!(expr("Keyboard.keyPressed()"), "call Keyboard.keyPressed 0\n");
    }

    #[test]
    fn unqualified_call_passes_this() {
        assert_eq!(
            expr("step(x)"),
            "push pointer 0\npush argument 1\ncall Robot.step 2\n"
        );
    }

    #[test]
    fn nested_calls_in_arguments() {
        assert_eq!(
            expr("Math.min(arr[obj.size()], 2)"),
            "push local 1
push local 0
call Robot.size 1
add
pop pointer 1
push that 0
push constant 2
call Math.min 2
"
        );
    }

    #[test]
    fn largest_int() {
        assert_eq!(expr("32767"), "push constant 32767\n");
    }

    #[test]
    fn int_out_of_range() {
        let err = try_expr("x + 32768").unwrap_err();
        assert_eq!(
            err,
            ParseErr::new(1, 5, ParseErrTy::IntOutOfRange("32768".to_string()))
        );
        assert_eq!(
            try_expr("99999999999").unwrap_err().ty,
            ParseErrTy::IntOutOfRange("99999999999".to_string())
        );
    }

    #[test]
    fn undeclared_variable() {
        assert_eq!(
            try_expr("x + ghost").unwrap_err().ty,
            ParseErrTy::UndeclSym("ghost".to_string())
        );
        assert_eq!(
            try_expr("ghost[0]").unwrap_err().ty,
            ParseErrTy::UndeclSym("ghost".to_string())
        );
    }

    #[test]
    fn invalid_terms() {
        assert_eq!(
            try_expr("x + ;").unwrap_err().ty,
            ParseErrTy::InvalidTerm(";".to_string())
        );
        assert_eq!(
            try_expr("while").unwrap_err().ty,
            ParseErrTy::InvalidTerm("while".to_string())
        );
    }

    #[test]
    fn eof_in_expression() {
        assert_eq!(
            try_expr("x *").unwrap_err().ty,
            ParseErrTy::UnexpectedEof("term".to_string())
        );
        assert_eq!(
            try_expr("(x").unwrap_err().ty,
            ParseErrTy::UnexpectedEof(")".to_string())
        );
    }

    #[test]
    fn string_too_long() {
        let src = format!("\"{}\"", "a".repeat(70000));
        assert_eq!(try_expr(&src).unwrap_err().ty, ParseErrTy::StrTooLong(70000));

        let src = format!("\"{}\"", "a".repeat(32768));
        assert_eq!(try_expr(&src).unwrap_err().ty, ParseErrTy::StrTooLong(32768));
    }

    #[test]
    fn longest_string() {
        let src = format!("\"{}\"", "a".repeat(32767));
        let out = expr(&src);
        assert!(out.starts_with("push constant 32767\ncall String.new 1\n"));
    }

    #[test]
    fn string_char_out_of_range() {
        let err = try_expr("x + \"ok \u{1F600}\"").unwrap_err();
        assert_eq!(
            err,
            ParseErr::new(1, 5, ParseErrTy::CharOutOfRange('\u{1F600}'))
        );
        assert_eq!(
            try_expr("\"\u{8000}\"").unwrap_err().ty,
            ParseErrTy::CharOutOfRange('\u{8000}')
        );
        assert_eq!(
            expr("\"\u{7FFF}\""),
            "push constant 1
call String.new 1
push constant 32767
call String.appendChar 2
"
        );
    }

    fn call_with_args(callee: &str, n: usize) -> String {
        format!("{}({})", callee, vec!["0"; n].join(","))
    }

    #[test]
    fn argument_count_is_capped() {
        let out = expr(&call_with_args("Math.sum", 32767));
        assert!(out.ends_with("call Math.sum 32767\n"));

        let err = try_expr(&call_with_args("Math.sum", 32768)).unwrap_err();
        assert_eq!(err.ty, ParseErrTy::TooManyArgs("0".to_string()));
    }

    #[test]
    fn receiver_counts_toward_argument_cap() {
        let err = try_expr(&call_with_args("step", 32767)).unwrap_err();
        assert_eq!(
            err,
            ParseErr::new(1, 1, ParseErrTy::TooManyArgs("step".to_string()))
        );

        let err = try_expr(&call_with_args("obj.run", 32767)).unwrap_err();
        assert_eq!(
            err,
            ParseErr::new(1, 5, ParseErrTy::TooManyArgs("run".to_string()))
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(expr(&ok), "push constant 1\n");

        let deep = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        assert_eq!(
            try_expr(&deep).unwrap_err().ty,
            ParseErrTy::NestingTooDeep("(".to_string())
        );

        let unary = format!("{}x", "-".repeat(1000));
        assert_eq!(
            try_expr(&unary).unwrap_err().ty,
            ParseErrTy::NestingTooDeep("-".to_string())
        );
    }
}
