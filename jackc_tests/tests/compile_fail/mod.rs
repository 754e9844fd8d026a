use jackc_err::{compile_err::CompileErr, err::JackErr};
use jackc_parse::compile_source;
use std::fs;

macro_rules! compile_fail_test {
    ($test_name:ident, $expected:expr) => {
        #[test]
        fn $test_name() {
            let file = format!("{}.jack", stringify!($test_name));
            let path = format!("./tests/compile_fail/inputs/{}", file);
            let src = fs::read_to_string(&path).unwrap();

            let ty = compile_source(&src).unwrap_err();
            assert_eq!(CompileErr::new(&file, ty).to_msg(), $expected);
        }
    };
}

compile_fail_test!(
    undeclared_symbol,
    "undeclared_symbol.jack: Parse error - [Line 3:13] Undeclared symbol 'total' found"
);
compile_fail_test!(
    missing_brace,
    "missing_brace.jack: Parse error - [Line 6:2] Unexpected end of file, expected '}'"
);
compile_fail_test!(
    lex_error,
    "lex_error.jack: Lex error - [Line 4:19] Unrecognized character '#'"
);
compile_fail_test!(
    int_overflow,
    "int_overflow.jack: Parse error - [Line 3:16] Integer constant '40000' is out of range 0..=32767"
);
compile_fail_test!(
    trailing_tokens,
    "trailing_tokens.jack: Parse error - [Line 3:1] Unexpected token '}' after the end of the class"
);
compile_fail_test!(
    duplicate_field,
    "duplicate_field.jack: Parse error - [Line 3:19] Symbol 'x' is already declared in this scope"
);
compile_fail_test!(
    missing_semicolon,
    "missing_semicolon.jack: Parse error - [Line 5:9] Expected token ';', but found 'return'"
);
compile_fail_test!(
    bad_call,
    "bad_call.jack: Parse error - [Line 3:28] Expected token '(', but found '5'"
);
