use jackc_driver::tokens::listing;
use jackc_parse::{lex::Lexer, token::TokenCategory};
use std::fs;

const INPUT_PATH: &str = "./tests/lex/inputs";

macro_rules! token_listing_test {
    ($test_name:ident, $expected:expr) => {
        #[test]
        fn $test_name() {
            let path = format!("{}/{}.jack", INPUT_PATH, stringify!($test_name));
            let src = fs::read_to_string(&path).unwrap();

            let mut output = String::from("\n");
            output.push_str(&listing(&src).unwrap());
            assert_eq!(output, $expected);
        }
    };
}

token_listing_test! {
    square,
    r#"
<tokens>
<keyword> class </keyword>
<identifier> Sq </identifier>
<symbol> { </symbol>
<keyword> field </keyword>
<keyword> int </keyword>
<identifier> size </identifier>
<symbol> ; </symbol>
<keyword> method </keyword>
<keyword> boolean </keyword>
<identifier> fits </identifier>
<symbol> ( </symbol>
<identifier> String </identifier>
<identifier> s </identifier>
<symbol> ) </symbol>
<symbol> { </symbol>
<keyword> return </keyword>
<symbol> ( </symbol>
<identifier> size </identifier>
<symbol> &lt; </symbol>
<integerConstant> 10 </integerConstant>
<symbol> ) </symbol>
<symbol> &amp; </symbol>
<symbol> ~ </symbol>
<symbol> ( </symbol>
<identifier> s </identifier>
<symbol> = </symbol>
<stringConstant> a&amp;b </stringConstant>
<symbol> ) </symbol>
<symbol> ; </symbol>
<symbol> } </symbol>
<symbol> } </symbol>
</tokens>
"#
}

#[test]
fn lexer_restarts_from_first_token() {
    let src = fs::read_to_string(format!("{}/square.jack", INPUT_PATH)).unwrap();
    let mut lexer = Lexer::new(&src).unwrap();

    let mut first_pass = Vec::new();
    while let Some(t) = lexer.advance() {
        first_pass.push(t.clone());
    }
    assert_eq!(first_pass.len(), lexer.len());

    lexer.reset();
    let t = lexer.advance().unwrap();
    assert_eq!((t.lexeme.as_str(), t.line, t.pos), ("class", 2, 1));
    assert_eq!(t.category(), TokenCategory::Keyword);
}
