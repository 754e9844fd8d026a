use jackc_err::lex_err::LexErr;
use jackc_parse::lex::Lexer;

/// Lexes `src` and renders every token as one line of an XML listing
/// wrapped in `<tokens>`. The parser is never involved.
pub fn listing(src: &str) -> Result<String, LexErr> {
    let mut lexer = Lexer::new(src)?;
    let mut out = String::from("<tokens>\n");

    while let Some(tkn) = lexer.advance() {
        out.push_str(&tkn.to_xml());
        out.push('\n');
    }

    out.push_str("</tokens>\n");
    Ok(out)
}
