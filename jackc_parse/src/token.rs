use crate::reserved;
use std::fmt;

/// The five lexical categories of the language. The category of a token is
/// never stored, it is always derived from the lexeme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCategory {
    Keyword,
    Symbol,
    Identifier,
    IntConst,
    StrConst,
}

impl TokenCategory {
    /// The element name used for this category in token listings.
    pub fn xml_label(self) -> &'static str {
        match self {
            TokenCategory::Keyword => "keyword",
            TokenCategory::Symbol => "symbol",
            TokenCategory::Identifier => "identifier",
            TokenCategory::IntConst => "integerConstant",
            TokenCategory::StrConst => "stringConstant",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.xml_label())
    }
}

/// A lexeme with the 1-based line and column it started at. String constants
/// keep their surrounding quotes in `lexeme`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub line: usize,
    pub pos: usize,
}

impl Token {
    pub fn new(lexeme: &str, line: usize, pos: usize) -> Token {
        Token {
            lexeme: lexeme.to_string(),
            line,
            pos,
        }
    }

    pub fn category(&self) -> TokenCategory {
        category_of(&self.lexeme)
    }

    /// The token's text with the quotes of a string constant removed.
    pub fn text(&self) -> &str {
        match self.category() {
            TokenCategory::StrConst => self.lexeme.trim_matches('"'),
            _ => &self.lexeme,
        }
    }

    /// `text()` with `<`, `>`, `"` and `&` escaped as XML entities.
    pub fn xml_text(&self) -> String {
        let mut out = String::with_capacity(self.lexeme.len());
        for c in self.text().chars() {
            match c {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '&' => out.push_str("&amp;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Renders the token as one line of a token listing.
    pub fn to_xml(&self) -> String {
        let label = self.category().xml_label();
        format!("<{}> {} </{}>", label, self.xml_text(), label)
    }

    pub fn is_symbol(&self, sym: &str) -> bool {
        self.lexeme == sym && self.category() == TokenCategory::Symbol
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        self.lexeme == kw && self.category() == TokenCategory::Keyword
    }

    pub fn is_ident(&self) -> bool {
        self.category() == TokenCategory::Identifier
    }

    /// Column just past the end of this token.
    pub fn end_pos(&self) -> usize {
        self.pos + self.lexeme.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Classifies a lexeme. Digits-only text is an integer constant and anything
/// containing a quote is a string constant.
pub fn category_of(lexeme: &str) -> TokenCategory {
    if reserved::is_reserved_word(lexeme) {
        TokenCategory::Keyword
    } else if reserved::is_symbol(lexeme) {
        TokenCategory::Symbol
    } else if !lexeme.is_empty() && lexeme.chars().all(|c| c.is_ascii_digit()) {
        TokenCategory::IntConst
    } else if lexeme.contains('"') {
        TokenCategory::StrConst
    } else {
        TokenCategory::Identifier
    }
}
