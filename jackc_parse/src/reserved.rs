use once_cell::sync::Lazy;
use std::collections::HashSet;

static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(get_reserved_words);

static SYMBOLS: Lazy<HashSet<&'static str>> = Lazy::new(get_symbols);

fn get_reserved_words() -> HashSet<&'static str> {
    [
        "class",
        "constructor",
        "function",
        "method",
        "field",
        "static",
        "var",
        "int",
        "char",
        "boolean",
        "void",
        "true",
        "false",
        "null",
        "this",
        "let",
        "do",
        "if",
        "else",
        "while",
        "return",
    ]
    .iter()
    .cloned()
    .collect()
}

fn get_symbols() -> HashSet<&'static str> {
    [
        "{", "}", "(", ")", "[", "]", ".", ",", ";", "+", "-", "*", "/", "&", "|", "<", ">", "=",
        "~",
    ]
    .iter()
    .cloned()
    .collect()
}

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word)
}

pub fn is_symbol(s: &str) -> bool {
    SYMBOLS.contains(s)
}

/// Primitive type names accepted wherever a type is expected.
pub fn is_primitive_type(word: &str) -> bool {
    match word {
        "int" | "char" | "boolean" => true,
        _ => false,
    }
}
