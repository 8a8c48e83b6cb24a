//! Rust reserved words.

/// Keywords that can be used as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers; escaped with a trailing underscore.
const SUFFIXED_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Escapes a Rust keyword.
///
/// # Examples
///
/// ```
/// use apigen_codegen::rust::escape_keyword;
///
/// assert_eq!(escape_keyword("type"), "r#type");
/// assert_eq!(escape_keyword("self"), "self_");
/// assert_eq!(escape_keyword("name"), "name");
/// ```
#[must_use]
pub fn escape_keyword(symbol: &str) -> String {
    if SUFFIXED_KEYWORDS.contains(&symbol) {
        format!("{symbol}_")
    } else if RAW_KEYWORDS.contains(&symbol) {
        format!("r#{symbol}")
    } else {
        symbol.to_string()
    }
}
