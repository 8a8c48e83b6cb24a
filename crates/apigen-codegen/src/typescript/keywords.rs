//! TypeScript reserved words.

/// Reserved words, strict-mode reserved words, and the primitive type names.
const KEYWORDS: &[&str] = &[
    "any", "as", "boolean", "break", "case", "catch", "class", "const", "constructor", "continue",
    "debugger", "declare", "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "implements", "import", "in", "instanceof", "interface",
    "let", "new", "null", "number", "package", "private", "protected", "public", "return",
    "static", "string", "super", "switch", "symbol", "this", "throw", "true", "try", "typeof",
    "var", "void", "while", "with", "yield",
];

/// Escapes a TypeScript keyword with a trailing underscore.
///
/// # Examples
///
/// ```
/// use apigen_codegen::typescript::escape_keyword;
///
/// assert_eq!(escape_keyword("delete"), "delete_");
/// assert_eq!(escape_keyword("delete_"), "delete_");
/// assert_eq!(escape_keyword("name"), "name");
/// ```
#[must_use]
pub fn escape_keyword(symbol: &str) -> String {
    if KEYWORDS.contains(&symbol) {
        format!("{symbol}_")
    } else {
        symbol.to_string()
    }
}
