//! Identifier case conversion.
//!
//! Converts source identifiers into the naming conventions of a target
//! language. The word-splitting rules are shared by every target; keyword
//! escaping is target-specific and passed in as a function, which keeps every
//! conversion idempotent: converting an already-converted name yields the
//! same name.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::naming;
//!
//! let no_escape = |s: &str| s.to_string();
//!
//! assert_eq!(naming::to_snake("HTTPRequest", no_escape), "http_request");
//! assert_eq!(naming::to_pascal("create_time", no_escape), "CreateTime");
//! assert_eq!(naming::to_pascal("HTTPRequest", no_escape), "HTTPRequest");
//! assert_eq!(naming::to_camel("create_time", no_escape), "createTime");
//! ```

/// Splits an identifier into words.
///
/// Underscores, dashes, and whitespace separate words. Inside a word, a
/// lower-case letter or digit followed by an upper-case letter starts a new
/// word, and so does the last upper-case letter of an acronym that is
/// followed by a lower-case letter (`HTTPRequest` splits into `HTTP` and
/// `Request`). Letters followed by digits stay together (`v1beta`).
///
/// # Examples
///
/// ```
/// use apigen_codegen::naming::split_words;
///
/// assert_eq!(split_words("HTTPRequest"), vec!["HTTP", "Request"]);
/// assert_eq!(split_words("page_size"), vec!["page", "size"]);
/// assert_eq!(split_words("Http2Server"), vec!["Http2", "Server"]);
/// ```
#[must_use]
pub fn split_words(symbol: &str) -> Vec<String> {
    let chars: Vec<char> = symbol.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts to `snake_case` without keyword escaping.
///
/// A name without upper-case letters is considered snake-cased already and is
/// returned unchanged.
#[must_use]
pub fn to_snake_no_mangling(symbol: &str) -> String {
    if !symbol.chars().any(char::is_uppercase) {
        return symbol.to_string();
    }
    split_words(symbol)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts to `snake_case`, then escapes keywords.
#[must_use]
pub fn to_snake(symbol: &str, escape: impl Fn(&str) -> String) -> String {
    escape(&to_snake_no_mangling(symbol))
}

/// Converts to `PascalCase`, then escapes keywords.
///
/// A name that already starts with an upper-case letter and has no
/// underscores is only escaped, which preserves acronyms such as `IAMPolicy`.
#[must_use]
pub fn to_pascal(symbol: &str, escape: impl Fn(&str) -> String) -> String {
    if symbol.is_empty() {
        return String::new();
    }
    let starts_upper = symbol.chars().next().is_some_and(char::is_uppercase);
    if starts_upper && !symbol.contains('_') {
        return escape(symbol);
    }
    let pascal: String = split_words(symbol).iter().map(|w| capitalize(w)).collect();
    escape(&pascal)
}

/// Converts to `camelCase`, then escapes keywords.
#[must_use]
pub fn to_camel(symbol: &str, escape: impl Fn(&str) -> String) -> String {
    let mut camel = String::with_capacity(symbol.len());
    for (i, word) in split_words(symbol).iter().enumerate() {
        if i == 0 {
            camel.push_str(&word.to_lowercase());
        } else {
            camel.push_str(&capitalize(word));
        }
    }
    escape(&camel)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> String {
        s.to_string()
    }

    fn suffix_type(s: &str) -> String {
        if s == "type" { "type_".to_string() } else { s.to_string() }
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("fooBarBaz"), vec!["foo", "Bar", "Baz"]);
        assert_eq!(split_words("IAMPolicy"), vec!["IAM", "Policy"]);
        assert_eq!(split_words("HTTP"), vec!["HTTP"]);
        assert_eq!(split_words("foo__bar"), vec!["foo", "bar"]);
        assert_eq!(split_words("v1beta2"), vec!["v1beta2"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_to_snake() {
        assert_eq!(to_snake("FooBar", plain), "foo_bar");
        assert_eq!(to_snake("fooBar", plain), "foo_bar");
        assert_eq!(to_snake("HTTPRequest", plain), "http_request");
        assert_eq!(to_snake("HTTP", plain), "http");
        assert_eq!(to_snake("foo_bar", plain), "foo_bar");
        assert_eq!(to_snake("type", suffix_type), "type_");
    }

    #[test]
    fn test_to_snake_leaves_lower_case_alone() {
        assert_eq!(to_snake_no_mangling("already_snake_2"), "already_snake_2");
        assert_eq!(to_snake_no_mangling("type"), "type");
    }

    #[test]
    fn test_to_pascal() {
        assert_eq!(to_pascal("foo_bar", plain), "FooBar");
        assert_eq!(to_pascal("FOO_BAR", plain), "FooBar");
        assert_eq!(to_pascal("fooBar", plain), "FooBar");
        assert_eq!(to_pascal("IAMPolicy", plain), "IAMPolicy");
        assert_eq!(to_pascal("", plain), "");
    }

    #[test]
    fn test_to_camel() {
        assert_eq!(to_camel("foo_bar", plain), "fooBar");
        assert_eq!(to_camel("FooBar", plain), "fooBar");
        assert_eq!(to_camel("HTTPRequest", plain), "httpRequest");
        assert_eq!(to_camel("type", suffix_type), "type_");
    }

    #[test]
    fn test_conversions_are_idempotent() {
        for symbol in ["HTTPRequest", "foo_bar", "IAMPolicy", "type", "fooBar2Baz", "x"] {
            let snake = to_snake(symbol, suffix_type);
            assert_eq!(to_snake(&snake, suffix_type), snake, "snake({symbol})");

            let pascal = to_pascal(symbol, suffix_type);
            assert_eq!(to_pascal(&pascal, suffix_type), pascal, "pascal({symbol})");

            let camel = to_camel(symbol, suffix_type);
            assert_eq!(to_camel(&camel, suffix_type), camel, "camel({symbol})");
        }
    }
}
