//! Documentation formatting.
//!
//! Converts free-text documentation in the API's Markdown dialect into the
//! comment lines of a target language. The conversion keeps the document
//! structure (headings, paragraphs, lists, code, quotes) and rewrites only
//! what the target's documentation tool would misinterpret:
//!
//! - code blocks and block quotes become do-not-compile fenced blocks
//! - raw HTML outside a small allow-list is escaped
//! - bare URLs become autolinks
//! - reference links to model elements get definitions pointing at the
//!   generated types
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::docs::format_docs;
//! use apigen_codegen::rust::RustCodec;
//! use apigen_codegen::ResolveState;
//! use apigen_core::{Api, CodecOptions};
//!
//! let api = Api::new("test", "test.v1");
//! let codec = RustCodec::new(CodecOptions::default());
//! let mut state = ResolveState::new();
//!
//! let lines = format_docs(&codec, &api, "Line one.\n\nSee https://example.com.", &mut state);
//! assert_eq!(lines, vec!["/// Line one.", "///", "/// See <https://example.com>."]);
//! ```

mod links;
mod markdown;

use crate::codec::Codec;
use crate::state::ResolveState;
use apigen_core::Api;
use markdown::{Block, ListItem};

/// Indentation added per list nesting level.
const LIST_INDENT: &str = "    ";

/// Closing fence of code blocks and block quotes.
const CLOSE_FENCE: &str = "```";

/// Formats `documentation` as target comment lines.
///
/// Returns no lines for empty documentation. Every emitted line carries the
/// codec's comment prefix and has no trailing whitespace.
pub fn format_docs<C: Codec + ?Sized>(
    codec: &C,
    api: &Api,
    documentation: &str,
    state: &mut ResolveState,
) -> Vec<String> {
    let document = markdown::parse(documentation);

    let mut lines = Vec::new();
    for block in &document.blocks {
        render_block(codec, block, "", &mut lines);
        lines.push(String::new());
    }
    trim_trailing_blanks(&mut lines);

    let definitions = links::link_definitions(codec, api, &document.link_ids, state);
    if !definitions.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(definitions);
    }

    let prefix = codec.comment_prefix();
    lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {line}").trim_end().to_string()
            }
        })
        .collect()
}

fn render_block<C: Codec + ?Sized>(codec: &C, block: &Block, indent: &str, out: &mut Vec<String>) {
    match block {
        Block::Heading { level, text } => {
            out.push(format!("{indent}{} {text}", "#".repeat(*level)));
        }
        Block::Paragraph { lines, .. } | Block::Raw { lines } => {
            out.extend(lines.iter().map(|line| format!("{indent}{line}")));
        }
        Block::Code { lines } => {
            out.push(format!("{indent}{}", codec.no_compile_fence()));
            out.extend(lines.iter().map(|line| format!("{indent}{line}")));
            out.push(format!("{indent}{CLOSE_FENCE}"));
        }
        Block::Quote { lines } => render_quote(codec, lines, indent, out),
        Block::List { items, loose } => {
            for (i, item) in items.iter().enumerate() {
                if *loose && i > 0 {
                    out.push(String::new());
                }
                render_item(codec, item, *loose, indent, out);
            }
        }
    }
}

fn render_item<C: Codec + ?Sized>(
    codec: &C,
    item: &ListItem,
    loose: bool,
    indent: &str,
    out: &mut Vec<String>,
) {
    let nested = format!("{indent}{LIST_INDENT}");
    let mut blocks = item.blocks.iter();

    match blocks.next() {
        Some(Block::Paragraph { lines, .. }) => {
            let mut lines = lines.iter();
            let first = lines.next().map_or("", String::as_str);
            out.push(format!("{indent}{} {first}", item.marker));
            out.extend(lines.map(|line| format!("{nested}{line}")));
        }
        Some(other) => {
            out.push(format!("{indent}{}", item.marker));
            render_block(codec, other, &nested, out);
        }
        None => out.push(format!("{indent}{}", item.marker)),
    }

    for block in blocks {
        if loose {
            out.push(String::new());
        }
        render_block(codec, block, &nested, out);
    }
}

/// Re-emits a block quote as a fenced block.
///
/// Lines carrying a quote marker (up to three spaces, `>`, an optional
/// space) open or extend the fence; a lazy continuation line closes it and
/// is emitted as plain text.
fn render_quote<C: Codec + ?Sized>(codec: &C, lines: &[String], indent: &str, out: &mut Vec<String>) {
    let mut open = false;
    for line in lines {
        if let Some(content) = strip_quote_marker(line) {
            if !open {
                out.push(format!("{indent}{}", codec.no_compile_fence()));
                open = true;
            }
            out.push(format!("{indent}{content}"));
        } else {
            if open {
                out.push(format!("{indent}{CLOSE_FENCE}"));
                open = false;
            }
            out.push(format!("{indent}{}", line.trim()));
        }
    }
    if open {
        out.push(format!("{indent}{CLOSE_FENCE}"));
    }
}

fn strip_quote_marker(line: &str) -> Option<&str> {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    if spaces > 3 {
        return None;
    }
    let rest = line[spaces..].strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn trim_trailing_blanks(lines: &mut Vec<String>) {
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
}
