//! Markdown parsing for documentation comments.
//!
//! Parses the API's Markdown dialect with `pulldown-cmark` into a small block
//! tree. Paragraph text is taken from the source, not re-rendered from
//! events, so the author's inline markup survives untouched except for the
//! edits collected while walking the inline events:
//! - raw HTML outside the allow-list is escaped
//! - bare URLs are wrapped in angle brackets, quoted ones become inline code
//!
//! Reference-link definitions produce no events; they are recovered from the
//! source text between top-level blocks and kept verbatim.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::LazyLock;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"`]+"#).expect("valid regex"));

static ALLOWED_HTML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^<(?:br\s*/?|/a|a\s+href\s*=\s*[^>]*)>$"#).expect("valid regex")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>\n]*>").expect("valid regex"));

static LINK_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}\[([^\]]+)\]:\s*\S").expect("valid regex")
});

static REFERENCE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]]*)\]\[([^\[\]]*)\]").expect("valid regex")
});

static LINK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid regex")
});

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]|\d{1,9}[.)])").expect("valid regex"));

/// One block of a parsed documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    Heading {
        level: usize,
        text: String,
    },
    Paragraph {
        lines: Vec<String>,
        /// Synthesized from the inline content of a tight list item
        implicit: bool,
    },
    Code {
        lines: Vec<String>,
    },
    /// Raw source lines of a block quote, markers included
    Quote {
        lines: Vec<String>,
    },
    List {
        items: Vec<ListItem>,
        loose: bool,
    },
    /// Emitted line by line: HTML blocks, tables, rules, link definitions
    Raw {
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListItem {
    pub marker: String,
    pub blocks: Vec<Block>,
}

/// A parsed documentation comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Document {
    pub blocks: Vec<Block>,
    /// IDs of reference links without a definition, sorted and deduplicated
    pub link_ids: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

#[derive(Debug, Default)]
struct InlineState {
    run: Option<Range<usize>>,
    link_depth: usize,
}

/// Parses `source` into blocks.
pub(crate) fn parse(source: &str) -> Document {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events: Vec<(Event<'_>, Range<usize>)> =
        Parser::new_ext(source, options).into_offset_iter().collect();

    let mut builder = TreeBuilder {
        source,
        events,
        pos: 0,
        edits: Vec::new(),
        protected: Vec::new(),
    };
    let mut top_level = builder.parse_top_level();

    let (definitions, labels) = link_definitions(source, &top_level);
    top_level.extend(definitions);
    top_level.sort_by_key(|(range, _)| range.start);

    let link_ids = reference_link_ids(source, &builder.protected, &labels);
    Document {
        blocks: top_level.into_iter().map(|(_, block)| block).collect(),
        link_ids,
    }
}

/// Returns `true` if an inline HTML tag may pass through unescaped.
pub(crate) fn is_allowed_html(tag: &str) -> bool {
    ALLOWED_HTML.is_match(tag.trim())
}

/// Escapes every HTML tag in `text` that is not allow-listed.
pub(crate) fn escape_html(text: &str) -> String {
    HTML_TAG
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let tag = &caps[0];
            if is_allowed_html(tag) { tag.to_string() } else { escape_angles(tag) }
        })
        .into_owned()
}

fn escape_angles(text: &str) -> String {
    text.replace('<', "\\<").replace('>', "\\>")
}

struct TreeBuilder<'a> {
    source: &'a str,
    events: Vec<(Event<'a>, Range<usize>)>,
    pos: usize,
    edits: Vec<Edit>,
    /// Source ranges whose text is never scanned for links
    protected: Vec<Range<usize>>,
}

impl<'a> TreeBuilder<'a> {
    fn next(&mut self) -> Option<(Event<'a>, Range<usize>)> {
        let event = self.events.get(self.pos).cloned();
        self.pos += 1;
        event
    }

    fn parse_top_level(&mut self) -> Vec<(Range<usize>, Block)> {
        let mut blocks = Vec::new();
        while let Some((event, range)) = self.next() {
            match event {
                Event::Start(tag) => blocks.push((range.clone(), self.parse_block(tag, range))),
                Event::Rule => blocks.push((range.clone(), self.raw(&range))),
                Event::Html(_) => {
                    let lines = self.raw_lines(&range).iter().map(|l| escape_html(l)).collect();
                    blocks.push((range, Block::Raw { lines }));
                }
                _ => {}
            }
        }
        blocks
    }

    /// Parses blocks until the end of the enclosing container.
    fn parse_blocks(&mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut inline = InlineState::default();
        let mut implicit: Option<Range<usize>> = None;
        let mut inline_depth = 0usize;

        while let Some((event, range)) = self.next() {
            match &event {
                Event::End(_) if inline_depth == 0 => break,
                Event::End(_) => inline_depth -= 1,
                Event::Start(tag) if !is_inline_tag(tag) => {
                    self.flush(&mut inline);
                    if let Some(text) = implicit.take() {
                        blocks.push(self.paragraph(&text, true));
                    }
                    let tag = tag.clone();
                    blocks.push(self.parse_block(tag, range));
                    continue;
                }
                Event::Start(_) => inline_depth += 1,
                Event::Rule => {
                    blocks.push(self.raw(&range));
                    continue;
                }
                _ => {}
            }
            implicit = Some(match implicit {
                Some(text) => text.start..range.end.max(text.end),
                None => range.clone(),
            });
            self.inline_event(&event, range, &mut inline);
        }
        self.flush(&mut inline);
        if let Some(text) = implicit {
            blocks.push(self.paragraph(&text, true));
        }
        blocks
    }

    fn parse_block(&mut self, tag: Tag<'a>, range: Range<usize>) -> Block {
        match tag {
            Tag::Paragraph => {
                self.parse_inlines();
                self.paragraph(&range, false)
            }
            Tag::Heading { level, .. } => {
                self.parse_inlines();
                let text = self.apply_edits(&range);
                Block::Heading {
                    level: level as usize,
                    text: heading_text(&text),
                }
            }
            Tag::CodeBlock(_) => {
                let mut text = String::new();
                while let Some((event, _)) = self.next() {
                    match event {
                        Event::Text(t) => text.push_str(&t),
                        Event::End(_) => break,
                        _ => {}
                    }
                }
                self.protected.push(range);
                Block::Code {
                    lines: text.lines().map(str::to_string).collect(),
                }
            }
            Tag::BlockQuote(_) => {
                self.skip_container();
                let lines = self.raw_lines(&range);
                self.protected.push(range);
                Block::Quote { lines }
            }
            Tag::List(_) => self.parse_list(),
            Tag::Table(_) => {
                self.parse_inlines();
                Block::Raw {
                    lines: self.edited_lines(&range),
                }
            }
            Tag::HtmlBlock => {
                self.skip_container();
                self.protected.push(range.clone());
                Block::Raw {
                    lines: self.raw_lines(&range).iter().map(|l| escape_html(l)).collect(),
                }
            }
            _ => {
                self.skip_container();
                self.raw(&range)
            }
        }
    }

    fn parse_list(&mut self) -> Block {
        let mut items = Vec::new();
        while let Some((event, range)) = self.next() {
            match event {
                Event::Start(Tag::Item) => {
                    let marker = LIST_MARKER
                        .find(&self.source[range.start..])
                        .map_or_else(|| "-".to_string(), |m| m.as_str().to_string());
                    let blocks = self.parse_blocks();
                    items.push(ListItem { marker, blocks });
                }
                Event::End(TagEnd::List(_)) => break,
                _ => {}
            }
        }
        let loose = items.iter().any(|item| {
            item.blocks
                .iter()
                .any(|b| matches!(b, Block::Paragraph { implicit: false, .. }))
        });
        Block::List { items, loose }
    }

    /// Consumes inline events up to the end of the current leaf block.
    fn parse_inlines(&mut self) {
        let mut state = InlineState::default();
        let mut depth = 0usize;
        while let Some((event, range)) = self.next() {
            match &event {
                Event::End(_) if depth == 0 => break,
                Event::End(_) => depth -= 1,
                Event::Start(_) => depth += 1,
                _ => {}
            }
            self.inline_event(&event, range, &mut state);
        }
        self.flush(&mut state);
    }

    fn skip_container(&mut self) {
        let mut depth = 0usize;
        while let Some((event, _)) = self.next() {
            match event {
                Event::End(_) if depth == 0 => return,
                Event::End(_) => depth -= 1,
                Event::Start(_) => depth += 1,
                _ => {}
            }
        }
    }

    fn inline_event(&mut self, event: &Event<'a>, range: Range<usize>, state: &mut InlineState) {
        match event {
            Event::Text(_) if state.link_depth == 0 => {
                state.run = Some(match state.run.take() {
                    Some(run) if run.end == range.start => run.start..range.end,
                    Some(run) => {
                        self.wrap_urls(&run);
                        range
                    }
                    None => range,
                });
                return;
            }
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => state.link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => {
                state.link_depth = state.link_depth.saturating_sub(1);
            }
            Event::InlineHtml(html) if !is_allowed_html(html) => {
                self.edits.push(Edit {
                    range: range.clone(),
                    replacement: escape_angles(&self.source[range]),
                });
            }
            Event::Code(_) => self.protected.push(range),
            _ => {}
        }
        self.flush(state);
    }

    fn flush(&mut self, state: &mut InlineState) {
        if let Some(run) = state.run.take() {
            self.wrap_urls(&run);
        }
    }

    /// Collects edits for the bare URLs of a contiguous text run.
    fn wrap_urls(&mut self, run: &Range<usize>) {
        let text = &self.source[run.clone()];
        for found in URL.find_iter(text) {
            let url = trim_url(found.as_str());
            let start = run.start + found.start();
            let end = start + url.len();
            let before = text[..found.start()].chars().next_back();
            let after = text[found.start() + url.len()..].chars().next();

            if before == Some('<') {
                continue;
            }
            if before == Some('"') && after == Some('"') {
                self.edits.push(Edit {
                    range: start - 1..end + 1,
                    replacement: format!("`{url}`"),
                });
            } else {
                self.edits.push(Edit {
                    range: start..end,
                    replacement: format!("<{url}>"),
                });
            }
        }
    }

    fn apply_edits(&self, range: &Range<usize>) -> String {
        let mut edits: Vec<&Edit> = self
            .edits
            .iter()
            .filter(|e| e.range.start >= range.start && e.range.end <= range.end)
            .collect();
        edits.sort_by_key(|e| e.range.start);

        let mut text = String::with_capacity(range.len());
        let mut cursor = range.start;
        for edit in edits {
            if edit.range.start < cursor {
                continue;
            }
            text.push_str(&self.source[cursor..edit.range.start]);
            text.push_str(&edit.replacement);
            cursor = edit.range.end;
        }
        text.push_str(&self.source[cursor..range.end]);
        text
    }

    fn paragraph(&self, range: &Range<usize>, implicit: bool) -> Block {
        let text = self.apply_edits(range);
        let mut lines: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        Block::Paragraph { lines, implicit }
    }

    fn raw(&self, range: &Range<usize>) -> Block {
        Block::Raw {
            lines: self.raw_lines(range),
        }
    }

    fn raw_lines(&self, range: &Range<usize>) -> Vec<String> {
        self.block_lines(range.start, &self.source[range.clone()])
    }

    /// Source lines of a block with the collected inline edits applied.
    fn edited_lines(&self, range: &Range<usize>) -> Vec<String> {
        self.block_lines(range.start, &self.apply_edits(range))
    }

    fn block_lines(&self, start: usize, text: &str) -> Vec<String> {
        let indent = self.column(start);
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                let line = if i == 0 { line } else { strip_indent(line, indent) };
                line.trim_end().to_string()
            })
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn column(&self, offset: usize) -> usize {
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        offset - line_start
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Link { .. }
            | Tag::Image { .. }
    )
}

fn heading_text(source: &str) -> String {
    let first = source.lines().next().unwrap_or_default().trim();
    if first.starts_with('#') {
        first
            .trim_start_matches('#')
            .trim_end_matches('#')
            .trim()
            .to_string()
    } else {
        first.to_string()
    }
}

/// Drops trailing punctuation and an unbalanced closing parenthesis.
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let trimmed = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '\'']);
        let trimmed = if trimmed.ends_with(')') && trimmed.matches('(').count() < trimmed.matches(')').count() {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    &line[spaces.min(indent)..]
}

/// Recovers reference-link definitions from the gaps between top-level
/// blocks. Returns the definition blocks and their lower-cased labels.
fn link_definitions(
    source: &str,
    blocks: &[(Range<usize>, Block)],
) -> (Vec<(Range<usize>, Block)>, BTreeSet<String>) {
    let mut definitions: Vec<(Range<usize>, Block)> = Vec::new();
    let mut labels = BTreeSet::new();
    let mut offset = 0;
    let mut previous_end = None;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if blocks.iter().any(|(range, _)| range.start <= start && start < range.end) {
            continue;
        }
        let Some(caps) = LINK_DEFINITION.captures(line) else {
            continue;
        };
        labels.insert(caps[1].to_lowercase());
        let text = line.trim_end().to_string();
        if previous_end == Some(start)
            && let Some((range, Block::Raw { lines })) = definitions.last_mut()
        {
            lines.push(text);
            range.end = offset;
        } else {
            definitions.push((start..offset, Block::Raw { lines: vec![text] }));
        }
        previous_end = Some(offset);
    }
    (definitions, labels)
}

fn reference_link_ids(
    source: &str,
    protected: &[Range<usize>],
    defined: &BTreeSet<String>,
) -> BTreeSet<String> {
    REFERENCE_LINK
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if protected
                .iter()
                .any(|p| whole.start() < p.end && p.start < whole.end())
            {
                return None;
            }
            let id = match caps.get(2).map(|m| m.as_str()) {
                Some(id) if !id.is_empty() => id,
                _ => caps.get(1)?.as_str(),
            };
            let id = id.trim();
            (LINK_ID.is_match(id) && !defined.contains(&id.to_lowercase())).then(|| id.to_string())
        })
        .collect()
}
