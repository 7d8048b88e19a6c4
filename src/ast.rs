//! Markdown syntax tree.
//!
//! pulldown-cmark produces a flat stream of `Start`/`End` events. This
//! module materializes that stream into a tree of [`MdNode`]s carrying
//! their source spans, and offers a depth-first [`walk`] that visits every
//! node on entry and on exit.

use std::ops::Range;

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
};

use crate::config::MarkdownConfig;

/// Kinds of markdown nodes, with the attributes the converter needs.
#[derive(Debug, Clone, PartialEq)]
pub enum MdKind {
    Document,
    Paragraph,
    /// Inline content placed directly in a list item or table cell
    TextBlock,
    Heading {
        level: u8,
    },
    BlockQuote,
    CodeBlock {
        /// First word of the fence info string, if any
        language: Option<String>,
    },
    List {
        ordered: bool,
        start: Option<u64>,
    },
    Item,
    ThematicBreak,
    Table,
    TableHead,
    TableRow,
    TableCell {
        header: bool,
    },
    Text(String),
    Code(String),
    SoftBreak,
    HardBreak,
    /// Emphasis by strength: 1 for `*a*`, 2 for `**a**`
    Emphasis {
        strength: u8,
    },
    Strikethrough,
    Superscript,
    Subscript,
    Link {
        href: String,
        title: Option<String>,
    },
    Image {
        src: String,
        title: Option<String>,
    },
    HtmlBlock,
    Html(String),
    InlineHtml(String),
    /// Anything the tree builder does not model
    Unknown(&'static str),
}

impl MdKind {
    pub fn name(&self) -> &'static str {
        match self {
            MdKind::Document => "document",
            MdKind::Paragraph => "paragraph",
            MdKind::TextBlock => "text block",
            MdKind::Heading { .. } => "heading",
            MdKind::BlockQuote => "block quote",
            MdKind::CodeBlock { .. } => "code block",
            MdKind::List { .. } => "list",
            MdKind::Item => "list item",
            MdKind::ThematicBreak => "thematic break",
            MdKind::Table => "table",
            MdKind::TableHead => "table head",
            MdKind::TableRow => "table row",
            MdKind::TableCell { .. } => "table cell",
            MdKind::Text(_) => "text",
            MdKind::Code(_) => "code span",
            MdKind::SoftBreak => "soft break",
            MdKind::HardBreak => "hard break",
            MdKind::Emphasis { .. } => "emphasis",
            MdKind::Strikethrough => "strikethrough",
            MdKind::Superscript => "superscript",
            MdKind::Subscript => "subscript",
            MdKind::Link { .. } => "link",
            MdKind::Image { .. } => "image",
            MdKind::HtmlBlock => "html block",
            MdKind::Html(_) => "html",
            MdKind::InlineHtml(_) => "inline html",
            MdKind::Unknown(name) => name,
        }
    }

    /// Whether the node belongs inside a paragraph-like block.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            MdKind::Text(_)
                | MdKind::Code(_)
                | MdKind::SoftBreak
                | MdKind::HardBreak
                | MdKind::Emphasis { .. }
                | MdKind::Strikethrough
                | MdKind::Superscript
                | MdKind::Subscript
                | MdKind::Link { .. }
                | MdKind::Image { .. }
                | MdKind::InlineHtml(_)
        )
    }

    /// Containers whose inline children get wrapped in a [`MdKind::TextBlock`].
    fn wraps_inline(&self) -> bool {
        matches!(self, MdKind::Item | MdKind::TableCell { .. })
    }
}

/// A node of the markdown tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MdNode {
    pub kind: MdKind,
    /// Byte range of the node in the source text
    pub span: Range<usize>,
    pub children: Vec<MdNode>,
}

impl MdNode {
    fn new(kind: MdKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    /// Literal text of the node: the text of all its descendants joined
    /// in document order, without any markup.
    pub fn literal(&self) -> String {
        let mut out = String::new();
        collect_literal(self, &mut out);
        out
    }
}

fn collect_literal(node: &MdNode, out: &mut String) {
    match &node.kind {
        MdKind::Text(text) | MdKind::Code(text) => out.push_str(text),
        _ => {
            for child in &node.children {
                collect_literal(child, out);
            }
        }
    }
}

/// What the walk does after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Continue,
    /// Do not visit the children; `exit` is still called
    SkipChildren,
}

/// Hooks for [`walk`].
pub trait Visitor {
    type Error;

    fn enter(&mut self, node: &MdNode) -> Result<WalkStatus, Self::Error>;

    fn exit(&mut self, node: &MdNode) -> Result<(), Self::Error>;
}

/// Depth-first walk calling `enter` before and `exit` after each node's
/// children.
pub fn walk<V: Visitor>(node: &MdNode, visitor: &mut V) -> Result<(), V::Error> {
    if visitor.enter(node)? == WalkStatus::Continue {
        for child in &node.children {
            walk(child, visitor)?;
        }
    }
    visitor.exit(node)
}

/// Strip YAML front matter from the beginning of markdown content.
///
/// The block must open with a line that is exactly `---`, must not start
/// with a blank line, and ends at the next line that is exactly `---`.
/// Returns the remaining text and its byte offset in the input.
fn strip_frontmatter(markdown: &str) -> (&str, usize) {
    let Some(body) = markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    else {
        return (markdown, 0);
    };
    // `---` followed by a blank line is a thematic break
    if body.starts_with('\n') || body.starts_with("\r\n") {
        return (markdown, 0);
    }

    let mut end = markdown.len() - body.len();
    for line in body.split_inclusive('\n') {
        end += line.len();
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let rest = markdown[end..].trim_start_matches(['\r', '\n']);
            return (rest, markdown.len() - rest.len());
        }
    }
    (markdown, 0)
}

fn parser_options(config: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    if config.tables {
        options.insert(Options::ENABLE_TABLES);
    }
    if config.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if config.heading_attributes {
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    }
    if config.superscript {
        options.insert(Options::ENABLE_SUPERSCRIPT);
    }
    if config.subscript {
        options.insert(Options::ENABLE_SUBSCRIPT);
    }
    if config.smart_punctuation {
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
    }
    options
}

/// Parse markdown text into a tree rooted at a [`MdKind::Document`] node.
///
/// Spans are byte offsets into `markdown`, front matter included.
pub fn parse(markdown: &str, config: &MarkdownConfig) -> MdNode {
    let (body, offset) = if config.strip_frontmatter {
        strip_frontmatter(markdown)
    } else {
        (markdown, 0)
    };

    let parser = Parser::new_ext(body, parser_options(config));
    let mut builder = TreeBuilder::new(markdown.len());

    for (event, range) in parser.into_offset_iter() {
        builder.process_event(event, range.start + offset..range.end + offset);
    }

    builder.finish()
}

struct TreeBuilder {
    // Open nodes, the document at the bottom
    open: Vec<MdNode>,
    in_table_head: bool,
}

impl TreeBuilder {
    fn new(len: usize) -> Self {
        Self {
            open: vec![MdNode::new(MdKind::Document, 0..len)],
            in_table_head: false,
        }
    }

    fn top(&self) -> &MdNode {
        &self.open[self.open.len() - 1]
    }

    fn top_mut(&mut self) -> &mut MdNode {
        let last = self.open.len() - 1;
        &mut self.open[last]
    }

    fn process_event(&mut self, event: Event, span: Range<usize>) {
        match event {
            Event::Start(tag) => {
                let kind = self.tag_kind(tag);
                self.open_node(MdNode::new(kind, span));
            }
            Event::End(tag_end) => {
                // A text block is never closed by its own event
                if self.top().kind == MdKind::TextBlock {
                    self.close_node();
                }
                if matches!(tag_end, TagEnd::TableHead) {
                    self.in_table_head = false;
                }
                self.close_node();
            }

            Event::Text(text) => self.leaf(MdKind::Text(text.into_string()), span),
            Event::Code(code) => self.leaf(MdKind::Code(code.into_string()), span),
            Event::SoftBreak => self.leaf(MdKind::SoftBreak, span),
            Event::HardBreak => self.leaf(MdKind::HardBreak, span),
            Event::Rule => self.leaf(MdKind::ThematicBreak, span),
            Event::Html(html) => self.leaf(MdKind::Html(html.into_string()), span),
            Event::InlineHtml(html) => self.leaf(MdKind::InlineHtml(html.into_string()), span),

            Event::FootnoteReference(_) => self.leaf(MdKind::Unknown("footnote reference"), span),
            Event::TaskListMarker(_) => self.leaf(MdKind::Unknown("task list marker"), span),
            _ => self.leaf(MdKind::Unknown("math"), span),
        }
    }

    fn tag_kind(&mut self, tag: Tag) -> MdKind {
        match tag {
            Tag::Paragraph => MdKind::Paragraph,
            Tag::Heading { level, .. } => MdKind::Heading {
                level: heading_level_to_u8(level),
            },
            Tag::BlockQuote(_) => MdKind::BlockQuote,
            Tag::CodeBlock(kind) => MdKind::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                    CodeBlockKind::Indented => None,
                },
            },
            Tag::HtmlBlock => MdKind::HtmlBlock,
            Tag::List(start) => MdKind::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => MdKind::Item,
            Tag::Table(_) => MdKind::Table,
            Tag::TableHead => {
                self.in_table_head = true;
                MdKind::TableHead
            }
            Tag::TableRow => MdKind::TableRow,
            Tag::TableCell => MdKind::TableCell {
                header: self.in_table_head,
            },
            Tag::Emphasis => MdKind::Emphasis { strength: 1 },
            Tag::Strong => MdKind::Emphasis { strength: 2 },
            Tag::Strikethrough => MdKind::Strikethrough,
            Tag::Superscript => MdKind::Superscript,
            Tag::Subscript => MdKind::Subscript,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = if link_type == LinkType::Email && !dest_url.starts_with("mailto:") {
                    format!("mailto:{}", dest_url)
                } else {
                    dest_url.into_string()
                };
                MdKind::Link {
                    href,
                    title: non_empty(title.into_string()),
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => MdKind::Image {
                src: dest_url.into_string(),
                title: non_empty(title.into_string()),
            },
            Tag::FootnoteDefinition(_) => MdKind::Unknown("footnote definition"),
            Tag::MetadataBlock(_) => MdKind::Unknown("metadata block"),
            _ => MdKind::Unknown("extension"),
        }
    }

    fn open_node(&mut self, node: MdNode) {
        self.prepare_parent(&node);
        self.open.push(node);
    }

    fn leaf(&mut self, kind: MdKind, span: Range<usize>) {
        let node = MdNode::new(kind, span);
        self.prepare_parent(&node);
        self.top_mut().children.push(node);
    }

    // Wrap inline runs of list items and table cells in a text block, and
    // end the run when a block follows it.
    fn prepare_parent(&mut self, node: &MdNode) {
        let inline = node.kind.is_inline();
        if self.top().kind == MdKind::TextBlock {
            if !inline {
                self.close_node();
            }
        } else if inline && self.top().kind.wraps_inline() {
            self.open.push(MdNode::new(MdKind::TextBlock, node.span.clone()));
        }
    }

    fn close_node(&mut self) {
        if self.open.len() == 1 {
            return;
        }
        let Some(mut node) = self.open.pop() else {
            return;
        };
        if node.kind == MdKind::TextBlock {
            if let Some(last) = node.children.last() {
                node.span.end = last.span.end;
            }
        }
        self.top_mut().children.push(node);
    }

    fn finish(mut self) -> MdNode {
        while self.open.len() > 1 {
            self.close_node();
        }
        self.open.remove(0)
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
