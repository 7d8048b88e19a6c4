use serde::Serialize;

/// ADF node types.
///
/// Only a subset is produced from markdown. The remaining variants are
/// reserved so the identifiers stay in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Rule,
    Table,
    TableRow,
    TableHeader,
    TableCell,
    MediaSingle,
    MediaGroup,
    Media,
    Panel,
    Emoji,
    HardBreak,
    InlineCard,
    Mention,
    Text,
}

impl NodeType {
    /// Inline nodes live inside a text block and never hold content.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeType::Emoji
                | NodeType::HardBreak
                | NodeType::InlineCard
                | NodeType::Mention
                | NodeType::Text
        )
    }

    /// Containers that the schema rejects when their content is empty.
    pub fn requires_content(self) -> bool {
        matches!(
            self,
            NodeType::Blockquote | NodeType::ListItem | NodeType::TableCell | NodeType::TableHeader
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::BulletList => "bulletList",
            NodeType::OrderedList => "orderedList",
            NodeType::ListItem => "listItem",
            NodeType::CodeBlock => "codeBlock",
            NodeType::Rule => "rule",
            NodeType::Table => "table",
            NodeType::TableRow => "tableRow",
            NodeType::TableHeader => "tableHeader",
            NodeType::TableCell => "tableCell",
            NodeType::MediaSingle => "mediaSingle",
            NodeType::MediaGroup => "mediaGroup",
            NodeType::Media => "media",
            NodeType::Panel => "panel",
            NodeType::Emoji => "emoji",
            NodeType::HardBreak => "hardBreak",
            NodeType::InlineCard => "inlineCard",
            NodeType::Mention => "mention",
            NodeType::Text => "text",
        }
    }
}

/// Placement of a media node relative to the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    WrapLeft,
    Center,
    WrapRight,
    Wide,
    FullWidth,
    AlignStart,
    AlignEnd,
}

/// Type-specific node attributes. Each field is only set for the node
/// types that define it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attrs {
    /// Heading level, 1 to 6
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Code block language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// First number of an ordered list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u64>,
    /// Media placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Media width in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubSup {
    Sub,
    Sup,
}

/// Inline formatting attached to a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "attrs", rename_all = "camelCase")]
pub enum Mark {
    Code,
    Em,
    Link {
        href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Strike,
    Strong,
    Subsup {
        #[serde(rename = "type")]
        kind: SubSup,
    },
    TextColor {
        color: String,
    },
    Underline,
}

impl Mark {
    /// Whether both marks are of the same type, ignoring attributes.
    pub fn same_type(&self, other: &Mark) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single ADF node. Containers hold child ids in `content`; text
/// leaves hold `text` and `marks`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeType,
    pub attrs: Option<Attrs>,
    pub content: Vec<NodeId>,
    pub marks: Vec<Mark>,
    pub text: Option<String>,
}

impl Node {
    /// An empty node of the given type.
    pub fn new(kind: NodeType) -> Self {
        Self {
            kind,
            attrs: None,
            content: Vec::new(),
            marks: Vec::new(),
            text: None,
        }
    }

    /// A text leaf. Empty text becomes a single space since the schema
    /// rejects empty text nodes.
    pub fn text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        let mut text = text.into();
        if text.is_empty() {
            text.push(' ');
        }
        Self {
            text: Some(text),
            marks,
            ..Self::new(NodeType::Text)
        }
    }

    pub fn with_attrs(mut self, attrs: Option<Attrs>) -> Self {
        self.attrs = attrs;
        self
    }
}

/// An ADF document stored as an arena.
///
/// The root `doc` node is created with the document and sits at index 0.
/// Nodes are only ever appended, so ids stay valid for the lifetime of
/// the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeType::Doc)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Append `node` to the content of `parent` and return its id.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        debug_assert!(
            !self.nodes[parent.0].kind.is_inline(),
            "inline nodes cannot hold content"
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].content.push(id);
        id
    }

    /// Append a text leaf to `parent`, merging it into the last child when
    /// that is a text leaf with the same marks. Returns the id holding the
    /// text.
    pub fn append_text(&mut self, parent: NodeId, node: Node) -> NodeId {
        if let Some(&last) = self.nodes[parent.0].content.last() {
            let prev = &mut self.nodes[last.0];
            if prev.kind == NodeType::Text && prev.marks == node.marks {
                if let (Some(text), Some(more)) = (prev.text.as_mut(), node.text) {
                    text.push_str(&more);
                }
                return last;
            }
        }
        self.append(parent, node)
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.node(id).content.iter().map(|child| self.node(*child))
    }

    /// Number of nodes, including the root.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
