//! Markdown tree to ADF tree transformation.
//!
//! The transformer walks the markdown tree once. Block constructs open a
//! container on the [`BlockStack`]; text and breaks are appended to the
//! container on top of it. Inline styling does not produce nodes: emphasis,
//! links and the like push a mark that every text leaf beneath them
//! carries.
//!
//! Inside a block quote the stack only materializes paragraphs. To keep
//! the text of other blocks, headings and code blocks are turned into
//! paragraphs there before they reach the stack.
//!
//! A list item only holds paragraphs, lists and code blocks. Headings
//! directly in an item become paragraphs, rules are dropped, and block
//! quotes and tables are elided so that their paragraphs land in the
//! item.

use crate::ast::{walk, MdKind, MdNode, Visitor, WalkStatus};
use crate::config::UnsupportedPolicy;
use crate::error::{Error, Result};
use crate::mapping::{adf_attrs, adf_mark, adf_type, is_unsupported};
use crate::node::{Document, Mark, Node, NodeId, NodeType};
use crate::stack::BlockStack;

/// An open mark-producing construct.
struct MarkFrame {
    /// Whether the construct added a mark, or repeated an active one
    pushed: bool,
    /// Leaves emitted before the construct was entered
    leaves: usize,
}

/// Builds one ADF document. Create a new transformer per conversion.
pub struct Transformer {
    doc: Document,
    stack: BlockStack,
    marks: Vec<Mark>,
    frames: Vec<MarkFrame>,
    leaves: usize,
    policy: UnsupportedPolicy,
}

impl Transformer {
    pub fn new(policy: UnsupportedPolicy) -> Self {
        let doc = Document::new();
        let stack = BlockStack::new(doc.root());
        Self {
            doc,
            stack,
            marks: Vec::new(),
            frames: Vec::new(),
            leaves: 0,
            policy,
        }
    }

    /// Convert the tree rooted at `root` and return the finished document.
    pub fn transform(mut self, root: &MdNode) -> Result<Document> {
        walk(root, &mut self)?;

        if self.stack.depth() != 1 || !self.frames.is_empty() {
            return Err(Error::Internal(format!(
                "walk ended with {} open blocks and {} open marks",
                self.stack.depth() - 1,
                self.frames.len()
            )));
        }
        log::debug!("built ADF document with {} nodes", self.doc.len());
        Ok(self.doc)
    }

    fn push_leaf(&mut self, text: &str) {
        let node = Node::text(text, self.marks.clone());
        self.stack.push_text(&mut self.doc, node);
        self.leaves += 1;
    }

    // Code text only combines with links in ADF
    fn push_code(&mut self, code: &str) {
        let mut marks: Vec<Mark> = self
            .marks
            .iter()
            .filter(|mark| matches!(mark, Mark::Link { .. }))
            .cloned()
            .collect();
        if marks.len() < self.marks.len() {
            log::debug!("code span drops {} enclosing marks", self.marks.len() - marks.len());
        }
        marks.push(Mark::Code);
        self.stack.push_text(&mut self.doc, Node::text(code, marks));
        self.leaves += 1;
    }

    fn open_mark(&mut self, mark: Mark) {
        let pushed = !self.marks.iter().any(|active| active.same_type(&mark));
        if pushed {
            self.marks.push(mark);
        }
        self.frames.push(MarkFrame {
            pushed,
            leaves: self.leaves,
        });
    }

    fn close_mark(&mut self) -> Result<()> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| Error::Internal("closing a mark that was never opened".to_string()))?;
        // Keep marked constructs without text, e.g. `[](https://example.com)`
        if self.leaves == frame.leaves {
            self.push_leaf("");
        }
        if frame.pushed {
            self.marks.pop();
        }
        Ok(())
    }

    fn code_block(&mut self, node: &MdNode) {
        let content = node.literal();

        if self.stack.is_restricted() {
            log::debug!(
                "code block at byte {} flattened into a paragraph",
                node.span.start
            );
            self.stack
                .push_block(&mut self.doc, Node::new(NodeType::Paragraph));
            let content = content.trim_end_matches('\n');
            if !content.is_empty() {
                self.push_code(content);
            }
            return;
        }

        let block = Node::new(NodeType::CodeBlock).with_attrs(adf_attrs(&node.kind));
        if let Some(id) = self.stack.push_block(&mut self.doc, block) {
            if !content.is_empty() {
                self.doc.append(id, Node::text(content, Vec::new()));
            }
        }
    }

    fn unmapped(&self, node: &MdNode) -> Result<WalkStatus> {
        let name = node.kind.name();
        if !is_unsupported(&node.kind) {
            return Err(Error::UnmappedNode {
                kind: name,
                offset: node.span.start,
            });
        }

        match self.policy {
            UnsupportedPolicy::Reject => Err(Error::Unsupported {
                construct: name,
                offset: node.span.start,
            }),
            UnsupportedPolicy::Drop => {
                log::warn!("dropping unsupported {} at byte {}", name, node.span.start);
                Ok(WalkStatus::SkipChildren)
            }
        }
    }

    fn in_list_item(&self) -> bool {
        self.doc.node(self.stack.top()).kind == NodeType::ListItem
    }

    fn block_quote(&mut self, node: &MdNode) {
        if self.stack.is_restricted() || self.in_list_item() {
            log::debug!(
                "block quote at byte {} flattened into its container",
                node.span.start
            );
            self.stack.restrict_in_place();
        } else if let Some(id) = self
            .stack
            .push_block(&mut self.doc, Node::new(NodeType::Blockquote))
        {
            self.stack.begin_restriction(id);
        }
    }

    // The schema rejects these containers when empty
    fn fill_empty(&mut self, id: NodeId) {
        let node = self.doc.node(id);
        if node.kind.requires_content() && node.content.is_empty() {
            self.doc.append(id, Node::new(NodeType::Paragraph));
        }
    }
}

fn opens_mark(kind: &MdKind) -> bool {
    matches!(
        kind,
        MdKind::Emphasis { .. }
            | MdKind::Strikethrough
            | MdKind::Superscript
            | MdKind::Subscript
            | MdKind::Link { .. }
    )
}

impl Visitor for Transformer {
    type Error = Error;

    fn enter(&mut self, node: &MdNode) -> Result<WalkStatus> {
        if node.kind == MdKind::Document {
            return Ok(WalkStatus::Continue);
        }
        let Some(ty) = adf_type(&node.kind) else {
            return self.unmapped(node);
        };

        match ty {
            NodeType::Text => match &node.kind {
                MdKind::Text(text) => self.push_leaf(text),
                MdKind::SoftBreak => self.push_leaf(" "),
                MdKind::Code(code) => self.push_code(code),
                kind => {
                    if let Some(mark) = adf_mark(kind) {
                        self.open_mark(mark);
                    }
                }
            },
            NodeType::HardBreak => {
                self.stack
                    .push_content(&mut self.doc, Node::new(NodeType::HardBreak));
            }
            NodeType::Rule => {
                if self.stack.is_restricted() || self.in_list_item() {
                    log::debug!("rule at byte {} dropped", node.span.start);
                } else {
                    self.stack.push_content(&mut self.doc, Node::new(NodeType::Rule));
                }
            }
            NodeType::CodeBlock => {
                self.code_block(node);
                return Ok(WalkStatus::SkipChildren);
            }
            NodeType::Blockquote => self.block_quote(node),
            NodeType::Table if self.in_list_item() => {
                log::debug!(
                    "table at byte {} flattened into list item",
                    node.span.start
                );
                self.stack.restrict_in_place();
            }
            NodeType::Heading if self.stack.is_restricted() || self.in_list_item() => {
                log::debug!(
                    "heading at byte {} flattened into a paragraph",
                    node.span.start
                );
                self.stack
                    .push_block(&mut self.doc, Node::new(NodeType::Paragraph));
            }
            _ => {
                let block = Node::new(ty).with_attrs(adf_attrs(&node.kind));
                self.stack.push_block(&mut self.doc, block);
            }
        }

        Ok(WalkStatus::Continue)
    }

    fn exit(&mut self, node: &MdNode) -> Result<()> {
        if node.kind == MdKind::Document {
            return Ok(());
        }
        // Unsupported constructs that were dropped on entry
        let Some(ty) = adf_type(&node.kind) else {
            return Ok(());
        };

        if ty.is_inline() {
            if opens_mark(&node.kind) {
                self.close_mark()?;
            }
            return Ok(());
        }
        if ty == NodeType::Rule {
            return Ok(());
        }

        if let Some(id) = self.stack.pop_block()? {
            self.fill_empty(id);
        }
        Ok(())
    }
}
