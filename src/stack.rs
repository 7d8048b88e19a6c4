//! Block-context stack.
//!
//! Tracks the chain of open ADF containers from the document root down to
//! the node currently receiving content. Markdown allows more nesting than
//! ADF does, so a block quote opens a restricted scope: inside it only
//! paragraphs reach the output tree. Other blocks are still tracked on the
//! logical stack so that their exits balance, but they never materialize.

use crate::error::{Error, Result};
use crate::node::{Document, Node, NodeId, NodeType};

/// The logical pushes covered by a restricted scope.
#[derive(Debug)]
struct Restriction {
    /// One entry per open push under the scope, `true` when the pushed
    /// node was materialized. The first entry is the scope node itself,
    /// which is elided for a scope opened in place.
    covered: Vec<bool>,
}

#[derive(Debug)]
pub struct BlockStack {
    open: Vec<NodeId>,
    restriction: Option<Restriction>,
}

impl BlockStack {
    pub fn new(root: NodeId) -> Self {
        Self {
            open: vec![root],
            restriction: None,
        }
    }

    /// The node currently receiving content.
    pub fn top(&self) -> NodeId {
        // The root is never popped
        self.open[self.open.len() - 1]
    }

    /// Number of materialized containers on the stack, root included.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_restricted(&self) -> bool {
        self.restriction.is_some()
    }

    /// Append `node` to the current container without making it the
    /// insertion point.
    pub fn push_content(&self, doc: &mut Document, node: Node) -> NodeId {
        doc.append(self.top(), node)
    }

    /// Append a text leaf to the current container, merged into the
    /// preceding leaf when both carry the same marks.
    pub fn push_text(&self, doc: &mut Document, node: Node) -> NodeId {
        doc.append_text(self.top(), node)
    }

    /// Append `node` and make it the insertion point for its children.
    ///
    /// Returns `None` when an active restriction drops the node.
    pub fn push_block(&mut self, doc: &mut Document, node: Node) -> Option<NodeId> {
        if let Some(restriction) = self.restriction.as_mut() {
            let keep = node.kind == NodeType::Paragraph;
            restriction.covered.push(keep);
            if !keep {
                log::debug!("dropping {} inside restricted scope", node.kind.as_str());
                return None;
            }
        }

        let id = self.push_content(doc, node);
        self.open.push(id);
        Some(id)
    }

    /// Close the innermost open block.
    ///
    /// Returns the id of the closed node when it is part of the output
    /// tree, `None` when it was dropped by a restriction.
    pub fn pop_block(&mut self) -> Result<Option<NodeId>> {
        if let Some(restriction) = self.restriction.as_mut() {
            let materialized = restriction.covered.pop().ok_or_else(|| {
                Error::Internal("restriction has no covered blocks".to_string())
            })?;
            if restriction.covered.is_empty() {
                self.restriction = None;
            }
            if !materialized {
                return Ok(None);
            }
        }

        if self.open.len() == 1 {
            return Err(Error::Internal(
                "attempted to close the document root".to_string(),
            ));
        }
        Ok(self.open.pop())
    }

    /// Restrict `scope` and its descendants to paragraph children.
    ///
    /// Only the outermost restricting ancestor counts: calling this while
    /// a restriction is active does nothing.
    pub fn begin_restriction(&mut self, scope: NodeId) {
        if self.restriction.is_some() {
            return;
        }
        log::debug!("restricting {:?} to paragraphs", scope);
        self.restriction = Some(Restriction {
            covered: vec![true],
        });
    }

    /// Restrict the current container to paragraph children without
    /// opening a node, as if a restricting block had been pushed and
    /// elided. The matching [`pop_block`](Self::pop_block) returns `None`.
    pub fn restrict_in_place(&mut self) {
        match self.restriction.as_mut() {
            Some(restriction) => restriction.covered.push(false),
            None => {
                self.restriction = Some(Restriction {
                    covered: vec![false],
                })
            }
        }
    }
}
