//! JSON rendering of ADF documents.
//!
//! The arena is rendered as a nested tree. Fields that do not apply to a
//! node are left out entirely rather than written as `null` or `[]`.

use std::io::Write;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::node::{Document, NodeId, NodeType};

/// Render a document as a JSON string, indented with two spaces when
/// `pretty` is set.
pub fn to_json(doc: &Document, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(json)
}

/// Render a document as JSON into `writer`.
pub fn to_writer<W: Write>(doc: &Document, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, doc)?;
    } else {
        serde_json::to_writer(writer, doc)?;
    }
    Ok(())
}

/// A node together with the arena it lives in.
struct NodeView<'a> {
    doc: &'a Document,
    id: NodeId,
}

struct ContentView<'a> {
    doc: &'a Document,
    ids: &'a [NodeId],
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        NodeView {
            doc: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let node = self.doc.node(self.id);
        let mut map = serializer.serialize_map(None)?;

        if node.kind == NodeType::Doc {
            map.serialize_entry("version", &Document::VERSION)?;
        }
        map.serialize_entry("type", &node.kind)?;
        if let Some(attrs) = &node.attrs {
            map.serialize_entry("attrs", attrs)?;
        }
        if !node.content.is_empty() {
            map.serialize_entry(
                "content",
                &ContentView {
                    doc: self.doc,
                    ids: &node.content,
                },
            )?;
        }
        if let Some(text) = &node.text {
            map.serialize_entry("text", text)?;
        }
        if !node.marks.is_empty() {
            map.serialize_entry("marks", &node.marks)?;
        }

        map.end()
    }
}

impl Serialize for ContentView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ids.iter().map(|id| NodeView {
            doc: self.doc,
            id: *id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Attrs, Mark, Node, SubSup};
    use serde_json::json;

    fn value(doc: &Document) -> serde_json::Value {
        serde_json::from_str(&to_json(doc, false).unwrap()).unwrap()
    }

    #[test]
    fn empty_document() {
        let doc = Document::new();
        assert_eq!(to_json(&doc, false).unwrap(), r#"{"version":1,"type":"doc"}"#);
    }

    #[test]
    fn pretty_uses_two_spaces() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, Node::new(NodeType::Rule));
        let json = to_json(&doc, true).unwrap();
        assert!(json.contains("\n  \"type\": \"doc\""));
        assert!(json.contains("\n      \"type\": \"rule\""));
    }

    #[test]
    fn fields_are_omitted_when_empty() {
        let mut doc = Document::new();
        let root = doc.root();
        let heading = doc.append(
            root,
            Node::new(NodeType::Heading).with_attrs(Some(Attrs {
                level: Some(2),
                ..Attrs::default()
            })),
        );
        doc.append(heading, Node::text("Title", vec![]));
        doc.append(root, Node::new(NodeType::Paragraph));

        assert_eq!(
            value(&doc),
            json!({
                "version": 1,
                "type": "doc",
                "content": [
                    {
                        "type": "heading",
                        "attrs": {"level": 2},
                        "content": [{"type": "text", "text": "Title"}]
                    },
                    {"type": "paragraph"}
                ]
            })
        );
    }

    #[test]
    fn marks_serialize_with_attrs() {
        let mut doc = Document::new();
        let root = doc.root();
        let para = doc.append(root, Node::new(NodeType::Paragraph));
        doc.append(
            para,
            Node::text(
                "x",
                vec![
                    Mark::Link {
                        href: "https://example.com".into(),
                        title: None,
                    },
                    Mark::Subsup { kind: SubSup::Sup },
                    Mark::TextColor {
                        color: "#ff0000".into(),
                    },
                    Mark::Em,
                ],
            ),
        );

        assert_eq!(
            value(&doc)["content"][0]["content"][0]["marks"],
            json!([
                {"type": "link", "attrs": {"href": "https://example.com"}},
                {"type": "subsup", "attrs": {"type": "sup"}},
                {"type": "textColor", "attrs": {"color": "#ff0000"}},
                {"type": "em"}
            ])
        );
    }

    #[test]
    fn writer_matches_string() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, Node::new(NodeType::Rule));
        let mut out = Vec::new();
        to_writer(&doc, &mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), to_json(&doc, true).unwrap());
    }
}
