//! Markdown to ADF type and mark mapping.
//!
//! | Markdown                      | ADF                                        |
//! |-------------------------------|--------------------------------------------|
//! | paragraph, text block         | `paragraph`                                |
//! | heading                       | `heading`, `attrs.level`                   |
//! | ordered / unordered list      | `orderedList` (`attrs.order`) / `bulletList` |
//! | list item                     | `listItem`                                 |
//! | block quote                   | `blockquote`                               |
//! | thematic break                | `rule`                                     |
//! | code block                    | `codeBlock`, `attrs.language`              |
//! | table, head, row              | `table`, `tableRow`, `tableRow`            |
//! | header cell, cell             | `tableHeader`, `tableCell`                 |
//! | text, soft break              | `text`                                     |
//! | hard break                    | `hardBreak`                                |
//! | code span                     | `text` + `code`                            |
//! | emphasis (1 / 2+)             | `text` + `em` / `strong`                   |
//! | strikethrough                 | `text` + `strike`                          |
//! | superscript / subscript       | `text` + `subsup`                          |
//! | link                          | `text` + `link`                            |
//!
//! Images and raw HTML have no mapping.

use crate::ast::MdKind;
use crate::node::{Attrs, Mark, NodeType, SubSup};

/// ADF node type produced for a markdown node, `None` when there is none.
///
/// Mark-producing constructs map to [`NodeType::Text`]: they contribute
/// text leaves, never containers.
pub fn adf_type(kind: &MdKind) -> Option<NodeType> {
    let ty = match kind {
        MdKind::Document => NodeType::Doc,
        MdKind::Paragraph | MdKind::TextBlock => NodeType::Paragraph,
        MdKind::Heading { .. } => NodeType::Heading,
        MdKind::BlockQuote => NodeType::Blockquote,
        MdKind::CodeBlock { .. } => NodeType::CodeBlock,
        MdKind::List { ordered: true, .. } => NodeType::OrderedList,
        MdKind::List { ordered: false, .. } => NodeType::BulletList,
        MdKind::Item => NodeType::ListItem,
        MdKind::ThematicBreak => NodeType::Rule,
        MdKind::Table => NodeType::Table,
        MdKind::TableHead | MdKind::TableRow => NodeType::TableRow,
        MdKind::TableCell { header: true } => NodeType::TableHeader,
        MdKind::TableCell { header: false } => NodeType::TableCell,
        MdKind::HardBreak => NodeType::HardBreak,
        MdKind::Text(_)
        | MdKind::Code(_)
        | MdKind::SoftBreak
        | MdKind::Emphasis { .. }
        | MdKind::Strikethrough
        | MdKind::Superscript
        | MdKind::Subscript
        | MdKind::Link { .. } => NodeType::Text,
        MdKind::Image { .. }
        | MdKind::HtmlBlock
        | MdKind::Html(_)
        | MdKind::InlineHtml(_)
        | MdKind::Unknown(_) => return None,
    };
    Some(ty)
}

/// Mark attached to the text beneath a markdown node.
pub fn adf_mark(kind: &MdKind) -> Option<Mark> {
    let mark = match kind {
        MdKind::Code(_) => Mark::Code,
        MdKind::Emphasis { strength: 1 } => Mark::Em,
        MdKind::Emphasis {
            strength: 2..=u8::MAX,
        } => Mark::Strong,
        MdKind::Strikethrough => Mark::Strike,
        MdKind::Superscript => Mark::Subsup { kind: SubSup::Sup },
        MdKind::Subscript => Mark::Subsup { kind: SubSup::Sub },
        MdKind::Link { href, title } => Mark::Link {
            href: href.clone(),
            title: title.clone(),
        },
        _ => return None,
    };
    Some(mark)
}

/// Attributes for the ADF node built from a markdown node.
pub fn adf_attrs(kind: &MdKind) -> Option<Attrs> {
    match kind {
        MdKind::Heading { level } => Some(Attrs {
            level: Some(*level),
            ..Attrs::default()
        }),
        MdKind::CodeBlock {
            language: Some(language),
        } => Some(Attrs {
            language: Some(language.clone()),
            ..Attrs::default()
        }),
        MdKind::List {
            ordered: true,
            start: Some(start),
        } if *start > 1 => Some(Attrs {
            order: Some(*start),
            ..Attrs::default()
        }),
        _ => None,
    }
}

/// Markdown nodes with no ADF rendering that a policy may drop.
pub fn is_unsupported(kind: &MdKind) -> bool {
    matches!(
        kind,
        MdKind::Image { .. } | MdKind::HtmlBlock | MdKind::Html(_) | MdKind::InlineHtml(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_map_by_order() {
        let ordered = MdKind::List {
            ordered: true,
            start: Some(1),
        };
        let bullet = MdKind::List {
            ordered: false,
            start: None,
        };
        assert_eq!(adf_type(&ordered), Some(NodeType::OrderedList));
        assert_eq!(adf_type(&bullet), Some(NodeType::BulletList));
    }

    #[test]
    fn emphasis_strength_selects_mark() {
        assert_eq!(adf_mark(&MdKind::Emphasis { strength: 1 }), Some(Mark::Em));
        assert_eq!(adf_mark(&MdKind::Emphasis { strength: 2 }), Some(Mark::Strong));
        assert_eq!(adf_mark(&MdKind::Emphasis { strength: 3 }), Some(Mark::Strong));
    }

    #[test]
    fn marked_constructs_are_text() {
        for kind in [
            MdKind::Code("x".into()),
            MdKind::Strikethrough,
            MdKind::Emphasis { strength: 1 },
            MdKind::Link {
                href: "h".into(),
                title: None,
            },
        ] {
            assert_eq!(adf_type(&kind), Some(NodeType::Text));
            assert!(adf_mark(&kind).is_some());
        }
    }

    #[test]
    fn plain_text_has_no_mark() {
        assert_eq!(adf_type(&MdKind::Text("x".into())), Some(NodeType::Text));
        assert_eq!(adf_mark(&MdKind::Text("x".into())), None);
    }

    #[test]
    fn unmapped_kinds() {
        let image = MdKind::Image {
            src: "a.png".into(),
            title: None,
        };
        assert_eq!(adf_type(&image), None);
        assert!(is_unsupported(&image));
        assert_eq!(adf_type(&MdKind::Unknown("math")), None);
        assert!(!is_unsupported(&MdKind::Unknown("math")));
    }

    #[test]
    fn table_cells_by_header() {
        assert_eq!(
            adf_type(&MdKind::TableCell { header: true }),
            Some(NodeType::TableHeader)
        );
        assert_eq!(
            adf_type(&MdKind::TableCell { header: false }),
            Some(NodeType::TableCell)
        );
        assert_eq!(adf_type(&MdKind::TableHead), Some(NodeType::TableRow));
    }

    #[test]
    fn attributes() {
        assert_eq!(
            adf_attrs(&MdKind::Heading { level: 2 }).and_then(|a| a.level),
            Some(2)
        );
        assert_eq!(
            adf_attrs(&MdKind::CodeBlock {
                language: Some("go".into())
            })
            .and_then(|a| a.language),
            Some("go".to_string())
        );
        assert_eq!(adf_attrs(&MdKind::CodeBlock { language: None }), None);
        let from_one = MdKind::List {
            ordered: true,
            start: Some(1),
        };
        let from_three = MdKind::List {
            ordered: true,
            start: Some(3),
        };
        assert_eq!(adf_attrs(&from_one), None);
        assert_eq!(adf_attrs(&from_three).and_then(|a| a.order), Some(3));
    }
}
