//! Structural ADF checks used in place of a JSON Schema validator.
//!
//! Covers the parts of the ADF v1 schema the converter can produce: the
//! document envelope, allowed children per node type, non-empty content
//! where required, field presence, and mark combinations.

use serde_json::{Map, Value};

const BLOCKS: &[&str] = &[
    "paragraph",
    "heading",
    "blockquote",
    "bulletList",
    "orderedList",
    "codeBlock",
    "rule",
    "table",
    "panel",
    "mediaSingle",
    "mediaGroup",
];
const INLINES: &[&str] = &["text", "hardBreak", "emoji", "mention", "inlineCard"];
const LIST_ITEM: &[&str] = &["paragraph", "bulletList", "orderedList", "codeBlock"];
const CELL: &[&str] = &[
    "paragraph",
    "heading",
    "blockquote",
    "bulletList",
    "orderedList",
    "codeBlock",
    "rule",
];
const QUOTE: &[&str] = &["paragraph"];
const LIST: &[&str] = &["listItem"];
const CODE: &[&str] = &["text"];
const TABLE: &[&str] = &["tableRow"];
const ROW: &[&str] = &["tableHeader", "tableCell"];
const LEAF: &[&str] = &[];
const FIELDS: &[&str] = &["version", "type", "attrs", "content", "marks", "text"];

/// Validate a rendered document, returning every violation found.
pub fn check_adf(json: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let doc: Value = match serde_json::from_str(json) {
        Ok(doc) => doc,
        Err(e) => return vec![format!("invalid JSON: {e}")],
    };

    if doc["version"] != 1 {
        errors.push("document version must be 1".to_string());
    }
    if doc["type"] != "doc" {
        errors.push("root type must be doc".to_string());
    }
    check_node(&doc, "$", &mut errors);
    errors
}

/// Panic with all violations when the document is not valid.
pub fn assert_valid_adf(json: &str) {
    let errors = check_adf(json);
    assert!(errors.is_empty(), "{}\n{}", errors.join("\n"), json);
}

fn allowed_children(kind: &str) -> Option<(&'static [&'static str], bool)> {
    // (allowed types, content required)
    let rule = match kind {
        "doc" => (BLOCKS, false),
        "paragraph" | "heading" => (INLINES, false),
        "blockquote" => (QUOTE, true),
        "bulletList" | "orderedList" => (LIST, true),
        "listItem" => (LIST_ITEM, true),
        "codeBlock" => (CODE, false),
        "table" => (TABLE, true),
        "tableRow" => (ROW, true),
        "tableHeader" | "tableCell" => (CELL, true),
        "rule" | "hardBreak" | "text" => (LEAF, false),
        _ => return None,
    };
    Some(rule)
}

fn check_node(node: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(obj) = node.as_object() else {
        errors.push(format!("{path}: node is not an object"));
        return;
    };
    check_fields(obj, path, errors);

    let kind = obj.get("type").and_then(Value::as_str).unwrap_or("");
    let Some((allowed, required)) = allowed_children(kind) else {
        errors.push(format!("{path}: unexpected node type '{kind}'"));
        return;
    };

    match obj.get("content") {
        Some(Value::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                let child_path = format!("{path}.content[{i}]");
                let child_kind = child["type"].as_str().unwrap_or("");
                if !allowed.contains(&child_kind) {
                    errors.push(format!(
                        "{child_path}: '{child_kind}' not allowed inside '{kind}'"
                    ));
                }
                check_node(child, &child_path, errors);
            }
        }
        Some(_) => errors.push(format!("{path}: content must be an array")),
        None if required => errors.push(format!("{path}: '{kind}' needs content")),
        None => {}
    }

    match kind {
        "text" => check_text(obj, path, errors),
        "heading" => {
            let level = obj.get("attrs").and_then(|a| a["level"].as_u64());
            if !matches!(level, Some(1..=6)) {
                errors.push(format!("{path}: heading level must be 1-6"));
            }
        }
        "orderedList" => {
            if let Some(order) = obj.get("attrs").map(|a| &a["order"]) {
                if order.as_u64().is_none_or(|o| o < 1) {
                    errors.push(format!("{path}: order must be a positive integer"));
                }
            }
        }
        _ => {}
    }
}

fn check_fields(obj: &Map<String, Value>, path: &str, errors: &mut Vec<String>) {
    for (key, value) in obj {
        if !FIELDS.contains(&key.as_str()) {
            errors.push(format!("{path}: unknown field '{key}'"));
        }
        match value {
            Value::Null => errors.push(format!("{path}: '{key}' is null")),
            Value::Array(items) if items.is_empty() => {
                errors.push(format!("{path}: '{key}' is an empty array"))
            }
            _ => {}
        }
    }
}

fn check_text(obj: &Map<String, Value>, path: &str, errors: &mut Vec<String>) {
    match obj.get("text").and_then(Value::as_str) {
        Some("") | None => errors.push(format!("{path}: text must be a non-empty string")),
        Some(_) => {}
    }

    let marks: Vec<&str> = obj
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| marks.iter().filter_map(|m| m["type"].as_str()).collect())
        .unwrap_or_default();
    if marks.contains(&"code") && marks.iter().any(|m| !matches!(*m, "code" | "link")) {
        errors.push(format!("{path}: code mark only combines with link"));
    }
    for mark in &marks {
        if marks.iter().filter(|m| *m == mark).count() > 1 {
            errors.push(format!("{path}: duplicate '{mark}' mark"));
        }
    }
}
