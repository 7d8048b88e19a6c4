//! Markdown to Atlassian Document Format (ADF) conversion.
//!
//! Pipeline: markdown text → pulldown-cmark events → markdown tree
//! ([`ast`]) → ADF tree ([`transform`]) → JSON ([`serializer`]).

pub mod ast;
pub mod config;
pub mod error;
pub mod mapping;
pub mod node;
pub mod serializer;
pub mod stack;
pub mod transform;

pub use ast::{MdKind, MdNode};
pub use config::{Config, UnsupportedPolicy};
pub use error::{Error, Result};
pub use node::{Attrs, Document, Layout, Mark, Node, NodeId, NodeType, SubSup};

use std::io::Write;

use transform::Transformer;

/// Parse markdown text into a markdown tree with the default options.
pub fn parse(markdown: &str) -> MdNode {
    ast::parse(markdown, &config::MarkdownConfig::default())
}

/// Convert markdown to an ADF document.
pub fn markdown_to_adf(markdown: &str) -> Result<Document> {
    markdown_to_adf_with_config(markdown, &Config::default())
}

/// Convert markdown to an ADF document using the given configuration.
pub fn markdown_to_adf_with_config(markdown: &str, config: &Config) -> Result<Document> {
    let root = ast::parse(markdown, &config.markdown);
    Transformer::new(config.unsupported.policy).transform(&root)
}

/// Convert markdown to pretty-printed ADF JSON.
pub fn markdown_to_json(markdown: &str) -> Result<String> {
    markdown_to_json_with_config(markdown, &Config::default())
}

/// Convert markdown to ADF JSON using the given configuration.
pub fn markdown_to_json_with_config(markdown: &str, config: &Config) -> Result<String> {
    let doc = markdown_to_adf_with_config(markdown, config)?;
    serializer::to_json(&doc, config.output.pretty)
}

/// Convert markdown and write the ADF JSON to `writer`.
///
/// Nothing is written when the conversion fails.
pub fn render<W: Write>(mut writer: W, markdown: &str, config: &Config) -> Result<()> {
    let doc = markdown_to_adf_with_config(markdown, config)?;
    serializer::to_writer(&doc, &mut writer, config.output.pretty)?;
    writer.flush()?;
    Ok(())
}
