use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

/// Defaults as shipped, validated by the build script.
pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub markdown: MarkdownConfig,
    pub output: OutputConfig,
    pub unsupported: UnsupportedConfig,
}

/// Parser extensions and input preprocessing.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkdownConfig {
    pub strip_frontmatter: bool,
    pub tables: bool,
    pub strikethrough: bool,
    pub heading_attributes: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            strip_frontmatter: false,
            tables: true,
            strikethrough: true,
            heading_attributes: true,
            superscript: false,
            subscript: false,
            smart_punctuation: false,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UnsupportedConfig {
    pub policy: UnsupportedPolicy,
}

/// What to do with markdown that has no ADF rendering (images, raw HTML).
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Fail the conversion
    #[default]
    Reject,
    /// Leave the construct out of the output
    Drop,
}

impl Config {
    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
