//! Parsed docblock types
//!
//! This module defines the value produced by a parse: the description
//! split plus the raw tag lines in source order.

use serde::{Deserialize, Serialize};

/// A parsed documentation comment
///
/// Immutable once built. Tag lists keep source order and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocBlock {
    /// Summary text before the first blank line (may be empty)
    pub short_description: String,
    /// Elaboration following the summary (may be empty)
    pub long_description: String,
    /// Raw `@param` lines
    pub param_tags: Vec<String>,
    /// Raw lines of every other tag
    pub tags: Vec<String>,
}

impl ParsedDocBlock {
    /// The summary text
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// The elaboration text
    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    /// Raw `@param` lines in source order
    pub fn param_tags(&self) -> &[String] {
        &self.param_tags
    }

    /// Raw non-param tag lines in source order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the block carries no text and no tags
    pub fn is_empty(&self) -> bool {
        self.short_description.is_empty()
            && self.long_description.is_empty()
            && self.param_tags.is_empty()
            && self.tags.is_empty()
    }
}

#[cfg(feature = "json")]
impl ParsedDocBlock {
    /// Serialize the docblock to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the docblock to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Structured view of one `@param` tag
///
/// `@param string $foo The foo parameter` gives type `string`, name `$foo`
/// and description `The foo parameter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamTag {
    /// Type token (first whitespace-delimited run)
    #[serde(rename = "type")]
    pub type_name: String,
    /// Parameter name including the `$` sigil
    pub name: String,
    /// Free text after the name (may be empty)
    pub description: String,
}
