//! Tag registry and accessors
//!
//! Turns the raw tag lines of a [`ParsedDocBlock`] into values. `@param`,
//! `@throws` and `@exception` have dedicated accessors; every other
//! recognized tag goes through the fixed [`TagName`] registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{ParamTag, ParsedDocBlock};
use crate::lines::{is_tag, strip_tag};

/// Tag lookup errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("No @param tag at index {index} ({count} present)")]
    ParamNotFound { index: usize, count: usize },

    #[error("No @{tag} tag found")]
    TagNotFound { tag: String },

    #[error("Unknown tag name: {name}")]
    UnknownTagName { name: String },

    #[error("Malformed @param tag, expected `<type> $<name> [description]`: {param}")]
    MalformedParam { param: String },
}

/// Tag lookup result type
pub type TagResult<T> = Result<T, TagError>;

/// Generic tags recognized by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagName {
    Author,
    Copyright,
    Deprecated,
    Example,
    Global,
    Ignore,
    Internal,
    Link,
    Package,
    Return,
    See,
    Since,
    Subpackage,
    Todo,
    Var,
    Version,
}

impl TagName {
    /// Every registered tag, in alphabetical order
    pub const ALL: [TagName; 16] = [
        Self::Author,
        Self::Copyright,
        Self::Deprecated,
        Self::Example,
        Self::Global,
        Self::Ignore,
        Self::Internal,
        Self::Link,
        Self::Package,
        Self::Return,
        Self::See,
        Self::Since,
        Self::Subpackage,
        Self::Todo,
        Self::Var,
        Self::Version,
    ];

    /// Get the tag name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Copyright => "copyright",
            Self::Deprecated => "deprecated",
            Self::Example => "example",
            Self::Global => "global",
            Self::Ignore => "ignore",
            Self::Internal => "internal",
            Self::Link => "link",
            Self::Package => "package",
            Self::Return => "return",
            Self::See => "see",
            Self::Since => "since",
            Self::Subpackage => "subpackage",
            Self::Todo => "todo",
            Self::Var => "var",
            Self::Version => "version",
        }
    }

    /// Spellings matched for this tag, longest first
    ///
    /// Matching is by prefix, so `returns` has to be tried before `return`.
    fn spellings(&self) -> &'static [&'static str] {
        match self {
            Self::Return => &["returns", "return"],
            Self::Author => &["author"],
            Self::Copyright => &["copyright"],
            Self::Deprecated => &["deprecated"],
            Self::Example => &["example"],
            Self::Global => &["global"],
            Self::Ignore => &["ignore"],
            Self::Internal => &["internal"],
            Self::Link => &["link"],
            Self::Package => &["package"],
            Self::See => &["see"],
            Self::Since => &["since"],
            Self::Subpackage => &["subpackage"],
            Self::Todo => &["todo"],
            Self::Var => &["var"],
            Self::Version => &["version"],
        }
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagName {
    type Err = TagError;

    /// Parse a tag name case-insensitively, with or without a leading `@`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.strip_prefix('@').unwrap_or(s).to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == key)
            .ok_or_else(|| TagError::UnknownTagName {
                name: s.to_string(),
            })
    }
}

/// Names matched by [`ParsedDocBlock::throws`]
pub const THROWS_TAGS: [&str; 2] = ["throws", "exception"];

impl ParsedDocBlock {
    /// Number of `@param` tags
    pub fn number_of_param_tags(&self) -> usize {
        self.param_tags.len()
    }

    /// The `@param` tag at `index`, without its `@param` marker
    pub fn param(&self, index: usize) -> TagResult<&str> {
        self.param_tags
            .get(index)
            .map(|raw| strip_tag("param", raw))
            .ok_or(TagError::ParamNotFound {
                index,
                count: self.param_tags.len(),
            })
    }

    /// Type token of the `@param` tag at `index`
    pub fn param_type(&self, index: usize) -> TagResult<&str> {
        split_param(self.param(index)?).map(|(type_name, _, _)| type_name)
    }

    /// Sigil-prefixed name of the `@param` tag at `index`
    pub fn param_name(&self, index: usize) -> TagResult<&str> {
        split_param(self.param(index)?).map(|(_, name, _)| name)
    }

    /// Description of the `@param` tag at `index`
    pub fn param_description(&self, index: usize) -> TagResult<&str> {
        split_param(self.param(index)?).map(|(_, _, description)| description)
    }

    /// Structured view of the `@param` tag at `index`
    pub fn param_tag(&self, index: usize) -> TagResult<ParamTag> {
        self.param(index)?.parse()
    }

    /// Structured views of every `@param` tag, failing on the first malformed one
    pub fn params(&self) -> TagResult<Vec<ParamTag>> {
        (0..self.param_tags.len())
            .map(|index| self.param_tag(index))
            .collect()
    }

    /// The first `@return` (or `@returns`) tag
    pub fn return_tag(&self) -> TagResult<&str> {
        self.get(TagName::Return)
    }

    /// The first `@var` tag
    pub fn var_tag(&self) -> TagResult<&str> {
        self.get(TagName::Var)
    }

    /// Every `@throws` and `@exception` tag in source order
    ///
    /// Never fails; a block without either tag yields an empty list.
    pub fn throws(&self) -> Vec<&str> {
        self.tags_named(&THROWS_TAGS)
    }

    /// Every tag matching one of `names`, in source order, marker stripped
    pub fn tags_named(&self, names: &[&str]) -> Vec<&str> {
        self.tags
            .iter()
            .filter_map(|line| {
                names
                    .iter()
                    .find(|name| is_tag(line, Some(**name)))
                    .map(|name| strip_tag(name, line))
            })
            .collect()
    }

    /// The first tag registered as `tag`, marker stripped
    pub fn get(&self, tag: TagName) -> TagResult<&str> {
        self.find_tag(tag).ok_or_else(|| TagError::TagNotFound {
            tag: tag.as_str().to_string(),
        })
    }

    /// Whether at least one tag registered as `tag` is present
    pub fn has(&self, tag: TagName) -> bool {
        self.find_tag(tag).is_some()
    }

    /// Look up a registry tag by name, e.g. `"Author"` or `"author"`
    ///
    /// Fails with [`TagError::UnknownTagName`] when the name is not in the
    /// registry, and [`TagError::TagNotFound`] when it is but this block
    /// lacks it.
    pub fn get_by_name(&self, name: &str) -> TagResult<&str> {
        self.get(name.parse::<TagName>()?)
    }

    /// Check for a registry tag by name
    ///
    /// Names outside the registry are never reported as present, even if a
    /// matching line exists.
    pub fn has_by_name(&self, name: &str) -> bool {
        name.parse::<TagName>().is_ok_and(|tag| self.has(tag))
    }

    fn find_tag(&self, tag: TagName) -> Option<&str> {
        self.tags.iter().find_map(|line| {
            tag.spellings()
                .iter()
                .find(|spelling| is_tag(line, Some(**spelling)))
                .map(|spelling| strip_tag(spelling, line))
        })
    }
}

impl FromStr for ParamTag {
    type Err = TagError;

    /// Parse the text of a `@param` tag with its marker already removed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (type_name, name, description) = split_param(s)?;
        Ok(Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }
}

/// Split `string $foo The foo parameter` into type, name and description
fn split_param(text: &str) -> TagResult<(&str, &str, &str)> {
    let malformed = || TagError::MalformedParam {
        param: text.to_string(),
    };

    // Exactly one separator after the type and after the name
    let (type_name, rest) = text
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;
    let (name, description) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

    if name.len() < 2 || !name.starts_with('$') {
        return Err(malformed());
    }

    Ok((type_name, name, description))
}
