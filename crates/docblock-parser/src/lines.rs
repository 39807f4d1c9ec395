//! Docblock preprocessing
//!
//! Normalizes line endings and strips comment decoration, turning raw
//! comment text into a sequence of content lines, plus the predicates
//! the scanner uses to classify those lines.

use crate::parser::{ParseError, ParseResult};

/// Content lines of one comment block
///
/// Index 0 is always the opening delimiter line. Blank lines are kept as
/// empty strings so that paragraph breaks survive preprocessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    /// Preprocess raw comment text into content lines
    ///
    /// `\r\n` and `\r` become `\n`. Each line is trimmed, stripped of
    /// every `*`, and trimmed again. Blank lines after a closing `*/` are
    /// dropped so that the delimiter stays the last line; any other blank
    /// line is kept.
    pub fn preprocess(text: &str) -> ParseResult<Self> {
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let raw: Vec<&str> = normalized.split('\n').collect();

        let end = match raw.iter().rposition(|line| !line.trim().is_empty()) {
            Some(last) if raw[last].trim_end().ends_with("*/") => last + 1,
            _ => raw.len(),
        };

        let lines = raw[..end]
            .iter()
            .map(|line| line.trim().replace('*', "").trim().to_string())
            .collect();

        Ok(Self { lines })
    }

    /// Number of lines, including the opening delimiter
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the line at `index`, or an empty string past the end
    pub fn get(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }

    /// Index of the final line
    pub fn last_index(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// Whether `index` is the final line of this block
    pub fn is_last_line(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Iterate over all lines in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Whether the line has no content
pub fn is_empty_line(line: &str) -> bool {
    line.is_empty()
}

/// Whether the line is a tag, optionally a specific one
///
/// With a name this is a plain prefix test: `@params` passes for `param`.
pub fn is_tag(line: &str, name: Option<&str>) -> bool {
    match name {
        None => line.starts_with('@'),
        Some(name) => line
            .strip_prefix('@')
            .is_some_and(|rest| rest.starts_with(name)),
    }
}

/// Whether the line ends with a period
pub fn is_dot_terminated(line: &str) -> bool {
    line.ends_with('.')
}

/// The name of a tag line (`@return int` -> `return`)
///
/// Returns `None` for lines that are not tags.
pub fn tag_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('@')?;
    Some(rest.split(char::is_whitespace).next().unwrap_or(rest))
}

/// Strip `@<name>` from the front of a tag line and trim the rest
pub fn strip_tag<'a>(name: &str, line: &'a str) -> &'a str {
    line.get(1 + name.len()..).unwrap_or("").trim()
}
