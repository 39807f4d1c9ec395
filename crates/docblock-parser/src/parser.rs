//! Docblock parser
//!
//! Line-based state machine that splits preprocessed comment lines into
//! short description, long description and tags.

use crate::ast::ParsedDocBlock;
use crate::lines::{Lines, is_dot_terminated, is_empty_line, is_tag};
use thiserror::Error;
use tracing::{debug, trace};

/// Parser errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty docblock: input text has no content")]
    EmptyInput,
}

/// Parse result type
pub type ParseResult<T> = Result<T, ParseError>;

/// Scanner states, in the order they are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Short,
    Gap,
    Long,
    Tags,
    Done,
}

/// Docblock parser
///
/// Owns the lines of a single comment block. Each `Parser` parses exactly
/// one input, so nothing carries over between blocks.
pub struct Parser {
    lines: Lines,
    pos: usize,
}

impl Parser {
    /// Create a new parser from raw comment text
    pub fn new(source: &str) -> ParseResult<Self> {
        Ok(Self {
            lines: Lines::preprocess(source)?,
            // Line 0 is the opening delimiter
            pos: 1,
        })
    }

    /// Parse the entire docblock
    pub fn parse(mut self) -> ParsedDocBlock {
        let mut doc = ParsedDocBlock::default();

        if self.lines.len() < 2 {
            debug!(lines = self.lines.len(), "docblock has no content lines");
            return doc;
        }

        let mut state = State::Start;
        while state != State::Done {
            trace!(?state, line = self.pos, "scanner state");
            state = match state {
                State::Start => {
                    if is_tag(self.current(), None) {
                        State::Tags
                    } else {
                        State::Short
                    }
                }
                State::Short => {
                    doc.short_description = self.scan_short_description();
                    State::Gap
                }
                State::Gap => {
                    self.skip_empty_lines();
                    State::Long
                }
                State::Long => {
                    doc.long_description = self.scan_long_description();
                    if self.is_at_end() {
                        State::Done
                    } else {
                        self.skip_empty_lines();
                        State::Tags
                    }
                }
                State::Tags => {
                    self.collect_tags(&mut doc);
                    State::Done
                }
                State::Done => State::Done,
            };
        }

        debug!(
            params = doc.param_tags.len(),
            tags = doc.tags.len(),
            "parsed docblock"
        );
        doc
    }

    /// Accumulate the short description
    ///
    /// Continues onto following lines until a blank line, a tag, a period
    /// at the end of the text so far, or the last line.
    fn scan_short_description(&mut self) -> String {
        let mut short = String::new();
        loop {
            short.push(' ');
            short.push_str(self.current());
            self.pos += 1;

            if self.is_at_end()
                || is_empty_line(self.current())
                || is_tag(self.current(), None)
                || is_dot_terminated(short.trim_end())
            {
                break;
            }
        }
        short.trim().to_string()
    }

    /// Accumulate the long description
    ///
    /// Ends at a blank line, a tag, or the last line.
    fn scan_long_description(&mut self) -> String {
        let mut long = String::new();
        while !self.is_at_end()
            && !is_empty_line(self.current())
            && !is_tag(self.current(), None)
        {
            long.push_str(self.current());
            long.push(' ');
            self.pos += 1;
        }
        long.trim().to_string()
    }

    /// Collect tag lines up to (not including) the last line
    fn collect_tags(&mut self, doc: &mut ParsedDocBlock) {
        while !self.is_at_end() {
            let line = self.current();
            if is_tag(line, Some("param")) {
                doc.param_tags.push(line.to_string());
            } else if is_tag(line, None) {
                doc.tags.push(line.to_string());
            }
            self.pos += 1;
        }
    }

    /// Skip blank lines, stopping at the last line
    fn skip_empty_lines(&mut self) {
        while !self.is_at_end() && is_empty_line(self.current()) {
            self.pos += 1;
        }
    }

    fn current(&self) -> &str {
        self.lines.get(self.pos)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.lines.last_index()
    }
}

/// Parse raw comment text into a docblock
///
/// The first line is always treated as the opening delimiter and skipped.
pub fn parse(source: &str) -> ParseResult<ParsedDocBlock> {
    let parser = Parser::new(source)?;
    Ok(parser.parse())
}
