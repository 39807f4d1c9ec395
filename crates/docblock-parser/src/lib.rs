//! docblock-parser: Parser for structured documentation comments
//!
//! This crate provides:
//! - Comment preprocessing and line classification
//! - A line-based scanner splitting short/long descriptions from tags
//! - A fixed tag registry with typed accessors
//!
//! # Example
//!
//! ```
//! use docblock_parser::{parse, TagName};
//!
//! let source = "/**
//!  * Adds two numbers.
//!  *
//!  * @param int $a The first operand
//!  * @param int $b The second operand
//!  * @return int
//!  */";
//!
//! let doc = parse(source).unwrap();
//! assert_eq!(doc.short_description(), "Adds two numbers.");
//! assert_eq!(doc.number_of_param_tags(), 2);
//! assert_eq!(doc.param_name(1).unwrap(), "$b");
//! assert_eq!(doc.get(TagName::Return).unwrap(), "int");
//! ```

pub mod ast;
pub mod lines;
pub mod parser;
pub mod tags;

// Re-export main types for convenient access
pub use ast::{ParamTag, ParsedDocBlock};
pub use lines::Lines;
pub use parser::{ParseError, ParseResult, Parser, parse};
pub use tags::{TagError, TagName, TagResult};
