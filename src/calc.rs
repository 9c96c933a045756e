//! Main module for the calculator language front end

pub mod error;
pub mod formats;
pub mod lexer;
pub mod parser;
pub mod processor;
pub mod testing;

pub use error::{Location, ParseError, ParseResult};
pub use parser::{parse, parse_with_limit, parse_with_source, Node, DEFAULT_MAX_DEPTH};
