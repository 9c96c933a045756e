//! Public API for the parser.

use crate::calc::error::ParseResult;
use crate::calc::lexer::lex_with_limit;
use crate::calc::parser::ast::Node;
use crate::calc::parser::combinators::ensure_completed;
use crate::calc::parser::cursor::{Root, DEFAULT_MAX_DEPTH};
use crate::calc::parser::grammar::program;

/// Parse calculator source into a [`Node::Program`]
pub fn parse(text: &str) -> ParseResult<Node> {
    parse_with_source(text, None)
}

/// Parse with a source name attached to every token, for diagnostics
pub fn parse_with_source(text: &str, name: Option<&str>) -> ParseResult<Node> {
    parse_with_limit(text, name, DEFAULT_MAX_DEPTH)
}

/// Parse, failing with `NestingTooDeep` once nesting passes `max_depth`
pub fn parse_with_limit(text: &str, name: Option<&str>, max_depth: usize) -> ParseResult<Node> {
    let root = Root::with_max_depth(lex_with_limit(text, name, max_depth)?, max_depth);
    let result = ensure_completed(program, root.block());
    match &result {
        Ok(node) => log::debug!(
            "parsed {} statements from {}",
            node.statements().len(),
            root.source().display_name()
        ),
        Err(err) => log::debug!("parse of {} failed: {}", root.source().display_name(), err),
    }
    result
}
