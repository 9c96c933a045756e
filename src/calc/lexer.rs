//! Lexer module for the calculator language
//!
//! Lexing happens in two stages:
//! - [`tokenize`]: text → flat tokens, using the fixed rule table in [`tokens::RULES`].
//! - [`bracket_transform`]: flat tokens → nested token tree, one group per matched pair of
//!   parentheses, after the parentheses have been checked for balance.
//!
//! Keeping nesting out of the tokenizer means the grammar never has to match parens: a
//! group arrives as a single node that the rule owning it re-enters on its own.

pub mod bracket_transform;
pub mod lexer_impl;
pub mod tokens;

pub use bracket_transform::{check_balance, check_depth, count_groups, nest, TokenNode};
pub use lexer_impl::{tokenize, tokenize_source};
pub use tokens::{superscript_to_digits, Source, Token, TokenKind};

use crate::calc::error::ParseResult;
use std::sync::Arc;

/// Everything the parser needs from the lexing stage
#[derive(Debug, Clone)]
pub struct Lexed {
    pub source: Arc<Source>,
    /// The flat sequence, parens included, kept for error locations
    pub tokens: Vec<Token>,
    pub tree: Vec<TokenNode>,
}

/// Main lexer function: tokenize, check balance, then nest
pub fn lex(code: &str, name: Option<&str>) -> ParseResult<Lexed> {
    lex_with_limit(code, name, usize::MAX)
}

/// Like [`lex`], but refuse parens nested more than `max_depth` deep before nesting
pub fn lex_with_limit(code: &str, name: Option<&str>, max_depth: usize) -> ParseResult<Lexed> {
    let source = Arc::new(Source::new(code, name.map(str::to_string)));
    let tokens = tokenize_source(Arc::clone(&source))?;
    check_balance(&tokens, &source)?;
    check_depth(&tokens, &source, max_depth)?;
    let tree = nest(tokens.clone());
    log::debug!(
        "lexed {} tokens into {} top-level nodes ({} groups)",
        tokens.len(),
        tree.len(),
        count_groups(&tree)
    );
    Ok(Lexed {
        source,
        tokens,
        tree,
    })
}
