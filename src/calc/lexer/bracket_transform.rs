//! Transformation: flat tokens → nested token tree
//!
//! Parentheses are the only grouping construct. Before anything is built the flat
//! sequence is checked for balance; only then is every matched pair, with everything
//! between, replaced by a [`TokenNode::Group`]. The paren tokens themselves do not appear
//! in the tree.
//!
//! Example:
//! ```text
//! Input tokens:  f ( 1 , ( 2 ) )
//! Output tree:   [ Leaf(f), Group([ Leaf(1), Leaf(,), Group([ Leaf(2) ]) ]) ]
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::calc::error::{Location, ParseError, ParseResult};
use crate::calc::lexer::tokens::{Source, Token, TokenKind};

/// A node in the nested token structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenNode {
    /// A single token
    Leaf(Token),

    /// The contents of one matched pair of parentheses
    Group(Vec<TokenNode>),
}

impl TokenNode {
    pub fn as_leaf(&self) -> Option<&Token> {
        match self {
            TokenNode::Leaf(token) => Some(token),
            TokenNode::Group(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, TokenNode::Group(_))
    }

    /// Whether this is a leaf of one of `kinds`
    pub fn is_kind(&self, kinds: &[TokenKind]) -> bool {
        self.as_leaf().is_some_and(|token| kinds.contains(&token.kind))
    }
}

impl fmt::Display for TokenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenNode::Leaf(token) => write!(f, "{}", token.text),
            TokenNode::Group(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Verify that parentheses nest properly.
///
/// A close paren that would take the depth below zero is reported at its own offset.
/// Parens left open at the end are reported at the innermost unclosed open paren.
pub fn check_balance(tokens: &[Token], source: &Arc<Source>) -> ParseResult<()> {
    let mut open: Vec<&Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::ParenOpen => open.push(token),
            TokenKind::ParenClose => {
                if open.pop().is_none() {
                    log::debug!("unmatched close paren at offset {}", token.offset);
                    return Err(ParseError::ImbalancedGrouping(Location::new(
                        token.offset,
                        Arc::clone(source),
                    )));
                }
            }
            _ => {}
        }
    }

    match open.last() {
        Some(unclosed) => {
            log::debug!("unclosed paren at offset {}", unclosed.offset);
            Err(ParseError::ImbalancedGrouping(Location::new(
                unclosed.offset,
                Arc::clone(source),
            )))
        }
        None => Ok(()),
    }
}

/// Refuse parens nested more than `max_depth` deep.
///
/// The first open paren that goes past the limit is reported.
pub fn check_depth(tokens: &[Token], source: &Arc<Source>, max_depth: usize) -> ParseResult<()> {
    let mut depth = 0usize;

    for token in tokens {
        match token.kind {
            TokenKind::ParenOpen => {
                depth += 1;
                if depth > max_depth {
                    log::debug!("paren at offset {} nests past {}", token.offset, max_depth);
                    return Err(ParseError::NestingTooDeep(Location::new(
                        token.offset,
                        Arc::clone(source),
                    )));
                }
            }
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Build the token tree from a balanced token sequence.
///
/// Call [`check_balance`] first; on unbalanced input this closes whatever is still open
/// at the end and ignores stray close parens.
pub fn nest(tokens: Vec<Token>) -> Vec<TokenNode> {
    let mut stack: Vec<Vec<TokenNode>> = vec![Vec::new()]; // Start with root level

    for token in tokens {
        match token.kind {
            TokenKind::ParenOpen => stack.push(Vec::new()),
            TokenKind::ParenClose => {
                if stack.len() > 1 {
                    if let Some(group) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.push(TokenNode::Group(group));
                        }
                    }
                }
            }
            _ => {
                if let Some(current) = stack.last_mut() {
                    current.push(TokenNode::Leaf(token));
                }
            }
        }
    }

    while stack.len() > 1 {
        if let Some(group) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.push(TokenNode::Group(group));
            }
        }
    }

    stack.pop().unwrap_or_default()
}

/// Number of groups in a tree, counted recursively
pub fn count_groups(nodes: &[TokenNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            TokenNode::Leaf(_) => 0,
            TokenNode::Group(children) => 1 + count_groups(children),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::lexer::tokenize_source;

    fn lex(input: &str) -> (Vec<Token>, Arc<Source>) {
        let source = Arc::new(Source::new(input, None));
        let tokens = tokenize_source(Arc::clone(&source)).unwrap();
        (tokens, source)
    }

    fn tree(input: &str) -> Vec<TokenNode> {
        let (tokens, source) = lex(input);
        check_balance(&tokens, &source).unwrap();
        nest(tokens)
    }

    fn render(nodes: &[TokenNode]) -> String {
        nodes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_flat_tokens_stay_flat() {
        let result = tree("1 + 2");
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|n| !n.is_group()));
    }

    #[test]
    fn test_single_group() {
        let result = tree("(1 + 2)");
        assert_eq!(result.len(), 1);
        match &result[0] {
            TokenNode::Group(children) => assert_eq!(children.len(), 3),
            other => panic!("expected group, found {:?}", other),
        }
    }

    #[test]
    fn test_nested_groups() {
        let result = tree("f(1, (2))");
        assert_eq!(render(&result), "f (1 , (2))");
        assert_eq!(count_groups(&result), 2);
    }

    #[test]
    fn test_empty_group() {
        let result = tree("f()");
        assert_eq!(result.len(), 2);
        assert_eq!(result[1], TokenNode::Group(vec![]));
    }

    #[test]
    fn test_adjacent_groups() {
        let result = tree("(a)(b)(c)");
        assert_eq!(render(&result), "(a) (b) (c)");
    }

    #[test]
    fn test_unclosed_paren_is_reported_at_the_open() {
        let (tokens, source) = lex("(1+2");
        let err = check_balance(&tokens, &source).unwrap_err();
        assert!(matches!(err, ParseError::ImbalancedGrouping(_)));
        assert_eq!(err.offset(), 0);
    }

    #[test]
    fn test_innermost_unclosed_paren_is_reported() {
        let (tokens, source) = lex("(1 + (2");
        let err = check_balance(&tokens, &source).unwrap_err();
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn test_stray_close_paren_is_reported_at_itself() {
        let (tokens, source) = lex("1) + (2");
        let err = check_balance(&tokens, &source).unwrap_err();
        assert!(matches!(err, ParseError::ImbalancedGrouping(_)));
        assert_eq!(err.offset(), 1);
    }

    #[test]
    fn test_depth_limit_reports_first_paren_past_it() {
        let (tokens, source) = lex("(1) + ((2) + ((3)))");
        assert!(check_depth(&tokens, &source, 3).is_ok());

        let err = check_depth(&tokens, &source, 2).unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep(_)));
        assert_eq!(err.offset(), 14);
    }

    #[test]
    fn test_is_kind() {
        let result = tree("x (y)");
        assert!(result[0].is_kind(&[TokenKind::Word]));
        assert!(!result[0].is_kind(&[TokenKind::Number]));
        assert!(!result[1].is_kind(&[TokenKind::Word]));
    }
}
