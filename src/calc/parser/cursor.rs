//! Cursor over the nested token tree
//!
//! A [`Root`] owns everything one parse needs: the flat token sequence (kept for error
//! locations), the nested tree and a high-water mark of consumed tokens. A [`Block`] is a
//! cursor over the children of one group.
//!
//! Blocks only ever see their own children. When a rule consumes a group it receives a
//! fresh block over that group's contents, and it must drive that block to completion on
//! its own; the outer block has already moved past the group.
//!
//! The root also counts how deeply the grammar has recursed. Rules that recurse on
//! nesting in the input take a [`DepthGuard`] first, so a parse fails with
//! `NestingTooDeep` instead of exhausting the stack.
//!
//! The high-water mark is diagnostic only. It is updated on every leaf consumption,
//! including along paths the grammar later abandons, and nothing reads it to make a
//! parsing decision.

use std::cell::Cell;
use std::sync::Arc;

use crate::calc::error::{Location, ParseError};
use crate::calc::lexer::{Lexed, Source, Token, TokenKind, TokenNode};

/// Nesting allowed when no limit is given
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Owner of the token tree for a single parse
#[derive(Debug)]
pub struct Root {
    source: Arc<Source>,
    tokens: Vec<Token>,
    tree: Vec<TokenNode>,
    /// Index (into `tokens`) of the furthest token consumed so far
    furthest: Cell<Option<usize>>,
    depth: Cell<usize>,
    max_depth: usize,
}

impl Root {
    pub fn new(lexed: Lexed) -> Self {
        Self::with_max_depth(lexed, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(lexed: Lexed, max_depth: usize) -> Self {
        Self {
            source: lexed.source,
            tokens: lexed.tokens,
            tree: lexed.tree,
            furthest: Cell::new(None),
            depth: Cell::new(0),
            max_depth,
        }
    }

    /// A cursor over the top level of the tree
    pub fn block(&self) -> Block<'_> {
        Block {
            root: self,
            items: &self.tree,
            place: 0,
        }
    }

    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the furthest token consumed, if any
    pub fn furthest(&self) -> Option<usize> {
        self.furthest.get()
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Enter one level of nesting, which is left again when the guard drops
    pub fn descend(&self) -> Result<DepthGuard<'_>, ParseError> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            log::debug!("nesting limit of {} reached", self.max_depth);
            return Err(self.too_deep());
        }
        self.depth.set(depth);
        Ok(DepthGuard { root: self })
    }

    /// Fail if a chain of `length` operators would put the tree past the limit
    pub fn check_chain(&self, length: usize) -> Result<(), ParseError> {
        if self.depth.get() + length > self.max_depth {
            log::debug!(
                "operator chain of {} at depth {} exceeds the limit of {}",
                length,
                self.depth.get(),
                self.max_depth
            );
            return Err(self.too_deep());
        }
        Ok(())
    }

    fn record(&self, token: &Token) {
        let furthest = match self.furthest.get() {
            Some(current) => current.max(token.index),
            None => token.index,
        };
        self.furthest.set(Some(furthest));
    }

    /// Best guess at where parsing went wrong: the furthest consumed token, clamped to the
    /// last token, or the first token when nothing was consumed
    pub fn furthest_location(&self) -> Location {
        let last = self.tokens.len().saturating_sub(1);
        let index = self.furthest.get().unwrap_or(0).min(last);
        let offset = self.tokens.get(index).map_or(0, |token| token.offset);
        Location::new(offset, Arc::clone(&self.source))
    }

    pub fn list_empty(&self) -> ParseError {
        ParseError::ListEmpty(self.furthest_location())
    }

    pub fn incomplete(&self) -> ParseError {
        ParseError::ParseIncomplete(self.furthest_location())
    }

    pub fn failed(&self) -> ParseError {
        ParseError::ParseFailed(self.furthest_location())
    }

    pub fn too_deep(&self) -> ParseError {
        ParseError::NestingTooDeep(self.furthest_location())
    }
}

/// One level of nesting held open on a [`Root`]
#[derive(Debug)]
pub struct DepthGuard<'r> {
    root: &'r Root,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.root.depth.set(self.root.depth.get().saturating_sub(1));
    }
}

/// What [`Block::consume`] hands back: a token's text or a cursor into a group
#[derive(Debug, Clone)]
pub enum Item<'t> {
    Text(&'t str),
    Block(Block<'t>),
}

/// Cursor over the children of one group
#[derive(Debug, Clone)]
pub struct Block<'t> {
    root: &'t Root,
    items: &'t [TokenNode],
    place: usize,
}

impl<'t> Block<'t> {
    pub fn root(&self) -> &'t Root {
        self.root
    }

    /// Whether the child `offset` places ahead is a token of one of `kinds`.
    /// Groups and positions past the end never match.
    pub fn peek_kind(&self, offset: usize, kinds: &[TokenKind]) -> bool {
        self.lookahead(offset).is_some_and(|node| node.is_kind(kinds))
    }

    /// The child `offset` places ahead, without consuming it
    pub fn lookahead(&self, offset: usize) -> Option<&'t TokenNode> {
        self.items.get(self.place + offset)
    }

    /// Whether the next child is a group
    pub fn at_group(&self) -> bool {
        self.lookahead(0).is_some_and(TokenNode::is_group)
    }

    /// Consume the next child, returning its text or a cursor into it
    pub fn consume(&mut self) -> Result<Item<'t>, ParseError> {
        Ok(match self.consume_details()? {
            TokenNode::Leaf(token) => Item::Text(&token.text),
            TokenNode::Group(children) => Item::Block(self.enter(children)),
        })
    }

    /// Consume the next child, returning the full node
    pub fn consume_details(&mut self) -> Result<&'t TokenNode, ParseError> {
        let Some(node) = self.items.get(self.place) else {
            log::trace!("ran out of tokens at place {}", self.place);
            return Err(self.root.failed());
        };
        self.place += 1;
        if let TokenNode::Leaf(token) = node {
            self.root.record(token);
        }
        Ok(node)
    }

    /// Consume the next child, which must be a token
    pub fn consume_token(&mut self) -> Result<&'t Token, ParseError> {
        match self.consume_details()? {
            TokenNode::Leaf(token) => Ok(token),
            TokenNode::Group(_) => Err(self.root.failed()),
        }
    }

    /// Consume the next child, which must be a group, and return a cursor into it
    pub fn consume_group(&mut self) -> Result<Block<'t>, ParseError> {
        match self.consume()? {
            Item::Block(block) => Ok(block),
            Item::Text(_) => Err(self.root.failed()),
        }
    }

    fn enter(&self, children: &'t [TokenNode]) -> Block<'t> {
        Block {
            root: self.root,
            items: children,
            place: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.place >= self.items.len()
    }

    pub fn position(&self) -> usize {
        self.place
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
