//! Delimited-list combinator
//!
//! Every binary precedence level and every comma-separated list in the grammar is the same
//! shape: items separated by delimiter tokens. [`eat_delimited`] parses that shape once and
//! a [`DelimitedList`] value says how to fold the result.

use crate::calc::error::ParseResult;
use crate::calc::lexer::{Token, TokenKind};
use crate::calc::parser::ast::{BinaryOperator, Node};
use crate::calc::parser::cursor::{Block, Root};

/// The node a collected list is packaged into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTag {
    Program,
    ParamList,
}

impl ListTag {
    fn build(self, items: Vec<Node>) -> Node {
        match self {
            ListTag::Program => Node::program(items),
            ListTag::ParamList => Node::param_list(items),
        }
    }
}

/// How the items of a delimited list are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `a - b - c` is `(a - b) - c`
    Left,
    /// `a ^ b ^ c` is `a ^ (b ^ c)`
    Right,
    /// Delimiters are dropped and the items kept in order
    Collect(ListTag),
}

/// Policy for one use of [`eat_delimited`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedList {
    pub delimiters: &'static [TokenKind],
    pub binding: Binding,
    /// Whether zero items is acceptable
    pub allow_empty: bool,
    /// Wrap even a single item instead of returning it bare
    pub always_package: bool,
}

impl DelimitedList {
    pub const fn left(delimiters: &'static [TokenKind]) -> Self {
        Self::new(delimiters, Binding::Left)
    }

    pub const fn right(delimiters: &'static [TokenKind]) -> Self {
        Self::new(delimiters, Binding::Right)
    }

    pub const fn collect(delimiters: &'static [TokenKind], tag: ListTag) -> Self {
        Self::new(delimiters, Binding::Collect(tag))
    }

    const fn new(delimiters: &'static [TokenKind], binding: Binding) -> Self {
        Self {
            delimiters,
            binding,
            allow_empty: false,
            always_package: false,
        }
    }

    pub const fn allowing_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub const fn always_packaged(mut self) -> Self {
        self.always_package = true;
        self
    }
}

/// Parse `item (delimiter item)*` from `block` and fold it according to `list`.
///
/// An already complete block yields no items, which is an error unless the list allows
/// empty. A single item comes back bare unless the list always packages.
pub fn eat_delimited<'t, F>(
    block: &mut Block<'t>,
    mut item_rule: F,
    list: &DelimitedList,
) -> ParseResult<Node>
where
    F: FnMut(&mut Block<'t>) -> ParseResult<Node>,
{
    let mut items = Vec::new();
    let mut delimiters: Vec<&'t Token> = Vec::new();

    if block.is_complete() {
        if !list.allow_empty {
            log::debug!("empty list where at least one item is required");
            return Err(block.root().list_empty());
        }
    } else {
        items.push(item_rule(block)?);
    }

    let folds = !matches!(list.binding, Binding::Collect(_));
    while block.peek_kind(0, list.delimiters) {
        if folds {
            block.root().check_chain(delimiters.len() + 1)?;
        }
        delimiters.push(block.consume_token()?);
        items.push(item_rule(block)?);
    }

    if items.len() == 1 && !list.always_package {
        if let Some(item) = items.pop() {
            return Ok(item);
        }
    }

    let root = block.root();
    match list.binding {
        Binding::Left => fold_left(items, &delimiters, root),
        Binding::Right => fold_right(items, delimiters, root),
        Binding::Collect(tag) => Ok(tag.build(items)),
    }
}

fn operator(delimiter: &Token, root: &Root) -> ParseResult<BinaryOperator> {
    BinaryOperator::from_symbol(&delimiter.text).ok_or_else(|| {
        log::debug!("{} is not a binary operator", delimiter);
        root.failed()
    })
}

fn fold_left(items: Vec<Node>, delimiters: &[&Token], root: &Root) -> ParseResult<Node> {
    let mut items = items.into_iter();
    let Some(mut value) = items.next() else {
        return Err(root.list_empty());
    };
    for (delimiter, right) in delimiters.iter().zip(items) {
        value = Node::bin_op(operator(delimiter, root)?, value, right);
    }
    Ok(value)
}

fn fold_right(mut items: Vec<Node>, mut delimiters: Vec<&Token>, root: &Root) -> ParseResult<Node> {
    let Some(mut value) = items.pop() else {
        return Err(root.list_empty());
    };
    while let (Some(delimiter), Some(left)) = (delimiters.pop(), items.pop()) {
        value = Node::bin_op(operator(delimiter, root)?, left, value);
    }
    Ok(value)
}

/// Run `rule` over a whole block and fail if it leaves anything unconsumed
pub fn ensure_completed<'t, T, F>(rule: F, mut block: Block<'t>) -> ParseResult<T>
where
    F: FnOnce(&mut Block<'t>) -> ParseResult<T>,
{
    let result = rule(&mut block)?;
    if !block.is_complete() {
        log::debug!(
            "rule stopped at {} of {} items",
            block.position(),
            block.len()
        );
        return Err(block.root().incomplete());
    }
    Ok(result)
}
