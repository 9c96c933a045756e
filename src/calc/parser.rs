//! Parser module for the calculator language
//!
//! Recursive descent over the nested token tree produced by the
//! [lexer](crate::calc::lexer). The pieces, bottom up:
//!
//! - [`cursor`]: `Root` owns the tree, `Block` walks one group of it
//! - [`combinators`]: the delimited-list combinator every binary level and list uses
//! - [`grammar`]: the precedence ladder, loosest to tightest
//! - [`api`]: `parse`, `parse_with_source` and `parse_with_limit`
//!
//! ## Testing
//!
//! Parser tests should check whole trees with
//! [assert_node](crate::calc::testing::assert_node) rather than poking at single fields.

pub mod api;
pub mod ast;
pub mod combinators;
pub mod cursor;
pub mod grammar;

pub use api::{parse, parse_with_limit, parse_with_source};
pub use ast::{ArrowKind, BinaryOperator, ComparisonLink, ComparisonOperator, Node};
pub use combinators::{eat_delimited, ensure_completed, Binding, DelimitedList, ListTag};
pub use cursor::{Block, DepthGuard, Item, Root, DEFAULT_MAX_DEPTH};
