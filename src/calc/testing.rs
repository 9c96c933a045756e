//! Testing utilities for AST assertions
//!
//! # Parser Testing Guidelines
//!
//! Two tools keep parser tests readable and honest:
//!
//! 1. **[CalcSources](crate::calc::processor::calc_sources::CalcSources)** - curated sample
//!    scripts under `docs/samples/`, for anything longer than a one-line expression
//! 2. **[assert_node](fn@assert_node)** - fluent assertions over a whole AST
//!
//! ## Why a fluent API
//!
//! Checking a tree by hand means a `match` per level with a `panic!` arm each time.
//! With `assert_node` the shape of the assertion follows the shape of the tree:
//!
//! ```rust-example
//! use crate::calc::parser::{parse, BinaryOperator};
//! use crate::calc::testing::assert_node;
//!
//! let program = parse("2+3*4").unwrap();
//! assert_node(&program)
//!     .assert_program()
//!     .item_count(1)
//!     .item(0, |stmt| {
//!         stmt.assert_bin_op(BinaryOperator::Add)
//!             .left(|n| n.number("2"))
//!             .right(|n| {
//!                 n.assert_bin_op(BinaryOperator::Multiply)
//!                     .left(|n| n.number("3"))
//!                     .right(|n| n.number("4"))
//!             })
//!     });
//! ```
//!
//! Failures name the path to the offending node (`root[0].right.left`) and print it in
//! s-expression form.

mod testing_assertions;

pub use testing_assertions::{
    assert_node, BinOpAssertion, CallAssertion, ComparisonAssertion, DieAssertion,
    FunctionDefinitionAssertion, ListAssertion, NodeAssertion,
};
