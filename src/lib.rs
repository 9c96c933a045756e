//! # dicecalc
//!
//! Front end for a small calculator and dice-rolling language: source text goes in, an AST
//! comes out.
//!
//! ```text
//! text ──tokenize──▶ tokens ──nest──▶ token tree ──grammar──▶ Program
//! ```
//!
//! The entry points are [`calc::parse`] and [`calc::parse_with_source`]. Evaluation is
//! somebody else's job; the [`calc::parser::Node`] enum is the whole interface towards it.
//!
//! ## Testing
//!
//! For testing guidelines, see the [testing module](calc::testing). Parser tests check
//! whole trees with `assert_node`, and longer scripts come from the curated samples in
//! `docs/samples/`.

pub mod calc;
