//! Output format implementations for AST serialization
//!
//! - [`sexp`]: compact s-expressions, also used by `Display` for [`Node`](crate::calc::parser::Node)
//! - [`treeviz`]: one line per node with box-drawing connectors

pub mod sexp;
pub mod treeviz;

pub use sexp::serialize_sexp;
pub use treeviz::to_treeviz_str;
