//! S-expression AST serialization
//!
//! A compact, single-line rendering used by `Display`, the `ast-sexp` format and most
//! snapshot tests.
//!
//! ## Format
//!
//! - Number and word → their text
//! - Binary operator → `(op left right)`
//! - Prefix minus → `(neg x)`, logical not → `(not x)`, factorial → `(fact x)`
//! - Die → `(d times faces)` or `(d faces)`
//! - Call → `(call callee args)`; argument lists render as `[a b]`
//! - Function definition → `(-> [a b] body)`, with `...` after the last variadic parameter
//! - Comparison → `(cmp a < b <= c)`
//! - Assignment → `(= name value)`
//! - Program → one statement per line
//!
//! ## Example
//!
//! ```text
//! f = (x, y) -> x^2 + y, f(1, 2d6)
//!
//! (= f (-> [x y] (+ (^ x 2) y)))
//! (call f [1 (d 2 6)])
//! ```

use crate::calc::parser::ast::Node;

/// Serialize a node; a program yields one line per statement
pub fn serialize_sexp(node: &Node) -> String {
    let mut output = String::new();
    match node {
        Node::Program { statements } => {
            for (i, statement) in statements.iter().enumerate() {
                if i > 0 {
                    output.push('\n');
                }
                write_node(&mut output, statement);
            }
        }
        _ => write_node(&mut output, node),
    }
    output
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Number { text } => out.push_str(text),
        Node::Word { name } => out.push_str(name),
        Node::BinOp { op, left, right } => {
            write_form(out, op.symbol(), &[left.as_ref(), right.as_ref()])
        }
        Node::UnaryMinus { value } => write_form(out, "neg", &[value.as_ref()]),
        Node::Not { value } => write_form(out, "not", &[value.as_ref()]),
        Node::Factorial { value } => write_form(out, "fact", &[value.as_ref()]),
        Node::Die { times, faces } => match times {
            Some(times) => write_form(out, "d", &[times.as_ref(), faces.as_ref()]),
            None => write_form(out, "d", &[faces.as_ref()]),
        },
        Node::FunctionCall { callee, args } => {
            write_form(out, "call", &[callee.as_ref(), args.as_ref()])
        }
        Node::ParamList { items } => write_list(out, items, false),
        Node::FunctionDefinition {
            params,
            variadic,
            kind,
            body,
        } => {
            out.push('(');
            out.push_str(kind.symbol());
            out.push(' ');
            match params.as_ref() {
                Node::ParamList { items } => write_list(out, items, *variadic),
                other => write_node(out, other),
            }
            out.push(' ');
            write_node(out, body);
            out.push(')');
        }
        Node::Comparison { first, rest } => {
            out.push_str("(cmp ");
            write_node(out, first);
            for link in rest {
                out.push(' ');
                out.push_str(link.operator.symbol());
                out.push(' ');
                write_node(out, &link.value);
            }
            out.push(')');
        }
        Node::Assignment { name, value } => {
            out.push_str("(= ");
            out.push_str(name);
            out.push(' ');
            write_node(out, value);
            out.push(')');
        }
        Node::Program { statements } => {
            out.push_str("(program");
            for statement in statements {
                out.push(' ');
                write_node(out, statement);
            }
            out.push(')');
        }
    }
}

fn write_form(out: &mut String, head: &str, operands: &[&Node]) {
    out.push('(');
    out.push_str(head);
    for operand in operands {
        out.push(' ');
        write_node(out, operand);
    }
    out.push(')');
}

fn write_list(out: &mut String, items: &[Node], variadic: bool) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_node(out, item);
    }
    if variadic {
        out.push_str("...");
    }
    out.push(']');
}
