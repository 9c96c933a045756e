//! Treeviz formatter for AST nodes
//!
//! One line per node, with box-drawing connectors showing the nesting. Every line reads
//! `<connector> <node type>: <label>`, where the label is the operator, name or literal
//! that distinguishes the node (truncated to 30 characters).
//!
//! Example, for `2d6 + f(x)`:
//!
//! ```text
//! └─ bin_op: +
//!   ├─ die: d
//!   │ ├─ number: 2
//!   │ └─ number: 6
//!   └─ function_call: f
//!     ├─ word: f
//!     └─ word: x
//! ```

use crate::calc::parser::ast::Node;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Render a node as a tree; a program renders its statements as the top level
pub fn to_treeviz_str(node: &Node) -> String {
    let mut result = String::new();
    match node {
        Node::Program { statements } => append_children(&mut result, statements.iter(), ""),
        _ => append_node(&mut result, node, "", true),
    }
    result
}

fn label(node: &Node) -> String {
    match node {
        Node::Number { text } => text.clone(),
        Node::Word { name } => name.clone(),
        Node::BinOp { op, .. } => op.symbol().to_string(),
        Node::UnaryMinus { .. } => "-".to_string(),
        Node::Not { .. } | Node::Factorial { .. } => "!".to_string(),
        Node::Die { .. } => "d".to_string(),
        Node::FunctionCall { callee, .. } => callee.to_string(),
        Node::ParamList { items } => format!("{} items", items.len()),
        Node::FunctionDefinition { kind, variadic, .. } => {
            if *variadic {
                format!("{} (variadic)", kind.symbol())
            } else {
                kind.symbol().to_string()
            }
        }
        Node::Comparison { rest, .. } => rest
            .iter()
            .map(|link| link.operator.symbol())
            .collect::<Vec<_>>()
            .join(" "),
        Node::Assignment { name, .. } => name.clone(),
        Node::Program { statements } => format!("{} statements", statements.len()),
    }
}

fn children(node: &Node) -> Vec<&Node> {
    match node {
        Node::Number { .. } | Node::Word { .. } => vec![],
        Node::BinOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        Node::UnaryMinus { value } | Node::Not { value } | Node::Factorial { value } => {
            vec![value.as_ref()]
        }
        Node::Die { times, faces } => times
            .as_deref()
            .into_iter()
            .chain(std::iter::once(faces.as_ref()))
            .collect(),
        Node::FunctionCall { callee, args } => vec![callee.as_ref(), args.as_ref()],
        Node::ParamList { items } => items.iter().collect(),
        Node::FunctionDefinition { params, body, .. } => vec![params.as_ref(), body.as_ref()],
        Node::Comparison { first, rest } => std::iter::once(first.as_ref())
            .chain(rest.iter().map(|link| &link.value))
            .collect(),
        Node::Assignment { value, .. } => vec![value.as_ref()],
        Node::Program { statements } => statements.iter().collect(),
    }
}

fn append_node(result: &mut String, node: &Node, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };

    result.push_str(&format!(
        "{}{} {}: {}\n",
        prefix,
        connector,
        node.node_type(),
        truncate(&label(node), 30)
    ));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, children(node).into_iter(), &new_prefix);
}

fn append_children<'a>(
    result: &mut String,
    children: impl ExactSizeIterator<Item = &'a Node>,
    prefix: &str,
) {
    let count = children.len();
    for (i, child) in children.enumerate() {
        append_node(result, child, prefix, i == count - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::parser::ast::BinaryOperator;

    #[test]
    fn test_leaf() {
        assert_eq!(to_treeviz_str(&Node::number("42")), "└─ number: 42\n");
    }

    #[test]
    fn test_nested_connectors() {
        let node = Node::bin_op(
            BinaryOperator::Add,
            Node::die(Some(Node::number("2")), Node::number("6")),
            Node::word("x"),
        );
        let expected = "\
└─ bin_op: +
  ├─ die: d
  │ ├─ number: 2
  │ └─ number: 6
  └─ word: x
";
        assert_eq!(to_treeviz_str(&node), expected);
    }

    #[test]
    fn test_program_statements_are_top_level() {
        let program = Node::program(vec![Node::number("1"), Node::unary_minus(Node::word("y"))]);
        let expected = "\
├─ number: 1
└─ unary_minus: -
  └─ word: y
";
        assert_eq!(to_treeviz_str(&program), expected);
    }

    #[test]
    fn test_bare_die_has_one_child() {
        let output = to_treeviz_str(&Node::die(None, Node::number("6")));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
