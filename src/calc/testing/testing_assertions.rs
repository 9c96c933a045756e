//! Fluent assertion API for AST nodes

use crate::calc::parser::ast::{
    ArrowKind, BinaryOperator, ComparisonLink, ComparisonOperator, Node,
};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a node, usually the [`Node::Program`] from a parse
pub fn assert_node(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: "root".to_string(),
    }
}

fn child<'a>(node: &'a Node, context: String) -> NodeAssertion<'a> {
    NodeAssertion { node, context }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    fn unexpected(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {}: {}",
            self.context,
            expected,
            self.node.node_type(),
            self.node
        )
    }

    /// Assert the serialized s-expression of this node
    pub fn renders_as(self, expected: &str) -> Self {
        let actual = self.node.to_string();
        assert_eq!(actual, expected, "{}: Rendered form differs", self.context);
        self
    }

    pub fn number(self, expected: &str) {
        match self.node {
            Node::Number { text } => assert_eq!(
                text, expected,
                "{}: Expected number {}, found {}",
                self.context, expected, text
            ),
            _ => self.unexpected("number"),
        }
    }

    pub fn word(self, expected: &str) {
        match self.node {
            Node::Word { name } => assert_eq!(
                name, expected,
                "{}: Expected word {}, found {}",
                self.context, expected, name
            ),
            _ => self.unexpected("word"),
        }
    }

    pub fn assert_program(self) -> ListAssertion<'a> {
        match self.node {
            Node::Program { statements } => ListAssertion {
                items: statements,
                context: self.context,
            },
            _ => self.unexpected("program"),
        }
    }

    pub fn assert_param_list(self) -> ListAssertion<'a> {
        match self.node {
            Node::ParamList { items } => ListAssertion {
                items,
                context: self.context,
            },
            _ => self.unexpected("param_list"),
        }
    }

    pub fn assert_bin_op(self, expected: BinaryOperator) -> BinOpAssertion<'a> {
        match self.node {
            Node::BinOp { op, left, right } => {
                assert_eq!(
                    *op, expected,
                    "{}: Expected operator {}, found {}",
                    self.context,
                    expected.symbol(),
                    op.symbol()
                );
                BinOpAssertion {
                    left,
                    right,
                    context: self.context,
                }
            }
            _ => self.unexpected("bin_op"),
        }
    }

    /// Assert this is a unary minus and return assertions for its operand
    pub fn assert_unary_minus(self) -> NodeAssertion<'a> {
        match self.node {
            Node::UnaryMinus { value } => child(value, format!("{}.uminus", self.context)),
            _ => self.unexpected("unary_minus"),
        }
    }

    /// Assert this is a logical not and return assertions for its operand
    pub fn assert_not(self) -> NodeAssertion<'a> {
        match self.node {
            Node::Not { value } => child(value, format!("{}.not", self.context)),
            _ => self.unexpected("not"),
        }
    }

    /// Assert this is a factorial and return assertions for its operand
    pub fn assert_factorial(self) -> NodeAssertion<'a> {
        match self.node {
            Node::Factorial { value } => child(value, format!("{}.factorial", self.context)),
            _ => self.unexpected("factorial"),
        }
    }

    pub fn assert_die(self) -> DieAssertion<'a> {
        match self.node {
            Node::Die { times, faces } => DieAssertion {
                times: times.as_deref(),
                faces,
                context: self.context,
            },
            _ => self.unexpected("die"),
        }
    }

    pub fn assert_call(self) -> CallAssertion<'a> {
        match self.node {
            Node::FunctionCall { callee, args } => CallAssertion {
                callee,
                args,
                context: self.context,
            },
            _ => self.unexpected("function_call"),
        }
    }

    pub fn assert_function_definition(self) -> FunctionDefinitionAssertion<'a> {
        match self.node {
            Node::FunctionDefinition {
                params,
                variadic,
                kind,
                body,
            } => FunctionDefinitionAssertion {
                params,
                variadic: *variadic,
                kind: *kind,
                body,
                context: self.context,
            },
            _ => self.unexpected("function_definition"),
        }
    }

    pub fn assert_comparison(self) -> ComparisonAssertion<'a> {
        match self.node {
            Node::Comparison { first, rest } => ComparisonAssertion {
                first,
                rest,
                context: self.context,
            },
            _ => self.unexpected("comparison"),
        }
    }

    /// Assert this is an assignment to `name` and return assertions for the value
    pub fn assert_assignment(self, name: &str) -> NodeAssertion<'a> {
        match self.node {
            Node::Assignment { name: actual, value } => {
                assert_eq!(
                    actual, name,
                    "{}: Expected assignment to {}, found {}",
                    self.context, name, actual
                );
                child(value, format!("{}.{}", self.context, name))
            }
            _ => self.unexpected("assignment"),
        }
    }
}

// ============================================================================
// List Assertions (programs and parameter lists)
// ============================================================================

pub struct ListAssertion<'a> {
    items: &'a [Node],
    context: String,
}

impl<'a> ListAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.items.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} items, found {} items: [{}]",
            self.context,
            expected,
            actual,
            summarize_items(self.items)
        );
        self
    }

    pub fn item<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assert!(
            index < self.items.len(),
            "{}: Item index {} out of bounds ({} items)",
            self.context,
            index,
            self.items.len()
        );
        assertion(child(
            &self.items[index],
            format!("{}[{}]", self.context, index),
        ));
        self
    }

    /// Assert every item is a word, in order
    pub fn words(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self
            .items
            .iter()
            .map(|item| match item {
                Node::Word { name } => name.as_str(),
                other => panic!(
                    "{}: Expected only words, found {}",
                    self.context,
                    other.node_type()
                ),
            })
            .collect();
        assert_eq!(actual, expected, "{}: Word list differs", self.context);
        self
    }
}

fn summarize_items(items: &[Node]) -> String {
    items
        .iter()
        .map(Node::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Operator Assertions
// ============================================================================

pub struct BinOpAssertion<'a> {
    left: &'a Node,
    right: &'a Node,
    context: String,
}

impl<'a> BinOpAssertion<'a> {
    pub fn left<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.left, format!("{}.left", self.context)));
        self
    }

    pub fn right<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.right, format!("{}.right", self.context)));
        self
    }
}

pub struct DieAssertion<'a> {
    times: Option<&'a Node>,
    faces: &'a Node,
    context: String,
}

impl<'a> DieAssertion<'a> {
    pub fn without_times(self) -> Self {
        assert!(
            self.times.is_none(),
            "{}: Expected a bare die, found times {:?}",
            self.context,
            self.times.map(Node::to_string)
        );
        self
    }

    pub fn times<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let times = self
            .times
            .unwrap_or_else(|| panic!("{}: Expected times, found a bare die", self.context));
        assertion(child(times, format!("{}.times", self.context)));
        self
    }

    pub fn faces<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.faces, format!("{}.faces", self.context)));
        self
    }
}

// ============================================================================
// Function Assertions
// ============================================================================

pub struct CallAssertion<'a> {
    callee: &'a Node,
    args: &'a Node,
    context: String,
}

impl<'a> CallAssertion<'a> {
    pub fn callee<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.callee, format!("{}.callee", self.context)));
        self
    }

    pub fn args<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.args, format!("{}.args", self.context)));
        self
    }
}

pub struct FunctionDefinitionAssertion<'a> {
    params: &'a Node,
    variadic: bool,
    kind: ArrowKind,
    body: &'a Node,
    context: String,
}

impl<'a> FunctionDefinitionAssertion<'a> {
    pub fn params(self, expected: &[&str]) -> Self {
        child(self.params, format!("{}.params", self.context))
            .assert_param_list()
            .words(expected);
        self
    }

    pub fn variadic(self, expected: bool) -> Self {
        assert_eq!(
            self.variadic, expected,
            "{}: Expected variadic {}, found {}",
            self.context, expected, self.variadic
        );
        self
    }

    pub fn kind(self, expected: ArrowKind) -> Self {
        assert_eq!(
            self.kind,
            expected,
            "{}: Expected arrow {}, found {}",
            self.context,
            expected.symbol(),
            self.kind.symbol()
        );
        self
    }

    pub fn body<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.body, format!("{}.body", self.context)));
        self
    }
}

// ============================================================================
// Comparison Assertions
// ============================================================================

pub struct ComparisonAssertion<'a> {
    first: &'a Node,
    rest: &'a [ComparisonLink],
    context: String,
}

impl<'a> ComparisonAssertion<'a> {
    pub fn first<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        assertion(child(self.first, format!("{}.first", self.context)));
        self
    }

    pub fn link_count(self, expected: usize) -> Self {
        assert_eq!(
            self.rest.len(),
            expected,
            "{}: Expected {} comparison links, found {}",
            self.context,
            expected,
            self.rest.len()
        );
        self
    }

    pub fn link<F, R>(self, index: usize, operator: ComparisonOperator, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> R,
    {
        let link = self.rest.get(index).unwrap_or_else(|| {
            panic!(
                "{}: Link index {} out of bounds ({} links)",
                self.context,
                index,
                self.rest.len()
            )
        });
        assert_eq!(
            link.operator,
            operator,
            "{}: Expected operator {} at link {}, found {}",
            self.context,
            operator.symbol(),
            index,
            link.operator.symbol()
        );
        assertion(child(
            &link.value,
            format!("{}.rest[{}]", self.context, index),
        ));
        self
    }
}
