//! AST node definitions
//!
//! This is the whole interface towards the evaluator: every parse produces a
//! [`Node::Program`] whose statements are built only from the variants below. Nodes carry
//! no source offsets, so two inputs with the same structure produce equal trees.

use serde::Serialize;
use std::fmt;

/// Binary operators produced by the precedence ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "^")]
    Power,
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Modulo,
            "^" => BinaryOperator::Power,
            "&" => BinaryOperator::And,
            "|" => BinaryOperator::Or,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
        }
    }
}

/// Operators allowed in a comparison chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOperator {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl ComparisonOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "<" => ComparisonOperator::Less,
            ">" => ComparisonOperator::Greater,
            "<=" => ComparisonOperator::LessEqual,
            ">=" => ComparisonOperator::GreaterEqual,
            "==" => ComparisonOperator::Equal,
            "!=" => ComparisonOperator::NotEqual,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Less => "<",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

/// The arrow between a parameter list and a function body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArrowKind {
    #[serde(rename = "->")]
    Arrow,
    #[serde(rename = "~>")]
    TildeArrow,
}

impl ArrowKind {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "->" => Some(ArrowKind::Arrow),
            "~>" => Some(ArrowKind::TildeArrow),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArrowKind::Arrow => "->",
            ArrowKind::TildeArrow => "~>",
        }
    }
}

/// One `(operator, operand)` link of a comparison chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonLink {
    pub operator: ComparisonOperator,
    pub value: Node,
}

/// An AST node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "#", rename_all = "snake_case")]
pub enum Node {
    Number {
        text: String,
    },
    Word {
        name: String,
    },
    BinOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryMinus {
        value: Box<Node>,
    },
    Not {
        value: Box<Node>,
    },
    Factorial {
        value: Box<Node>,
    },
    /// `times` is absent for a bare `d6`
    Die {
        times: Option<Box<Node>>,
        faces: Box<Node>,
    },
    /// `args` is a [`Node::ParamList`] unless the call had exactly one argument, in which
    /// case it is that argument itself
    FunctionCall {
        callee: Box<Node>,
        args: Box<Node>,
    },
    ParamList {
        items: Vec<Node>,
    },
    /// `params` is always a [`Node::ParamList`] of words
    FunctionDefinition {
        params: Box<Node>,
        variadic: bool,
        kind: ArrowKind,
        body: Box<Node>,
    },
    Comparison {
        first: Box<Node>,
        rest: Vec<ComparisonLink>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    Program {
        statements: Vec<Node>,
    },
}

impl Node {
    pub fn number(text: impl Into<String>) -> Self {
        Node::Number { text: text.into() }
    }

    pub fn word(name: impl Into<String>) -> Self {
        Node::Word { name: name.into() }
    }

    pub fn bin_op(op: BinaryOperator, left: Node, right: Node) -> Self {
        Node::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary_minus(value: Node) -> Self {
        Node::UnaryMinus {
            value: Box::new(value),
        }
    }

    pub fn logical_not(value: Node) -> Self {
        Node::Not {
            value: Box::new(value),
        }
    }

    pub fn factorial(value: Node) -> Self {
        Node::Factorial {
            value: Box::new(value),
        }
    }

    pub fn die(times: Option<Node>, faces: Node) -> Self {
        Node::Die {
            times: times.map(Box::new),
            faces: Box::new(faces),
        }
    }

    pub fn call(callee: Node, args: Node) -> Self {
        Node::FunctionCall {
            callee: Box::new(callee),
            args: Box::new(args),
        }
    }

    pub fn param_list(items: Vec<Node>) -> Self {
        Node::ParamList { items }
    }

    pub fn program(statements: Vec<Node>) -> Self {
        Node::Program { statements }
    }

    /// Tag name of this node, as used in serialized output
    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Number { .. } => "number",
            Node::Word { .. } => "word",
            Node::BinOp { .. } => "bin_op",
            Node::UnaryMinus { .. } => "unary_minus",
            Node::Not { .. } => "not",
            Node::Factorial { .. } => "factorial",
            Node::Die { .. } => "die",
            Node::FunctionCall { .. } => "function_call",
            Node::ParamList { .. } => "param_list",
            Node::FunctionDefinition { .. } => "function_definition",
            Node::Comparison { .. } => "comparison",
            Node::Assignment { .. } => "assignment",
            Node::Program { .. } => "program",
        }
    }

    /// Statements of a program node; empty for anything else
    pub fn statements(&self) -> &[Node] {
        match self {
            Node::Program { statements } => statements,
            _ => &[],
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::calc::formats::serialize_sexp(self))
    }
}
