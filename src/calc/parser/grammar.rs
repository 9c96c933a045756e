//! The precedence ladder
//!
//! One function per level, loosest first. Each level looks for its own marker and
//! otherwise falls through to the next tighter level:
//!
//! ```text
//! expression        function definition   (params) -> body
//! comparison        flat chain            a < b <= c
//! logic_or          left                  |
//! logic_and         left                  &
//! addition          left                  + -
//! product           left                  * /
//! modulo            left                  %
//! uminus            prefix                -
//! power             right                 ^
//! uminus_inner      prefix                -
//! superscript       postfix, chainable    x²
//! dieroll           once                  d6, 2d6
//! factorial         postfix, chainable    x!
//! logic_not         prefix                !x
//! function_call     postfix, curried      f(a)(b)
//! wrapped_expression                      (expression)
//! atom                                    number or word
//! ```
//!
//! Unary minus appears twice, above and below power, so that `-2^2` is `-(2^2)` while
//! `2^-2` is still `2^(-2)`.
//!
//! Every rule that recurses on nesting in the input (groups, prefix operators, function
//! bodies) holds a depth guard from the root while it recurses. The postfix loops and
//! binary folds build deep trees without recursing, so they check their chain length
//! against the same limit.

use crate::calc::error::ParseResult;
use crate::calc::lexer::{superscript_to_digits, TokenKind, TokenNode};
use crate::calc::parser::ast::{
    ArrowKind, BinaryOperator, ComparisonLink, ComparisonOperator, Node,
};
use crate::calc::parser::combinators::{eat_delimited, ensure_completed, DelimitedList, ListTag};
use crate::calc::parser::cursor::{Block, Item};

const PROGRAM: DelimitedList = DelimitedList::collect(&[TokenKind::Comma], ListTag::Program);
const ARGUMENTS: DelimitedList =
    DelimitedList::collect(&[TokenKind::Comma], ListTag::ParamList).allowing_empty();
const PARAMETERS: DelimitedList = DelimitedList::collect(&[TokenKind::Comma], ListTag::ParamList)
    .allowing_empty()
    .always_packaged();
const LOGIC_OR: DelimitedList = DelimitedList::left(&[TokenKind::LorOp]);
const LOGIC_AND: DelimitedList = DelimitedList::left(&[TokenKind::LandOp]);
const ADDITION: DelimitedList = DelimitedList::left(&[TokenKind::AddOp]);
const PRODUCT: DelimitedList = DelimitedList::left(&[TokenKind::MulOp]);
const MODULO: DelimitedList = DelimitedList::left(&[TokenKind::ModOp]);
const POWER: DelimitedList = DelimitedList::right(&[TokenKind::PowOp]);

/// Top level: one or more comma separated statements
pub fn program(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, statement, &PROGRAM)
}

/// `name = expression`, or a bare expression
pub fn statement(block: &mut Block<'_>) -> ParseResult<Node> {
    if block.peek_kind(1, &[TokenKind::Assignment]) {
        let name = word(block)?;
        block.consume()?;
        let value = expression(block)?;
        log::trace!("assignment to {}", name);
        return Ok(Node::Assignment {
            name,
            value: Box::new(value),
        });
    }
    expression(block)
}

pub fn expression(block: &mut Block<'_>) -> ParseResult<Node> {
    function_definition(block)
}

fn function_definition(block: &mut Block<'_>) -> ParseResult<Node> {
    if !block.peek_kind(1, &[TokenKind::Arrow]) {
        return comparison(block);
    }
    if !block.at_group() {
        log::debug!("function definition without a parameter group");
        return Err(block.root().failed());
    }
    let parameters = block.consume_group()?;
    let (params, variadic) = ensure_completed(parameter_list, parameters)?;
    let arrow = block.consume_token()?;
    let kind = ArrowKind::from_symbol(&arrow.text).ok_or_else(|| block.root().failed())?;
    let _guard = block.root().descend()?;
    let body = expression(block)?;
    Ok(Node::FunctionDefinition {
        params: Box::new(params),
        variadic,
        kind,
        body: Box::new(body),
    })
}

/// Comma separated words, optionally followed by a `.` marking the last one variadic
fn parameter_list(block: &mut Block<'_>) -> ParseResult<(Node, bool)> {
    let params = eat_delimited(block, parameter, &PARAMETERS)?;
    let variadic = block.peek_kind(0, &[TokenKind::Period]);
    if variadic {
        block.consume()?;
    }
    Ok((params, variadic))
}

fn parameter(block: &mut Block<'_>) -> ParseResult<Node> {
    word(block).map(Node::word)
}

fn argument_list(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, expression, &ARGUMENTS)
}

/// A chain of comparisons is kept flat: `a < b < c` is one node with two links
fn comparison(block: &mut Block<'_>) -> ParseResult<Node> {
    let first = logic_or(block)?;
    if !block.peek_kind(0, &[TokenKind::CompOp]) {
        return Ok(first);
    }
    let mut rest = Vec::new();
    while block.peek_kind(0, &[TokenKind::CompOp]) {
        let token = block.consume_token()?;
        let operator =
            ComparisonOperator::from_symbol(&token.text).ok_or_else(|| block.root().failed())?;
        let value = logic_or(block)?;
        rest.push(ComparisonLink { operator, value });
    }
    Ok(Node::Comparison {
        first: Box::new(first),
        rest,
    })
}

fn logic_or(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, logic_and, &LOGIC_OR)
}

fn logic_and(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, addition, &LOGIC_AND)
}

fn addition(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, product, &ADDITION)
}

fn product(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, modulo, &PRODUCT)
}

fn modulo(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, uminus, &MODULO)
}

fn at_minus(block: &Block<'_>) -> bool {
    block
        .lookahead(0)
        .and_then(TokenNode::as_leaf)
        .is_some_and(|token| token.is_symbol(TokenKind::AddOp, "-"))
}

/// Prefix minus above power: `-2^2` is `-(2^2)`
fn uminus(block: &mut Block<'_>) -> ParseResult<Node> {
    if at_minus(block) {
        block.consume()?;
        let _guard = block.root().descend()?;
        return Ok(Node::unary_minus(uminus(block)?));
    }
    power(block)
}

fn power(block: &mut Block<'_>) -> ParseResult<Node> {
    eat_delimited(block, uminus_inner, &POWER)
}

/// Prefix minus as an operand of power: `2^-2` is `2^(-2)`
fn uminus_inner(block: &mut Block<'_>) -> ParseResult<Node> {
    if at_minus(block) {
        block.consume()?;
        let _guard = block.root().descend()?;
        return Ok(Node::unary_minus(uminus_inner(block)?));
    }
    superscript(block)
}

/// `x²` is rewritten to `x^2`
fn superscript(block: &mut Block<'_>) -> ParseResult<Node> {
    let mut result = dieroll(block)?;
    let mut chain = 0;
    while block.peek_kind(0, &[TokenKind::Superscript]) {
        chain += 1;
        block.root().check_chain(chain)?;
        let token = block.consume_token()?;
        let exponent = Node::number(superscript_to_digits(&token.text));
        result = Node::bin_op(BinaryOperator::Power, result, exponent);
    }
    Ok(result)
}

fn dieroll(block: &mut Block<'_>) -> ParseResult<Node> {
    if block.peek_kind(0, &[TokenKind::DieOp]) {
        block.consume()?;
        return Ok(Node::die(None, factorial(block)?));
    }
    let left = factorial(block)?;
    if block.peek_kind(0, &[TokenKind::DieOp]) {
        block.consume()?;
        return Ok(Node::die(Some(left), factorial(block)?));
    }
    Ok(left)
}

fn factorial(block: &mut Block<'_>) -> ParseResult<Node> {
    let mut value = logic_not(block)?;
    let mut chain = 0;
    while block.peek_kind(0, &[TokenKind::Bang]) {
        chain += 1;
        block.root().check_chain(chain)?;
        block.consume()?;
        value = Node::factorial(value);
    }
    Ok(value)
}

fn logic_not(block: &mut Block<'_>) -> ParseResult<Node> {
    if block.peek_kind(0, &[TokenKind::Bang]) {
        block.consume()?;
        let _guard = block.root().descend()?;
        return Ok(Node::logical_not(logic_not(block)?));
    }
    function_call(block)
}

/// `f(a)(b)` calls `f` with `a`, then calls the result with `b`
fn function_call(block: &mut Block<'_>) -> ParseResult<Node> {
    let mut value = wrapped_expression(block)?;
    let mut chain = 0;
    while block.at_group() {
        chain += 1;
        block.root().check_chain(chain)?;
        let arguments = block.consume_group()?;
        let _guard = block.root().descend()?;
        let args = ensure_completed(argument_list, arguments)?;
        value = Node::call(value, args);
    }
    Ok(value)
}

fn wrapped_expression(block: &mut Block<'_>) -> ParseResult<Node> {
    if block.at_group() {
        if let Item::Block(inner) = block.consume()? {
            let _guard = block.root().descend()?;
            return ensure_completed(expression, inner);
        }
    }
    atom(block)
}

fn atom(block: &mut Block<'_>) -> ParseResult<Node> {
    if !block.peek_kind(0, &[TokenKind::Number, TokenKind::Word]) {
        log::debug!(
            "expected a number or word, found {}",
            block
                .lookahead(0)
                .map_or_else(|| "the end of the group".to_string(), |node| node.to_string())
        );
        return Err(block.root().failed());
    }
    let token = block.consume_token()?;
    Ok(match token.kind {
        TokenKind::Number => Node::number(token.text.clone()),
        _ => Node::word(token.text.clone()),
    })
}

fn word(block: &mut Block<'_>) -> ParseResult<String> {
    if !block.peek_kind(0, &[TokenKind::Word]) {
        return Err(block.root().failed());
    }
    Ok(block.consume_token()?.text.clone())
}
