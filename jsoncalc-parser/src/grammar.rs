//! Expression grammar over the token stream
//!
//! One function per precedence level, lowest binding first: ternary, `??`,
//! `||`, `&&`, equality, comparison, additive, multiplicative, `**`, unary
//! prefix, then call/index postfixes over the definition forms (lists,
//! records, lambdas, calculated names) and finally parenthesized groups and
//! atoms. Left-associative chains are folded with [`may_continue`] rather
//! than left recursion.

use crate::combinator::{
    alt, cat, list, map, matched, may_continue, no_match, or_default, rep, ParseOutcome, Parser,
};
use crate::error::ParseError;
use crate::token::{SpChar, Token};
use jsoncalc_ast::{CalcNode, InfixOp, UnaryOp};
use jsoncalc_model::coercion;

type TResult<'t, T> = ParseOutcome<&'t [Token], T, ParseError>;

/// A grammar rule as a plain function, usable wherever a parser is expected.
type NodeParser = for<'t> fn(&'t [Token]) -> TResult<'t, CalcNode>;

/// Parse a full expression from the front of a token sequence.
pub(crate) fn expr(stream: &[Token]) -> TResult<'_, CalcNode> {
    ternary(stream)
}

/// Parse a complete token sequence, rejecting leftovers.
pub fn parse_tokens(tokens: &[Token]) -> Result<CalcNode, ParseError> {
    match expr(tokens)? {
        None => Err(ParseError::Unmatched),
        Some((rest, _)) if !rest.is_empty() => Err(ParseError::TrailingTokens {
            tokens: rest.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
        }),
        Some((_, node)) => Ok(node),
    }
}

fn c<'t>(ch: SpChar) -> impl Parser<&'t [Token], ParseError, Output = SpChar> {
    move |stream: &'t [Token]| match stream.first() {
        Some(Token::SpChar(found)) if *found == ch => matched(&stream[1..], ch),
        _ => no_match(),
    }
}

fn wrapped<'t>(open: SpChar, close: SpChar) -> impl Parser<&'t [Token], ParseError, Output = CalcNode> {
    map(cat((c(open), expr as NodeParser, c(close))), |(_, node, _)| node)
}

fn infix_op<'t>(
    table: &'static [(SpChar, InfixOp)],
) -> impl Parser<&'t [Token], ParseError, Output = InfixOp> {
    move |stream: &'t [Token]| match stream.first() {
        Some(Token::SpChar(ch)) => match table.iter().find(|(spelling, _)| spelling == ch) {
            Some((_, op)) => matched(&stream[1..], *op),
            None => no_match(),
        },
        _ => no_match(),
    }
}

/// One left-associative precedence level: `element (op element)*`, folded
/// into a left-leaning tree.
fn infix_level<'t>(
    table: &'static [(SpChar, InfixOp)],
    element: NodeParser,
) -> impl Parser<&'t [Token], ParseError, Output = CalcNode> {
    move |stream: &'t [Token]| {
        let Some((rest, head)) = element.parse(stream)? else {
            return no_match();
        };
        match rep(cat((infix_op(table), element)), 1, None).parse(rest)? {
            Some((next, tail)) => {
                let node = tail
                    .into_iter()
                    .fold(head, |lhs, (op, rhs)| CalcNode::infix(op, lhs, rhs));
                matched(next, node)
            }
            None => matched(rest, head),
        }
    }
}

fn ternary(stream: &[Token]) -> TResult<'_, CalcNode> {
    may_continue(nullish as NodeParser, |rest: &[Token], condition: CalcNode| {
        map(
            cat((c(SpChar::Question), expr as NodeParser, c(SpChar::Colon), expr as NodeParser)),
            move |(_, then, _, or_else)| CalcNode::ternary(condition.clone(), then, or_else),
        )
        .parse(rest)
    })
    .parse(stream)
}

fn nullish(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(&[(SpChar::Nullish, InfixOp::Nullish)], logical_or).parse(stream)
}

fn logical_or(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(&[(SpChar::Or, InfixOp::Or)], logical_and).parse(stream)
}

fn logical_and(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(&[(SpChar::And, InfixOp::And)], equality).parse(stream)
}

fn equality(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(
        &[
            (SpChar::StrictEq, InfixOp::StrictEq),
            (SpChar::StrictNe, InfixOp::StrictNe),
            (SpChar::Eq, InfixOp::Eq),
            (SpChar::Ne, InfixOp::Ne),
        ],
        comparison,
    )
    .parse(stream)
}

fn comparison(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(
        &[
            (SpChar::Ge, InfixOp::Ge),
            (SpChar::Le, InfixOp::Le),
            (SpChar::Gt, InfixOp::Gt),
            (SpChar::Lt, InfixOp::Lt),
        ],
        additive,
    )
    .parse(stream)
}

fn additive(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(&[(SpChar::Plus, InfixOp::Add), (SpChar::Minus, InfixOp::Sub)], multiplicative)
        .parse(stream)
}

fn multiplicative(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(
        &[
            (SpChar::Star, InfixOp::Mul),
            (SpChar::Slash, InfixOp::Div),
            (SpChar::Percent, InfixOp::Rem),
        ],
        power,
    )
    .parse(stream)
}

fn power(stream: &[Token]) -> TResult<'_, CalcNode> {
    infix_level(&[(SpChar::Pow, InfixOp::Pow)], unary).parse(stream)
}

/// Prefix `!`, `-`, `+`. The operand is the whole remaining expression, so
/// `-1+2` reads as the negation of `1+2`.
fn unary(stream: &[Token]) -> TResult<'_, CalcNode> {
    fn op(stream: &[Token]) -> TResult<'_, UnaryOp> {
        match stream.first() {
            Some(Token::SpChar(SpChar::Bang)) => matched(&stream[1..], UnaryOp::Not),
            Some(Token::SpChar(SpChar::Minus)) => matched(&stream[1..], UnaryOp::Neg),
            Some(Token::SpChar(SpChar::Plus)) => matched(&stream[1..], UnaryOp::Pos),
            _ => no_match(),
        }
    }
    let prefixed = map(cat((op, expr as NodeParser)), |(op, operand)| CalcNode::unary(op, operand));
    alt((prefixed, post_process as NodeParser)).parse(stream)
}

enum Postfix {
    Invoke(Vec<CalcNode>),
    Access(Vec<CalcNode>),
}

/// Call and index suffixes, left-folded onto the definition forms:
/// `f(a)(b)[0]` becomes nested invoke and member-access nodes. Consecutive
/// index steps collapse into a single access node with a multi-step path.
fn post_process(stream: &[Token]) -> TResult<'_, CalcNode> {
    may_continue(defs as NodeParser, |rest: &[Token], head: CalcNode| {
        let invoke = map(
            cat((
                c(SpChar::LParen),
                or_default(list(expr as NodeParser, c(SpChar::Comma)), Vec::new()),
                c(SpChar::RParen),
            )),
            |(_, args, _)| Postfix::Invoke(args),
        );
        let access = map(rep(bracket_expr as NodeParser, 1, None), Postfix::Access);
        map(rep(alt((invoke, access)), 1, None), move |suffixes| {
            suffixes.into_iter().fold(head.clone(), |node, suffix| match suffix {
                Postfix::Invoke(args) => CalcNode::invoke(node, args),
                Postfix::Access(path) => CalcNode::member_access(node, path),
            })
        })
        .parse(rest)
    })
    .parse(stream)
}

fn bracket_expr(stream: &[Token]) -> TResult<'_, CalcNode> {
    wrapped(SpChar::LBracket, SpChar::RBracket).parse(stream)
}

fn defs(stream: &[Token]) -> TResult<'_, CalcNode> {
    alt((
        list_def as NodeParser,
        record_def as NodeParser,
        lambda_def as NodeParser,
        calculated as NodeParser,
    ))
    .parse(stream)
}

fn list_def(stream: &[Token]) -> TResult<'_, CalcNode> {
    map(
        cat((
            alt((c(SpChar::ListOpen), c(SpChar::LBracket))),
            or_default(list(expr as NodeParser, c(SpChar::Comma)), Vec::new()),
            c(SpChar::RBracket),
        )),
        |(_, items, _)| CalcNode::list(items),
    )
    .parse(stream)
}

/// Record entries split at parse time: keys that are literals land in the
/// ordered `raw` map under their display string (so `[1]` keys as `"1"`),
/// computed keys stay as expression pairs.
fn record_def(stream: &[Token]) -> TResult<'_, CalcNode> {
    let entry = cat((index as NodeParser, c(SpChar::Colon), expr as NodeParser));
    map(
        cat((
            alt((c(SpChar::RecordOpen), c(SpChar::LBrace))),
            or_default(list(entry, c(SpChar::Comma)), Vec::new()),
            c(SpChar::RBrace),
        )),
        |(_, entries, _)| {
            let mut raw = Vec::new();
            let mut pairs = Vec::new();
            for (key, _, value) in entries {
                match key.as_value() {
                    Some(literal) => raw.push((coercion::to_display_string(literal), value)),
                    None => pairs.push((key, value)),
                }
            }
            CalcNode::record(raw, pairs)
        },
    )
    .parse(stream)
}

/// A record key: bare identifier, literal, or a bracketed expression.
fn index(stream: &[Token]) -> TResult<'_, CalcNode> {
    match stream.first() {
        Some(Token::Value(value)) => return matched(&stream[1..], CalcNode::value(value.clone())),
        Some(Token::PropName { name }) => {
            return matched(&stream[1..], CalcNode::value(name.clone()))
        }
        _ => {}
    }
    bracket_expr(stream)
}

fn lambda_def(stream: &[Token]) -> TResult<'_, CalcNode> {
    fn param(stream: &[Token]) -> TResult<'_, String> {
        match stream.first() {
            Some(Token::LambdaVar { name }) => matched(&stream[1..], name.clone()),
            _ => no_match(),
        }
    }
    map(
        cat((
            c(SpChar::LambdaOpen),
            or_default(list(param, c(SpChar::Comma)), Vec::new()),
            c(SpChar::Pipe),
            c(SpChar::Arrow),
            expr as NodeParser,
        )),
        |(_, identifiers, _, _, body)| CalcNode::lambda(identifiers, body),
    )
    .parse(stream)
}

fn calculated(stream: &[Token]) -> TResult<'_, CalcNode> {
    alt((
        map(wrapped(SpChar::CalcVarOpen, SpChar::RParen), CalcNode::calculated_var),
        map(wrapped(SpChar::CalcFnOpen, SpChar::RParen), CalcNode::calculated_fn),
        parenthesized as NodeParser,
    ))
    .parse(stream)
}

fn parenthesized(stream: &[Token]) -> TResult<'_, CalcNode> {
    alt((wrapped(SpChar::LParen, SpChar::RParen), atom as NodeParser)).parse(stream)
}

fn atom(stream: &[Token]) -> TResult<'_, CalcNode> {
    let node = match stream.first() {
        Some(Token::Value(value)) => CalcNode::value(value.clone()),
        Some(Token::Var { name }) => CalcNode::var(name.clone()),
        Some(Token::LambdaVar { name }) => CalcNode::lambda_var(name.clone()),
        Some(Token::Fn { name }) => CalcNode::fn_ref(name.clone()),
        _ => return no_match(),
    };
    matched(&stream[1..], node)
}
