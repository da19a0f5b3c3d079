// Licensed under MIT. See LICENSE for details.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char as pchar, digit1, multispace0, one_of, satisfy};
use nom::combinator::{cut, eof, map, opt, peek, recognize, value};
use nom::error::context;
use nom::sequence::{pair, terminated, tuple};
use nom::IResult;
use tracing::{debug, trace};

use crate::error::{Expected, RuleError, SyntaxError};
use crate::grammar::{Node, Rule};
use crate::types::*;

pub type PResult<'a, O> = IResult<&'a str, O, RuleError<'a>>;

// Connectives.
#[derive(Clone, Copy)]
enum Oper {
    And,
    Or,
    Implies,
}

impl Oper {
    fn join(self, left: Formula, right: Formula, flag: Flag) -> Formula {
        let (left, right) = (Box::new(left), Box::new(right));
        match self {
            Oper::And => Formula::And { left, right, flag },
            Oper::Or => Formula::Or { left, right, flag },
            Oper::Implies => Formula::Implies { left, right, flag },
        }
    }
}

// Runs `body` as the named rule, so failures at its start report the rule.
fn rule<'a, O, F>(rule: Rule, input: &'a str, body: F) -> PResult<'a, O>
where
    F: FnMut(&'a str) -> PResult<'a, O>,
{
    context(rule.name(), body)(input)
}

// A token, optionally preceded by whitespace. Failures point at the end of
// the previous token.
fn lexeme<'a, O, P>(what: Expected, mut parser: P) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    P: FnMut(&'a str) -> PResult<'a, O>,
{
    move |input: &'a str| {
        let (rest, _) = multispace0::<_, RuleError<'a>>(input)?;
        parser(rest).map_err(|e| e.map(|_| RuleError::expected(input, what)))
    }
}

fn sym<'a>(token: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    lexeme(Expected::Token(token), tag(token))
}

// A temporal keyword is only a keyword when an interval follows; after that
// the operator is committed and later failures are final.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    terminated(sym(word), peek(sym("[")))
}

pub fn identifier(input: &str) -> PResult<'_, &str> {
    lexeme(
        Expected::Rule(Rule::Identifier.name()),
        recognize(pair(
            satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
    )(input)
}

pub fn number(input: &str) -> PResult<'_, Number> {
    let (rest, text) = lexeme(
        Expected::Rule(Rule::Number.name()),
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(pchar('.'), digit1)))),
                recognize(pair(pchar('.'), digit1)),
            )),
        ))),
    )(input)?;
    match text.parse::<f64>() {
        Ok(val) => Ok((rest, Number::new(val, text))),
        Err(_) => Err(nom::Err::Error(RuleError::expected(
            input,
            Expected::Rule(Rule::Number.name()),
        ))),
    }
}

pub fn flag(input: &str) -> PResult<'_, Flag> {
    map(
        opt(lexeme(
            Expected::Rule(Rule::Flag.name()),
            alt((value(Flag::Weak, pchar('w')), value(Flag::Strong, pchar('s')))),
        )),
        Option::unwrap_or_default,
    )(input)
}

pub fn rel_op(input: &str) -> PResult<'_, RelOp> {
    // Two-character operators first so `>=` is never cut short to `>`.
    rule(
        Rule::RelOp,
        input,
        alt((
            value(RelOp::Ge, sym(">=")),
            value(RelOp::Le, sym("<=")),
            value(RelOp::Eq, sym("==")),
            value(RelOp::Lt, sym("<")),
            value(RelOp::Gt, sym(">")),
        )),
    )
}

pub fn arith_op(input: &str) -> PResult<'_, ArithOp> {
    rule(
        Rule::ArithOp,
        input,
        alt((
            value(ArithOp::Add, sym("+")),
            value(ArithOp::Sub, sym("-")),
            value(ArithOp::Mul, sym("*")),
            value(ArithOp::Div, sym("/")),
        )),
    )
}

pub fn param(input: &str) -> PResult<'_, Param> {
    rule(Rule::Param, input, |input| {
        let (input, name) = identifier(input)?;
        let (input, _) = sym("?")(input)?;
        let (input, default) = number(input)?;
        let (input, _) = sym(";")(input)?;
        let (input, tolerance) = number(input)?;
        Ok((
            input,
            Param {
                name: name.to_string(),
                default,
                tolerance,
            },
        ))
    })
}

pub fn bound(input: &str) -> PResult<'_, Bound> {
    rule(
        Rule::Bound,
        input,
        alt((map(param, Bound::Param), map(number, Bound::Constant))),
    )
}

pub fn interval(input: &str) -> PResult<'_, Interval> {
    rule(Rule::Interval, input, |input| {
        let (input, _) = sym("[")(input)?;
        let (input, left) = bound(input)?;
        let (input, _) = sym(",")(input)?;
        let (input, right) = bound(input)?;
        let (input, _) = sym("]")(input)?;
        Ok((input, Interval { left, right }))
    })
}

pub fn infix(input: &str) -> PResult<'_, Term> {
    rule(Rule::Infix, input, |input| {
        let (input, _) = sym("{")(input)?;
        let (input, left) = term(input)?;
        let (input, op) = arith_op(input)?;
        let (input, right) = term(input)?;
        let (input, _) = sym("}")(input)?;
        Ok((
            input,
            Term::Expr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        ))
    })
}

pub fn term(input: &str) -> PResult<'_, Term> {
    // Parameters before bare identifiers, which would swallow their name.
    rule(
        Rule::Term,
        input,
        alt((
            infix,
            map(param, Term::Param),
            map(number, Term::Num),
            map(identifier, |name| Term::Var(name.to_string())),
        )),
    )
}

pub fn constraint(input: &str) -> PResult<'_, Predicate> {
    rule(Rule::Constraint, input, |input| {
        let (input, lhs) = term(input)?;
        let (input, relop) = rel_op(input)?;
        // Only a constraint has a relational operator.
        let (input, rhs) = cut(term)(input)?;
        Ok((
            input,
            Predicate::Constraint(Constraint {
                relop,
                term: lhs,
                bound: rhs,
            }),
        ))
    })
}

pub fn atom(input: &str) -> PResult<'_, Predicate> {
    rule(
        Rule::Atom,
        input,
        map(identifier, |name| Predicate::Atom(name.to_string())),
    )
}

pub fn predicate(input: &str) -> PResult<'_, Predicate> {
    rule(Rule::Predicate, input, alt((constraint, atom)))
}

pub fn globally(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Globally, input, |input| {
        let (input, _) = keyword("G")(input)?;
        let (input, interval) = cut(interval)(input)?;
        let (input, sub) = cut(formula)(input)?;
        let (input, flag) = flag(input)?;
        Ok((
            input,
            Formula::Globally {
                interval,
                sub: Box::new(sub),
                flag,
            },
        ))
    })
}

pub fn eventually(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Eventually, input, |input| {
        let (input, _) = keyword("E")(input)?;
        let (input, interval) = cut(interval)(input)?;
        let (input, sub) = cut(formula)(input)?;
        let (input, flag) = flag(input)?;
        Ok((
            input,
            Formula::Eventually {
                interval,
                sub: Box::new(sub),
                flag,
            },
        ))
    })
}

pub fn until(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Until, input, |input| {
        let (input, _) = keyword("U")(input)?;
        let (input, interval) = cut(interval)(input)?;
        let (input, _) = cut(sym("("))(input)?;
        let (input, left) = cut(formula)(input)?;
        let (input, _) = cut(sym(","))(input)?;
        let (input, right) = cut(formula)(input)?;
        let (input, _) = cut(sym(")"))(input)?;
        let (input, flag) = flag(input)?;
        Ok((
            input,
            Formula::Until {
                interval,
                left: Box::new(left),
                right: Box::new(right),
                flag,
            },
        ))
    })
}

pub fn mu(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Mu, input, |input| {
        let (input, _) = alt((sym("µ"), sym("μ")))(input)?;
        let (input, _) = cut(sym("("))(input)?;
        let (input, threshold) = cut(number)(input)?;
        let (input, spread) = cut(number)(input)?;
        let at_confidence = input;
        let (input, confidence) = cut(number)(input)?;
        let (input, _) = cut(sym(")"))(input)?;
        let (input, flag) = flag(input)?;
        match Mu::new(threshold, spread, confidence, flag) {
            Ok(mu) => Ok((input, Formula::Mu(mu))),
            Err(_) => Err(nom::Err::Failure(RuleError::expected(
                at_confidence,
                Expected::Rule("confidence in [0, 1]"),
            ))),
        }
    })
}

pub fn negation(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Negation, input, |input| {
        let (input, _) = sym("!")(input)?;
        let (input, sub) = cut(formula)(input)?;
        let (input, flag) = flag(input)?;
        Ok((
            input,
            Formula::Not {
                sub: Box::new(sub),
                flag,
            },
        ))
    })
}

fn connective(input: &str) -> PResult<'_, Oper> {
    alt((
        value(Oper::And, sym("&")),
        value(Oper::Or, sym("|")),
        value(Oper::Implies, sym("->")),
    ))(input)
}

// Both "(f)" and "(f op g)flag": the left operand is parsed once and what
// follows it decides which one it was. Nothing else starts with "(".
pub fn paren(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Paren, input, |input| {
        let (input, _) = sym("(")(input)?;
        let (input, left) = cut(formula)(input)?;
        let (input, oper) = cut(alt((map(connective, Some), value(None, sym(")")))))(input)?;
        match oper {
            None => Ok((input, left)),
            Some(oper) => {
                let (input, right) = cut(formula)(input)?;
                let (input, _) = cut(sym(")"))(input)?;
                let (input, flag) = flag(input)?;
                Ok((input, oper.join(left, right, flag)))
            }
        }
    })
}

pub fn braced(input: &str) -> PResult<'_, Formula> {
    rule(Rule::Braced, input, |input| {
        let (input, _) = sym("{")(input)?;
        let (input, inner) = formula(input)?;
        let (input, _) = sym("}")(input)?;
        Ok((input, inner))
    })
}

pub fn formula(input: &str) -> PResult<'_, Formula> {
    rule(
        Rule::Formula,
        input,
        alt((
            globally,
            eventually,
            until,
            mu,
            negation,
            paren,
            braced,
            map(predicate, Formula::Predicate),
        )),
    )
}

// Matches one rule at the start of `input`.
pub(crate) fn node(rule: Rule, input: &str) -> PResult<'_, Node> {
    match rule {
        Rule::Formula => map(formula, Node::Formula)(input),
        Rule::Globally => map(globally, Node::Formula)(input),
        Rule::Eventually => map(eventually, Node::Formula)(input),
        Rule::Until => map(until, Node::Formula)(input),
        Rule::Mu => map(mu, Node::Formula)(input),
        Rule::Negation => map(negation, Node::Formula)(input),
        Rule::Paren => map(paren, Node::Formula)(input),
        Rule::Braced => map(braced, Node::Formula)(input),
        Rule::Predicate => map(predicate, Node::Predicate)(input),
        Rule::Constraint => map(constraint, Node::Predicate)(input),
        Rule::Atom => map(atom, Node::Predicate)(input),
        Rule::Interval => map(interval, Node::Interval)(input),
        Rule::Bound => map(bound, Node::Bound)(input),
        Rule::Param => map(param, Node::Param)(input),
        Rule::Term => map(term, Node::Term)(input),
        Rule::Infix => map(infix, Node::Term)(input),
        Rule::Number => map(number, Node::Number)(input),
        Rule::Identifier => map(identifier, |id| Node::Identifier(id.to_string()))(input),
        Rule::RelOp => map(rel_op, Node::RelOp)(input),
        Rule::ArithOp => map(arith_op, Node::ArithOp)(input),
        Rule::Flag => map(flag, Node::Flag)(input),
    }
}

// Matches `rule` against the whole input, trailing whitespace aside.
pub(crate) fn complete(rule: Rule, input: &str) -> Result<Node, SyntaxError> {
    trace!(rule = rule.name(), len = input.len(), "parsing");
    let mut end = lexeme(Expected::EndOfInput, eof);
    match node(rule, input).and_then(|(rest, node)| end(rest).map(|_| node)) {
        Ok(node) => Ok(node),
        Err(err) => {
            let err = SyntaxError::from_nom(input, err);
            debug!(rule = rule.name(), offset = err.offset, "rejected: {}", err);
            Err(err)
        }
    }
}

/// Parses a complete STLU formula.
pub fn parse(input: &str) -> Result<Formula, SyntaxError> {
    match complete(Rule::Formula, input)? {
        Node::Formula(formula) => Ok(formula),
        _ => Err(SyntaxError::at(input, input, vec![Expected::Rule(Rule::Formula.name())])),
    }
}
