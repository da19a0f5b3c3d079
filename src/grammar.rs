// Licensed under MIT. See LICENSE for details.

//! The formula grammar as a table of named rules.
//!
//! Rules are ordered-choice (PEG) productions. Whitespace may precede any
//! token. Every rule can be matched on its own, at any offset, through
//! [`Grammar::attempt`], and any rule can serve as the start rule of a
//! complete parse through [`Grammar::parse_rule`].

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::{Expected, SyntaxError};
use crate::parser;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    Formula,
    Globally,
    Eventually,
    Until,
    Mu,
    Negation,
    Paren,
    Braced,
    Predicate,
    Constraint,
    Atom,
    Interval,
    Bound,
    Param,
    Term,
    Infix,
    RelOp,
    ArithOp,
    Flag,
    Identifier,
    Number,
}

impl Rule {
    // Declaration order.
    pub const ALL: [Rule; 21] = [
        Rule::Formula,
        Rule::Globally,
        Rule::Eventually,
        Rule::Until,
        Rule::Mu,
        Rule::Negation,
        Rule::Paren,
        Rule::Braced,
        Rule::Predicate,
        Rule::Constraint,
        Rule::Atom,
        Rule::Interval,
        Rule::Bound,
        Rule::Param,
        Rule::Term,
        Rule::Infix,
        Rule::RelOp,
        Rule::ArithOp,
        Rule::Flag,
        Rule::Identifier,
        Rule::Number,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Rule::Formula => "formula",
            Rule::Globally => "globally",
            Rule::Eventually => "eventually",
            Rule::Until => "until",
            Rule::Mu => "mu",
            Rule::Negation => "negation",
            Rule::Paren => "paren",
            Rule::Braced => "braced",
            Rule::Predicate => "predicate",
            Rule::Constraint => "constraint",
            Rule::Atom => "atom",
            Rule::Interval => "interval",
            Rule::Bound => "bound",
            Rule::Param => "param",
            Rule::Term => "term",
            Rule::Infix => "infix",
            Rule::RelOp => "relop",
            Rule::ArithOp => "arithop",
            Rule::Flag => "flag",
            Rule::Identifier => "identifier",
            Rule::Number => "number",
        }
    }

    pub const fn production(self) -> &'static str {
        match self {
            Rule::Formula => {
                "globally / eventually / until / mu / negation / paren / braced / predicate"
            }
            Rule::Globally => r#""G" interval formula flag"#,
            Rule::Eventually => r#""E" interval formula flag"#,
            Rule::Until => r#""U" interval "(" formula "," formula ")" flag"#,
            Rule::Mu => r#"("µ" / "μ") "(" number number number ")" flag"#,
            Rule::Negation => r#""!" formula flag"#,
            Rule::Paren => r#""(" formula ( ")" / ("&" / "|" / "->") formula ")" flag )"#,
            Rule::Braced => r#""{" formula "}""#,
            Rule::Predicate => "constraint / atom",
            Rule::Constraint => "term relop term",
            Rule::Atom => "identifier",
            Rule::Interval => r#""[" bound "," bound "]""#,
            Rule::Bound => "param / number",
            Rule::Param => r#"identifier "?" number ";" number"#,
            Rule::Term => "infix / param / number / identifier",
            Rule::Infix => r#""{" term arithop term "}""#,
            Rule::RelOp => r#"">=" / "<=" / "==" / "<" / ">""#,
            Rule::ArithOp => r#""+" / "-" / "*" / "/""#,
            Rule::Flag => r#"("w" / "s")?"#,
            Rule::Identifier => "~r\"[A-Za-z_][A-Za-z0-9_]*\"",
            Rule::Number => "~r\"[+-]?([0-9]+(\\.[0-9]+)?|\\.[0-9]+)\"",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = UnknownRule;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        grammar()
            .rule(name)
            .ok_or_else(|| UnknownRule(name.to_string()))
    }
}

#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[error("no grammar rule named '{0}'")]
pub struct UnknownRule(pub String);

// Typed value produced by a rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Formula(Formula),
    Predicate(Predicate),
    Interval(Interval),
    Bound(Bound),
    Param(Param),
    Term(Term),
    RelOp(RelOp),
    ArithOp(ArithOp),
    Flag(Flag),
    Identifier(Ident),
    Number(Number),
}

/// A successful rule attempt. `span` covers the consumed input, including
/// whitespace in front of the first token.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub rule: Rule,
    pub span: Range<usize>,
    pub node: Node,
}

pub struct Grammar {
    by_name: HashMap<&'static str, Rule>,
}

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| Grammar {
    by_name: Rule::ALL.into_iter().map(|rule| (rule.name(), rule)).collect(),
});

/// The shared, read-only rule table.
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

impl Grammar {
    pub fn rule(&self, name: &str) -> Option<Rule> {
        self.by_name.get(name).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = Rule> {
        Rule::ALL.into_iter()
    }

    /// Matches `rule` at byte `offset` of `input`. Nothing after the match is
    /// looked at.
    pub fn attempt(&self, rule: Rule, input: &str, offset: usize) -> Result<Match, SyntaxError> {
        let rest = match input.get(offset..) {
            Some(rest) => rest,
            None => {
                return Err(SyntaxError {
                    offset,
                    expected: vec![Expected::Rule(rule.name())],
                    found: None,
                })
            }
        };
        match parser::node(rule, rest) {
            Ok((after, node)) => Ok(Match {
                rule,
                span: offset..input.len() - after.len(),
                node,
            }),
            Err(err) => {
                let mut err = SyntaxError::from_nom(rest, err);
                err.offset += offset;
                Err(err)
            }
        }
    }

    /// Matches the whole of `input` against `rule`.
    pub fn parse_rule(&self, rule: Rule, input: &str) -> Result<Node, SyntaxError> {
        parser::complete(rule, input)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in self.rules() {
            writeln!(f, "{:<10} = {}", rule.name(), rule.production())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        for rule in grammar().rules() {
            assert_eq!(grammar().rule(rule.name()), Some(rule));
            assert_eq!(rule.name().parse::<Rule>(), Ok(rule));
        }
        assert_eq!(grammar().rule("sub_formula"), None);
        assert_eq!("nope".parse::<Rule>(), Err(UnknownRule("nope".to_string())));
    }

    #[test]
    fn test_display() {
        let text = grammar().to_string();
        assert_eq!(text.lines().count(), Rule::ALL.len());
        assert!(text.starts_with("formula    = globally / eventually"));
        assert!(text.contains(r#"relop      = ">=" / "<=" / "==" / "<" / ">""#));
    }

    #[test]
    fn test_attempt() {
        let input = "G[0, 5] a >= 3 & b";
        let m = grammar().attempt(Rule::Interval, input, 1).unwrap();
        assert_eq!(m.span, 1..7);
        assert_eq!(
            m.node,
            Node::Interval(Interval {
                left: Bound::Constant(Number::from(0.0)),
                right: Bound::Constant(Number::from(5.0)),
            })
        );

        let m = grammar().attempt(Rule::Constraint, input, 7).unwrap();
        assert_eq!(m.span, 7..14);
        assert_eq!(&input[m.span.clone()], " a >= 3");

        let m = grammar().attempt(Rule::RelOp, input, 10).unwrap();
        assert_eq!(m.node, Node::RelOp(RelOp::Ge));

        let err = grammar().attempt(Rule::Interval, input, 0).unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.expected, vec![Expected::Rule("interval")]);

        let err = grammar().attempt(Rule::Term, input, 14).unwrap_err();
        assert_eq!(err.offset, 14);
        assert_eq!(err.found, Some('&'));

        assert!(grammar().attempt(Rule::Formula, input, 99).is_err());
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!(
            grammar().parse_rule(Rule::Term, " {x * 2} "),
            Ok(Node::Term(Term::Expr {
                op: ArithOp::Mul,
                left: Box::new(Term::Var("x".to_string())),
                right: Box::new(Term::Num(Number::from(2.0))),
            }))
        );
        assert_eq!(
            grammar().parse_rule(Rule::Flag, "s"),
            Ok(Node::Flag(Flag::Strong))
        );

        let err = grammar().parse_rule(Rule::Interval, "[0,1] a").unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.expected, vec![Expected::EndOfInput]);
    }
}
