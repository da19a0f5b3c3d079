// Licensed under MIT. See LICENSE for details.

// Formulas print back in the grammar's concrete syntax, so that parsing the
// output gives the same tree again. Whitespace and redundant parentheses are
// not preserved.

use std::fmt;

use crate::types::*;

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(c) => write!(f, "{}", c),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{};{}", self.name, self.default, self.tolerance)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Bound::Constant(ref n) => fmt::Display::fmt(n, f),
            Bound::Param(ref p) => fmt::Display::fmt(p, f),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        })
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            RelOp::Ge => ">=",
            RelOp::Le => "<=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Eq => "==",
        })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Term::Var(ref name) => f.write_str(name),
            Term::Num(ref n) => fmt::Display::fmt(n, f),
            Term::Param(ref p) => fmt::Display::fmt(p, f),
            Term::Expr {
                op,
                ref left,
                ref right,
            } => write!(f, "{{{} {} {}}}", left, op, right),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.term, self.relop, self.bound)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Predicate::Atom(ref name) => f.write_str(name),
            Predicate::Constraint(ref c) => fmt::Display::fmt(c, f),
        }
    }
}

impl fmt::Display for Mu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "µ({} {} {})",
            self.threshold(),
            self.spread(),
            self.confidence()
        )?;
        write_flag(f, self.flag())
    }
}

// Flags go after a space, so they never run into an identifier.
fn write_flag(f: &mut fmt::Formatter<'_>, flag: Flag) -> fmt::Result {
    match flag.symbol() {
        Some(c) => write!(f, " {}", c),
        None => Ok(()),
    }
}

// True when the formula's text ends where its own flag would go: a flag
// printed right after it would be read as that flag instead.
fn ends_open(formula: &Formula) -> bool {
    formula.flag() == Some(Flag::Unspecified)
}

// The operand of a prefix operator, parenthesised when the operator's own
// flag would otherwise attach to it.
fn write_operand(f: &mut fmt::Formatter<'_>, sub: &Formula, flag: Flag) -> fmt::Result {
    if flag.is_specified() && ends_open(sub) {
        write!(f, "({})", sub)
    } else {
        write!(f, "{}", sub)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Formula::Globally {
                ref interval,
                ref sub,
                flag,
            } => {
                write!(f, "G{} ", interval)?;
                write_operand(f, sub, flag)?;
                write_flag(f, flag)
            }
            Formula::Eventually {
                ref interval,
                ref sub,
                flag,
            } => {
                write!(f, "E{} ", interval)?;
                write_operand(f, sub, flag)?;
                write_flag(f, flag)
            }
            Formula::Until {
                ref interval,
                ref left,
                ref right,
                flag,
            } => {
                write!(f, "U{}({}, {})", interval, left, right)?;
                write_flag(f, flag)
            }
            Formula::Or {
                ref left,
                ref right,
                flag,
            } => {
                write!(f, "({} | {})", left, right)?;
                write_flag(f, flag)
            }
            Formula::And {
                ref left,
                ref right,
                flag,
            } => {
                write!(f, "({} & {})", left, right)?;
                write_flag(f, flag)
            }
            Formula::Implies {
                ref left,
                ref right,
                flag,
            } => {
                write!(f, "({} -> {})", left, right)?;
                write_flag(f, flag)
            }
            Formula::Not { ref sub, flag } => {
                f.write_str("!")?;
                write_operand(f, sub, flag)?;
                write_flag(f, flag)
            }
            Formula::Mu(ref mu) => fmt::Display::fmt(mu, f),
            Formula::Predicate(ref p) => fmt::Display::fmt(p, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    fn render(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn test_render() {
        assert_eq!(render("G[0,5] a>3"), "G[0, 5] a > 3");
        assert_eq!(render("G[x?2;1,5]a>3 w"), "G[x?2;1, 5] a > 3 w");
        assert_eq!(render("E[ 0.5 , 1.0 ] {a+ -1}<=b s"), "E[0.5, 1.0] {a + -1} <= b s");
        assert_eq!(render("U[0,1](a,b)w"), "U[0, 1](a, b) w");
        assert_eq!(render("((a&b)s|(c->d))"), "((a & b) s | (c -> d))");
        assert_eq!(render("µ(0.95 1 0.8)w"), "µ(0.95 1 0.8) w");
        assert_eq!(render("μ(1 2 0)"), "µ(1 2 0)");
        assert_eq!(render("(((a)))"), "a");
        assert_eq!(render("{a==t?1;0.5}"), "a == t?1;0.5");
    }

    #[test]
    fn test_render_flag_placement() {
        // Not(Globally(a)) with the flag on the negation.
        assert_eq!(render("!(G[0,1] a) w"), "!(G[0, 1] a) w");
        // The flag on Globally stays inside.
        assert_eq!(render("!G[0,1] a w"), "!G[0, 1] a w");
        assert_eq!(render("!(a & b) w"), "!(a & b) w");
        assert_eq!(render("!((a & b)) w"), "!((a & b)) w");
        assert_eq!(render("G[0,1] !a s"), "G[0, 1] !a s");
        assert_eq!(render("G[0,1] (!a) s"), "G[0, 1] (!a) s");
    }
}
