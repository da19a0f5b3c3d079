// Licensed under MIT. See LICENSE for details.

use crate::error::ConfidenceOutOfRange;

pub type Ident = String;

// Strong/weak satisfaction flag of an operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Flag {
    Strong,
    Weak,
    #[default]
    Unspecified,
}

impl Flag {
    pub fn is_specified(self) -> bool {
        self != Flag::Unspecified
    }

    /// Resolves `Unspecified` to the caller's default semantics.
    pub fn or(self, default: Flag) -> Flag {
        match self {
            Flag::Unspecified => default,
            flag => flag,
        }
    }

    pub fn symbol(self) -> Option<char> {
        match self {
            Flag::Strong => Some('s'),
            Flag::Weak => Some('w'),
            Flag::Unspecified => None,
        }
    }
}

/// A numeric literal. Keeps its source text so it renders the way it was
/// written; equality only looks at the value.
#[derive(Clone, Debug)]
pub struct Number {
    value: f64,
    text: String,
}

impl Number {
    pub fn new(value: f64, text: &str) -> Self {
        Number {
            value,
            text: text.to_string(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number {
            value,
            text: value.to_string(),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.value == other.value
    }
}

// name ? default ; tolerance
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub default: Number,
    pub tolerance: Number,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Bound {
    Constant(Number),
    Param(Param),
}

// [left, right]
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    pub left: Bound,
    pub right: Bound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelOp {
    Ge,
    Le,
    Lt,
    Gt,
    Eq,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    // speed
    Var(Ident),
    // 3.5
    Num(Number),
    // x?2;1
    Param(Param),
    // {left op right}
    Expr {
        op: ArithOp,
        left: Box<Term>,
        right: Box<Term>,
    },
}

// term relop bound
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub relop: RelOp,
    pub term: Term,
    pub bound: Term,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    // Boolean signal.
    Atom(Ident),
    Constraint(Constraint),
}

/// Uncertainty predicate: the quantity lies within `threshold ± spread` with
/// the given statistical confidence.
#[derive(Clone, Debug, PartialEq)]
pub struct Mu {
    threshold: Number,
    spread: Number,
    confidence: Number,
    flag: Flag,
}

impl Mu {
    pub fn new(
        threshold: Number,
        spread: Number,
        confidence: Number,
        flag: Flag,
    ) -> Result<Self, ConfidenceOutOfRange> {
        if !(0.0..=1.0).contains(&confidence.value()) {
            return Err(ConfidenceOutOfRange(confidence.value()));
        }
        Ok(Mu {
            threshold,
            spread,
            confidence,
            flag,
        })
    }

    pub fn threshold(&self) -> &Number {
        &self.threshold
    }

    pub fn spread(&self) -> &Number {
        &self.spread
    }

    pub fn confidence(&self) -> &Number {
        &self.confidence
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }
}

// AST node types.
#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    // G[a,b] f
    Globally {
        interval: Interval,
        sub: Box<Formula>,
        flag: Flag,
    },
    // E[a,b] f
    Eventually {
        interval: Interval,
        sub: Box<Formula>,
        flag: Flag,
    },
    // U[a,b](f, g)
    Until {
        interval: Interval,
        left: Box<Formula>,
        right: Box<Formula>,
        flag: Flag,
    },
    // (f | g)
    Or {
        left: Box<Formula>,
        right: Box<Formula>,
        flag: Flag,
    },
    // (f & g)
    And {
        left: Box<Formula>,
        right: Box<Formula>,
        flag: Flag,
    },
    // (f -> g)
    Implies {
        left: Box<Formula>,
        right: Box<Formula>,
        flag: Flag,
    },
    // !f
    Not { sub: Box<Formula>, flag: Flag },
    // µ(threshold spread confidence)
    Mu(Mu),
    Predicate(Predicate),
}

impl Formula {
    /// The operator's flag, or `None` for predicates, which carry none.
    pub fn flag(&self) -> Option<Flag> {
        match *self {
            Formula::Globally { flag, .. }
            | Formula::Eventually { flag, .. }
            | Formula::Until { flag, .. }
            | Formula::Or { flag, .. }
            | Formula::And { flag, .. }
            | Formula::Implies { flag, .. }
            | Formula::Not { flag, .. } => Some(flag),
            Formula::Mu(ref mu) => Some(mu.flag),
            Formula::Predicate(_) => None,
        }
    }
}
