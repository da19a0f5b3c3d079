// Licensed under MIT. See LICENSE for details.

//! Borrowed views over the AST for traversal, and parameter instantiation.
//!
//! Every node kind that can hold a [`Param`] is reachable from any ancestor
//! through [`NodeRef::children`], so a parameter search can find all tunable
//! bounds with a plain walk:
//!
//! ```
//! let formula = stlu::parse("G[t?2;1, 5] (a > k?3;0.5 & b)").unwrap();
//! let names: Vec<_> = formula.params().iter().map(|p| p.name.as_str()).collect();
//! assert_eq!(names, ["t", "k"]);
//! ```

use std::collections::HashMap;

use crate::error::NonFiniteBinding;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeRef<'a> {
    Formula(&'a Formula),
    Predicate(&'a Predicate),
    Interval(&'a Interval),
    Bound(&'a Bound),
    Term(&'a Term),
}

impl<'a> NodeRef<'a> {
    /// Immediate children, in source order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        match self {
            NodeRef::Formula(formula) => match *formula {
                Formula::Globally {
                    ref interval,
                    ref sub,
                    ..
                }
                | Formula::Eventually {
                    ref interval,
                    ref sub,
                    ..
                } => vec![NodeRef::Interval(interval), NodeRef::Formula(sub)],
                Formula::Until {
                    ref interval,
                    ref left,
                    ref right,
                    ..
                } => vec![
                    NodeRef::Interval(interval),
                    NodeRef::Formula(left),
                    NodeRef::Formula(right),
                ],
                Formula::Or {
                    ref left,
                    ref right,
                    ..
                }
                | Formula::And {
                    ref left,
                    ref right,
                    ..
                }
                | Formula::Implies {
                    ref left,
                    ref right,
                    ..
                } => vec![NodeRef::Formula(left), NodeRef::Formula(right)],
                Formula::Not { ref sub, .. } => vec![NodeRef::Formula(sub)],
                Formula::Mu(_) => vec![],
                Formula::Predicate(ref p) => vec![NodeRef::Predicate(p)],
            },
            NodeRef::Predicate(predicate) => match *predicate {
                Predicate::Atom(_) => vec![],
                Predicate::Constraint(ref c) => {
                    vec![NodeRef::Term(&c.term), NodeRef::Term(&c.bound)]
                }
            },
            NodeRef::Interval(interval) => {
                vec![NodeRef::Bound(&interval.left), NodeRef::Bound(&interval.right)]
            }
            NodeRef::Bound(_) => vec![],
            NodeRef::Term(term) => match *term {
                Term::Expr {
                    ref left,
                    ref right,
                    ..
                } => vec![NodeRef::Term(left), NodeRef::Term(right)],
                Term::Var(_) | Term::Num(_) | Term::Param(_) => vec![],
            },
        }
    }

    pub fn param(self) -> Option<&'a Param> {
        match self {
            NodeRef::Bound(Bound::Param(p)) | NodeRef::Term(Term::Param(p)) => Some(p),
            _ => None,
        }
    }
}

// Pre-order walk.
pub struct Descendants<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

impl Formula {
    pub fn children(&self) -> Vec<NodeRef<'_>> {
        NodeRef::Formula(self).children()
    }

    /// This formula and everything below it, parents before children.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![NodeRef::Formula(self)],
        }
    }

    /// Every parameter, from interval bounds and from terms, in source order.
    pub fn params(&self) -> Vec<&Param> {
        self.descendants().filter_map(NodeRef::param).collect()
    }

    /// A copy of the formula with each parameter named in `bindings`
    /// replaced by that constant. Other parameters are kept.
    ///
    /// Every bound value must be finite, since NaN and infinities have no
    /// literal form.
    pub fn instantiate(
        &self,
        bindings: &HashMap<Ident, f64>,
    ) -> Result<Formula, NonFiniteBinding> {
        let bad = bindings
            .iter()
            .filter(|&(_, val)| !val.is_finite())
            .min_by(|a, b| a.0.cmp(b.0));
        if let Some((name, &value)) = bad {
            return Err(NonFiniteBinding {
                name: name.clone(),
                value,
            });
        }
        Ok(self.substitute(bindings))
    }

    fn substitute(&self, bindings: &HashMap<Ident, f64>) -> Formula {
        let sub = |f: &Formula| Box::new(f.substitute(bindings));
        match *self {
            Formula::Globally {
                ref interval,
                sub: ref s,
                flag,
            } => Formula::Globally {
                interval: interval.substitute(bindings),
                sub: sub(s),
                flag,
            },
            Formula::Eventually {
                ref interval,
                sub: ref s,
                flag,
            } => Formula::Eventually {
                interval: interval.substitute(bindings),
                sub: sub(s),
                flag,
            },
            Formula::Until {
                ref interval,
                ref left,
                ref right,
                flag,
            } => Formula::Until {
                interval: interval.substitute(bindings),
                left: sub(left),
                right: sub(right),
                flag,
            },
            Formula::Or {
                ref left,
                ref right,
                flag,
            } => Formula::Or {
                left: sub(left),
                right: sub(right),
                flag,
            },
            Formula::And {
                ref left,
                ref right,
                flag,
            } => Formula::And {
                left: sub(left),
                right: sub(right),
                flag,
            },
            Formula::Implies {
                ref left,
                ref right,
                flag,
            } => Formula::Implies {
                left: sub(left),
                right: sub(right),
                flag,
            },
            Formula::Not { sub: ref s, flag } => Formula::Not { sub: sub(s), flag },
            Formula::Mu(ref mu) => Formula::Mu(mu.clone()),
            Formula::Predicate(Predicate::Constraint(ref c)) => {
                Formula::Predicate(Predicate::Constraint(Constraint {
                    relop: c.relop,
                    term: c.term.substitute(bindings),
                    bound: c.bound.substitute(bindings),
                }))
            }
            Formula::Predicate(ref p) => Formula::Predicate(p.clone()),
        }
    }
}

impl Interval {
    fn substitute(&self, bindings: &HashMap<Ident, f64>) -> Interval {
        Interval {
            left: self.left.substitute(bindings),
            right: self.right.substitute(bindings),
        }
    }
}

impl Bound {
    fn substitute(&self, bindings: &HashMap<Ident, f64>) -> Bound {
        match *self {
            Bound::Param(ref p) => match bindings.get(&p.name) {
                Some(&val) => Bound::Constant(Number::from(val)),
                None => self.clone(),
            },
            Bound::Constant(_) => self.clone(),
        }
    }
}

impl Term {
    fn substitute(&self, bindings: &HashMap<Ident, f64>) -> Term {
        match *self {
            Term::Param(ref p) => match bindings.get(&p.name) {
                Some(&val) => Term::Num(Number::from(val)),
                None => self.clone(),
            },
            Term::Expr {
                op,
                ref left,
                ref right,
            } => Term::Expr {
                op,
                left: Box::new(left.substitute(bindings)),
                right: Box::new(right.substitute(bindings)),
            },
            Term::Var(_) | Term::Num(_) => self.clone(),
        }
    }
}
