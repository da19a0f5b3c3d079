// Licensed under MIT. See LICENSE for details.

//! Parser for STLU formulas: Signal Temporal Logic with strong/weak
//! satisfaction flags, parametric bounds and an uncertainty predicate.
//!
//! ```
//! use stlu::{Flag, Formula};
//!
//! match stlu::parse("(G[0, 5] a > 3 & µ(0.95 1 0.8) w) s").unwrap() {
//!     Formula::And { flag, .. } => assert_eq!(flag, Flag::Strong),
//!     other => panic!("unexpected {}", other),
//! }
//! ```

pub mod error;
pub mod grammar;
pub mod parser;
mod render;
pub mod tree;
pub mod types;

pub use error::{ConfidenceOutOfRange, Expected, NonFiniteBinding, SyntaxError};
pub use grammar::{grammar, Grammar, Match, Node, Rule};
pub use parser::parse;
pub use tree::NodeRef;
pub use types::*;
