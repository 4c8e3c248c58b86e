//! Actum Policy - boolean approval predicates over votes
//!
//! A rule is a pair of predicate trees (approve / reject) over vote atoms
//! and quorum combinators. Expressions are validated structurally at
//! construction so that evaluation is total and panic-free, and the
//! evaluator is a pure function of `(rule, votes)` with no store or clock
//! access.

#![deny(unsafe_code)]

pub mod error;
pub mod eval;
pub mod expr;
pub mod rule;

pub use error::PolicyError;
pub use eval::{evaluate, Verdict};
pub use expr::{Expr, MAX_EXPR_DEPTH};
pub use rule::Rule;
