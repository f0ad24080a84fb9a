//! # Hornlog
//!
//! A Horn-clause logic engine in Rust: unification, SLD resolution and
//! depth-first backtracking over a clause database.
//!
//! ## Features
//!
//! - Unification with occurs check
//! - Conjunction, disjunction and `is`/2 arithmetic goals
//! - Predicate indexing by name and arity
//! - Dynamic clause assertion and retraction
//! - Optional text parsing (`parsing` feature) and JSON answers (`serde` feature)
//!
//! ## Example
//!
//! ```rust
//! use hornlog::{Clause, LogicEngine, Term};
//!
//! let mut engine = LogicEngine::new();
//! engine.add_clause(Clause::fact(
//!     Term::compound("parent", vec![Term::atom("tom"), Term::atom("bob")]).unwrap(),
//! ).unwrap());
//!
//! let goal = Term::compound("parent", vec![Term::atom("tom"), Term::var("X")]).unwrap();
//! let solutions = engine.query(&goal);
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(solutions[0].resolve("X"), Some(Term::atom("bob")));
//! ```

/// Variable environments.
pub mod bindings;
/// Solver settings.
pub mod config;
/// Clause storage and predicate index.
pub mod database;
/// Resolution engine.
pub mod engine;
/// Error types.
pub mod error;
/// Text parser for clauses and goals.
#[cfg(feature = "parsing")]
pub mod parser;
/// Terms and clauses.
pub mod term;
/// Binding undo log.
pub mod trail;
/// Unification.
pub mod unify;

pub use bindings::Bindings;
pub use config::SolverConfig;
pub use database::Database;
pub use engine::{evaluate, LogicEngine, Query, SolveStats, Solution};
pub use error::{ParseError, TermError};
#[cfg(feature = "parsing")]
pub use parser::{parse_clause, parse_program, parse_term};
pub use term::{Clause, PredicateKey, Renaming, Term, NIL};
pub use trail::{Mark, PriorState, Trail};
pub use unify::{occurs_in, unify};
