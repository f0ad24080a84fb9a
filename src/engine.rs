use crate::bindings::Bindings;
use crate::config::SolverConfig;
use crate::database::Database;
use crate::term::{Clause, Renaming, Term};
use crate::trail::{Mark, Trail};
use crate::unify::unify;
use indexmap::IndexMap;
use log::{debug, trace};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

/// One answer to a query: a snapshot of the environment at a successful leaf
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    bindings: Bindings,
    answer: IndexMap<Rc<str>, Term>,
}

impl Solution {
    fn capture(bindings: &Bindings, goal_variables: &[Rc<str>]) -> Self {
        let answer = goal_variables
            .iter()
            .filter(|name| !name.starts_with('_') && bindings.is_bound(name))
            .map(|name| {
                let value = bindings.resolve(&Term::Variable(Rc::clone(name)));
                (Rc::clone(name), value)
            })
            .collect();
        Self {
            bindings: bindings.clone(),
            answer,
        }
    }

    /// The whole environment, including variables of renamed clauses
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// The term `name` is directly bound to
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// The fully instantiated value of variable `name`, if it is bound
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Term> {
        self.bindings.get(name).map(|term| self.bindings.resolve(term))
    }

    /// Bound variables of the query goal, resolved, in order of first occurrence.
    ///
    /// Variables whose name starts with `_` are left out; they stay reachable
    /// through [`Solution::resolve`].
    #[must_use]
    pub fn answer(&self) -> &IndexMap<Rc<str>, Term> {
        &self.answer
    }

    /// Serializes the answer as a JSON object of rendered terms
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        let rendered: IndexMap<&str, String> = self
            .answer
            .iter()
            .map(|(name, value)| (&**name, value.to_string()))
            .collect();
        serde_json::to_string(&rendered)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.answer.is_empty() {
            return f.write_str("true");
        }
        for (i, (name, value)) in self.answer.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}

/// Counters describing how a search went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Clauses whose head was tried against a goal
    pub activations: u64,
    /// Deepest rule nesting reached
    pub max_depth: usize,
    /// Branches abandoned by the depth limit
    pub depth_cutoffs: u64,
    /// True if the activation budget ran out before the search finished
    pub aborted: bool,
    /// Number of solutions returned
    pub solutions: usize,
}

/// Evaluates an arithmetic expression under `bindings`.
///
/// Supports numbers, bound variables and the functors `+`, `-`, `*`, `/`
/// (binary) and `-` (unary). Unbound variables, unknown functors and
/// division by zero give `None`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn evaluate(expr: &Term, bindings: &Bindings) -> Option<f64> {
    match bindings.deref(expr) {
        Term::Number(value) => Some(*value),
        Term::Struct { functor, args } => {
            let operands = args
                .iter()
                .map(|arg| evaluate(arg, bindings))
                .collect::<Option<SmallVec<[f64; 2]>>>()?;
            match (&**functor, operands.as_slice()) {
                ("+", [x, y]) => Some(x + y),
                ("-", [x, y]) => Some(x - y),
                ("-", [x]) => Some(-x),
                ("*", [x, y]) => Some(x * y),
                ("/", [_, y]) if *y == 0.0 => None,
                ("/", [x, y]) => Some(x / y),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Goals still to prove once the current goal succeeds
#[derive(Clone, Copy)]
struct Continuation<'a> {
    goal: &'a Term,
    depth: usize,
    next: Option<&'a Continuation<'a>>,
}

/// A single query against a database.
///
/// The environment, trail and counters are owned by the query and reset at
/// every [`Query::solve`]. The search is depth-first and left-to-right over
/// clauses in database order; every alternative is explored.
#[derive(Debug)]
pub struct Query<'db> {
    goal: Term,
    goal_variables: Vec<Rc<str>>,
    database: &'db Database,
    config: SolverConfig,
    bindings: Bindings,
    trail: Trail,
    depth: usize,
    stats: SolveStats,
}

impl<'db> Query<'db> {
    /// Creates a query with the default configuration
    #[must_use]
    pub fn new(goal: Term, database: &'db Database) -> Self {
        Self::with_config(goal, database, SolverConfig::default())
    }

    /// Creates a query with an explicit configuration
    #[must_use]
    pub fn with_config(goal: Term, database: &'db Database, config: SolverConfig) -> Self {
        let goal_variables = goal.variables().into_iter().collect();
        Self {
            goal,
            goal_variables,
            database,
            config,
            bindings: Bindings::new(),
            trail: Trail::new(),
            depth: 0,
            stats: SolveStats::default(),
        }
    }

    /// The goal being solved
    #[must_use]
    pub fn goal(&self) -> &Term {
        &self.goal
    }

    /// Statistics of the last [`Query::solve`]
    #[must_use]
    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Enumerates every solution in search order
    pub fn solve(&mut self) -> Vec<Solution> {
        self.bindings.clear();
        self.trail.clear();
        self.depth = 0;
        self.stats = SolveStats::default();

        if self.config.debugs() {
            debug!("solving {}", self.goal);
        }
        let goal = self.goal.clone();
        let mut solutions = Vec::new();
        self.solve_goal(&goal, None, &mut solutions);

        self.stats.solutions = solutions.len();
        if self.config.debugs() {
            debug!(
                "solved {} with {} solutions ({} activations{})",
                self.goal,
                solutions.len(),
                self.stats.activations,
                if self.stats.aborted { ", aborted" } else { "" }
            );
        }
        solutions
    }

    fn trace(&self, message: fmt::Arguments<'_>) {
        if self.config.traces() {
            trace!("{:indent$}{message}", "", indent = self.depth * 2);
        }
    }

    fn undo(&mut self, mark: Mark) {
        self.trail.undo(mark, &mut self.bindings);
    }

    fn solve_goal(
        &mut self,
        goal: &Term,
        next: Option<&Continuation<'_>>,
        solutions: &mut Vec<Solution>,
    ) {
        if self.stats.aborted {
            return;
        }
        self.trace(format_args!("solve {goal}"));

        if let Term::Variable(_) = goal {
            let resolved = self.bindings.walk(goal);
            if let Term::Variable(name) = &resolved {
                self.trace(format_args!("unbound goal {name}"));
                return;
            }
            self.solve_goal(&resolved, next, solutions);
            return;
        }

        if let Term::Struct { functor, args } = goal {
            match (&**functor, &**args) {
                (",", [left, right]) => {
                    let mark = self.trail.mark();
                    let then = Continuation {
                        goal: right,
                        depth: self.depth,
                        next,
                    };
                    self.solve_goal(left, Some(&then), solutions);
                    self.undo(mark);
                    return;
                }
                (";", [left, right]) => {
                    let mark = self.trail.mark();
                    self.solve_goal(left, next, solutions);
                    self.undo(mark);
                    self.trace(format_args!("backtrack into {right}"));
                    self.solve_goal(right, next, solutions);
                    self.undo(mark);
                    return;
                }
                ("is", [target, expr]) => {
                    self.solve_is(target, expr, next, solutions);
                    return;
                }
                _ => {}
            }
        }

        self.solve_user_goal(goal, next, solutions);
    }

    fn solve_is(
        &mut self,
        target: &Term,
        expr: &Term,
        next: Option<&Continuation<'_>>,
        solutions: &mut Vec<Solution>,
    ) {
        let mark = self.trail.mark();
        match evaluate(expr, &self.bindings) {
            Some(value) => {
                self.trace(format_args!("{expr} evaluates to {value}"));
                if unify(target, &Term::Number(value), &mut self.bindings, &mut self.trail) {
                    self.proceed(next, solutions);
                } else {
                    self.trace(format_args!("{target} does not match {value}"));
                }
            }
            None => self.trace(format_args!("cannot evaluate {expr}")),
        }
        self.undo(mark);
    }

    fn solve_user_goal(
        &mut self,
        goal: &Term,
        next: Option<&Continuation<'_>>,
        solutions: &mut Vec<Solution>,
    ) {
        let database = self.database;
        let candidates = database.find_clauses(goal);
        self.trace(format_args!("{} candidate clauses", candidates.len()));

        for clause in &candidates {
            if self.stats.aborted {
                break;
            }
            if self
                .config
                .max_activations
                .is_some_and(|max| self.stats.activations >= max)
            {
                if self.config.debugs() {
                    debug!("activation budget exhausted while solving {goal}");
                }
                self.stats.aborted = true;
                break;
            }
            self.activate(goal, clause, next, solutions);
        }
    }

    fn activate(
        &mut self,
        goal: &Term,
        clause: &Clause,
        next: Option<&Continuation<'_>>,
        solutions: &mut Vec<Solution>,
    ) {
        self.stats.activations += 1;
        let mut renaming = Renaming::unique();
        let head = clause.head().rename(&mut renaming);
        let body = clause.body().map(|body| body.rename(&mut renaming));
        self.trace(format_args!("try {clause}"));

        let mark = self.trail.mark();
        if unify(goal, &head, &mut self.bindings, &mut self.trail) {
            self.trace(format_args!("head matches {head}"));
            match &body {
                None => self.proceed(next, solutions),
                Some(body) => {
                    if self.config.max_depth.is_some_and(|max| self.depth >= max) {
                        self.trace(format_args!("depth limit reached"));
                        self.stats.depth_cutoffs += 1;
                    } else {
                        self.depth += 1;
                        self.stats.max_depth = self.stats.max_depth.max(self.depth);
                        self.solve_goal(body, next, solutions);
                        self.depth -= 1;
                    }
                }
            }
        } else {
            self.trace(format_args!("head does not unify"));
        }
        self.undo(mark);
    }

    /// Continues with the pending goals, or records a solution if there are none
    fn proceed(&mut self, next: Option<&Continuation<'_>>, solutions: &mut Vec<Solution>) {
        match next {
            None => {
                let solution = Solution::capture(&self.bindings, &self.goal_variables);
                self.trace(format_args!("solution: {solution}"));
                solutions.push(solution);
            }
            Some(then) => {
                let depth = std::mem::replace(&mut self.depth, then.depth);
                self.solve_goal(then.goal, then.next, solutions);
                self.depth = depth;
            }
        }
    }
}

/// A clause database together with the configuration used to query it
#[derive(Debug, Default)]
pub struct LogicEngine {
    database: Database,
    config: SolverConfig,
}

impl LogicEngine {
    /// Create a new engine with an empty database
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// Create an engine whose queries use `config`
    #[must_use]
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            database: Database::new(),
            config,
        }
    }

    /// The query configuration
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The clause database
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Mutable access to the clause database
    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    /// Add a program clause
    pub fn add_clause(&mut self, clause: Clause) {
        if self.config.debugs() {
            debug!("add clause {clause}");
        }
        self.database.add_clause(clause);
    }

    /// Add a clause at run time (dynamic)
    pub fn assert_clause(&mut self, clause: Clause) {
        if self.config.debugs() {
            debug!("assert clause {clause}");
        }
        self.database.add_dynamic_clause(clause);
    }

    /// Remove the first clause equal to `clause`
    pub fn retract(&mut self, clause: &Clause) -> bool {
        let removed = self.database.remove_clause(clause);
        if removed && self.config.debugs() {
            debug!("retract clause {clause}");
        }
        removed
    }

    /// Remove every clause
    pub fn clear(&mut self) {
        if self.config.debugs() {
            debug!("clear database");
        }
        self.database.clear();
    }

    /// Returns every solution of `goal`
    #[must_use]
    pub fn query(&self, goal: &Term) -> Vec<Solution> {
        self.query_with_stats(goal).0
    }

    /// Returns every solution of `goal` along with search statistics
    #[must_use]
    pub fn query_with_stats(&self, goal: &Term) -> (Vec<Solution>, SolveStats) {
        let mut query = Query::with_config(goal.clone(), &self.database, self.config);
        let solutions = query.solve();
        (solutions, query.stats())
    }

    /// Returns whether `goal` has a solution
    #[must_use]
    pub fn ask(&self, goal: &Term) -> bool {
        !self.query(goal).is_empty()
    }

    /// Adds every clause of a program text, returning how many were read.
    ///
    /// # Errors
    ///
    /// Fails on the first syntax error; clauses before it are not added.
    #[cfg(feature = "parsing")]
    pub fn consult(&mut self, source: &str) -> Result<usize, crate::error::ParseError> {
        let clauses = crate::parser::parse_program(source)?;
        let count = clauses.len();
        for clause in clauses {
            self.add_clause(clause);
        }
        Ok(count)
    }

    /// Parses `source` as a goal and solves it
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ParseError`] if `source` is not a term.
    #[cfg(feature = "parsing")]
    pub fn query_str(&self, source: &str) -> Result<Vec<Solution>, crate::error::ParseError> {
        let goal = crate::parser::parse_term(source)?;
        Ok(self.query(&goal))
    }
}
