use crate::term::{Clause, PredicateKey, Term};
use indexmap::IndexMap;
use std::rc::Rc;

/// Clauses of one predicate, split the same way as the database sequences
#[derive(Debug, Clone, Default)]
struct PredicateIndex {
    static_clauses: Vec<Rc<Clause>>,
    dynamic_clauses: Vec<Rc<Clause>>,
}

impl PredicateIndex {
    fn is_empty(&self) -> bool {
        self.static_clauses.is_empty() && self.dynamic_clauses.is_empty()
    }

    fn len(&self) -> usize {
        self.static_clauses.len() + self.dynamic_clauses.len()
    }
}

/// Ordered clause store with a functor/arity index.
///
/// Static clauses come from consulting a program, dynamic clauses are
/// asserted at run time. Lookups return static clauses first, then dynamic
/// ones, each in insertion order, which fixes the search order of the solver.
#[derive(Debug, Clone, Default)]
pub struct Database {
    clauses: Vec<Rc<Clause>>,
    dynamic_clauses: Vec<Rc<Clause>>,
    /// Always in sync with the two sequences above
    index: IndexMap<PredicateKey, PredicateIndex>,
}

impl Database {
    /// Creates an empty database
    #[must_use]
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            dynamic_clauses: Vec::new(),
            index: IndexMap::new(),
        }
    }

    /// Appends a static clause
    pub fn add_clause(&mut self, clause: Clause) {
        let Some(key) = clause.key() else {
            return;
        };
        let clause = Rc::new(clause);
        self.clauses.push(Rc::clone(&clause));
        self.index
            .entry(key)
            .or_default()
            .static_clauses
            .push(clause);
    }

    /// Appends a dynamic clause
    pub fn add_dynamic_clause(&mut self, clause: Clause) {
        let Some(key) = clause.key() else {
            return;
        };
        let clause = Rc::new(clause);
        self.dynamic_clauses.push(Rc::clone(&clause));
        self.index
            .entry(key)
            .or_default()
            .dynamic_clauses
            .push(clause);
    }

    /// Removes the first clause structurally equal to `clause`.
    ///
    /// Static clauses are searched before dynamic ones. Returns whether a
    /// clause was removed.
    pub fn remove_clause(&mut self, clause: &Clause) -> bool {
        let Some(key) = clause.key() else {
            return false;
        };

        if let Some(position) = self.clauses.iter().position(|c| **c == *clause) {
            let removed = self.clauses.remove(position);
            self.remove_from_index(&key, &removed, |index| &mut index.static_clauses);
        } else if let Some(position) = self.dynamic_clauses.iter().position(|c| **c == *clause) {
            let removed = self.dynamic_clauses.remove(position);
            self.remove_from_index(&key, &removed, |index| &mut index.dynamic_clauses);
        } else {
            return false;
        }

        true
    }

    fn remove_from_index<F>(&mut self, key: &PredicateKey, removed: &Rc<Clause>, bucket: F)
    where
        F: Fn(&mut PredicateIndex) -> &mut Vec<Rc<Clause>>,
    {
        let Some(index) = self.index.get_mut(key) else {
            return;
        };
        let clauses = bucket(index);
        if let Some(position) = clauses.iter().position(|c| Rc::ptr_eq(c, removed)) {
            clauses.remove(position);
        }
        if index.is_empty() {
            self.index.shift_remove(key);
        }
    }

    /// Clauses whose head has the same functor and arity as `term`.
    ///
    /// The result is a snapshot: later mutations of the database do not
    /// affect it. Terms that are not callable have no clauses.
    #[must_use]
    pub fn find_clauses(&self, term: &Term) -> Vec<Rc<Clause>> {
        let Some(index) = term.functor_key().and_then(|key| self.index.get(&key)) else {
            return Vec::new();
        };
        index
            .static_clauses
            .iter()
            .chain(&index.dynamic_clauses)
            .cloned()
            .collect()
    }

    /// Removes every clause
    pub fn clear(&mut self) {
        self.clauses.clear();
        self.dynamic_clauses.clear();
        self.index.clear();
    }

    /// Static clauses in insertion order
    #[must_use]
    pub fn clauses(&self) -> &[Rc<Clause>] {
        &self.clauses
    }

    /// Dynamic clauses in insertion order
    #[must_use]
    pub fn dynamic_clauses(&self) -> &[Rc<Clause>] {
        &self.dynamic_clauses
    }

    /// Indexed predicates in order of first definition
    pub fn predicates(&self) -> impl Iterator<Item = &PredicateKey> {
        self.index.keys()
    }

    /// Number of clauses defined for `key`
    #[must_use]
    pub fn clause_count(&self, key: &PredicateKey) -> usize {
        self.index.get(key).map_or(0, PredicateIndex::len)
    }

    /// Total number of clauses
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len() + self.dynamic_clauses.len()
    }

    /// True if the database holds no clauses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.dynamic_clauses.is_empty()
    }
}
