use crate::term::Term;
use indexmap::IndexMap;
use std::rc::Rc;

/// Substitution environment: variable name to bound term.
///
/// Bindings may chain (a variable bound to a variable bound to a value);
/// [`Bindings::deref`] follows the chain to its end. Entries keep the
/// order in which they were bound.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bindings {
    map: IndexMap<Rc<str>, Term>,
}

impl Bindings {
    /// Creates an empty environment
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Number of bound variables
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The term `name` is directly bound to, without following chains
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.map.get(name)
    }

    /// True if `name` is bound
    #[must_use]
    pub fn is_bound(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Iterates over the bindings in binding order
    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Term)> {
        self.map.iter()
    }

    /// Follows variable bindings until reaching a non-variable or an unbound variable
    #[must_use]
    pub fn deref<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Variable(name) = current {
            match self.map.get(&**name) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current
    }

    /// Owned variant of [`Bindings::deref`]
    #[must_use]
    pub fn walk(&self, term: &Term) -> Term {
        self.deref(term).clone()
    }

    /// Applies the environment throughout `term`, leaving only unbound variables
    #[must_use]
    pub fn resolve(&self, term: &Term) -> Term {
        match self.deref(term) {
            Term::Struct { functor, args } => Term::Struct {
                functor: Rc::clone(functor),
                args: args.iter().map(|arg| self.resolve(arg)).collect(),
            },
            Term::List { head, tail } => Term::List {
                head: Rc::new(self.resolve(head)),
                tail: Rc::new(self.resolve(tail)),
            },
            other => other.clone(),
        }
    }

    pub(crate) fn insert(&mut self, name: Rc<str>, value: Term) -> Option<Term> {
        self.map.insert(name, value)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Term> {
        self.map.shift_remove(name)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}
