use crate::bindings::Bindings;
use crate::error::TermError;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Text of the canonical empty list atom.
pub const NIL: &str = "[]";

/// A logic term.
///
/// Terms are immutable values: variables carry only a name, and their
/// bindings live in a [`Bindings`] environment outside the term graph.
/// Compound parts are reference counted, so cloning a term is cheap and
/// renamed copies can share ground subterms with the original.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// A constant symbol (e.g., `tom`, `'hello world'`, `[]`)
    Atom(Rc<str>),
    /// A floating point number
    Number(f64),
    /// A logic variable, identified by name
    Variable(Rc<str>),
    /// A compound term `functor(arg, ...)`
    Struct {
        /// The functor's atom text
        functor: Rc<str>,
        /// The arguments; the arity is their count
        args: Rc<[Term]>,
    },
    /// A non-empty list segment `[head | tail]`
    List {
        /// First element
        head: Rc<Term>,
        /// Rest of the list, `[]` for a proper list
        tail: Rc<Term>,
    },
}

/// Indexing key of a callable term: functor name and arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredicateKey {
    /// Functor (or atom) text
    pub name: Rc<str>,
    /// Number of arguments, 0 for atoms
    pub arity: usize,
}

impl fmt::Display for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

impl Term {
    /// Creates an atom
    pub fn atom(text: impl Into<Rc<str>>) -> Self {
        Term::Atom(text.into())
    }

    /// Creates a number
    #[must_use]
    pub fn number(value: f64) -> Self {
        Term::Number(value)
    }

    /// Creates a variable
    pub fn var(name: impl Into<Rc<str>>) -> Self {
        Term::Variable(name.into())
    }

    /// The empty list `[]`
    #[must_use]
    pub fn nil() -> Self {
        Term::Atom(NIL.into())
    }

    /// Creates a list cell `[head | tail]`
    #[must_use]
    pub fn cons(head: Term, tail: Term) -> Self {
        Term::List {
            head: Rc::new(head),
            tail: Rc::new(tail),
        }
    }

    /// Builds a proper list from `items`, ending in `[]`
    #[must_use]
    pub fn list(items: Vec<Term>) -> Self {
        Self::list_with_tail(items, Term::nil())
    }

    /// Builds a list from `items` ending in `tail` (e.g., `[1, 2 | T]`)
    #[must_use]
    pub fn list_with_tail(items: Vec<Term>, tail: Term) -> Self {
        items
            .into_iter()
            .rev()
            .fold(tail, |rest, item| Term::cons(item, rest))
    }

    /// Creates a compound term.
    ///
    /// A compound with no arguments is the atom of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::EmptyFunctor`] if `functor` is empty.
    pub fn compound(functor: &str, args: Vec<Term>) -> Result<Self, TermError> {
        if functor.is_empty() {
            return Err(TermError::EmptyFunctor);
        }
        if args.is_empty() {
            return Ok(Term::atom(functor));
        }
        Ok(Term::Struct {
            functor: functor.into(),
            args: args.into(),
        })
    }

    /// Creates a compound term whose functor is itself given as a term.
    ///
    /// # Errors
    ///
    /// Fails with [`TermError::NonAtomFunctor`] unless `functor` is an atom,
    /// and with [`TermError::EmptyFunctor`] if that atom is empty.
    pub fn compound_from(functor: &Term, args: Vec<Term>) -> Result<Self, TermError> {
        match functor {
            Term::Atom(name) => Self::compound(name, args),
            other => Err(TermError::NonAtomFunctor(other.to_string())),
        }
    }

    /// Binary operator term such as `,(A, B)` or `+(1, 2)`
    pub(crate) fn binary(functor: &str, left: Term, right: Term) -> Self {
        Term::Struct {
            functor: functor.into(),
            args: Rc::from(vec![left, right]),
        }
    }

    /// True for the empty list atom
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Term::Atom(text) if &**text == NIL)
    }

    /// True for atoms and compound terms, the only terms that can be goals or heads
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Term::Atom(_) | Term::Struct { .. })
    }

    /// Functor/arity key of a callable term; atoms index at arity 0
    #[must_use]
    pub fn functor_key(&self) -> Option<PredicateKey> {
        match self {
            Term::Atom(name) => Some(PredicateKey {
                name: Rc::clone(name),
                arity: 0,
            }),
            Term::Struct { functor, args } => Some(PredicateKey {
                name: Rc::clone(functor),
                arity: args.len(),
            }),
            _ => None,
        }
    }

    /// Deep copy in which every variable is replaced by a fresh one.
    ///
    /// Repeated occurrences of a variable map to the same fresh variable
    /// for as long as the same `renaming` is used.
    #[must_use]
    pub fn rename(&self, renaming: &mut Renaming) -> Term {
        match self {
            Term::Atom(_) | Term::Number(_) => self.clone(),
            Term::Variable(name) => Term::Variable(renaming.fresh(name)),
            Term::Struct { functor, args } => Term::Struct {
                functor: Rc::clone(functor),
                args: args.iter().map(|arg| arg.rename(renaming)).collect(),
            },
            Term::List { head, tail } => Term::List {
                head: Rc::new(head.rename(renaming)),
                tail: Rc::new(tail.rename(renaming)),
            },
        }
    }

    /// Structural equality under `bindings`.
    ///
    /// Variables are compared by their dereferenced value, or by name when
    /// unbound. Numbers use IEEE-754 equality, so `NaN` never equals `NaN`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn equals_in(&self, other: &Term, bindings: &Bindings) -> bool {
        match (bindings.deref(self), bindings.deref(other)) {
            (Term::Atom(a), Term::Atom(b)) | (Term::Variable(a), Term::Variable(b)) => a == b,
            (Term::Number(a), Term::Number(b)) => a == b,
            (
                Term::Struct {
                    functor: f1,
                    args: a1,
                },
                Term::Struct {
                    functor: f2,
                    args: a2,
                },
            ) => {
                f1 == f2
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2.iter()).all(|(x, y)| x.equals_in(y, bindings))
            }
            (Term::List { head: h1, tail: t1 }, Term::List { head: h2, tail: t2 }) => {
                h1.equals_in(h2, bindings) && t1.equals_in(t2, bindings)
            }
            _ => false,
        }
    }

    /// True if any variable reachable from this term is unbound in `bindings`
    #[must_use]
    pub fn has_unbound_variables(&self, bindings: &Bindings) -> bool {
        match bindings.deref(self) {
            Term::Atom(_) | Term::Number(_) => false,
            Term::Variable(_) => true,
            Term::Struct { args, .. } => args.iter().any(|arg| arg.has_unbound_variables(bindings)),
            Term::List { head, tail } => {
                head.has_unbound_variables(bindings) || tail.has_unbound_variables(bindings)
            }
        }
    }

    /// Variable names in order of first occurrence
    #[must_use]
    pub fn variables(&self) -> IndexSet<Rc<str>> {
        let mut names = IndexSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut IndexSet<Rc<str>>) {
        match self {
            Term::Atom(_) | Term::Number(_) => {}
            Term::Variable(name) => {
                names.insert(Rc::clone(name));
            }
            Term::Struct { args, .. } => {
                for arg in args.iter() {
                    arg.collect_variables(names);
                }
            }
            Term::List { head, tail } => {
                head.collect_variables(names);
                tail.collect_variables(names);
            }
        }
    }
}

impl fmt::Display for Term {
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(text) | Term::Variable(text) => f.write_str(text),
            Term::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            Term::Struct { functor, args } => {
                write!(f, "{functor}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Term::List { head, tail } => {
                write!(f, "[{head}")?;
                let mut rest: &Term = &**tail;
                loop {
                    match rest {
                        Term::List { head, tail } => {
                            write!(f, ", {head}")?;
                            rest = &**tail;
                        }
                        nil if nil.is_nil() => break,
                        other => {
                            write!(f, " | {other}")?;
                            break;
                        }
                    }
                }
                f.write_str("]")
            }
        }
    }
}

/// Source of activation numbers for [`Renaming::unique`], shared by every query
static NEXT_ACTIVATION: AtomicU64 = AtomicU64::new(1);

/// Per-activation variable renaming table.
///
/// Built lazily while a clause is copied: the first time a variable name is
/// seen it gets a fresh name tagged with the activation number, later
/// occurrences reuse it.
#[derive(Debug, Clone)]
pub struct Renaming {
    activation: u64,
    names: IndexMap<Rc<str>, Rc<str>>,
}

impl Renaming {
    /// Creates an empty table for the given activation number
    #[must_use]
    pub fn new(activation: u64) -> Self {
        Self {
            activation,
            names: IndexMap::new(),
        }
    }

    /// Creates an empty table whose activation number has never been handed
    /// out before in this process.
    ///
    /// Unbound renamed variables can leak into answers and from there into
    /// later goals, so numbers are not reused across queries.
    #[must_use]
    pub fn unique() -> Self {
        Self::new(NEXT_ACTIVATION.fetch_add(1, Ordering::Relaxed))
    }

    /// The activation number appended to renamed variables
    #[must_use]
    pub fn activation(&self) -> u64 {
        self.activation
    }

    /// Fresh name for `name`, allocated on first use.
    ///
    /// `#` cannot appear in parsed variable names, so renamed variables never
    /// collide with variables written in a query.
    pub fn fresh(&mut self, name: &Rc<str>) -> Rc<str> {
        let activation = self.activation;
        Rc::clone(
            self.names
                .entry(Rc::clone(name))
                .or_insert_with(|| format!("{name}#{activation}").into()),
        )
    }

    /// Number of distinct variables renamed so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no variable has been renamed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A Horn clause: a fact when `body` is absent, a rule otherwise.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawClause"))]
pub struct Clause {
    head: Term,
    body: Option<Term>,
}

/// Serialized form of a [`Clause`], checked by [`Clause::new`] on the way in
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawClause {
    head: Term,
    body: Option<Term>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawClause> for Clause {
    type Error = TermError;

    fn try_from(raw: RawClause) -> Result<Self, Self::Error> {
        Clause::new(raw.head, raw.body)
    }
}

impl Clause {
    /// Creates a clause.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::InvalidHead`] if `head` is not an atom or compound term.
    pub fn new(head: Term, body: Option<Term>) -> Result<Self, TermError> {
        if !head.is_callable() {
            return Err(TermError::InvalidHead(head.to_string()));
        }
        Ok(Self { head, body })
    }

    /// Creates a fact.
    ///
    /// # Errors
    ///
    /// See [`Clause::new`].
    pub fn fact(head: Term) -> Result<Self, TermError> {
        Self::new(head, None)
    }

    /// Creates a rule `head :- body`.
    ///
    /// # Errors
    ///
    /// See [`Clause::new`].
    pub fn rule(head: Term, body: Term) -> Result<Self, TermError> {
        Self::new(head, Some(body))
    }

    /// The clause head
    #[must_use]
    pub fn head(&self) -> &Term {
        &self.head
    }

    /// The clause body, `None` for facts
    #[must_use]
    pub fn body(&self) -> Option<&Term> {
        self.body.as_ref()
    }

    /// True if the clause has no body
    #[must_use]
    pub fn is_fact(&self) -> bool {
        self.body.is_none()
    }

    /// Index key of the head
    #[must_use]
    pub fn key(&self) -> Option<PredicateKey> {
        self.head.functor_key()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            None => write!(f, "{}.", self.head),
            Some(body) => write!(f, "{} :- {body}.", self.head),
        }
    }
}
