use crate::bindings::Bindings;
use crate::term::Term;
use std::rc::Rc;

/// State of a variable immediately before it was (re)bound.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorState {
    /// The variable had no binding
    Unbound,
    /// The variable was bound to this term
    Bound(Term),
}

/// Position in the trail returned by [`Trail::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

impl Mark {
    /// Trail length at the time the mark was taken
    #[must_use]
    pub fn position(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct TrailEntry {
    name: Rc<str>,
    prior: PriorState,
}

/// Append-only undo log of variable bindings.
///
/// Every mutation of a [`Bindings`] environment during search goes through
/// [`Trail::bind`], which records the variable's prior state first.
/// [`Trail::undo`] rolls the environment back to any earlier [`Mark`].
#[derive(Debug, Clone, Default)]
pub struct Trail {
    entries: Vec<TrailEntry>,
}

impl Trail {
    /// Creates an empty trail
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Current position, to be passed to [`Trail::undo`] later
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.entries.len())
    }

    /// Number of recorded entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records the state of `name` as it was right before a mutation
    pub fn push(&mut self, name: Rc<str>, prior: PriorState) {
        self.entries.push(TrailEntry { name, prior });
    }

    /// Binds `name` to `value` in `bindings`, trailing the previous state
    pub fn bind(&mut self, bindings: &mut Bindings, name: &Rc<str>, value: Term) {
        let prior = match bindings.get(name) {
            Some(previous) => PriorState::Bound(previous.clone()),
            None => PriorState::Unbound,
        };
        self.push(Rc::clone(name), prior);
        bindings.insert(Rc::clone(name), value);
    }

    /// Restores every entry above `mark`, newest first, then truncates to `mark`.
    ///
    /// A mark at or beyond the current length is a no-op, so undoing twice to
    /// the same mark is harmless.
    pub fn undo(&mut self, mark: Mark, bindings: &mut Bindings) {
        while self.entries.len() > mark.0 {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            match entry.prior {
                PriorState::Unbound => {
                    bindings.remove(&entry.name);
                }
                PriorState::Bound(previous) => {
                    bindings.insert(entry.name, previous);
                }
            }
        }
    }

    /// Forgets every entry without touching any environment
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
