use crate::bindings::Bindings;
use crate::term::Term;
use crate::trail::Trail;
use std::rc::Rc;

/// Unifies `a` with `b`, extending `bindings` and recording each binding on `trail`.
///
/// On failure some bindings made during the call may remain. Callers that
/// backtrack take a [`Trail::mark`] beforehand and [`Trail::undo`] to it.
#[allow(clippy::float_cmp)]
pub fn unify(a: &Term, b: &Term, bindings: &mut Bindings, trail: &mut Trail) -> bool {
    let a = bindings.walk(a);
    let b = bindings.walk(b);

    match (&a, &b) {
        (Term::Variable(x), Term::Variable(y)) if x == y => true,
        (Term::Variable(name), other) | (other, Term::Variable(name)) => {
            bind(name, other, bindings, trail)
        }
        (Term::Atom(x), Term::Atom(y)) => x == y,
        (Term::Number(x), Term::Number(y)) => x == y,
        (Term::List { head: h1, tail: t1 }, Term::List { head: h2, tail: t2 }) => {
            unify(h1, h2, bindings, trail) && unify(t1, t2, bindings, trail)
        }
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
                && a1
                    .iter()
                    .zip(a2.iter())
                    .all(|(x, y)| unify(x, y, bindings, trail))
        }
        _ => false,
    }
}

/// Binds an unbound variable after the occurs check
fn bind(name: &Rc<str>, value: &Term, bindings: &mut Bindings, trail: &mut Trail) -> bool {
    if occurs_in(name, value, bindings) {
        return false;
    }
    trail.bind(bindings, name, value.clone());
    true
}

/// True if variable `name` appears in `term`, looking through `bindings`
#[must_use]
pub fn occurs_in(name: &str, term: &Term, bindings: &Bindings) -> bool {
    match bindings.deref(term) {
        Term::Variable(other) => &**other == name,
        Term::Struct { args, .. } => args.iter().any(|arg| occurs_in(name, arg, bindings)),
        Term::List { head, tail } => {
            occurs_in(name, head, bindings) || occurs_in(name, tail, bindings)
        }
        Term::Atom(_) | Term::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(functor: &str, args: Vec<Term>) -> Term {
        Term::compound(functor, args).unwrap()
    }

    fn unify_fresh(a: &Term, b: &Term) -> (bool, Bindings) {
        let mut bindings = Bindings::new();
        let mut trail = Trail::new();
        let unified = unify(a, b, &mut bindings, &mut trail);
        (unified, bindings)
    }

    #[test]
    fn test_unify_atoms_and_numbers() {
        assert!(unify_fresh(&Term::atom("a"), &Term::atom("a")).0);
        assert!(!unify_fresh(&Term::atom("a"), &Term::atom("b")).0);
        assert!(unify_fresh(&Term::number(1.0), &Term::number(1.0)).0);
        assert!(!unify_fresh(&Term::number(1.0), &Term::number(2.0)).0);
        assert!(!unify_fresh(&Term::number(f64::NAN), &Term::number(f64::NAN)).0);
        assert!(!unify_fresh(&Term::atom("1"), &Term::number(1.0)).0);
    }

    #[test]
    fn test_unify_variable_binds_in_either_direction() {
        let (unified, bindings) = unify_fresh(&Term::var("X"), &Term::atom("a"));
        assert!(unified);
        assert_eq!(bindings.get("X"), Some(&Term::atom("a")));

        let (unified, bindings) = unify_fresh(&Term::atom("a"), &Term::var("X"));
        assert!(unified);
        assert_eq!(bindings.get("X"), Some(&Term::atom("a")));
    }

    #[test]
    fn test_unify_same_variable_makes_no_binding() {
        let (unified, bindings) = unify_fresh(&Term::var("X"), &Term::var("X"));
        assert!(unified);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_unify_structs() {
        let a = compound("f", vec![Term::var("X"), Term::atom("b")]);
        let b = compound("f", vec![Term::atom("a"), Term::var("Y")]);
        let (unified, bindings) = unify_fresh(&a, &b);
        assert!(unified);
        assert_eq!(bindings.get("X"), Some(&Term::atom("a")));
        assert_eq!(bindings.get("Y"), Some(&Term::atom("b")));

        let other_functor = compound("g", vec![Term::var("X"), Term::atom("b")]);
        assert!(!unify_fresh(&a, &other_functor).0);

        let other_arity = compound("f", vec![Term::var("X")]);
        assert!(!unify_fresh(&a, &other_arity).0);
    }

    #[test]
    fn test_unify_stops_at_first_failing_argument() {
        let a = compound("f", vec![Term::atom("a"), Term::var("X")]);
        let b = compound("f", vec![Term::atom("b"), Term::atom("c")]);
        let (unified, bindings) = unify_fresh(&a, &b);
        assert!(!unified);
        assert!(!bindings.is_bound("X"));
    }

    #[test]
    fn test_unify_repeated_variable() {
        let pattern = compound("same", vec![Term::var("X"), Term::var("X")]);
        assert!(!unify_fresh(&pattern, &compound("same", vec![Term::atom("a"), Term::atom("b")])).0);
        assert!(unify_fresh(&pattern, &compound("same", vec![Term::atom("c"), Term::atom("c")])).0);
    }

    #[test]
    fn test_occurs_check() {
        let x = Term::var("X");
        assert!(!unify_fresh(&x, &compound("f", vec![x.clone()])).0);

        let mut bindings = Bindings::new();
        let mut trail = Trail::new();
        assert!(unify(&Term::var("X"), &Term::var("Y"), &mut bindings, &mut trail));
        assert!(!unify(
            &Term::var("Y"),
            &compound("f", vec![Term::var("X")]),
            &mut bindings,
            &mut trail
        ));
    }

    #[test]
    fn test_unify_partial_list() {
        let one = Term::number(1.0);
        let two = Term::number(2.0);
        let pattern = Term::list_with_tail(vec![one.clone(), two.clone()], Term::var("T"));
        let list = Term::list(vec![one, two, Term::number(3.0)]);

        let (unified, bindings) = unify_fresh(&pattern, &list);
        assert!(unified);
        assert_eq!(
            bindings.get("T"),
            Some(&Term::list(vec![Term::number(3.0)]))
        );
    }

    #[test]
    fn test_unify_empty_lists() {
        let (unified, bindings) = unify_fresh(&Term::nil(), &Term::nil());
        assert!(unified);
        assert!(bindings.is_empty());
        assert!(!unify_fresh(&Term::nil(), &Term::list(vec![Term::atom("a")])).0);
    }

    #[test]
    fn test_failed_unify_rolls_back_with_mark() {
        let mut bindings = Bindings::new();
        let mut trail = Trail::new();
        let mark = trail.mark();
        let a = compound("f", vec![Term::var("X"), Term::atom("a")]);
        let b = compound("f", vec![Term::atom("z"), Term::atom("b")]);

        assert!(!unify(&a, &b, &mut bindings, &mut trail));
        trail.undo(mark, &mut bindings);
        assert!(bindings.is_empty());
    }
}
