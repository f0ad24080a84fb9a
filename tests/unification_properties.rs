//! Property-based tests for unification and the trail using proptest.

use hornlog::{occurs_in, unify, Bindings, Term, Trail};
use proptest::prelude::*;

/// Term description, turned into a [`Term`] by [`build`]
#[derive(Debug, Clone)]
enum TermDesc {
    Var(u8),
    Atom(u8),
    Number(i8),
    Func(u8, Vec<TermDesc>),
    List(Vec<TermDesc>, Option<u8>),
}

fn arb_term_desc(max_depth: u32) -> BoxedStrategy<TermDesc> {
    let leaf = prop_oneof![
        (0..4u8).prop_map(TermDesc::Var),
        (0..3u8).prop_map(TermDesc::Atom),
        (-2..3i8).prop_map(TermDesc::Number),
    ];
    if max_depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            4 => leaf,
            2 => (0..2u8, proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=3))
                .prop_map(|(f, args)| TermDesc::Func(f, args)),
            1 => (
                proptest::collection::vec(arb_term_desc(max_depth - 1), 1..=3),
                proptest::option::of(0..4u8),
            )
                .prop_map(|(items, tail)| TermDesc::List(items, tail)),
        ]
        .boxed()
    }
}

fn build(desc: &TermDesc) -> Term {
    match desc {
        TermDesc::Var(i) => Term::var(format!("X{i}")),
        TermDesc::Atom(i) => Term::atom(format!("c{i}")),
        TermDesc::Number(n) => Term::number(f64::from(*n)),
        TermDesc::Func(f, args) => {
            Term::compound(&format!("f{f}"), args.iter().map(build).collect()).unwrap()
        }
        TermDesc::List(items, tail) => {
            let tail = tail.map_or_else(Term::nil, |i| Term::var(format!("X{i}")));
            Term::list_with_tail(items.iter().map(build).collect(), tail)
        }
    }
}

fn arb_term(max_depth: u32) -> impl Strategy<Value = Term> {
    arb_term_desc(max_depth).prop_map(|desc| build(&desc))
}

proptest! {
    #[test]
    fn unification_is_symmetric(a in arb_term(3), b in arb_term(3)) {
        let mut forward = Bindings::new();
        let mut backward = Bindings::new();
        let ok_forward = unify(&a, &b, &mut forward, &mut Trail::new());
        let ok_backward = unify(&b, &a, &mut backward, &mut Trail::new());

        prop_assert_eq!(ok_forward, ok_backward);
        if ok_forward {
            prop_assert!(forward.resolve(&a).equals_in(&forward.resolve(&b), &forward));
            prop_assert!(backward.resolve(&a).equals_in(&backward.resolve(&b), &backward));
            prop_assert_eq!(forward.len(), backward.len());
        }
    }

    #[test]
    fn unifier_makes_terms_equal(a in arb_term(3), b in arb_term(3)) {
        let mut bindings = Bindings::new();
        if unify(&a, &b, &mut bindings, &mut Trail::new()) {
            prop_assert_eq!(bindings.resolve(&a), bindings.resolve(&b));
        }
    }

    #[test]
    fn term_unifies_with_itself_without_bindings(a in arb_term(3)) {
        let mut bindings = Bindings::new();
        let mut trail = Trail::new();
        prop_assert!(unify(&a, &a, &mut bindings, &mut trail));
        prop_assert!(bindings.is_empty());
        prop_assert!(trail.is_empty());
    }

    #[test]
    fn variable_never_binds_to_term_containing_it(
        args in proptest::collection::vec(arb_term(2), 0..3),
        f in 0..2u8,
    ) {
        let x = Term::var("X0");
        let mut with_x = args;
        with_x.push(x.clone());
        let cyclic = Term::compound(&format!("f{f}"), with_x).unwrap();

        let mut bindings = Bindings::new();
        prop_assert!(occurs_in("X0", &cyclic, &bindings));
        prop_assert!(!unify(&x, &cyclic, &mut bindings, &mut Trail::new()));
    }

    #[test]
    fn undo_restores_environment_and_is_idempotent(
        seed in arb_term(2),
        a in arb_term(3),
        b in arb_term(3),
    ) {
        let mut bindings = Bindings::new();
        let mut trail = Trail::new();
        let _ = unify(&Term::var("X3"), &seed, &mut bindings, &mut trail);
        let before = bindings.clone();

        let mark = trail.mark();
        let _ = unify(&a, &b, &mut bindings, &mut trail);
        trail.undo(mark, &mut bindings);
        prop_assert_eq!(&bindings, &before);

        trail.undo(mark, &mut bindings);
        prop_assert_eq!(&bindings, &before);
        prop_assert_eq!(trail.mark(), mark);
    }
}
