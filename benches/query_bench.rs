#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hornlog::{Clause, LogicEngine, Term};

fn node(i: usize) -> Term {
    Term::atom(format!("node_{i}"))
}

fn call(name: &str, args: Vec<Term>) -> Term {
    Term::compound(name, args).expect("functor is a non-empty atom")
}

/// A chain of 200 edges, padded with unrelated predicates so lookups hit the index
fn setup_chain() -> LogicEngine {
    let mut engine = LogicEngine::new();

    for i in 0..200 {
        engine.add_clause(
            Clause::fact(call("edge", vec![node(i), node(i + 1)])).expect("callable head"),
        );
        engine.add_clause(
            Clause::fact(call(&format!("noise_{}", i % 20), vec![node(i)]))
                .expect("callable head"),
        );
    }

    // path(X, Y) :- edge(X, Y).
    engine.add_clause(
        Clause::rule(
            call("path", vec![Term::var("X"), Term::var("Y")]),
            call("edge", vec![Term::var("X"), Term::var("Y")]),
        )
        .expect("callable head"),
    );

    // path(X, Z) :- edge(X, Y), path(Y, Z).
    engine.add_clause(
        Clause::rule(
            call("path", vec![Term::var("X"), Term::var("Z")]),
            call(
                ",",
                vec![
                    call("edge", vec![Term::var("X"), Term::var("Y")]),
                    call("path", vec![Term::var("Y"), Term::var("Z")]),
                ],
            ),
        )
        .expect("callable head"),
    );

    engine
}

fn query_fact_lookup(c: &mut Criterion) {
    let engine = setup_chain();

    c.bench_function("query_fact_lookup", |b| {
        b.iter(|| {
            let goal = call("edge", vec![node(150), Term::var("Next")]);
            black_box(engine.query(&goal))
        });
    });
}

fn query_existence_check(c: &mut Criterion) {
    let engine = setup_chain();

    c.bench_function("query_existence_check", |b| {
        b.iter(|| {
            let goal = call("path", vec![node(0), node(100)]);
            black_box(engine.ask(&goal))
        });
    });
}

fn query_reachable_nodes(c: &mut Criterion) {
    let engine = setup_chain();

    c.bench_function("query_reachable_nodes", |b| {
        b.iter(|| {
            let goal = call("path", vec![node(100), Term::var("To")]);
            black_box(engine.query(&goal))
        });
    });
}

criterion_group!(
    benches,
    query_fact_lookup,
    query_existence_check,
    query_reachable_nodes
);
criterion_main!(benches);
