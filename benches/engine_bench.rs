#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hornlog::{parse_term, LogicEngine};

const FAMILY: &str = "
    parent(tom, bob).
    parent(tom, liz).
    parent(bob, ann).
    parent(bob, pat).
    parent(pat, jim).
    parent(jim, kim).
    ancestor(X, Y) :- parent(X, Y).
    ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).
";

const LISTS: &str = "
    append([], L, L).
    append([H | T], L, [H | R]) :- append(T, L, R).
    len([], 0).
    len([_ | T], N) :- len(T, M), N is M + 1.
";

fn engine_with(source: &str) -> LogicEngine {
    let mut engine = LogicEngine::new();
    engine.consult(source).expect("benchmark program parses");
    engine
}

/// Benchmark for parsing and loading a program
fn bench_consult(c: &mut Criterion) {
    let mut program = String::new();
    for i in 0..500 {
        program.push_str(&format!("edge(n{i}, n{}).\n", i + 1));
    }
    program.push_str(FAMILY);

    c.bench_function("consult", |b| {
        b.iter(|| {
            let mut engine = LogicEngine::new();
            black_box(engine.consult(black_box(&program)))
        });
    });
}

/// Benchmark for recursive rule resolution
fn bench_ancestor(c: &mut Criterion) {
    let engine = engine_with(FAMILY);
    let goal = parse_term("ancestor(tom, Who)").expect("goal parses");

    c.bench_function("ancestor", |b| {
        b.iter(|| black_box(engine.query(&goal)));
    });
}

/// Benchmark for list splitting, which enumerates every append split
fn bench_append_splits(c: &mut Criterion) {
    let engine = engine_with(LISTS);
    let goal = parse_term("append(X, Y, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10])").expect("goal parses");

    c.bench_function("append_splits", |b| {
        b.iter(|| black_box(engine.query(&goal)));
    });
}

/// Benchmark for arithmetic goals inside recursion
fn bench_arithmetic(c: &mut Criterion) {
    let engine = engine_with(LISTS);
    let goal = parse_term(
        "len([a, b, c, d, e, f, g, h, i, j, k, l, m, n, o, p], N), M is N * 2 + 1",
    )
    .expect("goal parses");

    c.bench_function("arithmetic", |b| {
        b.iter(|| black_box(engine.query(&goal)));
    });
}

criterion_group!(
    benches,
    bench_consult,
    bench_ancestor,
    bench_append_splits,
    bench_arithmetic
);
criterion_main!(benches);
