use criterion::{Criterion, criterion_group, criterion_main};
use grid_puzzle::grid::{GridPuzzle, Rules};
use grid_puzzle::smt::cnf::Cnf;
use grid_puzzle::smt::encode::encode_constraint;
use grid_puzzle::smt::{BoolVar, LinearSum, VarisatBackend};
use std::hint::black_box;
use std::time::Duration;

fn bench_solve(c: &mut Criterion) {
    let puzzle = GridPuzzle::default();

    c.bench_function("grid - first solution", |b| {
        b.iter(|| {
            let outcome = puzzle.solve::<VarisatBackend>(&()).unwrap();
            black_box(outcome);
        })
    });

    c.bench_function("grid - first solution, unverified", |b| {
        let puzzle = puzzle.with_verification(false);
        b.iter(|| {
            let outcome = puzzle.solve::<VarisatBackend>(&()).unwrap();
            black_box(outcome);
        })
    });

    let unsat = GridPuzzle::new(Rules {
        row_target: 3,
        ..Rules::default()
    });
    c.bench_function("grid - no solution", |b| {
        b.iter(|| {
            let outcome = unsat.solve::<VarisatBackend>(&()).unwrap();
            black_box(outcome);
        })
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid - enumeration");
    group.sample_size(100);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("all solutions", |b| {
        b.iter(|| {
            let boards = GridPuzzle::default()
                .solve_all::<VarisatBackend>(&(), None)
                .unwrap();
            black_box(boards);
        })
    });

    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("cnf - cardinality encoding");

    for n in [4_usize, 9, 16] {
        let vars: Vec<BoolVar> = (0..n).map(BoolVar::from_index).collect();
        let constraint = LinearSum::indicators(vars).equals(2);
        group.bench_function(format!("exactly 2 of {n}"), |b| {
            b.iter(|| {
                let mut cnf = Cnf::new(n);
                encode_constraint(&mut cnf, black_box(&constraint)).unwrap();
                black_box(cnf);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve, bench_enumerate, bench_encoding);
criterion_main!(benches);
