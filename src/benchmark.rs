use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regex_dfa::{compile, simulate};

const PATTERN: &str = "(a|b)*abb(a|b)?(0|1(01*0)*1)+";

fn inputs() -> Vec<String> {
    (0..200)
        .map(|i| format!("{}abb{:b}", "ab".repeat(i % 17), i * 3))
        .collect()
}

fn do_the_work(inputs: &[String], expected: &[bool]) {
    let dfa = compile(PATTERN).unwrap();
    let actual: Vec<bool> = inputs.iter().map(|input| simulate(&dfa, input)).collect();
    assert_eq!(expected, actual.as_slice())
}

fn criterion_benchmark_compile(c: &mut Criterion) {
    c.bench_function("compile textbook pattern", |b| {
        b.iter(|| compile(black_box(PATTERN)).unwrap())
    });
}

fn criterion_benchmark_simulate(c: &mut Criterion) {
    let inputs = inputs();
    let oracle = regex::Regex::new(&format!("^(?:{})$", PATTERN)).unwrap();
    let expected: Vec<bool> = inputs.iter().map(|input| oracle.is_match(input)).collect();
    c.bench_function("compile and simulate 200 inputs", |b| {
        b.iter(|| do_the_work(black_box(&inputs), black_box(&expected)))
    });
}

criterion_group!(
    benches,
    criterion_benchmark_compile,
    criterion_benchmark_simulate
);
criterion_main!(benches);
