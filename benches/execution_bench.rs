use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lambda_script::{parse, Environment, Evaluator, Lexer};

const FIB: &str = r#"
    # naive recursion
    fib = lambda(n) if n < 2 then n else fib(n - 1) + fib(n - 2);
    fib(15)
"#;

fn lexer_benchmark(c: &mut Criterion) {
    let source = r#"
        x = 42;
        y = 10;
        result = x + y * 2
    "#;

    c.bench_function("tokenize simple program", |b| {
        b.iter(|| Lexer::tokenize(black_box(source)).unwrap())
    });
}

fn parser_benchmark(c: &mut Criterion) {
    c.bench_function("parse fib program", |b| {
        b.iter(|| parse(black_box(FIB)).unwrap())
    });
}

fn evaluator_benchmark(c: &mut Criterion) {
    let program = parse(FIB).unwrap();

    c.bench_function("evaluate fib(15)", |b| {
        b.iter(|| {
            let mut evaluator = Evaluator::new(Environment::new());
            evaluator.evaluate(black_box(&program)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    lexer_benchmark,
    parser_benchmark,
    evaluator_benchmark
);
criterion_main!(benches);
