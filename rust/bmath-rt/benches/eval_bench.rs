use bmath_compiler::OptLevel;
use bmath_rt::Engine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn run_to_end(source: &str, level: OptLevel) {
    let mut engine = Engine::new(level);
    for result in engine.run(source) {
        result.unwrap();
    }
}

fn bench_eval(c: &mut Criterion) {
    c.bench_function("eval/fib-15", |b| {
        b.iter(|| {
            run_to_end(
                black_box("fib = |n| if(n < 2) n else fib(n-1) + fib(n-2)\nfib(15)"),
                OptLevel::Full,
            )
        })
    });

    c.bench_function("eval/vector-pipeline", |b| {
        b.iter(|| {
            run_to_end(
                black_box(
                    "v = vec(100, |i| i)\nsum(collect(map(filter(v, |x| x % 2 == 0), |x| x * x)))",
                ),
                OptLevel::Full,
            )
        })
    });

    c.bench_function("eval/sequence-lazy", |b| {
        b.iter(|| {
            run_to_end(
                black_box("collect(take(seq(10000, |i| i * 2), 50))"),
                OptLevel::Full,
            )
        })
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
