use bmath_compiler::{parse_source, OptLevel};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const ARITHMETIC: &str = "1 + 2 * 3 - 4 / 5 ^ 2 % 7\n";

const MIXED: &str = "\
f = |x: Integer| => Real if(x <= 1) 1.0 else x * f(x - 1)
v = [1, 2, 3, 4, 5]
collect(map(v, |x| x * x))
reduce(v, 0, |a, b| a + b)
{a = 1
 b = 2
 a + b}
";

fn bench_parse(c: &mut Criterion) {
    let arithmetic: String = ARITHMETIC.repeat(200);
    c.bench_function("parse/arithmetic", |b| {
        b.iter(|| parse_source(black_box(&arithmetic), OptLevel::None).unwrap())
    });

    let mixed: String = MIXED.repeat(50);
    c.bench_function("parse/mixed", |b| {
        b.iter(|| parse_source(black_box(&mixed), OptLevel::None).unwrap())
    });

    c.bench_function("parse/mixed-optimized", |b| {
        b.iter(|| parse_source(black_box(&mixed), OptLevel::Full).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
