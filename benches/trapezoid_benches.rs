use RustedTrapezoid::Examples::trapezoid_examples::trapezoid_examples;
use RustedTrapezoid::numerical::pipeline::{IntegrationRequest, run};
use RustedTrapezoid::numerical::trapezoid::{Bounds, trapezoidal_rule};
use RustedTrapezoid::symbolic::symbolic_engine::Expr;
use RustedTrapezoid::symbolic::symbolic_lambdify::Evaluator;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_trapezoidal_rule(c: &mut Criterion) {
    let expr = Expr::parse_expression("exp(-x^2) * cos(3*x) + ln(1 + x^2)").unwrap();
    let f = Evaluator::compile(&expr, "x").unwrap();
    let mut group = c.benchmark_group("trapezoidal rule");
    for n in [10, 100, 1000] {
        group.bench_function(format!("n = {}", n), |b| {
            b.iter(|| trapezoidal_rule(&f, Bounds::new(black_box(-2.0), black_box(2.0)), n))
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let request = IntegrationRequest::new("x^2*exp(x)", 0.0, 1.0, 100);
    c.bench_function("full request", |b| b.iter(|| run(black_box(&request))));
}

fn bench_example_1(c: &mut Criterion) {
    c.bench_function("example 1", |b| b.iter(|| trapezoid_examples(1)));
}

criterion_group!(benches, bench_trapezoidal_rule, bench_pipeline, bench_example_1);
criterion_main!(benches);
