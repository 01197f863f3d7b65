use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fieldgate::{
    Binder, ExclusiveGroup, MemoryForm, RuleRegistry, RuleRegistryBuilder, Value, exclusive,
    hide, set, show, value,
};

/// Build a registry with `n` rules on one controller, each toggling its own
/// field, plus a form holding every field.
fn build_registry(n: usize) -> (RuleRegistry, MemoryForm) {
    let mut builder = RuleRegistryBuilder::new();
    let mut form = MemoryForm::new().field("method", "on");

    for i in 0..n {
        let target = format!("f{i}");
        let option = format!("o{}", i % 4);
        form.insert_field(&target, Value::from(""));
        builder = builder.rule(&format!("r{i}"), move |r| {
            r.watch("method")
                .when(value().eq(option.as_str()).or(value().icontains("ON")))
                .then(show(&target))
                .otherwise(hide(&target))
        });
    }

    (builder.compile().unwrap(), form)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let (registry, _) = build_registry(n);
        let current = Value::from("on");
        group.bench_function(format!("{n}_rules"), |b| {
            b.iter(|| registry.evaluate(black_box("method"), black_box(&current)));
        });
        group.bench_function(format!("{n}_rules_detailed"), |b| {
            b.iter(|| registry.evaluate_detailed(black_box("method"), black_box(&current)));
        });
    }

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for &n in &[5, 20, 50] {
        let (registry, mut form) = build_registry(n);
        let binder = Binder::initialize(registry, &mut form);
        let directives = binder.registry().evaluate("method", &Value::from("off"));

        group.bench_function(format!("{n}_directives"), |b| {
            b.iter(|| binder.apply(&mut form, black_box(&directives)));
        });
    }

    group.finish();
}

fn bench_exclusive(c: &mut Criterion) {
    let mut group = c.benchmark_group("exclusive");

    for &n in &[2, 4, 8] {
        let g = (0..n).fold(ExclusiveGroup::new("detail", "process", "ETCH"), |g, i| {
            g.member(&format!("m{i}"), &format!("T{i}"))
        });
        let registry = RuleRegistryBuilder::new()
            .group(g)
            .rule("m0", |r| {
                r.watch("m0")
                    .when(value().is_checked())
                    .then(exclusive("detail", Some("m0")))
                    .otherwise(set("process", "ETCH"))
            })
            .compile()
            .unwrap();
        let checked = Value::Bool(true);

        group.bench_function(format!("{n}_members"), |b| {
            b.iter(|| registry.evaluate(black_box("m0"), black_box(&checked)));
        });
    }

    group.finish();
}

fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation");

    for &n in &[5, 20, 50] {
        group.bench_function(format!("{n}_rules"), |b| {
            b.iter(|| black_box(build_registry(n)));
        });
    }

    let dsl = include_str!("../demos/forms/quiz_admin.rules");
    group.bench_function("quiz_admin_dsl", |b| {
        b.iter(|| black_box(RuleRegistry::from_dsl(black_box(dsl)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_apply,
    bench_exclusive,
    bench_compilation
);
criterion_main!(benches);
