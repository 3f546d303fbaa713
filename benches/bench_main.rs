use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

// Vimscript expressions of varying complexity
const VIM_SIMPLE: &str = "1 + 2";
const VIM_ARITHMETIC: &str = "((5 * 2) + 3) / 2 - 1 % 7";
const VIM_COMPARISON: &str = "a ==# 'x' && b isnot v:null || c =~? '^foo'";
const VIM_PROJECTION: &str = "g:opts.ui.border-style.width";
const VIM_METHOD_CHAIN: &str = "items->filter({_, v -> v.enabled})->map({_, v -> v.name})->join(', ')";
const VIM_TERNARY: &str = "exists('g:loaded') ? g:loaded ?? 0 : get(b:, 'fallback', -1)";
const VIM_COMPLEX: &str = r#"#{name: s:Name(), tags: ['a', 'b'], size: len(l[1:]) * 2}.size .. printf("%d", d.f(1, 2)) .. $HOME .. &l:shiftwidth .. @a"#;

fn bench_vimscript_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Vimscript Parsing");

    for (name, input) in [
        ("Simple (1 + 2)", VIM_SIMPLE),
        ("Arithmetic", VIM_ARITHMETIC),
        ("Comparison", VIM_COMPARISON),
        ("Projection", VIM_PROJECTION),
        ("Method Chain", VIM_METHOD_CHAIN),
        ("Ternary", VIM_TERNARY),
        ("Complex", VIM_COMPLEX),
    ] {
        group.bench_function(name, |b| b.iter(|| vimexpr::parse(black_box(input))));
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("Vimscript Stages");
    let input = VIM_METHOD_CHAIN;

    group.bench_function("Concrete parse only", |b| {
        b.iter(|| vimexpr::parse_tree(black_box(input)))
    });

    group.bench_function("Concrete parse + AST", |b| {
        b.iter(|| vimexpr::parse(black_box(input)))
    });

    group.bench_function("S-expression", |b| {
        b.iter_batched_ref(
            || vimexpr::parse(input).expect("benchmark input parses"),
            |expr| vimexpr::sexpr(black_box(expr)),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_long_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("Vimscript Long Chains");

    let additions = vec!["x"; 500].join(" + ");
    group.bench_function("500 additions", |b| {
        b.iter(|| vimexpr::parse(black_box(&additions)))
    });

    let projections = format!("d{}", ".key".repeat(200));
    group.bench_function("200 projections", |b| {
        b.iter(|| vimexpr::parse(black_box(&projections)))
    });

    group.finish();
}

criterion_group!(benches, bench_vimscript_parsing, bench_stages, bench_long_chains);
criterion_main!(benches);
