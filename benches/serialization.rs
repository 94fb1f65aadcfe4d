use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use serde_argv::{to_args, Context, FieldSpec, ToArgs};

#[derive(ToArgs, Clone)]
pub struct Run {
    #[args("--name=,omitempty")]
    pub name: String,
    #[args("true=--rm")]
    pub remove: bool,
    #[args("--env")]
    pub env: Vec<String>,
    #[args("--label,join,omitempty")]
    pub labels: Vec<String>,
    #[args("--workdir,omitempty")]
    pub workdir: Option<String>,
    pub image: String,
    pub command: Vec<String>,
}

#[derive(Serialize, Clone)]
struct CopyFile {
    from: String,
    to: String,
    mode: u32,
}

fn sample_run() -> Run {
    Run {
        name: "web".to_string(),
        remove: true,
        env: vec!["RUST_LOG=info".to_string()],
        labels: vec!["team=core".to_string(), "tier=web".to_string()],
        workdir: None,
        image: "alpine:3".to_string(),
        command: vec!["sh".to_string(), "-c".to_string(), "echo hi".to_string()],
    }
}

fn benchmark_derived_struct(c: &mut Criterion) {
    let ctx = Context::background();
    let run = sample_run();

    c.bench_function("encode_derived_struct", |b| {
        b.iter(|| to_args(&ctx, black_box(&run)))
    });
}

fn benchmark_plain_struct(c: &mut Criterion) {
    let ctx = Context::background();
    let copy = CopyFile {
        from: "a.txt".to_string(),
        to: "b.txt".to_string(),
        mode: 644,
    };

    c.bench_function("encode_plain_struct", |b| {
        b.iter(|| to_args(&ctx, black_box(&copy)))
    });
}

fn benchmark_string_sequences(c: &mut Criterion) {
    let ctx = Context::background();
    let mut group = c.benchmark_group("encode_sequence");

    for size in [10, 100, 1000].iter() {
        let values: Vec<String> = (0..*size).map(|i| format!("value{}", i)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| to_args(&ctx, black_box(values)))
        });
    }

    group.finish();
}

fn benchmark_directive_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_directive");

    group.bench_function("flag", |b| b.iter(|| FieldSpec::parse(black_box("--name"))));
    group.bench_function("full", |b| {
        b.iter(|| FieldSpec::parse(black_box("--label=,join,omitempty,true=yes,false=no")))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_derived_struct,
    benchmark_plain_struct,
    benchmark_string_sequences,
    benchmark_directive_parsing
);
criterion_main!(benches);
