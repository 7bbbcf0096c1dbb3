use apollo_synthesizer::ast::OperationType;
use apollo_synthesizer::OperationSynthesizer;
use apollo_synthesizer::Schema;
use apollo_synthesizer::SynthesisOptions;
use criterion::*;

fn synthesize_all(synthesizer: &mut OperationSynthesizer<'_>, options: &SynthesisOptions) {
    for operation_type in [OperationType::Query, OperationType::Mutation] {
        let operations = synthesizer.synthesize_root_fields(operation_type, options);
        let _ = black_box(operations);
    }
}

fn bench_fresh_cache(c: &mut Criterion) {
    let schema = Schema::parse(include_str!("testdata/social.graphql")).unwrap();
    let options = SynthesisOptions::new();

    c.bench_function("synthesize_fresh_cache", move |b| {
        b.iter(|| synthesize_all(&mut OperationSynthesizer::new(&schema), &options))
    });
}

fn bench_shared_cache(c: &mut Criterion) {
    let schema = Schema::parse(include_str!("testdata/social.graphql")).unwrap();
    let options = SynthesisOptions::new();
    let mut synthesizer = OperationSynthesizer::new(&schema);
    synthesize_all(&mut synthesizer, &options);

    c.bench_function("synthesize_shared_cache", move |b| {
        b.iter(|| synthesize_all(&mut synthesizer, &options))
    });
}

fn bench_models_and_depth(c: &mut Criterion) {
    let schema = Schema::parse(include_str!("testdata/social.graphql")).unwrap();
    let options = SynthesisOptions::new()
        .models(["User", "Post"])
        .depth_limit(3)
        .circular_reference_depth(2);

    c.bench_function("synthesize_models_and_depth", move |b| {
        b.iter(|| synthesize_all(&mut OperationSynthesizer::new(&schema), &options))
    });
}

criterion_group!(
    benches,
    bench_fresh_cache,
    bench_shared_cache,
    bench_models_and_depth
);
criterion_main!(benches);
