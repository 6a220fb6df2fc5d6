use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use taguchi_doe::{ArrayType, Factor, TaguchiDesign};
use taguchi_doe::{AnalysisConfig, ExperimentResult};

fn design(array: ArrayType, factors: usize) -> TaguchiDesign<u32> {
    let factors = (0..factors)
        .map(|i| {
            let levels = if array == ArrayType::L18 && i == 0 {
                vec![1, 2]
            } else {
                (1..=array.max_levels() as u32).collect()
            };
            Factor::new(format!("F{i}"), levels).unwrap()
        })
        .collect();
    TaguchiDesign::new(array, factors, AnalysisConfig::default()).unwrap()
}

fn results(design: &TaguchiDesign<u32>, replicates: usize) -> Vec<ExperimentResult<u32>> {
    let plan = design.generate().unwrap();
    let responses: Vec<Vec<f64>> = (0..plan.len())
        .map(|run| {
            (0..replicates)
                .map(|r| ((run * 31 + r * 17) % 23) as f64 + 1.0)
                .collect()
        })
        .collect();
    plan.with_responses(&responses).unwrap()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generate");

    for (array, factors) in [(ArrayType::L9, 4), (ArrayType::L16, 15), (ArrayType::L18, 8)] {
        let design = design(array, factors);
        group.bench_function(BenchmarkId::from_parameter(array), |b| {
            b.iter(|| design.generate().unwrap());
        });
    }
    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyze");

    // Leave error degrees of freedom with one replicate
    for (array, factors) in [(ArrayType::L9, 3), (ArrayType::L16, 10), (ArrayType::L18, 6)] {
        let design = design(array, factors);
        for replicates in [1, 4] {
            let results = results(&design, replicates);
            group.bench_with_input(
                BenchmarkId::new(array.name(), replicates),
                &results,
                |b, results| b.iter(|| design.analyze(results).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_analyze);
criterion_main!(benches);
