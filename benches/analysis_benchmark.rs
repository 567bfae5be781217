/// Benchmark module for dataset construction.
/// Measures loading, normalizing and partitioning a generated input file.
use criterion::{criterion_group, criterion_main, Criterion};
use daydash::analysis::{
    build_dataset, load_records, write_sample, Dataset, DayOrder, DayPartition, Normalizer,
    SampleSpec,
};
use daydash::config::DataConfig;
use tempfile::TempDir;

/// Set up a large sample file for benchmarking
///
/// # Returns
/// * `(TempDir, DataConfig)` - Temporary directory and a config pointing at the file
fn setup_large_sample() -> (TempDir, DataConfig) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bench.db");
    let spec = SampleSpec {
        days: 30,
        per_day: 500,
        seed: Some(7),
        ..SampleSpec::default()
    };
    write_sample(&path, &spec, &DataConfig::default()).unwrap();

    let config = DataConfig {
        input: path,
        ..DataConfig::default()
    };
    (temp_dir, config)
}

fn bench_build_dataset(c: &mut Criterion) {
    let (_temp_dir, config) = setup_large_sample();

    c.bench_function("build_dataset", |b| {
        b.iter(|| build_dataset(&config).unwrap())
    });
}

fn bench_stages(c: &mut Criterion) {
    let (_temp_dir, config) = setup_large_sample();
    let raw = load_records(&config.input).unwrap();
    let normalizer = Normalizer::from_config(&config);
    let table = normalizer.normalize(raw.clone()).unwrap();

    let mut group = c.benchmark_group("stages");
    group.bench_function("load_records", |b| {
        b.iter(|| load_records(&config.input).unwrap())
    });
    group.bench_function("normalize", |b| {
        b.iter(|| normalizer.normalize(raw.clone()).unwrap())
    });
    group.bench_function("partition", |b| {
        b.iter(|| DayPartition::build(&table, DayOrder::FirstSeen))
    });
    group.bench_function("select_every_day", |b| {
        let dataset = Dataset::from_table("bench", table.clone(), DayOrder::FirstSeen);
        let keys: Vec<String> = dataset.day_keys().map(str::to_string).collect();
        b.iter(|| keys.iter().filter_map(|k| dataset.select(k)).map(|d| d.len()).sum::<usize>())
    });
    group.finish();
}

criterion_group!(benches, bench_build_dataset, bench_stages);
criterion_main!(benches);
