// Criterion benchmarks for Itinera Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use itinera_match::core::{normalize::normalize_destination, scoring::calculate_match_score, Matcher};
use itinera_match::models::{Budget, Extraction, Package, PackageStatus, ScoringWeights};

fn create_package(id: usize) -> Package {
    let destination = if id % 3 == 0 { "Paris" } else if id % 3 == 1 { "Tokyo" } else { "Rome" };
    Package {
        id: format!("pkg-{id:05}"),
        tenant_id: "tenant-a".to_string(),
        title: format!("{} Trip {}", destination, id),
        destination: destination.to_string(),
        price: 1000.0 + (id % 40) as f64 * 50.0,
        currency: "USD".to_string(),
        duration_days: 3 + (id % 10) as i32,
        capacity: 12,
        status: PackageStatus::Active,
        available_from: None,
        available_to: None,
        created_at: None,
    }
}

fn create_extraction() -> Extraction {
    Extraction {
        destination: Some("paris".to_string()),
        budget: Some(Budget {
            amount: 2000.0,
            currency: "USD".to_string(),
        }),
        duration_days: Some(5),
        ..Default::default()
    }
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_destination", |b| {
        b.iter(|| normalize_destination(black_box("  Paris,   France ")));
    });
}

fn bench_scoring(c: &mut Criterion) {
    let package = create_package(0);
    let extraction = create_extraction();
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| {
            calculate_match_score(
                black_box(&package),
                black_box(&extraction),
                black_box(&weights),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let extraction = create_extraction();

    let mut group = c.benchmark_group("ranking");

    for catalog_size in [10, 50, 100, 500, 1000].iter() {
        let packages: Vec<Package> = (0..*catalog_size).map(create_package).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", catalog_size),
            catalog_size,
            |b, _| {
                b.iter(|| {
                    matcher.rank(
                        black_box("tenant-a"),
                        black_box(&extraction),
                        black_box(packages.clone()),
                        black_box(50),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_scoring, bench_ranking);
criterion_main!(benches);
