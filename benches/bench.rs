// Criterion benchmarks for MatchMe Directory

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matchme_directory::core::{compatibility_score, score, DirectoryQuery, FilterCriteria, ScoreMode};
use matchme_directory::models::Profile;

const LOCATIONS: &[&str] = &["Dubai", "New York, NY", "Abu Dhabi", "Lagos", "London"];
const RELIGIONS: &[&str] = &["islam", "christianity", "hinduism", "none"];
const EDUCATION: &[&str] = &["bachelors", "masters", "phd", "high-school"];

fn create_candidate(id: usize) -> Profile {
    let mut profile = Profile::with_id(format!("user_{}", id));
    profile.age = Some(20 + (id % 40) as u32);
    profile.location = Some(LOCATIONS[id % LOCATIONS.len()].to_string());
    profile.religion = Some(RELIGIONS[id % RELIGIONS.len()].to_string());
    profile.education = Some(EDUCATION[id % EDUCATION.len()].to_string());
    profile
}

fn create_filters() -> FilterCriteria {
    FilterCriteria::default()
        .with_age_range(25, 35)
        .with_religion("islam")
        .with_location("york")
        .with_education("masters")
}

fn bench_score(c: &mut Criterion) {
    let profile = create_candidate(10);
    let filters = create_filters();

    c.bench_function("score_single", |b| {
        b.iter(|| score(black_box(&profile), black_box(&filters)));
    });
}

fn bench_score_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_page");
    let filters = create_filters();

    for size in [20, 200, 2000].iter() {
        let candidates: Vec<Profile> = (0..*size).map(create_candidate).collect();

        for mode in [ScoreMode::Fixed100, ScoreMode::RescaleToActiveFilters] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), size),
                &candidates,
                |b, candidates| {
                    b.iter(|| {
                        let scores: Vec<u8> = candidates
                            .iter()
                            .map(|p| compatibility_score(p, black_box(&filters), mode))
                            .collect();
                        black_box(scores)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let filters = create_filters();
    let rows: Vec<Profile> = (0..40).map(create_candidate).collect();

    c.bench_function("directory_query_build", |b| {
        b.iter(|| DirectoryQuery::build(black_box("user_3"), black_box(&filters), 20));
    });

    c.bench_function("directory_query_enforce", |b| {
        let query = DirectoryQuery::build("user_3", &filters, 20);
        b.iter(|| black_box(query.enforce(rows.clone())));
    });
}

criterion_group!(benches, bench_score, bench_score_page, bench_query);

criterion_main!(benches);
