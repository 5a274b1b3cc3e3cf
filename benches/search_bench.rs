//! Criterion benchmarks for the precedence-posting solvers.
//!
//! Instances are synthetic job shops on [`MockEngine`]: every job runs on
//! one of `machines` unit-capacity resources with a pseudo-random duration
//! and release date, and a sink closes the project.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_pcp::engine::MockEngine;
use u_pcp::exhaustive::{ExhaustiveConfig, ExhaustiveSolver};
use u_pcp::hybrid::{HybridConfig, HybridSolver};
use u_pcp::ifr::{IfrConfig, IfrSolver};
use u_pcp::model::Project;
use u_pcp::solver::ScheduleSolver;

fn job_shop(jobs: usize, machines: usize, seed: u64) -> (MockEngine, Project) {
    let _ = env_logger::try_init();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = MockEngine::new();
    let resources: Vec<_> = (0..machines)
        .map(|m| engine.add_resource(format!("m{m}"), 1.0))
        .collect();
    for j in 0..jobs {
        let duration = rng.random_range(1..20);
        let release = rng.random_range(0..30);
        let act = engine.add_activity(format!("j{j}"), duration, release, 10_000);
        engine.add_demand(resources[j % machines], act, 1.0);
    }
    engine.add_sink("end", 100_000);
    let project = Project::from_engine(&engine).expect("bench instance has activities");
    (engine, project)
}

fn bench_ifr(c: &mut Criterion) {
    let mut group = c.benchmark_group("ifr");
    group.sample_size(10);

    for &(jobs, machines) in &[(10, 2), (30, 3), (60, 4)] {
        let config = IfrConfig::default()
            .with_timeout(Duration::from_secs(10))
            .with_max_stable(50)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new("jobs", format!("{jobs}x{machines}")),
            &(jobs, machines),
            |b, &(jobs, machines)| {
                b.iter(|| {
                    let (mut engine, project) = job_shop(jobs, machines, 7);
                    let outcome = IfrSolver::new(config.clone())
                        .solve(&mut engine, &project)
                        .expect("valid config");
                    black_box(outcome.best_makespan)
                });
            },
        );
    }
    group.finish();
}

fn bench_exhaustive(c: &mut Criterion) {
    let mut group = c.benchmark_group("exhaustive");
    group.sample_size(10);

    for &jobs in &[4, 6] {
        let config = ExhaustiveConfig::default().with_timeout(Duration::from_secs(10));
        group.bench_with_input(BenchmarkId::new("jobs", jobs), &jobs, |b, &jobs| {
            b.iter(|| {
                let (mut engine, project) = job_shop(jobs, 1, 11);
                let outcome = ExhaustiveSolver::new(config.clone())
                    .solve(&mut engine, &project)
                    .expect("no contract violation");
                black_box(outcome.best_makespan)
            });
        });
    }
    group.finish();
}

fn bench_hybrid(c: &mut Criterion) {
    let mut group = c.benchmark_group("hybrid");
    group.sample_size(10);

    let config = HybridConfig::default()
        .with_timeout(Duration::from_millis(500))
        .with_ifr(IfrConfig::default().with_max_stable(30).with_seed(5));
    group.bench_function("jobs/8x2", |b| {
        b.iter(|| {
            let (mut engine, project) = job_shop(8, 2, 3);
            let outcome = HybridSolver::new(config.clone())
                .solve(&mut engine, &project)
                .expect("valid config");
            black_box(outcome.best_makespan)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_ifr, bench_exhaustive, bench_hybrid);
criterion_main!(benches);
