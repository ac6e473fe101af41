mod support;

use qsim_core::centers::CenterNetwork;
use qsim_core::clock::CenterKind;
use qsim_core::config::CenterConfig;
use qsim_core::scenario::WarmupControl;
use qsim_core::statistics::MetricIndex;
use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

#[test]
fn mm1_batch_means_match_theory() {
    // λ = 1, E[s] = 0.5: ρ = 0.5, E[Ts] = 1.
    let mut world = TestWorldBuilder::new()
        .with_seed(123_456_789)
        .single_server(0.5)
        .batch_means(2_000, 50)
        .configure(|c| c.with_inter_arrival_time(1.0))
        .build();
    ScheduleRunner::new().run_full(&mut world);

    let network = world.resource::<CenterNetwork>();
    let small = network.center(CenterKind::Small).expect("small center");
    let windows = &small.core().batch_statistics.windows;
    assert_eq!(windows.len(), 50);

    let means = windows.mean_statistics().expect("batches collected");
    assert!((means.utilization() - 0.5).abs() < 0.02, "ρ = {}", means.utilization());
    assert!((means.lambda() - 1.0).abs() < 0.03, "λ = {}", means.lambda());
    assert!((means.service_time() - 0.5).abs() < 0.02, "E[s] = {}", means.service_time());
    assert!((means.response_time() - 1.0).abs() < 0.15, "E[Ts] = {}", means.response_time());

    let utilization = windows
        .confidence_intervals(0.99)
        .get(MetricIndex::Utilization)
        .copied()
        .expect("utilization interval");
    assert!(
        utilization.contains(0.5),
        "ρ = 0.5 outside {} ± {}",
        utilization.mean,
        utilization.half_width
    );

    let intervals = windows.confidence_intervals(0.95);
    for metric in MetricIndex::ALL {
        let half_width = intervals.half_width(metric).expect("interval defined");
        assert!(half_width.is_finite() && half_width >= 0.0);
    }
}

#[test]
fn mm2_utilization_is_shared_between_servers() {
    // λ = 1, E[s] = 1.5, two servers: ρ = 0.75.
    let mut world = TestWorldBuilder::new()
        .with_seed(987_654_321)
        .configure(|c| {
            c.with_centers(vec![CenterConfig::new(CenterKind::Medium, 2, 1.5)])
                .with_exponential_service(true)
                .with_inter_arrival_time(1.0)
        })
        .batch_means(1_000, 40)
        .build();
    ScheduleRunner::new().run_full(&mut world);

    let network = world.resource::<CenterNetwork>();
    let medium = network.center(CenterKind::Medium).expect("medium center");
    let means = medium
        .core()
        .batch_statistics
        .windows
        .mean_statistics()
        .expect("batches collected");
    assert!((means.utilization() - 0.75).abs() < 0.04, "ρ = {}", means.utilization());
    assert!(means.queue_time() > 0.0);
    assert!(means.response_time() > means.service_time());
}

#[test]
fn warmup_completes_before_batches_start() {
    let mut world = TestWorldBuilder::new()
        .single_server(0.5)
        .batch_means(100, 10)
        .configure(|c| c.with_warmup_percentage(0.5))
        .build();
    ScheduleRunner::new().run_full(&mut world);

    let warmup = world.resource::<WarmupControl>();
    assert_eq!(warmup.threshold, 500);
    assert!(warmup.completed_at.is_some_and(|t| t > 0.0));

    let network = world.resource::<CenterNetwork>();
    let small = network.center(CenterKind::Small).expect("small center");
    // Completions after warmup fill exactly the requested batches.
    assert!(small.core().total_served >= 500 + 100 * 10);
    assert!(small.core().is_done());
}

#[test]
fn stopped_centers_keep_serving_until_every_center_is_done() {
    let mut world = TestWorldBuilder::new()
        .with_seed(7)
        .configure(|c| c.with_exponential_service(true))
        .batch_means(200, 5)
        .build();
    ScheduleRunner::new().run_full(&mut world);

    let network = world.resource::<CenterNetwork>();
    assert!(network.all_done());
    for center in network.centers() {
        assert_eq!(center.core().batch_statistics.windows.len(), 5, "{}", center.name());
    }
}
