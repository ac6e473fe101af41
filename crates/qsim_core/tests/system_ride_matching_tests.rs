mod support;

use bevy_ecs::prelude::World;
use qsim_core::centers::{Center, CenterNetwork, RideCenter, ServiceCenter};
use qsim_core::clock::CenterKind;
use qsim_core::config::RideCenterConfig;
use qsim_core::runner::{run_until_done_with_hook, simulation_schedule};
use support::world::TestWorldBuilder;

fn ride(world: &World) -> &RideCenter {
    match world.resource::<CenterNetwork>().center(CenterKind::Ride) {
        Some(Center::Ride(ride)) => ride,
        _ => panic!("ride center missing"),
    }
}

#[test]
fn vehicles_never_exceed_their_seats() {
    let mut world = TestWorldBuilder::new()
        .with_seed(2024)
        .with_ride(RideCenterConfig::default())
        .finite_horizon(400.0)
        .build();

    let mut schedule = simulation_schedule();
    let mut max_riders = 0;
    run_until_done_with_hook(&mut world, &mut schedule, usize::MAX, |world, _| {
        for vehicle in &ride(world).core().servers {
            assert!(vehicle.capacity_remaining <= vehicle.capacity_total);
            if vehicle.running {
                assert!(vehicle.requests_served >= 1);
                assert!(vehicle.running_average_service > 0.0);
            } else {
                assert_eq!(vehicle.capacity_remaining, vehicle.capacity_total);
            }
            max_riders = max_riders.max(vehicle.requests_served);
        }
    })
    .expect("run succeeds");

    assert!(max_riders >= 1);
}

#[test]
fn matching_rounds_advance_by_fixed_interval() {
    let config = RideCenterConfig::default().with_match_interval(5.0);
    let mut world = TestWorldBuilder::new()
        .with_seed(31)
        .with_ride(config)
        .finite_horizon(200.0)
        .build();

    let mut schedule = simulation_schedule();
    let mut first_match: Option<f64> = None;
    run_until_done_with_hook(&mut world, &mut schedule, usize::MAX, |world, _| {
        let ride = ride(world);
        if let (Some(first), Some(last)) = (first_match, ride.last_match_time()) {
            let rounds = (last - first) / 5.0;
            assert!((rounds - rounds.round()).abs() < 1e-9);
        } else {
            first_match = ride.last_match_time();
        }
    })
    .expect("run succeeds");
}

#[test]
fn unmatched_requests_come_back_as_feedback() {
    let config = RideCenterConfig::default().with_match_probabilities(0.0, 0.0);
    let mut world = TestWorldBuilder::new()
        .with_seed(77)
        .with_ride(config)
        .finite_horizon(300.0)
        .build();

    let mut schedule = simulation_schedule();
    run_until_done_with_hook(&mut world, &mut schedule, usize::MAX, |_, _| {}).expect("run succeeds");

    let network = world.resource::<CenterNetwork>();
    assert_eq!(ride(&world).core().total_served, 0);
    let feedback: u64 = [CenterKind::Small, CenterKind::Medium]
        .into_iter()
        .filter_map(|kind| network.center(kind))
        .map(|c| c.core().feedback_served)
        .sum();
    assert!(feedback > 0);
}
