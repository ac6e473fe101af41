//! Arrival system: hands the arrival to its center and schedules the next
//! external arrival of the same stream.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::centers::{CenterNetwork, EventContext};
use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::queue::EventQueue;
use crate::rng::RngStreams;

pub fn arrival_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    mut queue: ResMut<EventQueue>,
    mut rng: ResMut<RngStreams>,
    mut network: ResMut<CenterNetwork>,
) {
    let EventKind::Arrival(kind) = event.0.kind else {
        return;
    };
    let Some(center) = network.center_mut(kind) else {
        warn!(center = ?kind, "arrival for a center that is not configured");
        return;
    };

    let mut ctx = EventContext {
        clock: &clock,
        queue: &mut queue,
        rng: &mut rng,
    };
    center.service_mut().process_arrival(&event.0, &mut ctx);

    // Feedback arrivals are re-routed jobs, not part of an external stream.
    if !event.0.is_feedback {
        network.schedule_next_arrival(kind, &mut queue, &mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::{CenterKind, Event};
    use crate::config::SimulationConfig;
    use crate::scenario::{build_simulation, RunMode};

    fn world() -> World {
        let mut world = World::new();
        let config = SimulationConfig::default();
        build_simulation(&mut world, &config, RunMode::BatchMeans, 11).expect("valid config");
        world
    }

    #[test]
    fn external_arrival_schedules_completion_and_next_arrival() {
        let mut world = world();
        world.insert_resource(CurrentEvent(Event::arrival(CenterKind::Small, 0.0)));

        let mut schedule = Schedule::default();
        schedule.add_systems(arrival_system);
        schedule.run(&mut world);

        let network = world.resource::<CenterNetwork>();
        let small = network.center(CenterKind::Small).expect("small center");
        assert_eq!(small.core().jobs_in_node, 1);

        let mut queue = world.resource_mut::<EventQueue>();
        let mut kinds = Vec::new();
        while let Ok(event) = queue.pop() {
            kinds.push(event.kind);
        }
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&EventKind::Arrival(CenterKind::Small)));
        assert!(kinds.contains(&EventKind::Completion(CenterKind::Small)));
    }

    #[test]
    fn feedback_arrival_does_not_extend_the_stream() {
        let mut world = world();
        world.insert_resource(CurrentEvent(
            Event::arrival(CenterKind::Medium, 0.0).with_seats(4).as_feedback(),
        ));

        let mut schedule = Schedule::default();
        schedule.add_systems(arrival_system);
        schedule.run(&mut world);

        let queue = world.resource::<EventQueue>();
        assert_eq!(queue.len(), 1, "only the completion is scheduled");
    }
}
