use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::centers::{CenterNetwork, EventContext};
use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::queue::EventQueue;
use crate::rng::RngStreams;

pub fn completion_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    mut queue: ResMut<EventQueue>,
    mut rng: ResMut<RngStreams>,
    mut network: ResMut<CenterNetwork>,
) {
    let EventKind::Completion(kind) = event.0.kind else {
        return;
    };
    let Some(center) = network.center_mut(kind) else {
        warn!(center = ?kind, "completion for a center that is not configured");
        return;
    };

    let mut ctx = EventContext {
        clock: &clock,
        queue: &mut queue,
        rng: &mut rng,
    };
    center.service_mut().process_completion(&event.0, &mut ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::{CenterKind, Event};
    use crate::config::{CenterConfig, SimulationConfig};
    use crate::scenario::{build_simulation, RunMode};

    #[test]
    fn completion_frees_the_server() {
        let config = SimulationConfig::default()
            .with_centers(vec![CenterConfig::new(CenterKind::Large, 1, 1.0)]);
        let mut world = World::new();
        build_simulation(&mut world, &config, RunMode::BatchMeans, 3).expect("valid config");

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                crate::systems::arrival::arrival_system,
                completion_system,
            ),
        );

        world.insert_resource(CurrentEvent(Event::arrival(CenterKind::Large, 0.0).as_feedback()));
        schedule.run(&mut world);
        let completion = world
            .resource_mut::<EventQueue>()
            .pop()
            .expect("completion scheduled");

        world.resource_mut::<SimulationClock>().set_next(completion.time);
        world.resource_mut::<SimulationClock>().advance();
        world.insert_resource(CurrentEvent(completion));
        schedule.run(&mut world);

        let network = world.resource::<CenterNetwork>();
        let large = network.center(CenterKind::Large).expect("large center");
        assert_eq!(large.core().jobs_in_node, 0);
        assert_eq!(large.core().total_served, 1);
        assert_eq!(large.service().busy_servers(), 0);
        assert_eq!(large.core().servers[0].last_completion_time, completion.time);
    }
}
