use std::collections::VecDeque;

use crate::clock::Event;
use crate::config::{CenterConfig, GeneralConfig};
use crate::error::SimError;

use super::{CenterCore, EventContext, ServerSlot, ServiceCenter};

/// Multi-server FIFO center with one job per server.
#[derive(Debug, Clone)]
pub struct SimpleCenter {
    core: CenterCore,
    /// Feedback flag of every job waiting for a server, oldest first.
    waiting: VecDeque<bool>,
}

impl SimpleCenter {
    pub fn new(config: &CenterConfig, general: &GeneralConfig, batch_mode: bool) -> Result<Self, SimError> {
        let servers = vec![ServerSlot::with_capacity(1); config.servers];
        Ok(Self {
            core: CenterCore::new(config, general, servers, batch_mode)?,
            waiting: VecDeque::new(),
        })
    }
}

impl ServiceCenter for SimpleCenter {
    fn core(&self) -> &CenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CenterCore {
        &mut self.core
    }

    fn process_arrival(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        self.core.record_arrival(event.time);
        let idle = if self.core.jobs_in_node <= self.core.server_count() as u64 {
            self.core.servers.iter().position(|s| !s.running)
        } else {
            None
        };
        match idle {
            Some(server_id) => {
                self.core.servers[server_id].running = true;
                self.spawn_completion_event(server_id, event, ctx);
            }
            None => self.waiting.push_back(event.is_feedback),
        }
    }

    fn process_completion(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        let server_id = event.server_id;
        self.core.jobs_in_node = self.core.jobs_in_node.saturating_sub(1);
        if event.is_feedback {
            self.core.feedback_served += 1;
        }
        self.core
            .record_completion(server_id, event.service, 1, event.time, ctx.now());

        if self.core.jobs_in_node >= self.core.server_count() as u64 {
            let mut next_job = Event::arrival(self.core.kind, ctx.now());
            if self.waiting.pop_front().unwrap_or(false) {
                next_job = next_job.as_feedback();
            }
            self.spawn_completion_event(server_id, &next_job, ctx);
        } else {
            let slot = &mut self.core.servers[server_id];
            slot.running = false;
            slot.last_completion_time = event.time;
        }
    }

    fn spawn_completion_event(&mut self, server_id: usize, job: &Event, ctx: &mut EventContext<'_>) {
        let service = self.service_time(ctx.rng);
        let mut completion = Event::completion(self.core.kind, ctx.now() + service, service, server_id);
        if job.is_feedback {
            completion = completion.as_feedback();
        }
        ctx.queue.add(completion);
    }

    fn queue_population(&self) -> u64 {
        self.core.jobs_in_node.saturating_sub(self.core.busy_servers())
    }

    fn reset(&mut self) {
        self.core.reset();
        self.waiting.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{CenterKind, EventKind, SimulationClock};
    use crate::queue::EventQueue;
    use crate::rng::RngStreams;

    fn center(servers: usize, batch_size: usize) -> SimpleCenter {
        let config = CenterConfig::new(CenterKind::Small, servers, 1.0);
        let general = GeneralConfig {
            batch_size,
            num_batches: 4,
            ..GeneralConfig::default()
        };
        SimpleCenter::new(&config, &general, true).expect("valid center")
    }

    /// Advances `clock` to `time` integrating areas first, as the runner does.
    fn step(center: &mut SimpleCenter, clock: &mut SimulationClock, time: f64) {
        clock.set_next(time);
        center.set_area(clock);
        clock.advance();
    }

    #[test]
    fn arrivals_fill_servers_then_queue() {
        let mut c = center(2, 10);
        let mut clock = SimulationClock::default();
        let mut queue = EventQueue::new();
        let mut rng = RngStreams::new(1);

        for t in [1.0, 2.0, 3.0] {
            step(&mut c, &mut clock, t);
            let mut ctx = EventContext {
                clock: &clock,
                queue: &mut queue,
                rng: &mut rng,
            };
            c.process_arrival(&Event::arrival(CenterKind::Small, t), &mut ctx);
        }

        assert_eq!(c.core().jobs_in_node, 3);
        assert_eq!(c.busy_servers(), 2);
        assert_eq!(c.queue_population(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(c.core().first_arrival_time, Some(1.0));
        assert_eq!(c.core().last_arrival_time, 3.0);
    }

    #[test]
    fn completion_hands_server_to_waiting_job() {
        let mut c = center(1, 10);
        let mut clock = SimulationClock::default();
        let mut queue = EventQueue::new();
        let mut rng = RngStreams::new(2);

        for t in [1.0, 1.5] {
            step(&mut c, &mut clock, t);
            let mut ctx = EventContext {
                clock: &clock,
                queue: &mut queue,
                rng: &mut rng,
            };
            c.process_arrival(&Event::arrival(CenterKind::Small, t).as_feedback(), &mut ctx);
        }
        let first = queue.pop().expect("completion scheduled");
        assert_eq!(first.kind, EventKind::Completion(CenterKind::Small));
        assert!(first.is_feedback);

        step(&mut c, &mut clock, first.time);
        let mut ctx = EventContext {
            clock: &clock,
            queue: &mut queue,
            rng: &mut rng,
        };
        c.process_completion(&first, &mut ctx);

        assert_eq!(c.core().jobs_in_node, 1);
        assert_eq!(c.busy_servers(), 1);
        assert_eq!(c.core().feedback_served, 1);
        let second = queue.pop().expect("next job started");
        assert!(second.is_feedback);
        assert!(second.time >= first.time);
    }

    #[test]
    fn batch_sample_after_exactly_batch_size_completions() {
        let mut c = center(1, 3);
        let mut clock = SimulationClock::default();
        let mut queue = EventQueue::new();
        let mut rng = RngStreams::new(3);
        c.stop_warmup(0.0);

        let mut time = 0.0;
        for served in 1..=3u64 {
            time += 1.0;
            step(&mut c, &mut clock, time);
            let mut ctx = EventContext {
                clock: &clock,
                queue: &mut queue,
                rng: &mut rng,
            };
            c.process_arrival(&Event::arrival(CenterKind::Small, time), &mut ctx);
            let completion = queue.pop().expect("completion scheduled");

            step(&mut c, &mut clock, completion.time);
            let mut ctx = EventContext {
                clock: &clock,
                queue: &mut queue,
                rng: &mut rng,
            };
            c.process_completion(&completion, &mut ctx);
            time = completion.time;

            if served < 3 {
                assert!(c.core().batch_statistics.windows.is_empty());
                assert!(c.core().area.node > 0.0);
            }
        }

        assert_eq!(c.core().batch_statistics.windows.len(), 1);
        assert_eq!(c.core().jobs_served_this_batch, 0);
        assert_eq!(c.core().area, crate::area::Area::default());
        assert_eq!(c.core().batch_start_time, time);
        assert_eq!(c.core().total_served, 3);
    }

    #[test]
    fn warmup_suppresses_batch_samples() {
        let mut c = center(1, 1);
        let mut clock = SimulationClock::default();
        let mut queue = EventQueue::new();
        let mut rng = RngStreams::new(4);

        step(&mut c, &mut clock, 1.0);
        let mut ctx = EventContext {
            clock: &clock,
            queue: &mut queue,
            rng: &mut rng,
        };
        c.process_arrival(&Event::arrival(CenterKind::Small, 1.0), &mut ctx);
        let completion = queue.pop().expect("completion scheduled");
        step(&mut c, &mut clock, completion.time);
        let mut ctx = EventContext {
            clock: &clock,
            queue: &mut queue,
            rng: &mut rng,
        };
        c.process_completion(&completion, &mut ctx);

        assert!(c.core().batch_statistics.windows.is_empty());
        assert_eq!(c.core().counted_jobs, 0);
        assert_eq!(c.core().total_served, 1);
    }
}
