use std::collections::VecDeque;

use tracing::trace;

use crate::clock::{CenterKind, Event};
use crate::config::{GeneralConfig, RideCenterConfig};
use crate::error::SimError;
use crate::rng::RngStreams;

use super::{CenterCore, EventContext, ServerSlot, ServiceCenter};

const SMALL_VEHICLE_SEATS: u32 = 3;
const MEDIUM_VEHICLE_SEATS: u32 = 4;
const LARGE_VEHICLE_SEATS: u32 = 8;

/// Ride-sharing center: requests wait in a FIFO and are matched onto vehicles
/// at fixed intervals. A vehicle may carry several requests; it completes all
/// of them together.
#[derive(Debug, Clone)]
pub struct RideCenter {
    core: CenterCore,
    pending: VecDeque<Event>,
    match_interval: f64,
    last_match_time: Option<f64>,
    p_match_busy: f64,
    p_match_idle: f64,
    match_busy_stream: usize,
    match_idle_stream: usize,
}

impl RideCenter {
    pub fn new(config: &RideCenterConfig, general: &GeneralConfig, batch_mode: bool) -> Result<Self, SimError> {
        let servers = std::iter::repeat(ServerSlot::with_capacity(SMALL_VEHICLE_SEATS))
            .take(config.small_vehicles)
            .chain(std::iter::repeat(ServerSlot::with_capacity(MEDIUM_VEHICLE_SEATS)).take(config.medium_vehicles))
            .chain(std::iter::repeat(ServerSlot::with_capacity(LARGE_VEHICLE_SEATS)).take(config.large_vehicles))
            .collect();
        Ok(Self {
            core: CenterCore::new(&config.center, general, servers, batch_mode)?,
            pending: VecDeque::new(),
            match_interval: config.match_interval,
            last_match_time: None,
            p_match_busy: config.p_match_busy,
            p_match_idle: config.p_match_idle,
            match_busy_stream: config.match_busy_stream,
            match_idle_stream: config.match_idle_stream,
        })
    }

    pub fn pending(&self) -> &VecDeque<Event> {
        &self.pending
    }

    pub fn last_match_time(&self) -> Option<f64> {
        self.last_match_time
    }

    /// Runs matching rounds until one matches nothing, then sends the oldest
    /// unmatched request (if any) back out as feedback. Returns the number of
    /// requests placed on vehicles.
    pub fn match_pending(&mut self, ctx: &mut EventContext<'_>) -> usize {
        let mut total = 0;
        loop {
            let matched = self.match_round(ctx);
            if matched == 0 {
                break;
            }
            total += matched;
        }
        if let Some(request) = self.pending.pop_front() {
            self.core.jobs_in_node = self.core.jobs_in_node.saturating_sub(1);
            self.send_feedback(&request, ctx);
        }
        total
    }

    /// One matching round for the oldest pending request.
    fn match_round(&mut self, ctx: &mut EventContext<'_>) -> usize {
        let Some(first) = self.pending.front().copied() else {
            return 0;
        };
        let seats = first.seats_requested;

        // Merge onto a vehicle already on the road.
        let busy = best_fit(
            &self.core.servers,
            seats,
            true,
            self.p_match_busy,
            self.match_busy_stream,
            ctx.rng,
        );
        if let Some(vehicle) = busy {
            self.spawn_completion_event(vehicle, &first, ctx);
            self.pending.pop_front();
            return 1;
        }

        let Some(vehicle) = best_fit(
            &self.core.servers,
            seats,
            false,
            self.p_match_idle,
            self.match_idle_stream,
            ctx.rng,
        ) else {
            return 0;
        };

        // Dispatch an idle vehicle and fill it from the rest of the queue.
        self.spawn_completion_event(vehicle, &first, ctx);
        self.pending.pop_front();
        let mut matched = 1;
        let mut i = 0;
        while i < self.pending.len() {
            if self.core.servers[vehicle].capacity_remaining == 0 {
                break;
            }
            let request = self.pending[i];
            if request.seats_requested <= self.core.servers[vehicle].capacity_remaining {
                self.spawn_completion_event(vehicle, &request, ctx);
                self.pending.remove(i);
                matched += 1;
            } else {
                i += 1;
            }
        }
        matched
    }

    fn send_feedback(&self, request: &Event, ctx: &mut EventContext<'_>) {
        let target = CenterKind::for_seats(request.seats_requested);
        trace!(
            seats = request.seats_requested,
            target = ?target,
            time = ctx.now(),
            "unmatched ride request sent back as feedback"
        );
        ctx.queue.add(
            Event::arrival(target, ctx.now())
                .with_seats(request.seats_requested)
                .as_feedback(),
        );
    }
}

/// Vehicle with the most remaining seats among those in the requested state
/// that fit `seats` and pass a Bernoulli(`p`) draw. Ties go to the lowest index.
fn best_fit(
    servers: &[ServerSlot],
    seats: u32,
    running: bool,
    p: f64,
    stream: usize,
    rng: &mut RngStreams,
) -> Option<usize> {
    rng.select_stream(stream);
    let mut best: Option<(usize, u32)> = None;
    for (i, slot) in servers.iter().enumerate() {
        if slot.running == running
            && slot.capacity_remaining >= seats
            && rng.random() < p
            && best.map_or(true, |(_, cap)| slot.capacity_remaining > cap)
        {
            best = Some((i, slot.capacity_remaining));
        }
    }
    best.map(|(i, _)| i)
}

impl ServiceCenter for RideCenter {
    fn core(&self) -> &CenterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CenterCore {
        &mut self.core
    }

    fn process_arrival(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        self.core.record_arrival(event.time);
        self.pending.push_back(*event);

        let last_match = *self.last_match_time.get_or_insert(event.time);
        if event.time >= last_match + self.match_interval {
            self.match_pending(ctx);
            self.last_match_time = Some(last_match + self.match_interval);
        }
    }

    fn process_completion(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        let vehicle = event.server_id;
        let riders = self.core.servers[vehicle].requests_served;
        self.core.jobs_in_node = self.core.jobs_in_node.saturating_sub(riders);
        self.core.record_completion(
            vehicle,
            event.service * riders as f64,
            riders,
            event.time,
            ctx.now(),
        );
        self.core.servers[vehicle].release(event.time);
    }

    /// Adds `job` to `server_id`. An idle vehicle starts with the drawn service
    /// time; a running one folds it into its running average and has its
    /// pending completion rescheduled.
    fn spawn_completion_event(&mut self, server_id: usize, job: &Event, ctx: &mut EventContext<'_>) {
        let service = self.service_time(ctx.rng);
        let slot = &mut self.core.servers[server_id];
        let average = if slot.running {
            ctx.queue.remove_completions_for(server_id);
            let n = slot.requests_served as f64;
            (slot.running_average_service * n + service) / (n + 1.0)
        } else {
            slot.running = true;
            service
        };
        slot.running_average_service = average;
        slot.capacity_remaining = slot.capacity_remaining.saturating_sub(job.seats_requested);
        slot.requests_served += 1;

        ctx.queue.add(Event::completion(
            CenterKind::Ride,
            ctx.now() + average,
            average,
            server_id,
        ));
    }

    fn queue_population(&self) -> u64 {
        self.pending.len() as u64
    }

    fn reset(&mut self) {
        self.core.reset();
        self.pending.clear();
        self.last_match_time = None;
    }
}
