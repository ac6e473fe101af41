//! Service-center state machines.
//!
//! Every center owns a [CenterCore] with the counters and accumulators that
//! feed the statistics engine. [SimpleCenter] is a FIFO multi-server queue;
//! [RideCenter] batches ride requests into shared vehicles and sends the ones
//! it cannot place back to the simple centers as feedback arrivals.

mod ride;
mod simple;

pub use ride::RideCenter;
pub use simple::SimpleCenter;

use bevy_ecs::prelude::Resource;
use tracing::debug;

use crate::area::{Area, ServerSum};
use crate::clock::{CenterKind, Event, SimulationClock};
use crate::config::{CenterConfig, GeneralConfig, SimulationConfig};
use crate::distributions::{sample_seats, InterArrival, ServiceDistribution};
use crate::error::SimError;
use crate::queue::EventQueue;
use crate::rng::RngStreams;
use crate::statistics::{BatchStatistics, RunStatistics, WindowSample};

/// Mutable run state handed to a center while it processes one event.
pub struct EventContext<'a> {
    pub clock: &'a SimulationClock,
    pub queue: &'a mut EventQueue,
    pub rng: &'a mut RngStreams,
}

impl EventContext<'_> {
    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

/// One server. Simple centers use capacity 1; ride vehicles have 3, 4 or 8 seats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerSlot {
    pub running: bool,
    pub last_completion_time: f64,
    pub capacity_total: u32,
    pub capacity_remaining: u32,
    pub requests_served: u64,
    pub running_average_service: f64,
}

impl ServerSlot {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            running: false,
            last_completion_time: 0.0,
            capacity_total: capacity,
            capacity_remaining: capacity,
            requests_served: 0,
            running_average_service: 0.0,
        }
    }

    /// Frees the server and restores its full capacity.
    pub fn release(&mut self, time: f64) {
        self.running = false;
        self.last_completion_time = time;
        self.capacity_remaining = self.capacity_total;
        self.requests_served = 0;
        self.running_average_service = 0.0;
    }
}

/// State shared by every center kind.
#[derive(Debug, Clone)]
pub struct CenterCore {
    pub name: String,
    pub kind: CenterKind,
    pub jobs_in_node: u64,
    pub total_served: u64,
    pub servers: Vec<ServerSlot>,
    pub area: Area,
    pub sums: Vec<ServerSum>,
    pub first_arrival_time: Option<f64>,
    pub last_arrival_time: f64,
    pub last_completion_time: f64,
    pub warmup: bool,
    pub batch_size: u64,
    pub jobs_served_this_batch: u64,
    pub batch_start_time: f64,
    pub run_statistics: RunStatistics,
    pub batch_statistics: BatchStatistics,
    /// Jobs counted towards the per-run total: every completion in finite
    /// mode, only post-warmup completions before batch collection ends in
    /// batch mode.
    pub counted_jobs: u64,
    pub feedback_served: u64,
    service: ServiceDistribution,
    service_stream: usize,
    batch_mode: bool,
}

impl CenterCore {
    pub fn new(
        config: &CenterConfig,
        general: &GeneralConfig,
        servers: Vec<ServerSlot>,
        batch_mode: bool,
    ) -> Result<Self, SimError> {
        if servers.is_empty() {
            return Err(SimError::invalid_center(&config.name, "needs at least one server"));
        }
        let service = config.service_distribution(general.exponential_service)?;
        let sums = vec![ServerSum::default(); servers.len()];
        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            jobs_in_node: 0,
            total_served: 0,
            servers,
            area: Area::default(),
            sums,
            first_arrival_time: None,
            last_arrival_time: 0.0,
            last_completion_time: 0.0,
            warmup: true,
            batch_size: general.batch_size as u64,
            jobs_served_this_batch: 0,
            batch_start_time: 0.0,
            run_statistics: RunStatistics::default(),
            batch_statistics: BatchStatistics::new(general.num_batches),
            counted_jobs: 0,
            feedback_served: 0,
            service,
            service_stream: config.stream_index,
            batch_mode,
        })
    }

    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    pub fn busy_servers(&self) -> u64 {
        self.servers.iter().filter(|s| s.running).count() as u64
    }

    pub fn service_distribution(&self) -> &ServiceDistribution {
        &self.service
    }

    pub fn draw_service(&self, rng: &mut RngStreams) -> f64 {
        self.service.sample(rng, self.service_stream)
    }

    pub(crate) fn record_arrival(&mut self, time: f64) {
        self.jobs_in_node += 1;
        self.first_arrival_time.get_or_insert(time);
        self.last_arrival_time = time;
    }

    /// Books `served` jobs with total `service` time on `server_id` and takes
    /// a batch sample once the batch is full.
    pub(crate) fn record_completion(&mut self, server_id: usize, service: f64, served: u64, time: f64, now: f64) {
        if !self.is_done() {
            self.total_served += served;
            self.jobs_served_this_batch += served;
        }
        self.sums[server_id].record(service, served);
        self.last_completion_time = time;
        if !self.warmup && self.jobs_served_this_batch >= self.batch_size {
            self.save_batch_sample(now);
        }
        if !self.batch_mode || (!self.warmup && !self.is_done()) {
            self.counted_jobs += served;
        }
    }

    fn save_batch_sample(&mut self, now: f64) {
        match WindowSample::compute(
            &self.area,
            &self.sums,
            self.last_arrival_time,
            self.last_completion_time,
            self.batch_start_time,
        ) {
            Some(sample) => {
                self.batch_statistics.record(&sample);
                debug!(
                    center = %self.name,
                    batch = self.batch_statistics.windows.len(),
                    response_time = sample.get(crate::statistics::MetricIndex::ResponseTime),
                    "batch sample"
                );
            }
            None => debug!(center = %self.name, "empty batch window skipped"),
        }
        self.reset_batch(now);
    }

    pub fn reset_batch(&mut self, now: f64) {
        self.area.reset();
        self.sums.iter_mut().for_each(ServerSum::reset);
        self.jobs_served_this_batch = 0;
        self.batch_start_time = now;
    }

    pub fn stop_warmup(&mut self, now: f64) {
        self.warmup = false;
        self.reset_batch(now);
    }

    /// Clears per-run state before a new replication. Collected statistics survive.
    pub fn reset(&mut self) {
        self.jobs_in_node = 0;
        self.total_served = 0;
        self.area.reset();
        self.first_arrival_time = None;
        self.last_arrival_time = 0.0;
        self.last_completion_time = 0.0;
        self.sums.iter_mut().for_each(ServerSum::reset);
        for slot in &mut self.servers {
            *slot = ServerSlot::with_capacity(slot.capacity_total);
        }
        self.jobs_served_this_batch = 0;
        self.batch_start_time = 0.0;
        self.counted_jobs = 0;
        self.feedback_served = 0;
    }

    /// Total service time in the current window.
    pub fn busy_time(&self) -> f64 {
        self.sums.iter().map(|s| s.service).sum()
    }

    /// Appends this run's window (measured from time zero) to the run statistics.
    pub fn save_run_statistics(&mut self) {
        let sample = WindowSample::compute(
            &self.area,
            &self.sums,
            self.last_arrival_time,
            self.last_completion_time,
            0.0,
        );
        if sample.is_none() {
            debug!(center = %self.name, "run ended without completions");
        }
        let busy_time = self.busy_time();
        self.run_statistics
            .record(sample.as_ref(), self.counted_jobs as f64, busy_time);
    }

    /// Mean response time so far in the current window, for Welch plots.
    pub fn response_time_observation(&self) -> Option<f64> {
        let served: u64 = self.sums.iter().map(|s| s.served).sum();
        if self.first_arrival_time.is_none() || served == 0 {
            return None;
        }
        Some(self.area.node / served as f64)
    }

    pub fn is_done(&self) -> bool {
        self.batch_statistics.is_done()
    }
}

/// Behaviour every center exposes to the runner.
pub trait ServiceCenter {
    fn core(&self) -> &CenterCore;
    fn core_mut(&mut self) -> &mut CenterCore;

    fn process_arrival(&mut self, event: &Event, ctx: &mut EventContext<'_>);
    fn process_completion(&mut self, event: &Event, ctx: &mut EventContext<'_>);

    /// Starts (or extends) service on `server_id` for `job` and schedules its completion.
    fn spawn_completion_event(&mut self, server_id: usize, job: &Event, ctx: &mut EventContext<'_>);

    /// Jobs waiting for a server.
    fn queue_population(&self) -> u64;

    fn service_time(&self, rng: &mut RngStreams) -> f64 {
        self.core().draw_service(rng)
    }

    fn busy_servers(&self) -> u64 {
        self.core().busy_servers()
    }

    /// Integrates populations over `[clock.now(), clock.next()]`. The service
    /// area grows by `width × busy servers`, not by `width` alone.
    fn set_area(&mut self, clock: &SimulationClock) {
        let width = clock.width();
        let queue_population = self.queue_population();
        let busy = self.busy_servers();
        let core = self.core_mut();
        let jobs = core.jobs_in_node;
        core.area.accumulate(width, jobs, queue_population, busy);
    }

    fn stop_warmup(&mut self, now: f64) {
        self.core_mut().stop_warmup(now);
    }

    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn save_run_statistics(&mut self) {
        self.core_mut().save_run_statistics();
    }

    fn is_done(&self) -> bool {
        self.core().is_done()
    }
}

#[derive(Debug, Clone)]
pub enum Center {
    Simple(SimpleCenter),
    Ride(RideCenter),
}

impl Center {
    pub fn service(&self) -> &dyn ServiceCenter {
        match self {
            Center::Simple(center) => center,
            Center::Ride(center) => center,
        }
    }

    pub fn service_mut(&mut self) -> &mut dyn ServiceCenter {
        match self {
            Center::Simple(center) => center,
            Center::Ride(center) => center,
        }
    }

    pub fn core(&self) -> &CenterCore {
        self.service().core()
    }

    pub fn kind(&self) -> CenterKind {
        self.core().kind
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }
}

/// Poisson arrival stream feeding one center.
#[derive(Debug, Clone)]
pub struct ArrivalProcess {
    pub center: CenterKind,
    inter_arrival: InterArrival,
    /// Seat-count stream; only ride requests carry a seat count.
    seat_stream: Option<usize>,
    last_time: f64,
    stop: f64,
    exhausted: bool,
}

impl ArrivalProcess {
    pub fn new(center: CenterKind, inter_arrival: InterArrival, seat_stream: Option<usize>) -> Self {
        Self {
            center,
            inter_arrival,
            seat_stream,
            last_time: 0.0,
            stop: f64::INFINITY,
            exhausted: false,
        }
    }

    /// Restarts the stream at `start`; arrivals after `stop` are never generated.
    pub fn reset(&mut self, start: f64, stop: f64) {
        self.last_time = start;
        self.stop = stop;
        self.exhausted = false;
    }

    /// Draws the next arrival, or `None` once it would fall past the stop time.
    pub fn next_arrival(&mut self, rng: &mut RngStreams) -> Option<Event> {
        if self.exhausted {
            return None;
        }
        self.last_time += self.inter_arrival.sample(rng);
        if self.last_time > self.stop {
            self.exhausted = true;
            return None;
        }
        let mut event = Event::arrival(self.center, self.last_time);
        if let Some(stream) = self.seat_stream {
            event = event.with_seats(sample_seats(rng, stream));
        }
        Some(event)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// All centers of the simulated network plus their external arrival streams.
#[derive(Debug, Clone, Resource)]
pub struct CenterNetwork {
    centers: Vec<Center>,
    arrivals: Vec<ArrivalProcess>,
}

impl CenterNetwork {
    pub fn from_config(config: &SimulationConfig, batch_mode: bool) -> Result<Self, SimError> {
        config.validate()?;
        let general = &config.general;
        let mut centers = Vec::with_capacity(config.center_count());
        let mut arrivals = Vec::with_capacity(config.center_count());

        for center in &config.centers {
            centers.push(Center::Simple(SimpleCenter::new(center, general, batch_mode)?));
            arrivals.push(ArrivalProcess::new(
                center.kind,
                center.inter_arrival(general.inter_arrival_time)?,
                None,
            ));
        }
        if let Some(ride) = &config.ride {
            centers.push(Center::Ride(RideCenter::new(ride, general, batch_mode)?));
            arrivals.push(ArrivalProcess::new(
                CenterKind::Ride,
                ride.center.inter_arrival(general.inter_arrival_time)?,
                Some(ride.seat_stream()),
            ));
        }
        Ok(Self { centers, arrivals })
    }

    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    pub fn center(&self, kind: CenterKind) -> Option<&Center> {
        self.centers.iter().find(|c| c.kind() == kind)
    }

    pub fn center_mut(&mut self, kind: CenterKind) -> Option<&mut Center> {
        self.centers.iter_mut().find(|c| c.kind() == kind)
    }

    /// Integrates every center's populations over the interval the clock is about to cross.
    pub fn update_areas(&mut self, clock: &SimulationClock) {
        for center in &mut self.centers {
            center.service_mut().set_area(clock);
        }
    }

    pub fn min_total_served(&self) -> u64 {
        self.centers
            .iter()
            .map(|c| c.core().total_served)
            .min()
            .unwrap_or(0)
    }

    /// True once every center has collected all of its batches.
    pub fn all_done(&self) -> bool {
        self.centers.iter().all(|c| c.service().is_done())
    }

    pub fn stop_warmup(&mut self, now: f64) {
        for center in &mut self.centers {
            center.service_mut().stop_warmup(now);
        }
    }

    /// Resets every center and schedules the first arrival of every stream.
    pub fn start_run(&mut self, queue: &mut EventQueue, rng: &mut RngStreams, start: f64, stop: f64) {
        for center in &mut self.centers {
            center.service_mut().reset();
        }
        for arrivals in &mut self.arrivals {
            arrivals.reset(start, stop);
            if let Some(event) = arrivals.next_arrival(rng) {
                queue.add(event);
            }
        }
    }

    /// Schedules the arrival following one just processed at `kind`.
    pub fn schedule_next_arrival(&mut self, kind: CenterKind, queue: &mut EventQueue, rng: &mut RngStreams) {
        if let Some(arrivals) = self.arrivals.iter_mut().find(|a| a.center == kind) {
            if let Some(event) = arrivals.next_arrival(rng) {
                queue.add(event);
            }
        }
    }

    pub fn arrivals_exhausted(&self) -> bool {
        self.arrivals.iter().all(ArrivalProcess::is_exhausted)
    }

    pub fn save_run_statistics(&mut self) {
        for center in &mut self.centers {
            center.service_mut().save_run_statistics();
        }
    }

    pub fn jobs_in_system(&self) -> u64 {
        self.centers.iter().map(|c| c.core().jobs_in_node).sum()
    }

    pub fn into_centers(self) -> Vec<Center> {
        self.centers
    }
}
