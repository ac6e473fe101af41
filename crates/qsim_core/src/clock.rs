//! Simulated time and the events that move it forward.
//!
//! [SimulationClock] holds the `current` and `next` instants. It is only
//! advanced by the runner, once per popped event, after the area integrals
//! have been updated for the elapsed interval.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Identifies a service center; doubles as the node id carried by events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CenterKind {
    Small,
    Medium,
    Large,
    Ride,
}

impl CenterKind {
    pub const ALL: [CenterKind; 4] = [
        CenterKind::Small,
        CenterKind::Medium,
        CenterKind::Large,
        CenterKind::Ride,
    ];

    /// Simple center that takes a request of `seats` when the ride center
    /// cannot match it.
    pub fn for_seats(seats: u32) -> CenterKind {
        if seats <= 3 {
            CenterKind::Small
        } else if seats <= 4 {
            CenterKind::Medium
        } else {
            CenterKind::Large
        }
    }

    pub fn config_section(self) -> &'static str {
        match self {
            CenterKind::Small => "small_center",
            CenterKind::Medium => "medium_center",
            CenterKind::Large => "large_center",
            CenterKind::Ride => "ride_center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival(CenterKind),
    Completion(CenterKind),
    /// Checkpoint sentinel injected by the checkpointing queue; carries no job.
    SaveStat,
}

impl EventKind {
    pub fn center(self) -> Option<CenterKind> {
        match self {
            EventKind::Arrival(center) | EventKind::Completion(center) => Some(center),
            EventKind::SaveStat => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub time: f64,
    /// Service duration drawn for a completion; zero for arrivals.
    pub service: f64,
    pub server_id: usize,
    pub is_feedback: bool,
    pub has_priority: bool,
    /// Seats asked for by a ride request; zero elsewhere.
    pub seats_requested: u32,
}

impl Event {
    pub fn new(kind: EventKind, time: f64) -> Self {
        Self {
            kind,
            time,
            service: 0.0,
            server_id: 0,
            is_feedback: false,
            has_priority: false,
            seats_requested: 0,
        }
    }

    pub fn arrival(center: CenterKind, time: f64) -> Self {
        Self::new(EventKind::Arrival(center), time)
    }

    pub fn completion(center: CenterKind, time: f64, service: f64, server_id: usize) -> Self {
        Self {
            service,
            server_id,
            ..Self::new(EventKind::Completion(center), time)
        }
    }

    pub fn save_stat(time: f64) -> Self {
        Self::new(EventKind::SaveStat, time)
    }

    pub fn with_seats(mut self, seats: u32) -> Self {
        self.seats_requested = seats;
        self
    }

    pub fn with_priority(mut self, has_priority: bool) -> Self {
        self.has_priority = has_priority;
        self
    }

    pub fn as_feedback(mut self) -> Self {
        self.is_feedback = true;
        self
    }

    pub fn is_save_stat(&self) -> bool {
        self.kind == EventKind::SaveStat
    }
}

/// The event currently being processed; inserted by the runner before the schedule runs.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Clone, Copy, Default, PartialEq, Resource)]
pub struct SimulationClock {
    current: f64,
    next: f64,
}

impl SimulationClock {
    pub fn starting_at(start: f64) -> Self {
        Self {
            current: start,
            next: start,
        }
    }

    pub fn now(&self) -> f64 {
        self.current
    }

    pub fn next(&self) -> f64 {
        self.next
    }

    /// Width of the interval about to be integrated.
    pub fn width(&self) -> f64 {
        self.next - self.current
    }

    pub fn set_next(&mut self, time: f64) {
        debug_assert!(
            time >= self.current,
            "next event time must be >= current time"
        );
        self.next = time;
    }

    pub fn advance(&mut self) {
        self.current = self.next;
    }
}
