//! Pending-event queue.
//!
//! All events live in one binary heap ordered by `(time, tier, sequence)`.
//! Tier 0 and 1 are the priority pools (`has_priority` true/false), tier 2 is
//! the plain pool used by [EventQueue::add]. At equal times the lower tier
//! pops first; inside a tier, equal times pop in insertion order.
//!
//! Ride-center completions are indexed by server so they can be cancelled
//! when a vehicle takes another rider. Cancelled entries stay in the heap and
//! are skipped on pop.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use bevy_ecs::prelude::Resource;

use crate::clock::{CenterKind, Event, EventKind};
use crate::error::SimError;

const TIER_PRIORITY: u8 = 0;
const TIER_PRIORITY_LOW: u8 = 1;
const TIER_PLAIN: u8 = 2;

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    time: f64,
    tier: u8,
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (time, tier, seq).
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.tier.cmp(&self.tier))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Periodic checkpoint state for the bounded-interval variant.
#[derive(Debug, Clone, Copy)]
struct Checkpoints {
    interval: f64,
    last_save_time: f64,
}

#[derive(Debug, Default, Resource)]
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
    /// Live ride-center completions per server.
    ride_completions: HashMap<usize, Vec<u64>>,
    cancelled: HashSet<u64>,
    checkpoints: Option<Checkpoints>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue that yields a [EventKind::SaveStat] sentinel every time the head
    /// event lies more than `interval` past the previous checkpoint.
    pub fn with_checkpoints(interval: f64) -> Self {
        debug_assert!(interval > 0.0, "checkpoint interval must be positive");
        Self {
            checkpoints: Some(Checkpoints {
                interval,
                last_save_time: 0.0,
            }),
            ..Self::default()
        }
    }

    pub fn checkpoint_interval(&self) -> Option<f64> {
        self.checkpoints.map(|c| c.interval)
    }

    /// Inserts into the plain (non-priority) pool.
    pub fn add(&mut self, event: Event) {
        self.push(event, TIER_PLAIN);
    }

    /// Inserts into one of the two priority pools, chosen by `has_priority`.
    pub fn add_priority(&mut self, event: Event) {
        let tier = if event.has_priority {
            TIER_PRIORITY
        } else {
            TIER_PRIORITY_LOW
        };
        self.push(event, tier);
    }

    fn push(&mut self, event: Event, tier: u8) {
        debug_assert!(event.time.is_finite(), "event time must be finite");
        let seq = self.next_seq;
        self.next_seq += 1;
        if event.kind == EventKind::Completion(CenterKind::Ride) {
            self.ride_completions
                .entry(event.server_id)
                .or_default()
                .push(seq);
        }
        self.heap.push(Scheduled {
            time: event.time,
            tier,
            seq,
            event,
        });
    }

    /// Removes and returns the globally earliest event.
    ///
    /// With checkpoints enabled, returns a `SaveStat` sentinel instead when
    /// the head lies beyond the next checkpoint; the head stays queued.
    pub fn pop(&mut self) -> Result<Event, SimError> {
        self.discard_cancelled_head();
        let head_time = self.heap.peek().map(|s| s.time).ok_or(SimError::EmptyQueue)?;

        if let Some(checkpoints) = self.checkpoints.as_mut() {
            let due = checkpoints.last_save_time + checkpoints.interval;
            if head_time > due {
                checkpoints.last_save_time = due;
                return Ok(Event::save_stat(due));
            }
        }

        let scheduled = self.heap.pop().ok_or(SimError::EmptyQueue)?;
        if scheduled.event.kind == EventKind::Completion(CenterKind::Ride) {
            self.forget_ride_completion(scheduled.event.server_id, scheduled.seq);
        }
        Ok(scheduled.event)
    }

    /// Time of the earliest live event, ignoring checkpoints.
    pub fn peek_time(&mut self) -> Option<f64> {
        self.discard_cancelled_head();
        self.heap.peek().map(|s| s.time)
    }

    /// Purges every pending ride-center completion for `server_id`.
    pub fn remove_completions_for(&mut self, server_id: usize) {
        if let Some(seqs) = self.ride_completions.remove(&server_id) {
            self.cancelled.extend(seqs);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    fn discard_cancelled_head(&mut self) {
        while let Some(head) = self.heap.peek() {
            if !self.cancelled.remove(&head.seq) {
                break;
            }
            self.heap.pop();
        }
    }

    fn forget_ride_completion(&mut self, server_id: usize, seq: u64) {
        if let Some(seqs) = self.ride_completions.get_mut(&server_id) {
            seqs.retain(|s| *s != seq);
            if seqs.is_empty() {
                self.ride_completions.remove(&server_id);
            }
        }
    }
}
