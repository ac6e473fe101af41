//! Time-integrated populations and per-server service sums.

use serde::{Deserialize, Serialize};

/// Time integrals over the current window. Non-decreasing between resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub node: f64,
    pub queue: f64,
    pub service: f64,
}

impl Area {
    /// Integrates the given populations over an interval of `width`.
    ///
    /// The service area is weighted by the number of busy servers, so for
    /// multi-server centers it is the total busy time and E[s] divides it by
    /// jobs served rather than by a single server's count.
    pub fn accumulate(&mut self, width: f64, jobs_in_node: u64, queue_population: u64, busy_servers: u64) {
        debug_assert!(width >= 0.0, "area width must be non-negative");
        self.node += width * jobs_in_node as f64;
        self.queue += width * queue_population as f64;
        self.service += width * busy_servers as f64;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Service time and job count accumulated by one server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSum {
    pub service: f64,
    pub served: u64,
}

impl ServerSum {
    pub fn record(&mut self, service: f64, served: u64) {
        self.service += service;
        self.served += served;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
