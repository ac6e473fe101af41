//! Multi-stream uniform random number provider.
//!
//! Every center draws from its own stream so that changing one center's
//! configuration does not shift the variates seen by another.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Number of independent streams.
pub const STREAMS: usize = 256;

#[derive(Debug, Clone, Resource)]
pub struct RngStreams {
    streams: Vec<StdRng>,
    selected: usize,
}

impl RngStreams {
    pub fn new(seed: u64) -> Self {
        let mut rngs = Self {
            streams: Vec::with_capacity(STREAMS),
            selected: 0,
        };
        rngs.plant_seeds(seed);
        rngs
    }

    /// Re-seeds every stream from one master seed. Stream 0 stays selected.
    pub fn plant_seeds(&mut self, seed: u64) {
        let mut master = StdRng::seed_from_u64(seed);
        self.streams = (0..STREAMS)
            .map(|_| StdRng::seed_from_u64(master.next_u64()))
            .collect();
        self.selected = 0;
    }

    /// Selects the stream used by subsequent draws. Indices wrap modulo [STREAMS].
    pub fn select_stream(&mut self, index: usize) {
        self.selected = index % STREAMS;
    }

    pub fn selected_stream(&self) -> usize {
        self.selected
    }

    /// Uniform draw in `[0, 1)` from the selected stream.
    pub fn random(&mut self) -> f64 {
        self.streams[self.selected].gen::<f64>()
    }

    /// Reads a fresh seed out of the selected stream.
    pub fn seed(&mut self) -> u64 {
        self.streams[self.selected].next_u64()
    }
}

impl RngCore for RngStreams {
    fn next_u32(&mut self) -> u32 {
        self.streams[self.selected].next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.streams[self.selected].next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.streams[self.selected].fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.streams[self.selected].try_fill_bytes(dest)
    }
}

/// Seeds for `runs` consecutive replications. Run `i + 1` is seeded with the
/// value read from `seed_stream` after planting run `i`'s seed, so the whole
/// sequence follows from `master`.
pub fn derive_run_seeds(master: u64, runs: usize, seed_stream: usize) -> Vec<u64> {
    let mut seeds = Vec::with_capacity(runs);
    let mut rngs = RngStreams::new(master);
    let mut current = master;
    for _ in 0..runs {
        seeds.push(current);
        rngs.plant_seeds(current);
        rngs.select_stream(seed_stream);
        current = rngs.seed();
    }
    seeds
}
