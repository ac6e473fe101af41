//! Checkpoint observations of running mean response time, for Welch plots.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::centers::CenterNetwork;
use crate::clock::CenterKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterObservations {
    pub center: CenterKind,
    pub name: String,
    pub points: Vec<f64>,
}

/// One observation series per center for the current run.
#[derive(Debug, Clone, Default, Resource)]
pub struct ObservationLog {
    centers: Vec<CenterObservations>,
}

impl ObservationLog {
    pub fn for_network(network: &CenterNetwork) -> Self {
        Self {
            centers: network
                .centers()
                .iter()
                .map(|c| CenterObservations {
                    center: c.kind(),
                    name: c.name().to_string(),
                    points: Vec::new(),
                })
                .collect(),
        }
    }

    /// Appends the current mean response time of every center that has
    /// completed at least one job in the current window.
    pub fn record(&mut self, network: &CenterNetwork) {
        for series in &mut self.centers {
            let observation = network
                .center(series.center)
                .and_then(|c| c.core().response_time_observation());
            if let Some(point) = observation {
                series.points.push(point);
            }
        }
    }

    pub fn series(&self) -> &[CenterObservations] {
        &self.centers
    }

    pub fn center(&self, kind: CenterKind) -> Option<&CenterObservations> {
        self.centers.iter().find(|c| c.center == kind)
    }

    pub fn into_series(self) -> Vec<CenterObservations> {
        self.centers
    }

    pub fn clear(&mut self) {
        for series in &mut self.centers {
            series.points.clear();
        }
    }
}
