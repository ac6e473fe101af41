//! Configuration store and the typed simulation configuration built from it.
//!
//! The store is a JSON object of sections, each an object of keys. Values may
//! be numbers, booleans or strings; the typed getters parse strings as well.

use std::path::Path;

use serde_json::{Map, Value};

use crate::clock::CenterKind;
use crate::distributions::{InterArrival, ServiceDistribution};
use crate::error::{ConfigError, SimError};

#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    sections: Map<String, Value>,
}

impl ConfigStore {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(ConfigError::Malformed {
                section: String::new(),
                key: String::new(),
                value: other.to_string(),
                expected: "an object of sections",
            }),
        }
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.get(section).is_some_and(Value::is_object)
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.lookup(section, key).is_some()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .sections
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(keys) = entry {
            keys.insert(key.to_string(), value.into());
        }
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.as_object()?.get(key)
    }

    fn require(&self, section: &str, key: &str) -> Result<&Value, ConfigError> {
        self.lookup(section, key).ok_or_else(|| ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    fn malformed(section: &str, key: &str, value: &Value, expected: &'static str) -> ConfigError {
        ConfigError::Malformed {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, ConfigError> {
        let value = self.require(section, key)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| Self::malformed(section, key, value, "an integer"))
    }

    pub fn get_double(&self, section: &str, key: &str) -> Result<f64, ConfigError> {
        let value = self.require(section, key)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| Self::malformed(section, key, value, "a number"))
    }

    pub fn get_string(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        match self.require(section, key)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(Self::malformed(section, key, other, "a string")),
        }
    }

    /// Accepts JSON booleans, `0`/`1`, and the strings `true`/`false`/`1`/`0`.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<bool, ConfigError> {
        let value = self.require(section, key)?;
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| Self::malformed(section, key, value, "a boolean"))
    }

    fn get_count(&self, section: &str, key: &str) -> Result<usize, ConfigError> {
        let raw = self.get_int(section, key)?;
        usize::try_from(raw).map_err(|_| ConfigError::Malformed {
            section: section.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
            expected: "a non-negative integer",
        })
    }

    fn get_optional_double(&self, section: &str, key: &str) -> Result<Option<f64>, ConfigError> {
        if self.contains(section, key) {
            self.get_double(section, key).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Run-wide parameters (`general` section).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralConfig {
    pub seed: u64,
    pub inter_arrival_time: f64,
    pub batch_size: usize,
    pub num_batches: usize,
    pub warmup_percentage: f64,
    pub level_of_confidence: f64,
    pub runs_number: usize,
    pub observation_time: f64,
    /// Spacing of checkpoint observations; `None` disables them.
    pub checkpoint_interval: Option<f64>,
    /// Replace every service distribution by an exponential with the same mean.
    pub exponential_service: bool,
    pub seed_stream_index: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            seed: 123_456_789,
            inter_arrival_time: 1.0,
            batch_size: 512,
            num_batches: 64,
            warmup_percentage: 0.1,
            level_of_confidence: 0.95,
            runs_number: 64,
            observation_time: 1_000.0,
            checkpoint_interval: None,
            exponential_service: true,
            seed_stream_index: 255,
        }
    }
}

impl GeneralConfig {
    fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        const S: &str = "general";
        let raw_seed = store.get_int(S, "seed")?;
        let seed = u64::try_from(raw_seed).map_err(|_| ConfigError::Malformed {
            section: S.to_string(),
            key: "seed".to_string(),
            value: raw_seed.to_string(),
            expected: "a non-negative seed",
        })?;
        let checkpoint_interval = store
            .get_optional_double(S, "checkpoint_interval")?
            .filter(|interval| *interval > 0.0);
        Ok(Self {
            seed,
            inter_arrival_time: store.get_double(S, "inter_arrival_time")?,
            batch_size: store.get_count(S, "batch_size")?,
            num_batches: store.get_count(S, "num_batches")?,
            warmup_percentage: store.get_double(S, "warmup_percentage")?,
            level_of_confidence: store.get_double(S, "level_of_confidence")?,
            runs_number: store.get_count(S, "runs_number")?,
            observation_time: store.get_double(S, "observation_time")?,
            checkpoint_interval,
            exponential_service: store.get_bool(S, "exponential_service")?,
            seed_stream_index: store.get_count(S, "seed_stream_index")?,
        })
    }

    /// Completions the slowest center must reach before batch collection starts.
    pub fn warmup_threshold(&self) -> u64 {
        ((self.batch_size * self.num_batches) as f64 * self.warmup_percentage) as u64
    }
}

/// One service center (`small_center`, `medium_center`, `large_center`, or the
/// shared part of `ride_center`).
#[derive(Debug, Clone, PartialEq)]
pub struct CenterConfig {
    pub kind: CenterKind,
    pub name: String,
    pub servers: usize,
    pub mean_service_time: f64,
    pub sigma: f64,
    pub truncation_point: f64,
    /// Service stream; interarrivals use `stream_index + 1`.
    pub stream_index: usize,
    /// Overrides the general interarrival mean for this center.
    pub inter_arrival_time: Option<f64>,
}

impl CenterConfig {
    pub fn new(kind: CenterKind, servers: usize, mean_service_time: f64) -> Self {
        let stream_index = match kind {
            CenterKind::Small => 0,
            CenterKind::Medium => 2,
            CenterKind::Large => 4,
            CenterKind::Ride => 6,
        };
        Self {
            kind,
            name: kind.config_section().to_string(),
            servers,
            mean_service_time,
            sigma: mean_service_time / 2.0,
            truncation_point: mean_service_time * 4.0,
            stream_index,
            inter_arrival_time: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_truncated_shape(mut self, sigma: f64, truncation_point: f64) -> Self {
        self.sigma = sigma;
        self.truncation_point = truncation_point;
        self
    }

    pub fn with_stream_index(mut self, stream_index: usize) -> Self {
        self.stream_index = stream_index;
        self
    }

    pub fn with_inter_arrival_time(mut self, mean: f64) -> Self {
        self.inter_arrival_time = Some(mean);
        self
    }

    fn from_store(store: &ConfigStore, kind: CenterKind) -> Result<Self, ConfigError> {
        let s = kind.config_section();
        Ok(Self {
            kind,
            name: store.get_string(s, "center_name")?,
            servers: store.get_count(s, "servers_number")?,
            mean_service_time: store.get_double(s, "mean_service_time")?,
            sigma: store.get_double(s, "sigma")?,
            truncation_point: store.get_double(s, "truncation_point")?,
            stream_index: store.get_count(s, "stream_index")?,
            inter_arrival_time: store.get_optional_double(s, "inter_arrival_time")?,
        })
    }

    pub fn arrival_stream(&self) -> usize {
        self.stream_index + 1
    }

    /// Service distribution: exponential when `exponential` is set, otherwise
    /// truncated normal for simple centers and truncated log-normal for rides.
    pub fn service_distribution(&self, exponential: bool) -> Result<ServiceDistribution, SimError> {
        let dist = if exponential {
            ServiceDistribution::exponential(self.mean_service_time)
        } else if self.kind == CenterKind::Ride {
            ServiceDistribution::truncated_log_normal(
                self.mean_service_time,
                self.sigma,
                self.truncation_point,
            )
        } else {
            ServiceDistribution::truncated_normal(
                self.mean_service_time,
                self.sigma,
                self.truncation_point,
            )
        };
        dist.map_err(|e| match e {
            SimError::InvalidCenter { reason, .. } => SimError::invalid_center(&self.name, reason),
            other => other,
        })
    }

    pub fn inter_arrival(&self, general_mean: f64) -> Result<InterArrival, SimError> {
        let mean = self.inter_arrival_time.unwrap_or(general_mean);
        InterArrival::new(mean, self.arrival_stream()).map_err(|_| {
            SimError::invalid_center(
                &self.name,
                format!("interarrival mean must be positive, got {mean}"),
            )
        })
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.servers == 0 {
            return Err(SimError::invalid_center(&self.name, "needs at least one server"));
        }
        if !(self.mean_service_time > 0.0) {
            return Err(SimError::invalid_center(
                &self.name,
                format!("mean service time must be positive, got {}", self.mean_service_time),
            ));
        }
        Ok(())
    }
}

/// Ride-sharing center: a heterogeneous vehicle fleet plus matching parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RideCenterConfig {
    pub center: CenterConfig,
    pub small_vehicles: usize,
    pub medium_vehicles: usize,
    pub large_vehicles: usize,
    pub match_interval: f64,
    pub p_match_busy: f64,
    pub p_match_idle: f64,
    pub match_busy_stream: usize,
    pub match_idle_stream: usize,
}

impl Default for RideCenterConfig {
    fn default() -> Self {
        Self::new(2, 2, 1)
    }
}

impl RideCenterConfig {
    pub fn new(small_vehicles: usize, medium_vehicles: usize, large_vehicles: usize) -> Self {
        let servers = small_vehicles + medium_vehicles + large_vehicles;
        Self {
            center: CenterConfig::new(CenterKind::Ride, servers, 8.0)
                .with_truncated_shape(3.0, 25.0)
                .with_inter_arrival_time(1.5),
            small_vehicles,
            medium_vehicles,
            large_vehicles,
            match_interval: 2.0,
            p_match_busy: 0.6,
            p_match_idle: 0.8,
            match_busy_stream: 9,
            match_idle_stream: 10,
        }
    }

    pub fn with_match_probabilities(mut self, busy: f64, idle: f64) -> Self {
        self.p_match_busy = busy;
        self.p_match_idle = idle;
        self
    }

    pub fn with_match_interval(mut self, interval: f64) -> Self {
        self.match_interval = interval;
        self
    }

    pub fn with_mean_service_time(mut self, mean: f64) -> Self {
        self.center.mean_service_time = mean;
        self
    }

    pub fn with_inter_arrival_time(mut self, mean: f64) -> Self {
        self.center.inter_arrival_time = Some(mean);
        self
    }

    /// Seat-count draws use the stream after the interarrival stream.
    pub fn seat_stream(&self) -> usize {
        self.center.stream_index + 2
    }

    pub fn vehicles(&self) -> usize {
        self.small_vehicles + self.medium_vehicles + self.large_vehicles
    }

    fn from_store(store: &ConfigStore) -> Result<Self, SimError> {
        const S: &str = "ride_center";
        let small_vehicles = store.get_count(S, "small_vehicles")?;
        let medium_vehicles = store.get_count(S, "medium_vehicles")?;
        let large_vehicles = store.get_count(S, "large_vehicles")?;
        let vehicles = small_vehicles + medium_vehicles + large_vehicles;

        let center = if store.contains(S, "servers_number") {
            CenterConfig::from_store(store, CenterKind::Ride)?
        } else {
            let mut shadow = store.clone();
            shadow.set(S, "servers_number", vehicles as i64);
            CenterConfig::from_store(&shadow, CenterKind::Ride)?
        };
        if center.servers != vehicles {
            return Err(SimError::invalid_center(
                &center.name,
                format!(
                    "servers_number {} does not match the {} configured vehicles",
                    center.servers, vehicles
                ),
            ));
        }
        Ok(Self {
            center,
            small_vehicles,
            medium_vehicles,
            large_vehicles,
            match_interval: store.get_double(S, "match_interval")?,
            p_match_busy: store.get_double(S, "p_match_busy")?,
            p_match_idle: store.get_double(S, "p_match_idle")?,
            match_busy_stream: store.get_count(S, "match_busy_stream")?,
            match_idle_stream: store.get_count(S, "match_idle_stream")?,
        })
    }

    fn validate(&self) -> Result<(), SimError> {
        self.center.validate()?;
        let name = &self.center.name;
        if !(self.match_interval > 0.0) {
            return Err(SimError::invalid_center(
                name,
                format!("match interval must be positive, got {}", self.match_interval),
            ));
        }
        for (label, p) in [("p_match_busy", self.p_match_busy), ("p_match_idle", self.p_match_idle)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::invalid_center(
                    name,
                    format!("{label} must lie in [0, 1], got {p}"),
                ));
            }
        }
        Ok(())
    }
}

/// Immutable description of one simulated network.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub general: GeneralConfig,
    pub centers: Vec<CenterConfig>,
    pub ride: Option<RideCenterConfig>,
}

impl Default for SimulationConfig {
    /// Three simple centers, all stable under the default arrival rate.
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            centers: vec![
                CenterConfig::new(CenterKind::Small, 2, 1.5).with_name("Small"),
                CenterConfig::new(CenterKind::Medium, 1, 0.6).with_name("Medium"),
                CenterConfig::new(CenterKind::Large, 3, 2.0).with_name("Large"),
            ],
            ride: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self, SimError> {
        let general = GeneralConfig::from_store(store)?;
        let centers = [CenterKind::Small, CenterKind::Medium, CenterKind::Large]
            .into_iter()
            .filter(|kind| store.has_section(kind.config_section()))
            .map(|kind| CenterConfig::from_store(store, kind))
            .collect::<Result<Vec<_>, _>>()?;
        let ride = if store.has_section(CenterKind::Ride.config_section()) {
            Some(RideCenterConfig::from_store(store)?)
        } else {
            None
        };
        let config = Self {
            general,
            centers,
            ride,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        Self::from_store(&ConfigStore::from_path(path)?)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let general = &self.general;
        if general.batch_size == 0 {
            return Err(malformed_general("batch_size", general.batch_size, "a positive batch size").into());
        }
        if general.num_batches == 0 {
            return Err(malformed_general("num_batches", general.num_batches, "a positive batch count").into());
        }
        if !(general.level_of_confidence > 0.0 && general.level_of_confidence < 1.0) {
            return Err(malformed_general(
                "level_of_confidence",
                general.level_of_confidence,
                "a probability in (0, 1)",
            )
            .into());
        }
        if !(0.0..=1.0).contains(&general.warmup_percentage) {
            return Err(malformed_general(
                "warmup_percentage",
                general.warmup_percentage,
                "a fraction in [0, 1]",
            )
            .into());
        }
        if self.centers.is_empty() && self.ride.is_none() {
            return Err(SimError::invalid_center("network", "no centers configured"));
        }
        let mut seen = Vec::new();
        for center in &self.centers {
            if center.kind == CenterKind::Ride {
                return Err(SimError::invalid_center(
                    &center.name,
                    "ride centers must be configured through the ride section",
                ));
            }
            if seen.contains(&center.kind) {
                return Err(SimError::invalid_center(&center.name, "duplicate center kind"));
            }
            seen.push(center.kind);
            center.validate()?;
        }
        if let Some(ride) = &self.ride {
            ride.validate()?;
            // Unmatched requests of up to four seats are re-routed to these.
            for kind in [CenterKind::Small, CenterKind::Medium] {
                if !seen.contains(&kind) {
                    return Err(SimError::invalid_center(
                        &ride.center.name,
                        format!("feedback needs a {} section", kind.config_section()),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.general.seed = seed;
        self
    }

    pub fn with_batches(mut self, batch_size: usize, num_batches: usize) -> Self {
        self.general.batch_size = batch_size;
        self.general.num_batches = num_batches;
        self
    }

    pub fn with_warmup_percentage(mut self, warmup_percentage: f64) -> Self {
        self.general.warmup_percentage = warmup_percentage;
        self
    }

    pub fn with_runs(mut self, runs_number: usize) -> Self {
        self.general.runs_number = runs_number;
        self
    }

    pub fn with_observation_time(mut self, observation_time: f64) -> Self {
        self.general.observation_time = observation_time;
        self
    }

    pub fn with_inter_arrival_time(mut self, mean: f64) -> Self {
        self.general.inter_arrival_time = mean;
        self
    }

    pub fn with_checkpoint_interval(mut self, interval: f64) -> Self {
        self.general.checkpoint_interval = Some(interval);
        self
    }

    pub fn with_exponential_service(mut self, exponential: bool) -> Self {
        self.general.exponential_service = exponential;
        self
    }

    pub fn with_level_of_confidence(mut self, level: f64) -> Self {
        self.general.level_of_confidence = level;
        self
    }

    pub fn with_centers(mut self, centers: Vec<CenterConfig>) -> Self {
        self.centers = centers;
        self
    }

    pub fn with_ride(mut self, ride: RideCenterConfig) -> Self {
        self.ride = Some(ride);
        self
    }

    /// Number of centers, counting the ride center.
    pub fn center_count(&self) -> usize {
        self.centers.len() + usize::from(self.ride.is_some())
    }
}

fn malformed_general(key: &str, value: impl ToString, expected: &'static str) -> ConfigError {
    ConfigError::Malformed {
        section: "general".to_string(),
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "general": {
            "seed": 42,
            "inter_arrival_time": "1.0",
            "batch_size": 100,
            "num_batches": 10,
            "warmup_percentage": 0.2,
            "level_of_confidence": 0.95,
            "runs_number": 8,
            "observation_time": 500,
            "checkpoint_interval": 0,
            "exponential_service": "1",
            "seed_stream_index": 255
        },
        "small_center": {
            "center_name": "Small",
            "servers_number": 2,
            "mean_service_time": 1.5,
            "sigma": 0.5,
            "truncation_point": 4.0,
            "stream_index": 0
        },
        "medium_center": {
            "center_name": "Medium",
            "servers_number": 1,
            "mean_service_time": 0.6,
            "sigma": 0.2,
            "truncation_point": 2.0,
            "stream_index": 2
        },
        "ride_center": {
            "center_name": "Ride",
            "mean_service_time": 8.0,
            "sigma": 3.0,
            "truncation_point": 25.0,
            "stream_index": 6,
            "inter_arrival_time": 2.5,
            "small_vehicles": 2,
            "medium_vehicles": 1,
            "large_vehicles": 1,
            "match_interval": 2.0,
            "p_match_busy": 0.5,
            "p_match_idle": 0.9,
            "match_busy_stream": 9,
            "match_idle_stream": 10
        }
    }"#;

    #[test]
    fn typed_getters_parse_strings() {
        let store = ConfigStore::parse(SAMPLE).expect("valid json");
        assert_eq!(store.get_double("general", "inter_arrival_time").expect("double"), 1.0);
        assert!(store.get_bool("general", "exponential_service").expect("bool"));
        assert_eq!(store.get_int("general", "seed").expect("int"), 42);
        assert_eq!(store.get_string("small_center", "center_name").expect("string"), "Small");
    }

    #[test]
    fn missing_and_malformed_keys_are_reported() {
        let store = ConfigStore::parse(SAMPLE).expect("valid json");
        assert!(matches!(
            store.get_int("general", "nope"),
            Err(ConfigError::MissingKey { .. })
        ));
        assert!(matches!(
            store.get_int("small_center", "center_name"),
            Err(ConfigError::Malformed { .. })
        ));
        assert!(matches!(
            store.get_bool("general", "observation_time"),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn builds_simulation_config_from_store() {
        let store = ConfigStore::parse(SAMPLE).expect("valid json");
        let config = SimulationConfig::from_store(&store).expect("valid config");
        assert_eq!(config.general.seed, 42);
        assert_eq!(config.general.checkpoint_interval, None);
        assert_eq!(config.general.warmup_threshold(), 200);
        assert_eq!(config.centers.len(), 2);
        assert_eq!(config.centers[0].servers, 2);
        assert_eq!(config.centers[1].kind, CenterKind::Medium);

        let ride = config.ride.expect("ride section present");
        assert_eq!(ride.vehicles(), 4);
        assert_eq!(ride.center.servers, 4);
        assert_eq!(ride.center.inter_arrival_time, Some(2.5));
        assert_eq!(ride.seat_stream(), 8);
    }

    #[test]
    fn negative_seed_is_malformed() {
        let store = ConfigStore::parse(&SAMPLE.replace(r#""seed": 42"#, r#""seed": -1"#)).expect("valid json");
        let err = SimulationConfig::from_store(&store).expect_err("negative seed");
        assert!(matches!(
            err,
            SimError::Config(ConfigError::Malformed { ref key, .. }) if key == "seed"
        ));
    }

    #[test]
    fn rejects_invalid_networks() {
        let zero_servers =
            SimulationConfig::default().with_centers(vec![CenterConfig::new(CenterKind::Small, 0, 1.0)]);
        assert!(matches!(
            zero_servers.validate(),
            Err(SimError::InvalidCenter { .. })
        ));

        let bad_probability = SimulationConfig::default()
            .with_ride(RideCenterConfig::default().with_match_probabilities(1.5, 0.5));
        assert!(bad_probability.validate().is_err());

        let bad_interval =
            SimulationConfig::default().with_ride(RideCenterConfig::default().with_match_interval(0.0));
        assert!(bad_interval.validate().is_err());

        let no_feedback_target = SimulationConfig::default()
            .with_centers(vec![CenterConfig::new(CenterKind::Small, 1, 1.0)])
            .with_ride(RideCenterConfig::default());
        assert!(no_feedback_target.validate().is_err());

        let no_batches = SimulationConfig::default().with_batches(0, 10);
        assert!(matches!(no_batches.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::default()
            .with_ride(RideCenterConfig::default())
            .validate()
            .is_ok());
    }
}
