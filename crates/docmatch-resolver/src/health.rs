//! Advisory health cache for the remote collaborators
//!
//! After a failed call a service is skipped until the recheck interval has
//! passed; the next call after that is a fresh attempt. Skipping only means
//! the local fallback runs straight away.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Remote collaborator tracked by the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Semantic template classifier
    Classifier,
    /// Entity and key-phrase analyzer
    Analyzer,
}

impl Service {
    /// Get the service name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Classifier => "classifier",
            Service::Analyzer => "analyzer",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    healthy: bool,
    at: Instant,
}

/// Last known health of each remote collaborator
#[derive(Debug)]
pub struct HealthCache {
    recheck: Duration,
    observations: Mutex<HashMap<Service, Observation>>,
}

impl HealthCache {
    /// Create a cache that re-tries failed services after `recheck`
    pub fn new(recheck: Duration) -> Self {
        Self {
            recheck,
            observations: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a call to `service` should be attempted now
    pub fn should_attempt(&self, service: Service) -> bool {
        match self.observation(service) {
            None => true,
            Some(obs) if obs.healthy => true,
            Some(obs) => obs.at.elapsed() >= self.recheck,
        }
    }

    /// Record the outcome of a call
    pub fn record(&self, service: Service, healthy: bool) {
        let mut observations = self
            .observations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        observations.insert(
            service,
            Observation {
                healthy,
                at: Instant::now(),
            },
        );
    }

    /// Last recorded health, `None` if the service was never called
    pub fn is_healthy(&self, service: Service) -> Option<bool> {
        self.observation(service).map(|obs| obs.healthy)
    }

    fn observation(&self, service: Service) -> Option<Observation> {
        let observations = self
            .observations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        observations.get(&service).copied()
    }
}
