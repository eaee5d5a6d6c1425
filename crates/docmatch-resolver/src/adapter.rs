//! Calling the remote collaborators
//!
//! Every call runs on the blocking pool under a timeout. Any failure comes back
//! as an `AdapterFailure` value for the caller to replace with a fallback.

use crate::health::{HealthCache, Service};
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Why a remote call produced no usable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterFailure {
    /// The call did not finish in time
    Timeout(Duration),
    /// Transport or service error
    Error(String),
    /// The service answered with something unusable
    Malformed(String),
    /// The health cache marked the service as down; no call was made
    Skipped,
    /// The service was due for a recheck but its health check failed
    Unhealthy,
}

impl fmt::Display for AdapterFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterFailure::Timeout(limit) => write!(f, "timed out after {} ms", limit.as_millis()),
            AdapterFailure::Error(e) => write!(f, "{}", e),
            AdapterFailure::Malformed(e) => write!(f, "malformed response: {}", e),
            AdapterFailure::Skipped => f.write_str("skipped, marked unhealthy"),
            AdapterFailure::Unhealthy => f.write_str("skipped, health check failed"),
        }
    }
}

/// Timeout and retry settings for one service
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    /// Limit for each attempt
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry
    pub backoff: Duration,
}

/// Run a blocking collaborator call under the policy
///
/// The closure returns `Err(AdapterFailure)` for service errors and malformed
/// payloads alike. The health cache is consulted first and updated with the
/// final outcome. A service marked unhealthy whose recheck interval has passed
/// must pass `probe` before it is called again.
pub async fn call_with_policy<T, P, F>(
    service: Service,
    health: &HealthCache,
    policy: CallPolicy,
    probe: P,
    call: F,
) -> Result<T, AdapterFailure>
where
    T: Send + 'static,
    P: FnOnce() -> bool + Send + 'static,
    F: Fn() -> Result<T, AdapterFailure> + Clone + Send + 'static,
{
    if !health.should_attempt(service) {
        debug!("Skipping {} call, service marked unhealthy", service);
        return Err(AdapterFailure::Skipped);
    }

    if health.is_healthy(service) == Some(false) {
        debug!("Probing {} health before calling it again", service);
        let probed = timeout(policy.timeout, tokio::task::spawn_blocking(probe)).await;
        if !matches!(probed, Ok(Ok(true))) {
            warn!("{} health check failed, still using fallback", service);
            health.record(service, false);
            return Err(AdapterFailure::Unhealthy);
        }
    }

    let mut attempt: u32 = 0;
    loop {
        let call = call.clone();
        let outcome = match timeout(policy.timeout, tokio::task::spawn_blocking(call)).await {
            Err(_) => Err(AdapterFailure::Timeout(policy.timeout)),
            Ok(Err(join_error)) => Err(AdapterFailure::Error(format!(
                "Task join error: {}",
                join_error
            ))),
            Ok(Ok(result)) => result,
        };

        match outcome {
            Ok(value) => {
                health.record(service, true);
                return Ok(value);
            }
            Err(failure) if attempt >= policy.max_retries => {
                health.record(service, false);
                return Err(failure);
            }
            Err(failure) => {
                let delay = policy.backoff.saturating_mul(1u32 << attempt.min(16));
                warn!(
                    "{} attempt {} failed ({}), retrying in {} ms",
                    service,
                    attempt + 1,
                    failure,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
