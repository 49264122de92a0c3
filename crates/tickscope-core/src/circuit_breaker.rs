//! Consecutive-failure circuit breaker guarding upstream provider calls.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::info;

use crate::data_source::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            open_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct Circuit {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

/// Opens after `failure_threshold` consecutive failures and rejects calls
/// until `open_timeout` has elapsed; then one probe call is let through
/// (half-open) and its outcome closes or re-opens the circuit.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: &'static str,
    config: CircuitBreakerConfig,
    circuit: Mutex<Circuit>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            config,
            circuit: Mutex::new(Circuit {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    /// Admit a call, or explain why it is rejected.
    pub fn try_acquire(&self) -> Result<(), SourceError> {
        let mut circuit = self.lock();
        match circuit.state {
            CircuitState::Closed | CircuitState::HalfOpen => Ok(()),
            CircuitState::Open => {
                let cooled_down = circuit
                    .opened_at
                    .is_some_and(|opened_at| opened_at.elapsed() >= self.config.open_timeout);

                if cooled_down {
                    circuit.state = CircuitState::HalfOpen;
                    circuit.opened_at = None;
                    info!(provider = self.name, "circuit half-open; probing upstream");
                    Ok(())
                } else {
                    Err(SourceError::unavailable(format!(
                        "{} circuit breaker is open; skipping upstream call",
                        self.name
                    )))
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut circuit = self.lock();
        if circuit.state != CircuitState::Closed {
            info!(provider = self.name, "circuit closed");
        }
        circuit.state = CircuitState::Closed;
        circuit.consecutive_failures = 0;
        circuit.opened_at = None;
    }

    pub fn record_failure(&self) {
        let mut circuit = self.lock();
        circuit.consecutive_failures = circuit.consecutive_failures.saturating_add(1);

        let trip = circuit.state == CircuitState::HalfOpen
            || circuit.consecutive_failures >= self.config.failure_threshold;
        if trip && circuit.state != CircuitState::Open {
            info!(
                provider = self.name,
                failures = circuit.consecutive_failures,
                "circuit opened"
            );
        }
        if trip {
            circuit.state = CircuitState::Open;
            circuit.opened_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    fn lock(&self) -> MutexGuard<'_, Circuit> {
        self.circuit.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 2,
                open_timeout: Duration::from_secs(60),
            },
        );

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        let error = breaker.try_acquire().expect_err("open circuit rejects");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("circuit breaker is open"));
    }

    #[test]
    fn half_open_probe_success_closes_circuit() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 1,
                open_timeout: Duration::from_millis(1),
            },
        );

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.try_acquire().is_ok());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert_eq!(breaker.consecutive_failures(), 0);
    }

    #[test]
    fn half_open_probe_failure_reopens_circuit() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 5,
                open_timeout: Duration::from_millis(1),
            },
        );

        for _ in 0..5 {
            breaker.record_failure();
        }
        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.try_acquire().is_ok());

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
