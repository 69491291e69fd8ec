//! Ordered fallback over backend alternatives
//!
//! Every capability with more than one backend uses the same policy: try
//! each in order, return the first success, and if all fail report one
//! aggregated error instead of the last one seen.

use crate::error::CapabilityError;
use tracing::warn;

/// Call `attempt` on each backend in order, returning the first success.
///
/// Failures are logged and collected; if no backend succeeds the result is
/// a single [`CapabilityError::AllBackendsFailed`] summarizing every
/// attempt.
pub fn first_success<B, T, F>(
    label: &str,
    backends: &[B],
    mut attempt: F,
) -> Result<T, CapabilityError>
where
    B: std::fmt::Display,
    F: FnMut(&B) -> Result<T, CapabilityError>,
{
    let mut failures = Vec::with_capacity(backends.len());
    for backend in backends {
        match attempt(backend) {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!("{label}: backend {backend} failed: {err}");
                failures.push(format!("{backend}: {err}"));
            }
        }
    }
    Err(CapabilityError::AllBackendsFailed {
        attempted: backends.len(),
        summary: failures.join("; "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_success_stops_at_first_ok() {
        let backends = ["a", "b", "c"];
        let mut calls = 0;
        let result = first_success("test", &backends, |b| {
            calls += 1;
            if *b == "b" {
                Ok(42)
            } else {
                Err(CapabilityError::Unavailable("nope"))
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_all_failures_aggregate() {
        let backends = ["a", "b"];
        let result: Result<(), _> = first_success("test", &backends, |_| {
            Err(CapabilityError::Unavailable("down"))
        });
        match result {
            Err(CapabilityError::AllBackendsFailed { attempted, summary }) => {
                assert_eq!(attempted, 2);
                assert!(summary.contains("a:"));
                assert!(summary.contains("b:"));
            }
            other => panic!("expected AllBackendsFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_backend_list() {
        let backends: [&str; 0] = [];
        let result: Result<(), _> =
            first_success("test", &backends, |_| Err(CapabilityError::Unavailable("x")));
        assert!(matches!(
            result,
            Err(CapabilityError::AllBackendsFailed { attempted: 0, .. })
        ));
    }
}
