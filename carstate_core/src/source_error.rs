//! Maps `Box<dyn Error>` from the signal-source boundary to typed `StateError`.
//!
//! `carstate_traits::SignalSource` returns `Box<dyn Error + Send + Sync>` so any bus
//! decoder can plug in; this module converts those to our typed error enum, with an
//! optional feature-gated path for `carstate_sim::error::SimError` downcasting.

use crate::error::StateError;

/// Map a source-boundary error to a typed `StateError`.
///
/// Attempts to downcast known source error types first, then falls back
/// to string-based heuristics.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> StateError {
    #[cfg(feature = "sim-errors")]
    {
        if let Some(sim) = e.downcast_ref::<carstate_sim::error::SimError>() {
            return match sim {
                carstate_sim::error::SimError::Timeout => StateError::Timeout,
                carstate_sim::error::SimError::Injected(msg) => {
                    StateError::SourceFault(msg.clone())
                }
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return match io.kind() {
            std::io::ErrorKind::TimedOut => StateError::Timeout,
            _ => StateError::Io(io.to_string()),
        };
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        StateError::Timeout
    } else {
        StateError::Source(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_recognised() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "bus quiet");
        assert!(matches!(map_source_error(&io), StateError::Timeout));

        let boxed: Box<dyn std::error::Error + Send + Sync> = "read timeout on can0".into();
        assert!(matches!(map_source_error(boxed.as_ref()), StateError::Timeout));
    }

    #[test]
    fn io_errors_stay_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "decoder gone");
        match map_source_error(&io) {
            StateError::Io(msg) => assert_eq!(msg, "decoder gone"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn other_errors_keep_their_message() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = "bus off".into();
        match map_source_error(boxed.as_ref()) {
            StateError::Source(msg) => assert_eq!(msg, "bus off"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(feature = "sim-errors")]
    #[test]
    fn sim_errors_map_precisely() {
        use carstate_sim::error::SimError;
        assert!(matches!(map_source_error(&SimError::Timeout), StateError::Timeout));
        match map_source_error(&SimError::Injected("dropout".into())) {
            StateError::SourceFault(msg) => assert_eq!(msg, "dropout"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
