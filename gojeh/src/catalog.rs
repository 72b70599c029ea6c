//! The fixed work/break rotation.

use crate::config::PhasesConfig;
use anyhow::{ensure, Result};
use std::time::Duration;

/// A single entry in the rotation: what to show and how long it lasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub label: String,
    pub initial_seconds: i64,
}

impl Phase {
    pub fn new(label: impl Into<String>, duration: Duration) -> Result<Self> {
        let label = label.into();
        ensure!(
            duration.subsec_nanos() == 0,
            "duration of phase {label:?} must be a whole number of seconds"
        );
        ensure!(
            duration.as_secs() > 0,
            "duration of phase {label:?} must be positive"
        );
        let initial_seconds = i64::try_from(duration.as_secs())?;
        Ok(Self {
            label,
            initial_seconds,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SessionCatalog {
    phases: [Phase; 2],
}

impl SessionCatalog {
    pub fn new(phases: [Phase; 2]) -> Self {
        Self { phases }
    }

    pub fn from_config(config: &PhasesConfig) -> Result<Self> {
        Ok(Self::new([
            Phase::new(&config.work.label, config.work.duration)?,
            Phase::new(&config.rest.label, config.rest.duration)?,
        ]))
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Panics if `index` is out of range; the engine only ever holds
    /// indices produced by [`SessionCatalog::next_index`] or zero.
    pub fn phase(&self, index: usize) -> &Phase {
        &self.phases[index]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }
}

impl Default for SessionCatalog {
    fn default() -> Self {
        Self::new([
            Phase {
                label: "🍅".to_string(),
                initial_seconds: 25 * 60,
            },
            Phase {
                label: "☕".to_string(),
                initial_seconds: 3 * 60,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rotation_is_tomato_then_coffee() {
        let catalog = SessionCatalog::default();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.phase(0).label, "🍅");
        assert_eq!(catalog.phase(0).initial_seconds, 1500);
        assert_eq!(catalog.phase(1).label, "☕");
        assert_eq!(catalog.phase(1).initial_seconds, 180);
    }

    #[test]
    fn index_wraps_after_last_phase() {
        let catalog = SessionCatalog::default();
        assert_eq!(catalog.next_index(0), 1);
        assert_eq!(catalog.next_index(1), 0);
    }

    #[test]
    fn rejects_zero_duration() {
        let err = Phase::new("x", Duration::ZERO).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn rejects_fractional_seconds() {
        assert!(Phase::new("x", Duration::from_millis(1500)).is_err());
        assert_eq!(
            Phase::new("x", Duration::from_secs(90)).unwrap().initial_seconds,
            90
        );
    }
}
