//! Timer state and its transitions, independent of channels and clocks.
//!
//! Every running stretch gets a fresh epoch. Ticks are armed with the epoch
//! that was current when they were scheduled and are ignored if the timer has
//! since paused or restarted, so at most one tick chain is ever live.

use crate::catalog::SessionCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Paused,
    Running,
}

/// What the engine has to do after a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// Print the status line.
    pub render: bool,
    /// Arm a tick for this epoch one second from now.
    pub schedule_tick: Option<u64>,
    /// The countdown just reached zero.
    pub expired: bool,
}

#[derive(Debug)]
pub struct Timer {
    catalog: SessionCatalog,
    phase_index: usize,
    remaining_seconds: i64,
    state: RunState,
    epoch: u64,
}

impl Timer {
    pub fn new(catalog: SessionCatalog) -> Self {
        let remaining_seconds = catalog.phase(0).initial_seconds;
        Self {
            catalog,
            phase_index: 0,
            remaining_seconds,
            state: RunState::Paused,
            epoch: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds
    }

    pub fn label(&self) -> &str {
        &self.catalog.phase(self.phase_index).label
    }

    pub fn toggle(&mut self) -> Effects {
        match self.state {
            RunState::Running => {
                self.state = RunState::Paused;
                Effects {
                    render: true,
                    ..Effects::default()
                }
            }
            RunState::Paused => {
                self.state = RunState::Running;
                self.epoch = self.epoch.wrapping_add(1);
                // Count the first second right away so the toggle is visible.
                let expired = self.decrement();
                Effects {
                    render: true,
                    schedule_tick: Some(self.epoch),
                    expired,
                }
            }
        }
    }

    pub fn advance(&mut self) -> Effects {
        self.state = RunState::Paused;
        self.phase_index = self.catalog.next_index(self.phase_index);
        self.remaining_seconds = self.catalog.phase(self.phase_index).initial_seconds;
        Effects {
            render: true,
            ..Effects::default()
        }
    }

    pub fn tick(&mut self, epoch: u64) -> Effects {
        if self.state != RunState::Running || epoch != self.epoch {
            return Effects::default();
        }
        let expired = self.decrement();
        Effects {
            render: true,
            schedule_tick: Some(self.epoch),
            expired,
        }
    }

    fn decrement(&mut self) -> bool {
        self.remaining_seconds -= 1;
        self.remaining_seconds == 0
    }
}
