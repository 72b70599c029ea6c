//! The control loop that owns the timer.
//!
//! Toggles, phase advances and ticks each arrive on their own channel and are
//! applied one at a time by [`Engine::run`]. Nothing else touches the timer.
//! The loop selects between ready channels without a fixed priority.

use crate::catalog::SessionCatalog;
use crate::display;
use crate::notify::Notifier;
use crate::timer::{Effects, Timer};
use anyhow::{anyhow, Result};
use std::io::Write;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Completed once the engine has applied the request.
type Ack = oneshot::Sender<()>;

/// Cloneable sender side of the engine, handed to connection tasks.
#[derive(Clone)]
pub struct EngineHandle {
    toggle_tx: mpsc::Sender<Ack>,
    advance_tx: mpsc::Sender<Ack>,
}

impl EngineHandle {
    /// Start or pause the countdown. Resolves after the change is rendered.
    pub async fn toggle(&self) -> Result<()> {
        handoff(&self.toggle_tx).await
    }

    /// Move to the next phase, paused. Resolves after the change is rendered.
    pub async fn advance(&self) -> Result<()> {
        handoff(&self.advance_tx).await
    }
}

async fn handoff(tx: &mpsc::Sender<Ack>) -> Result<()> {
    let (ack_tx, ack_rx) = oneshot::channel();
    tx.send(ack_tx)
        .await
        .map_err(|_| anyhow!("timer engine has stopped"))?;
    ack_rx
        .await
        .map_err(|_| anyhow!("timer engine has stopped"))
}

pub struct Engine {
    timer: Timer,
    notifier: Box<dyn Notifier>,
    display: Box<dyn Write + Send>,
    toggle_rx: mpsc::Receiver<Ack>,
    advance_rx: mpsc::Receiver<Ack>,
    tick_tx: mpsc::Sender<u64>,
    tick_rx: mpsc::Receiver<u64>,
}

impl Engine {
    pub fn new(
        catalog: SessionCatalog,
        notifier: Box<dyn Notifier>,
        display: Box<dyn Write + Send>,
    ) -> (Self, EngineHandle) {
        let (toggle_tx, toggle_rx) = mpsc::channel(1);
        let (advance_tx, advance_rx) = mpsc::channel(1);
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let engine = Self {
            timer: Timer::new(catalog),
            notifier,
            display,
            toggle_rx,
            advance_rx,
            tick_tx,
            tick_rx,
        };
        let handle = EngineHandle {
            toggle_tx,
            advance_tx,
        };
        (engine, handle)
    }

    /// Run until every [`EngineHandle`] has been dropped.
    pub async fn run(mut self) {
        self.render();

        loop {
            tokio::select! {
                msg = self.toggle_rx.recv() => {
                    let Some(ack) = msg else { break };
                    let effects = self.timer.toggle();
                    debug!(state = ?self.timer.state(), remaining = self.timer.remaining_seconds(), "toggled");
                    self.apply(effects);
                    let _ = ack.send(());
                }
                msg = self.advance_rx.recv() => {
                    let Some(ack) = msg else { break };
                    let effects = self.timer.advance();
                    debug!(phase = self.timer.phase_index(), remaining = self.timer.remaining_seconds(), "advanced");
                    self.apply(effects);
                    let _ = ack.send(());
                }
                Some(epoch) = self.tick_rx.recv() => {
                    let effects = self.timer.tick(epoch);
                    if effects == Effects::default() {
                        debug!(epoch, "dropped tick");
                    }
                    self.apply(effects);
                }
            }
        }

        debug!("all engine handles dropped, stopping");
    }

    fn apply(&mut self, effects: Effects) {
        if effects.expired {
            if let Err(e) = self.notifier.notify() {
                warn!("Failed to send notification: {:#}", e);
            }
        }
        if effects.render {
            self.render();
        }
        if let Some(epoch) = effects.schedule_tick {
            self.schedule_tick(epoch);
        }
    }

    fn schedule_tick(&self, epoch: u64) {
        let tick_tx = self.tick_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(TICK_INTERVAL).await;
            let _ = tick_tx.send(epoch).await;
        });
    }

    fn render(&mut self) {
        let line = display::status_line(self.timer.label(), self.timer.remaining_seconds());
        let written = writeln!(self.display, "{line}").and_then(|()| self.display.flush());
        if let Err(e) = written {
            warn!("Failed to write status line: {}", e);
        }
    }
}
