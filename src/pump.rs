//! Timer-driven message pump.
//!
//! Single-threaded and cooperative: on each tick the pump drains
//! pending platform notifications into the session, then performs one
//! bounded-wait poll against the protocol engine and dispatches
//! whatever arrived. Dispatch runs on the same thread that handles
//! input, so a slow dispatch blocks input for its duration — an
//! accepted trade-off of the cooperative model.
//!
//! A protocol-level dispatch failure is fatal: the pump signals
//! application-wide shutdown on its watch channel and deregisters
//! itself, guaranteeing it never fires again during teardown.
//!
//! [`tick`](MessagePump::tick) is the deterministic single step;
//! [`run`](MessagePump::run) paces ticks on the configured period via
//! `tokio::time`. Tests drive `tick` directly with a scripted engine,
//! no clock or network needed.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, trace};

use crate::config::PumpConfig;
use crate::error::SessionError;
use crate::platform::Platform;
use crate::present::PresentTarget;
use crate::protocol::ProtocolEngine;
use crate::session::Session;

// ── Tick ─────────────────────────────────────────────────────────

/// Outcome of one pump tick.
#[derive(Debug)]
pub enum Tick {
    /// No protocol data arrived within the bounded wait.
    Idle,
    /// Dispatched this many inbound updates.
    Dispatched(usize),
    /// Protocol failure: shutdown has been signalled and the pump is
    /// deregistered.
    Fatal(SessionError),
    /// The pump was already stopped; it will not fire again.
    Stopped,
}

// ── MessagePump ──────────────────────────────────────────────────

/// Drives the poll/dispatch cycle for one session.
pub struct MessagePump {
    period: Duration,
    poll_timeout: Duration,
    stopped: bool,
    shutdown_tx: watch::Sender<bool>,
}

impl MessagePump {
    /// Create a pump with the given timing configuration.
    pub fn new(config: &PumpConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            period: config.tick(),
            poll_timeout: config.poll_timeout(),
            stopped: false,
            shutdown_tx,
        }
    }

    /// A receiver that flips to `true` when the pump hits a fatal
    /// protocol error or is stopped. The embedding application
    /// watches this to schedule termination.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Whether the pump has been deregistered.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stop the pump. After this, every tick returns
    /// [`Tick::Stopped`] and [`run`](Self::run) exits.
    pub fn stop(&mut self) {
        self.stopped = true;
        let _ = self.shutdown_tx.send(true);
    }

    /// Perform one pump cycle: drain platform notifications, then
    /// poll (bounded) and dispatch protocol data.
    pub fn tick<E, P, T>(&mut self, session: &mut Session<E, P, T>) -> Tick
    where
        E: ProtocolEngine,
        P: Platform,
        T: PresentTarget,
    {
        if self.stopped {
            return Tick::Stopped;
        }

        // Platform events first, so hotkey handling during this tick
        // sees the freshest confirmed capture status.
        if let Err(e) = session.drain_platform_events() {
            return self.fail(e);
        }

        match session.pump_cycle(self.poll_timeout) {
            Ok(0) => Tick::Idle,
            Ok(n) => {
                trace!(updates = n, "dispatched");
                Tick::Dispatched(n)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Run the pump until it stops or a protocol error occurs.
    ///
    /// Cooperative single-task loop; intended to run on the same
    /// runtime thread as input handling:
    ///
    /// ```no_run
    /// # use vnc_session::pump::MessagePump;
    /// # use vnc_session::config::PumpConfig;
    /// # async fn example<E, P, T>(mut session: vnc_session::session::Session<E, P, T>)
    /// # where
    /// #     E: vnc_session::protocol::ProtocolEngine,
    /// #     P: vnc_session::platform::Platform,
    /// #     T: vnc_session::present::PresentTarget,
    /// # {
    /// let mut pump = MessagePump::new(&PumpConfig::default());
    /// let shutdown = pump.shutdown_signal();
    /// pump.run(&mut session).await.ok();
    /// # }
    /// ```
    pub async fn run<E, P, T>(&mut self, session: &mut Session<E, P, T>) -> Result<(), SessionError>
    where
        E: ProtocolEngine,
        P: Platform,
        T: PresentTarget,
    {
        loop {
            match self.tick(session) {
                Tick::Stopped => return Ok(()),
                Tick::Fatal(e) => return Err(e),
                Tick::Idle | Tick::Dispatched(_) => {}
            }
            tokio::time::sleep(self.period).await;
        }
    }

    /// Record a fatal failure: deregister and signal shutdown.
    fn fail(&mut self, e: SessionError) -> Tick {
        error!("protocol failure, shutting down: {e}");
        self.stopped = true;
        let _ = self.shutdown_tx.send(true);
        Tick::Fatal(e)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_flips_the_shutdown_signal() {
        let mut pump = MessagePump::new(&PumpConfig::default());
        let rx = pump.shutdown_signal();
        assert!(!*rx.borrow());

        pump.stop();
        assert!(pump.is_stopped());
        assert!(*rx.borrow());
    }

    #[test]
    fn timing_comes_from_config() {
        let pump = MessagePump::new(&PumpConfig {
            tick_ms: 25,
            poll_timeout_ms: 100,
        });
        assert_eq!(pump.period, Duration::from_millis(25));
        assert_eq!(pump.poll_timeout, Duration::from_millis(100));
    }
}
