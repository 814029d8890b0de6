//! Async runtime around [`CombatMeter`]
//!
//! One task owns the meter and multiplexes commands, the websocket and the
//! publish ticks with `select!`, so no locks guard meter state.

mod handle;
pub mod transport;

#[cfg(test)]
mod tests;

pub use handle::MeterHandle;
pub use transport::{Inbound, TransportError};

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};

use relink_act_types::{CombatData, MeterConfig};

use crate::dispatch::{Handler, MessageKind};
use crate::meter::CombatMeter;
use crate::scheduler::TickTransition;
use transport::WsStream;

/// Tick source period, roughly one display frame
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("meter service is not running")]
    Stopped,
}

/// Commands sent from a [`MeterHandle`] to the service task
pub enum MeterCommand {
    Subscribe {
        kind: MessageKind,
        handler: Handler,
    },
    Unsubscribe {
        kind: MessageKind,
        handler: Handler,
        reply: oneshot::Sender<bool>,
    },
    CurrentCombat(oneshot::Sender<Option<CombatData>>),
    Shutdown,
}

impl fmt::Debug for MeterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterCommand::Subscribe { kind, .. } => write!(f, "Subscribe({kind})"),
            MeterCommand::Unsubscribe { kind, .. } => write!(f, "Unsubscribe({kind})"),
            MeterCommand::CurrentCombat(_) => f.write_str("CurrentCombat"),
            MeterCommand::Shutdown => f.write_str("Shutdown"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Meter Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct MeterService {
    meter: CombatMeter,
    endpoint: String,
    reconnect_delay: Duration,
    cmd_rx: mpsc::Receiver<MeterCommand>,
}

impl MeterService {
    pub fn new(config: MeterConfig) -> (Self, MeterHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let service = Self {
            meter: CombatMeter::new(&config),
            endpoint: config.endpoint_url(),
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            cmd_rx,
        };
        (service, MeterHandle { cmd_tx })
    }

    /// Run until shutdown or until every handle is dropped.
    pub async fn run(self) {
        let Self {
            mut meter,
            endpoint,
            reconnect_delay,
            mut cmd_rx,
        } = self;

        let started = Instant::now();
        let mut link = Link::Waiting(started);
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(%endpoint, "meter service started");

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    tracing::debug!(?cmd, "service command");
                    match cmd {
                        MeterCommand::Subscribe { kind, handler } => {
                            if meter.subscribe(kind, handler) == TickTransition::Started {
                                ticker.reset_immediately();
                                tracing::debug!("publish ticks started");
                            }
                        }
                        MeterCommand::Unsubscribe { kind, handler, reply } => {
                            let transition = meter.unsubscribe(kind, &handler);
                            if transition == Some(TickTransition::Stopped) {
                                tracing::debug!("publish ticks stopped");
                            }
                            let _ = reply.send(transition.is_some());
                        }
                        MeterCommand::CurrentCombat(reply) => {
                            let _ = reply.send(meter.current_combat());
                        }
                        MeterCommand::Shutdown => break,
                    }
                }

                event = link.next_event() => {
                    match event {
                        LinkEvent::Retry => {
                            let url = endpoint.clone();
                            link = Link::Connecting(Box::pin(async move { transport::connect(&url).await }));
                        }
                        LinkEvent::Connected(Ok(stream)) => {
                            tracing::info!(%endpoint, "connected");
                            link = Link::Open(stream);
                        }
                        LinkEvent::Connected(Err(e)) => {
                            tracing::warn!(
                                error = %e,
                                retry_ms = reconnect_delay.as_millis() as u64,
                                "connection failed"
                            );
                            link = Link::Waiting(Instant::now() + reconnect_delay);
                        }
                        LinkEvent::Inbound(Inbound::Payload(text)) => {
                            if let Err(e) = meter.handle_payload(&text) {
                                tracing::warn!(error = %e, "dropping payload");
                            }
                        }
                        LinkEvent::Inbound(Inbound::Closed) => {
                            tracing::info!(
                                retry_ms = reconnect_delay.as_millis() as u64,
                                "disconnected, scheduling reconnect"
                            );
                            link = Link::Waiting(Instant::now() + reconnect_delay);
                        }
                        LinkEvent::Inbound(Inbound::Ignored) => {}
                    }
                }

                _ = ticker.tick(), if meter.is_ticking() => {
                    let now_ms = started.elapsed().as_millis() as i64;
                    meter.tick(now_ms, link.is_open());
                }
            }
        }

        tracing::info!("meter service stopped");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection State
// ─────────────────────────────────────────────────────────────────────────────

type ConnectFuture = Pin<Box<dyn Future<Output = Result<WsStream, TransportError>> + Send>>;

/// Connection lifecycle. Dropping it drops any socket or pending attempt.
enum Link {
    /// Reconnect scheduled at the given instant
    Waiting(Instant),
    Connecting(ConnectFuture),
    Open(WsStream),
}

enum LinkEvent {
    Retry,
    Connected(Result<WsStream, TransportError>),
    Inbound(Inbound),
}

impl Link {
    fn is_open(&self) -> bool {
        matches!(self, Link::Open(_))
    }

    /// Wait for the next state change. Cancel safe: a pending connect
    /// attempt stays in `self` and resumes on the next call.
    async fn next_event(&mut self) -> LinkEvent {
        match self {
            Link::Waiting(at) => {
                sleep_until(*at).await;
                LinkEvent::Retry
            }
            Link::Connecting(attempt) => LinkEvent::Connected(attempt.as_mut().await),
            Link::Open(stream) => LinkEvent::Inbound(transport::next_inbound(stream).await),
        }
    }
}
