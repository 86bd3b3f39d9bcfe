use std::time::Duration;

use futures::StreamExt;
use rand::Rng;
use reqwest::{header, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clients::invalidation::{invalidation_keys, CacheKey};
use crate::clients::sse::{SseFrame, SseParser};
use crate::events::EventName;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("stream ended")]
    Ended,
}

/// Where the subscriber is in its lifecycle. `GaveUp` is terminal until
/// the owner spawns a fresh client (say, after the user logs back in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    GaveUp,
}

/// A parsed event together with the cache buckets it invalidates.
#[derive(Debug, Clone)]
pub struct StreamUpdate {
    pub event: EventName,
    pub payload: Value,
    pub invalidation_keys: &'static [CacheKey],
}

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Full subscription URL including the identity query parameters.
    pub endpoint: String,
    /// First reconnect delay; doubles per failed attempt.
    pub initial_retry_delay: Duration,
    /// Ceiling for the doubled delay.
    pub max_retry_delay: Duration,
    /// Random extra delay added on top, spreading reconnect stampedes.
    pub max_jitter: Duration,
    /// Consecutive failed reconnects tolerated before giving up.
    pub max_attempts: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/api/events?role=user".to_string(),
            initial_retry_delay: Duration::from_millis(2000),
            max_retry_delay: Duration::from_millis(30_000),
            max_jitter: Duration::from_millis(1000),
            max_attempts: 10,
        }
    }
}

#[derive(Debug)]
enum Command {
    Shutdown,
}

enum SessionEnd {
    Shutdown,
    Error { was_connected: bool, error: StreamError },
}

/// Reconnecting subscriber for the server's event stream.
///
/// Consumers read parsed events from `updates()` and watch the
/// connection lifecycle through `state()`. Reconnection runs an explicit
/// state machine (disconnected, connecting, connected, and back to
/// disconnected on error) with exponentially backed-off retries and a
/// bounded number of attempts; the attempt counter resets whenever a
/// connection reaches HTTP 200.
pub struct EventStreamClient {
    command_tx: mpsc::UnboundedSender<Command>,
    updates: broadcast::Sender<StreamUpdate>,
    state_rx: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl EventStreamClient {
    pub fn spawn(config: StreamConfig) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, _) = broadcast::channel(256);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let updates = update_tx.clone();
        let task = tokio::spawn(async move {
            connection_task(config, command_rx, update_tx, state_tx).await;
        });

        Self {
            command_tx,
            updates,
            state_rx,
            task,
        }
    }

    pub fn updates(&self) -> broadcast::Receiver<StreamUpdate> {
        self.updates.subscribe()
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Explicit cancellation: tears down the connection and preempts any
    /// scheduled retry. Resolves once the connection task has exited.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(Command::Shutdown);
        let _ = self.task.await;
    }
}

async fn connection_task(
    config: StreamConfig,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    updates: broadcast::Sender<StreamUpdate>,
    state_tx: watch::Sender<ConnectionState>,
) {
    let client = reqwest::Client::new();
    let mut attempt: u32 = 0;

    loop {
        state_tx.send_replace(ConnectionState::Connecting);

        match run_session(&client, &config, &mut command_rx, &updates, &state_tx).await {
            SessionEnd::Shutdown => {
                info!("Event stream shut down");
                state_tx.send_replace(ConnectionState::Disconnected);
                return;
            }
            SessionEnd::Error {
                was_connected,
                error,
            } => {
                warn!("Event stream connection error: {}", error);
                if was_connected {
                    attempt = 0;
                }
                state_tx.send_replace(ConnectionState::Disconnected);

                if attempt >= config.max_attempts {
                    error!(
                        "Giving up after {} failed reconnect attempts",
                        config.max_attempts
                    );
                    state_tx.send_replace(ConnectionState::GaveUp);
                    return;
                }

                let delay = retry_delay(&config, attempt);
                attempt += 1;
                info!(
                    "Reconnecting in {:?} (attempt {}/{})",
                    delay, attempt, config.max_attempts
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = command_rx.recv() => {
                        info!("Event stream shut down during retry wait");
                        state_tx.send_replace(ConnectionState::Disconnected);
                        return;
                    }
                }
            }
        }
    }
}

async fn run_session(
    client: &reqwest::Client,
    config: &StreamConfig,
    command_rx: &mut mpsc::UnboundedReceiver<Command>,
    updates: &broadcast::Sender<StreamUpdate>,
    state_tx: &watch::Sender<ConnectionState>,
) -> SessionEnd {
    let request = client
        .get(&config.endpoint)
        .header(header::ACCEPT, "text/event-stream")
        .send();

    let response = tokio::select! {
        r = request => r,
        _ = command_rx.recv() => return SessionEnd::Shutdown,
    };

    let response = match response {
        Ok(r) => r,
        Err(e) => {
            return SessionEnd::Error {
                was_connected: false,
                error: StreamError::Request(e),
            }
        }
    };

    if response.status() != StatusCode::OK {
        return SessionEnd::Error {
            was_connected: false,
            error: StreamError::Status(response.status()),
        };
    }

    info!("Event stream connected");
    state_tx.send_replace(ConnectionState::Connected);

    let mut stream = response.bytes_stream();
    let mut parser = SseParser::new();

    loop {
        tokio::select! {
            chunk = stream.next() => match chunk {
                Some(Ok(bytes)) => {
                    for frame in parser.push(&bytes) {
                        dispatch_frame(frame, updates);
                    }
                }
                Some(Err(e)) => {
                    return SessionEnd::Error { was_connected: true, error: StreamError::Request(e) };
                }
                None => {
                    return SessionEnd::Error { was_connected: true, error: StreamError::Ended };
                }
            },
            _ = command_rx.recv() => return SessionEnd::Shutdown,
        }
    }
}

fn dispatch_frame(frame: SseFrame, updates: &broadcast::Sender<StreamUpdate>) {
    let event = match frame.event.parse::<EventName>() {
        Ok(event) => event,
        Err(_) => {
            debug!("Ignoring unknown event name: {}", frame.event);
            return;
        }
    };
    let payload = serde_json::from_str(&frame.data).unwrap_or(Value::Null);
    let _ = updates.send(StreamUpdate {
        event,
        payload,
        invalidation_keys: invalidation_keys(event),
    });
}

fn retry_delay(config: &StreamConfig, attempt: u32) -> Duration {
    let base = base_delay_ms(
        config.initial_retry_delay.as_millis() as u64,
        config.max_retry_delay.as_millis() as u64,
        attempt,
    );
    let jitter = rand::thread_rng().gen_range(0..=config.max_jitter.as_millis() as u64);
    Duration::from_millis(base + jitter)
}

/// `min(initial * 2^attempt, cap)` without overflow surprises.
fn base_delay_ms(initial: u64, cap: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    initial.saturating_mul(factor).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::timeout;

    #[test]
    fn config_defaults_match_the_platform() {
        let config = StreamConfig::default();
        assert_eq!(config.initial_retry_delay, Duration::from_millis(2000));
        assert_eq!(config.max_retry_delay, Duration::from_millis(30_000));
        assert_eq!(config.max_attempts, 10);
    }

    #[test]
    fn delay_doubles_until_the_cap() {
        assert_eq!(base_delay_ms(2000, 30_000, 0), 2000);
        assert_eq!(base_delay_ms(2000, 30_000, 1), 4000);
        assert_eq!(base_delay_ms(2000, 30_000, 2), 8000);
        assert_eq!(base_delay_ms(2000, 30_000, 3), 16_000);
        assert_eq!(base_delay_ms(2000, 30_000, 4), 30_000);
        assert_eq!(base_delay_ms(2000, 30_000, 63), 30_000);
        assert_eq!(base_delay_ms(2000, 30_000, 64), 30_000);
    }

    #[test]
    fn jitter_stays_within_its_bound() {
        let config = StreamConfig {
            initial_retry_delay: Duration::from_millis(100),
            max_jitter: Duration::from_millis(50),
            ..Default::default()
        };
        for _ in 0..50 {
            let delay = retry_delay(&config, 0);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }

    #[tokio::test]
    async fn known_frames_are_forwarded_with_their_keys() {
        let (tx, mut rx) = broadcast::channel(8);
        dispatch_frame(
            SseFrame {
                event: "deposits-updated".into(),
                data: "{\"credited\":1}".into(),
            },
            &tx,
        );
        let update = rx.try_recv().unwrap();
        assert_eq!(update.event, EventName::DepositsUpdated);
        assert_eq!(update.payload["credited"], 1);
        assert_eq!(update.invalidation_keys, invalidation_keys(update.event));
    }

    #[tokio::test]
    async fn unknown_event_names_are_dropped() {
        let (tx, mut rx) = broadcast::channel(8);
        dispatch_frame(
            SseFrame {
                event: "client-gossip".into(),
                data: "{}".into(),
            },
            &tx,
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn gives_up_after_exhausting_attempts() {
        // A listener that accepts and immediately closes makes every
        // attempt observable without ever producing a response.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        tokio::spawn(async move {
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    counter.fetch_add(1, Ordering::SeqCst);
                    drop(socket);
                }
            }
        });

        let client = EventStreamClient::spawn(StreamConfig {
            endpoint: format!("http://127.0.0.1:{}/api/events?role=user", port),
            initial_retry_delay: Duration::from_millis(1),
            max_retry_delay: Duration::from_millis(4),
            max_jitter: Duration::ZERO,
            max_attempts: 3,
        });

        let mut state = client.state();
        timeout(Duration::from_secs(5), async {
            loop {
                state.changed().await.unwrap();
                if *state.borrow() == ConnectionState::GaveUp {
                    break;
                }
            }
        })
        .await
        .expect("client should give up");

        // Initial try plus three reconnect attempts.
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn shutdown_preempts_a_scheduled_retry() {
        // Nothing listens on this port, and the retry delay is long; a
        // prompt shutdown proves the sleep is cancellable.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = EventStreamClient::spawn(StreamConfig {
            endpoint: format!("http://127.0.0.1:{}/api/events?role=user", port),
            initial_retry_delay: Duration::from_secs(30),
            max_retry_delay: Duration::from_secs(30),
            max_jitter: Duration::ZERO,
            max_attempts: 10,
        });

        // Let the first connect fail and the retry get scheduled.
        tokio::time::sleep(Duration::from_millis(100)).await;

        timeout(Duration::from_secs(1), client.shutdown())
            .await
            .expect("shutdown should preempt the retry sleep");
    }
}
