//! Interaction session controller.
//!
//! Owns the single active streamed turn: issues the request, drives the
//! decode loop on a spawned task, and applies decoded events to the
//! session state behind a clonable handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use log::{debug, error, trace, warn};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::StatusCode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use talewire_core_types::{InteractionTurn, StreamStatus};

use crate::config::ClientConfig;
use crate::decoder::{decode_line, DecodedLine};
use crate::error::InteractionError;
use crate::line_buffer::LineBuffer;
use crate::session::StreamSession;

/// Read access to a live session's state.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<Mutex<StreamSession>>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> StreamSession {
        lock(&self.state).clone()
    }

    pub fn status(&self) -> StreamStatus {
        lock(&self.state).status
    }
}

struct ActiveStream {
    state: Arc<Mutex<StreamSession>>,
    cancel: CancellationToken,
}

/// Owns one streamed turn at a time.
///
/// Starting a new turn unconditionally tears down the previous one, so
/// the session state never has two writers. The consuming view calls
/// [`SessionController::disconnect`] on unmount to release the stream.
pub struct SessionController {
    http: reqwest::Client,
    config: ClientConfig,
    active: Option<ActiveStream>,
    retry_attempt: u32,
    raw_tap: Option<mpsc::UnboundedSender<String>>,
}

impl SessionController {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            active: None,
            retry_attempt: 0,
            raw_tap: None,
        }
    }

    /// Mirror every raw protocol line into `tx` for diagnostics.
    pub fn with_raw_tap(mut self, tx: mpsc::UnboundedSender<String>) -> Self {
        self.raw_tap = Some(tx);
        self
    }

    /// Start a new turn. Returns once the response is readable; the reply
    /// keeps streaming on a background task after this resolves.
    ///
    /// Failures do not propagate; the returned session carries them in
    /// `last_error`.
    pub async fn connect(&mut self, turn: &InteractionTurn) -> SessionHandle {
        self.retry_attempt = 0;
        self.begin_turn(turn).await
    }

    /// Release the active stream. Idempotent; a session that already ended
    /// keeps its terminal status.
    pub fn disconnect(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("tearing down active stream");
            active.cancel.cancel();
            lock(&active.state).cancel();
        }
    }

    /// Explicit retry of a failed turn with multiplicative backoff.
    ///
    /// Each call waits `retry_base_delay × attempt` and makes one fresh
    /// connection attempt; once `max_retry_attempts` calls have failed, no
    /// further network attempt is made until a turn succeeds or a new
    /// [`SessionController::connect`] resets the budget.
    pub async fn retry(&mut self, turn: &InteractionTurn) -> SessionHandle {
        let max = self.config.max_retry_attempts;
        if self.retry_attempt >= max {
            warn!("retry budget exhausted, not contacting the backend");
            return self.errored_handle(InteractionError::RetriesExhausted { attempts: max });
        }

        self.retry_attempt += 1;
        let attempt = self.retry_attempt;
        let delay = self.config.retry_base_delay() * attempt;
        debug!("retry attempt {attempt}/{max} after {delay:?}");
        tokio::time::sleep(delay).await;

        let handle = self.begin_turn(turn).await;
        if handle.status() == StreamStatus::Errored {
            warn!("retry attempt {attempt}/{max} failed");
            if attempt >= max {
                lock_active_error_message(
                    &self.active,
                    InteractionError::RetriesExhausted { attempts: max },
                );
            }
        } else {
            self.retry_attempt = 0;
        }
        handle
    }

    async fn begin_turn(&mut self, turn: &InteractionTurn) -> SessionHandle {
        self.disconnect();

        let state = Arc::new(Mutex::new(StreamSession::connecting()));
        let cancel = CancellationToken::new();
        self.active = Some(ActiveStream {
            state: state.clone(),
            cancel: cancel.clone(),
        });
        let handle = SessionHandle {
            state: state.clone(),
        };

        match self.open_stream(turn).await {
            Ok(response) => {
                lock(&state).status = StreamStatus::Streaming;
                tokio::spawn(read_loop(response, state, cancel, self.raw_tap.clone()));
            }
            Err(err) => {
                error!("turn request failed: {err}");
                lock(&state).fail(err.to_string());
            }
        }
        handle
    }

    async fn open_stream(
        &self,
        turn: &InteractionTurn,
    ) -> Result<reqwest::Response, InteractionError> {
        match self.send_turn(turn).await {
            Err(InteractionError::Status(StatusCode::BAD_GATEWAY)) => {
                // Transient gateway hiccup: one silent retry, then surface.
                let delay = self.config.gateway_retry_delay();
                debug!("gateway unavailable, retrying once after {delay:?}");
                tokio::time::sleep(delay).await;
                self.send_turn(turn).await
            }
            result => result,
        }
    }

    async fn send_turn(
        &self,
        turn: &InteractionTurn,
    ) -> Result<reqwest::Response, InteractionError> {
        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .json(&turn.request_body());
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InteractionError::Status(status));
        }
        Ok(response)
    }

    fn errored_handle(&mut self, err: InteractionError) -> SessionHandle {
        if let Some(active) = &self.active {
            let mut session = lock(&active.state);
            if session.status == StreamStatus::Errored {
                session.last_error = Some(err.to_string());
                return SessionHandle {
                    state: active.state.clone(),
                };
            }
        }

        let mut session = StreamSession::default();
        session.fail(err.to_string());
        let state = Arc::new(Mutex::new(session));
        self.active = Some(ActiveStream {
            state: state.clone(),
            cancel: CancellationToken::new(),
        });
        SessionHandle { state }
    }
}

fn lock(state: &Mutex<StreamSession>) -> MutexGuard<'_, StreamSession> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_active_error_message(active: &Option<ActiveStream>, err: InteractionError) {
    if let Some(active) = active {
        lock(&active.state).last_error = Some(err.to_string());
    }
}

#[derive(PartialEq)]
enum LineFlow {
    Continue,
    Stop,
}

async fn read_loop(
    response: reqwest::Response,
    state: Arc<Mutex<StreamSession>>,
    cancel: CancellationToken,
    raw_tap: Option<mpsc::UnboundedSender<String>>,
) {
    let mut stream = response.bytes_stream();
    let mut buffer = LineBuffer::new();

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("stream cancelled");
                lock(&state).cancel();
                return;
            }
            next = stream.next() => next,
        };

        match next {
            Some(Ok(bytes)) => {
                for line in buffer.push(&bytes) {
                    if process_line(&line, &state, &raw_tap) == LineFlow::Stop {
                        return;
                    }
                }
            }
            Some(Err(e)) => {
                if cancel.is_cancelled() {
                    // A closed connection resolves the pending read as an
                    // error; that is normal termination.
                    lock(&state).cancel();
                } else {
                    let err = InteractionError::Read(e.to_string());
                    error!("{err}");
                    lock(&state).fail(err.to_string());
                }
                return;
            }
            None => {
                if let Some(tail) = buffer.finish() {
                    if process_line(&tail, &state, &raw_tap) == LineFlow::Stop {
                        return;
                    }
                }
                lock(&state).complete();
                return;
            }
        }
    }
}

fn process_line(
    line: &str,
    state: &Mutex<StreamSession>,
    raw_tap: &Option<mpsc::UnboundedSender<String>>,
) -> LineFlow {
    trace!("protocol line: {line:?}");
    if let Some(tap) = raw_tap {
        let _ = tap.send(line.to_string());
    }
    match decode_line(line) {
        Some(DecodedLine::Done) => {
            lock(state).complete();
            LineFlow::Stop
        }
        Some(DecodedLine::Event(event)) => {
            let mut session = lock(state);
            session.apply(event);
            if session.status.is_terminal() {
                LineFlow::Stop
            } else {
                LineFlow::Continue
            }
        }
        None => LineFlow::Continue,
    }
}
