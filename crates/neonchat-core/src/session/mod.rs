//! Session controller
//!
//! Drives one request/response turn at a time over a single streaming
//! connection. The controller performs no transport I/O: it consumes
//! [`ConnectionEvent`]s and user actions, mutates the transcript, persists it
//! through the [`TranscriptStore`], and queues [`Effect`]s that a front end
//! executes (open/send/close the socket, re-render, play sounds).

mod clock;
mod events;


pub use clock::{Clock, LocalClock};
pub use events::{ConnectionEvent, ConnectionEventKind, ConnectionId, Effect, Sound};

use std::collections::VecDeque;

use crate::config::WidgetConfig;
use crate::message::{Message, Transcript};
use crate::protocol::ChatRequest;
use crate::store::TranscriptStore;
use crate::NORMAL_CLOSURE;

/// Where the controller is in the turn lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No connection held; input accepted
    Idle,
    /// Connection requested, request waiting for the open event
    Sending { connection: ConnectionId, payload: String },
    /// Request transmitted; reply fragments accumulate in `reply`
    StreamingOpen { connection: ConnectionId, reply: String },
}

impl SessionState {
    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            SessionState::Idle => None,
            SessionState::Sending { connection, .. } | SessionState::StreamingOpen { connection, .. } => {
                Some(*connection)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Sending { .. } => "sending",
            SessionState::StreamingOpen { .. } => "streaming",
        }
    }
}

/// How the most recent turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Connection closed normally
    Completed,
    /// Connection closed abnormally or broke
    Failed(String),
    /// Closed locally by `cancel()` or `shutdown()`
    Cancelled,
}

/// Result of [`SessionController::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing happened
    Ignored,
    /// Outgoing message recorded and a connection requested
    Sent,
    /// A turn was in flight, so the submit cancelled it instead
    Cancelled,
}

pub struct SessionController {
    config: WidgetConfig,
    session_id: String,
    store: TranscriptStore,
    clock: Box<dyn Clock>,
    transcript: Transcript,
    state: SessionState,
    started: bool,
    next_connection: u64,
    last_outcome: Option<TurnOutcome>,
    effects: VecDeque<Effect>,
}

impl SessionController {
    pub fn new(config: WidgetConfig, store: TranscriptStore, clock: Box<dyn Clock>) -> Self {
        let session_id = config
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        log::debug!("Session controller created for session {}", session_id);

        Self {
            config,
            session_id,
            store,
            clock,
            transcript: Transcript::new(),
            state: SessionState::Idle,
            started: false,
            next_connection: 0,
            last_outcome: None,
            effects: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True while a connection is held (sending or streaming)
    pub fn is_busy(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Typing indicator is asserted for as long as a connection is held
    pub fn is_typing(&self) -> bool {
        self.is_busy()
    }

    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    /// Drain queued effects in the order they were emitted
    pub fn poll_effects(&mut self) -> Vec<Effect> {
        self.effects.drain(..).collect()
    }

    /// Restore persisted history, or open the greeting turn when there is none.
    ///
    /// Runs once per controller and only while idle; other calls are ignored.
    pub fn start(&mut self) {
        if self.started {
            log::debug!("Session {} already started", self.session_id);
            return;
        }
        if self.is_busy() {
            log::debug!("Start ignored while {}", self.state.name());
            return;
        }
        self.started = true;

        match self.store.load() {
            Some(history) if !history.is_empty() => {
                log::info!("Restored {} messages from history", history.len());
                self.transcript = history;
                self.effects.push_back(Effect::TranscriptChanged);
                self.effects.push_back(Effect::ScrollToLatest);
            }
            _ => {
                log::info!("No chat history, requesting greeting");
                let greeting = self.config.greeting_prompt.clone();
                self.open_turn(greeting);
            }
        }
    }

    /// Send user text, or cancel the turn in flight.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if self.is_busy() {
            log::debug!("Submit while {} treated as cancel", self.state.name());
            self.cancel();
            return SubmitOutcome::Cancelled;
        }

        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.effects.push_back(Effect::PlaySound(Sound::Send));

        let time = self.clock.now(&self.config.time_format);
        self.transcript.push(Message::outgoing(text, time));
        self.store.save(&self.transcript);
        self.effects.push_back(Effect::TranscriptChanged);
        self.effects.push_back(Effect::ScrollToLatest);

        self.open_turn(text.to_string());
        SubmitOutcome::Sent
    }

    /// Close the connection in flight with a normal-closure code.
    ///
    /// Returns `false` (and does nothing) when idle.
    pub fn cancel(&mut self) -> bool {
        let Some(connection) = self.state.connection() else {
            return false;
        };

        log::info!("Cancelling turn on {}", connection);
        self.effects.push_back(Effect::Disconnect {
            connection,
            code: NORMAL_CLOSURE,
        });
        self.finish_turn(TurnOutcome::Cancelled);
        true
    }

    /// Drop all history, in memory and in storage.
    ///
    /// A turn in flight keeps streaming; no greeting is requested.
    pub fn clear(&mut self) {
        log::info!("Clearing chat history");
        self.store.clear();
        self.transcript.clear();
        self.effects.push_back(Effect::TranscriptChanged);
    }

    /// Page teardown: release the connection and persist
    pub fn shutdown(&mut self) {
        if self.cancel() {
            log::debug!("Session {} shut down with a turn in flight", self.session_id);
        }
    }

    /// Transition function for transport events
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        let ConnectionEvent { connection, kind } = event;

        if self.state.connection() != Some(connection) {
            log::debug!("Ignoring {:?} from stale {}", kind, connection);
            return;
        }

        match kind {
            ConnectionEventKind::Opened => self.on_opened(connection),
            ConnectionEventKind::Fragment(text) => self.on_fragment(connection, &text),
            ConnectionEventKind::Closed { code, was_clean } => {
                if was_clean || code == NORMAL_CLOSURE {
                    log::info!("Reply complete on {}", connection);
                    self.finish_turn(TurnOutcome::Completed);
                } else {
                    log::warn!("{} closed abnormally (code {})", connection, code);
                    self.finish_turn(TurnOutcome::Failed(format!("closed with code {}", code)));
                }
            }
            ConnectionEventKind::Failed(reason) => {
                log::warn!("{} failed: {}", connection, reason);
                self.finish_turn(TurnOutcome::Failed(reason));
            }
        }
    }

    fn allocate_connection(&mut self) -> ConnectionId {
        self.next_connection += 1;
        ConnectionId(self.next_connection)
    }

    fn open_turn(&mut self, message: String) {
        let request = ChatRequest {
            session_id: self.session_id.clone(),
            app_id: self.config.app_id.clone(),
            system_prompt: self.config.system_prompt.clone(),
            message,
        };
        let payload = match request.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Failed to encode chat request: {}", e);
                return;
            }
        };

        let connection = self.allocate_connection();
        log::info!("Opening {} to {}", connection, self.config.endpoint);

        self.state = SessionState::Sending { connection, payload };
        self.last_outcome = None;
        self.effects.push_back(Effect::Typing(true));
        self.effects.push_back(Effect::Connect {
            connection,
            url: self.config.endpoint.clone(),
        });
    }

    fn on_opened(&mut self, connection: ConnectionId) {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        self.state = match state {
            SessionState::Sending { connection, payload } => {
                self.effects.push_back(Effect::Transmit { connection, payload });
                SessionState::StreamingOpen {
                    connection,
                    reply: String::new(),
                }
            }
            other => {
                log::debug!("Duplicate open event for {}", connection);
                other
            }
        };
    }

    fn on_fragment(&mut self, connection: ConnectionId, text: &str) {
        if let SessionState::Sending { .. } = self.state {
            log::warn!("Fragment on {} before open event", connection);
            self.state = SessionState::StreamingOpen {
                connection,
                reply: String::new(),
            };
        }

        let SessionState::StreamingOpen { reply, .. } = &mut self.state else {
            return;
        };
        reply.push_str(text);

        let clock = &self.clock;
        let format = &self.config.time_format;
        self.transcript.reconcile_reply(reply.as_str(), || clock.now(format));

        self.effects.push_back(Effect::PlaySound(Sound::Receive));
        self.effects.push_back(Effect::TranscriptChanged);
        self.effects.push_back(Effect::ScrollToLatest);
    }

    fn finish_turn(&mut self, outcome: TurnOutcome) {
        log::debug!("Turn finished from {}: {:?}", self.state.name(), outcome);
        self.state = SessionState::Idle;
        self.last_outcome = Some(outcome);
        self.effects.push_back(Effect::Typing(false));
        self.store.save(&self.transcript);
    }
}
