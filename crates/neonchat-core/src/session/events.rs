use std::fmt;

/// Identifies one streaming connection opened by the controller
///
/// Ids are never reused within a controller, so events that arrive after
/// the controller dropped a connection can be recognised and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Transport event delivered to [`super::SessionController::handle_event`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub connection: ConnectionId,
    pub kind: ConnectionEventKind,
}

impl ConnectionEvent {
    pub fn opened(connection: ConnectionId) -> Self {
        Self {
            connection,
            kind: ConnectionEventKind::Opened,
        }
    }

    pub fn fragment(connection: ConnectionId, text: impl Into<String>) -> Self {
        Self {
            connection,
            kind: ConnectionEventKind::Fragment(text.into()),
        }
    }

    pub fn closed(connection: ConnectionId, code: u16, was_clean: bool) -> Self {
        Self {
            connection,
            kind: ConnectionEventKind::Closed { code, was_clean },
        }
    }

    pub fn failed(connection: ConnectionId, reason: impl Into<String>) -> Self {
        Self {
            connection,
            kind: ConnectionEventKind::Failed(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEventKind {
    /// Connection established; the turn request can be transmitted
    Opened,
    /// One chunk of reply text
    Fragment(String),
    /// Connection closed by either side
    Closed { code: u16, was_clean: bool },
    /// Connection could not be opened, or broke mid-stream
    Failed(String),
}

/// Notification clips the front end plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Send,
    Receive,
}

/// Work the controller queues for its driver, drained in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a streaming connection to `url`
    Connect { connection: ConnectionId, url: String },
    /// Send one text frame on an open connection
    Transmit { connection: ConnectionId, payload: String },
    /// Close a connection with the given status code
    Disconnect { connection: ConnectionId, code: u16 },
    /// The transcript must be re-rendered
    TranscriptChanged,
    /// Show or hide the typing indicator
    Typing(bool),
    /// Scroll the message list to the newest entry
    ScrollToLatest,
    PlaySound(Sound),
}
