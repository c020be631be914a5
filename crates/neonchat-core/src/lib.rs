//! Core types and session logic for neonchat
//!
//! This crate holds everything that does not touch a browser: the message and
//! transcript model, widget configuration, the wire payload sent to the hosted
//! chatbot, transcript persistence, and the session controller state machine.
//! Front ends (see `neonchat-wasm`) drive the controller and execute the
//! effects it queues.

pub mod config;
pub mod error;
pub mod message;
pub mod protocol;
pub mod session;
pub mod store;

pub use config::WidgetConfig;
pub use error::{ChatError, Result};
pub use message::{Alignment, Message, Transcript};
pub use protocol::ChatRequest;
pub use session::{
    Clock, ConnectionEvent, ConnectionEventKind, ConnectionId, Effect, LocalClock, SessionController,
    SessionState, Sound, SubmitOutcome, TurnOutcome,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, TranscriptStore};

// ============================================================================
// Constants
// ============================================================================

/// Hosted chatbot streaming endpoint
pub const DEFAULT_ENDPOINT: &str = "wss://backend.buildpicoapps.com/api/chatbot/chat";

/// Application identifier the hosted service expects
pub const DEFAULT_APP_ID: &str = "word-almost";

/// Storage key holding the serialized transcript
pub const DEFAULT_STORAGE_KEY: &str = "ceo-ai-chat-history";

/// Directive sent with every turn
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "Y'ello, I am Mr Smile Foundation your AI developer for MOBILE AI and I am a software engineer.";

/// Instruction sent in place of user text for the session-opening turn
pub const DEFAULT_GREETING_PROMPT: &str = "A very short welcome message from the MR SMILE AI";

/// Name shown in the typing indicator
pub const DEFAULT_ASSISTANT_NAME: &str = "Mr Smile";

/// Timestamp format for message labels (2-digit hour and minute)
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// WebSocket normal-closure status code
pub const NORMAL_CLOSURE: u16 = 1000;
