use serde::{Deserialize, Serialize};

// ============================================================================
// Message Types
// ============================================================================

/// Which side of the conversation a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Reply text streamed from the chatbot
    #[serde(alias = "left")]
    Incoming,
    /// Text typed by the user
    #[serde(alias = "right")]
    Outgoing,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Incoming => "incoming",
            Alignment::Outgoing => "outgoing",
        }
    }
}

/// One entry in the visible transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub alignment: Alignment,
    #[serde(default)]
    pub time: String,
}

impl Message {
    pub fn incoming(text: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alignment: Alignment::Incoming,
            time: time.into(),
        }
    }

    pub fn outgoing(text: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alignment: Alignment::Outgoing,
            time: time.into(),
        }
    }

    pub fn is_incoming(&self) -> bool {
        self.alignment == Alignment::Incoming
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// Ordered message history, the unit of persistence
///
/// Append-only, except that the trailing incoming entry is rewritten while
/// its reply is still streaming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Merge the accumulated reply text into the transcript.
    ///
    /// The trailing entry is overwritten when it is incoming; otherwise (empty
    /// transcript or trailing outgoing entry) a new incoming entry is appended,
    /// stamped with `time()`. Returns `true` when an entry was created.
    pub fn reconcile_reply<F>(&mut self, reply: &str, time: F) -> bool
    where
        F: FnOnce() -> String,
    {
        match self.messages.last_mut() {
            Some(last) if last.is_incoming() => {
                last.text.clear();
                last.text.push_str(reply);
                false
            }
            _ => {
                self.messages.push(Message::incoming(reply, time()));
                true
            }
        }
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reconcile_creates_entry_on_empty_transcript() {
        let mut transcript = Transcript::new();
        let created = transcript.reconcile_reply("Hi", || "10:00".to_string());

        assert!(created);
        assert_eq!(transcript.messages(), &[Message::incoming("Hi", "10:00")]);
    }

    #[test]
    fn test_reconcile_creates_entry_after_outgoing() {
        let mut transcript = Transcript::from(vec![Message::outgoing("hello", "10:00")]);
        let created = transcript.reconcile_reply("Hey", || "10:01".to_string());

        assert!(created);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last(), Some(&Message::incoming("Hey", "10:01")));
    }

    #[test]
    fn test_reconcile_rewrites_trailing_incoming_and_keeps_time() {
        let mut transcript = Transcript::from(vec![
            Message::outgoing("hello", "10:00"),
            Message::incoming("He", "10:01"),
        ]);
        let created = transcript.reconcile_reply("Hello there", || panic!("clock must not be read"));

        assert!(!created);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last(), Some(&Message::incoming("Hello there", "10:01")));
    }

    #[test]
    fn test_alignment_serializes_lowercase() {
        let json = serde_json::to_string(&Message::outgoing("hi", "09:30")).unwrap();
        assert_eq!(json, r#"{"text":"hi","alignment":"outgoing","time":"09:30"}"#);
    }

    #[test]
    fn test_legacy_left_right_alignment_is_accepted() {
        let json = r#"[
            {"text":"hello","alignment":"right","time":"09:30"},
            {"text":"Hi!","alignment":"left","time":"09:30"}
        ]"#;
        let transcript: Transcript = serde_json::from_str(json).unwrap();

        assert_eq!(transcript.messages()[0].alignment, Alignment::Outgoing);
        assert_eq!(transcript.messages()[1].alignment, Alignment::Incoming);
    }

    #[test]
    fn test_transcript_is_a_bare_json_array() {
        let transcript = Transcript::from(vec![Message::incoming("a", "t")]);
        let value = serde_json::to_value(&transcript).unwrap();
        assert!(value.is_array());
    }
}
