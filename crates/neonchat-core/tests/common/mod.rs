use neonchat_core::{
    Clock, ConnectionEvent, ConnectionId, Effect, KeyValueStore, MemoryStore, SessionController, Transcript,
    TranscriptStore, WidgetConfig,
};

/// Clock that always reports the same label
pub struct FixedClock(pub &'static str);

impl Clock for FixedClock {
    fn now(&self, _format: &str) -> String {
        self.0.to_string()
    }
}

/// Common test utilities for driving a controller through whole turns
pub struct TestSession {
    pub backend: MemoryStore,
    pub controller: SessionController,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_backend(MemoryStore::new())
    }

    pub fn with_backend(backend: MemoryStore) -> Self {
        let config = WidgetConfig::default();
        let store = TranscriptStore::new(Box::new(backend.clone()), config.storage_key.clone());
        let controller = SessionController::new(config, store, Box::new(FixedClock("T1")));
        Self { backend, controller }
    }

    /// Take the connection id from the next `Connect` effect
    pub fn expect_connect(&mut self) -> ConnectionId {
        self.controller
            .poll_effects()
            .into_iter()
            .find_map(|effect| match effect {
                Effect::Connect { connection, .. } => Some(connection),
                _ => None,
            })
            .expect("controller did not request a connection")
    }

    /// Deliver the open event followed by every fragment, in order
    pub fn stream(&mut self, connection: ConnectionId, fragments: &[String]) {
        self.controller.handle_event(ConnectionEvent::opened(connection));
        for fragment in fragments {
            self.controller
                .handle_event(ConnectionEvent::fragment(connection, fragment.clone()));
        }
    }

    pub fn close_normally(&mut self, connection: ConnectionId) {
        self.controller
            .handle_event(ConnectionEvent::closed(connection, 1000, true));
    }

    pub fn stored(&self) -> Option<Transcript> {
        let key = &self.controller.config().storage_key;
        self.backend
            .get(key)
            .expect("memory store never fails")
            .map(|json| serde_json::from_str(&json).expect("stored transcript is valid JSON"))
    }
}
