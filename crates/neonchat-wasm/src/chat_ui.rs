use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, KeyboardEvent};

use neonchat_core::{
    ConnectionEvent, ConnectionId, Effect, LocalClock, SessionController, SubmitOutcome, TranscriptStore,
    WidgetConfig,
};

use crate::dom;
use crate::sound::SoundBank;
use crate::storage::LocalStorage;
use crate::websocket::{self, Link};

const MESSAGES_ID: &str = "messagesContainer";
const TYPING_ID: &str = "typingIndicator";
const INPUT_ID: &str = "messageInput";
const SEND_ID: &str = "sendButton";
const CLEAR_ID: &str = "clearButton";

const SEND_LABEL: &str = "Ask AI!";
const CANCEL_LABEL: &str = "Cancel";

/// Binds a [`SessionController`] to the page: DOM, WebSocket tasks, sounds
pub struct ChatWidget {
    document: Document,
    messages: Element,
    typing: HtmlElement,
    input: HtmlInputElement,
    send_button: HtmlButtonElement,
    controller: RefCell<SessionController>,
    links: RefCell<HashMap<ConnectionId, Link>>,
    sounds: SoundBank,
}

impl ChatWidget {
    pub fn mount(config: WidgetConfig) -> Result<Rc<Self>, JsValue> {
        let document = crate::document()?;

        let typing = dom::typed_element_by_id::<HtmlElement>(&document, TYPING_ID)?;
        dom::set_text_content(&typing, &format!("{} is typing...", config.assistant_name));
        dom::hide_element(&typing);

        let store = TranscriptStore::new(Box::new(LocalStorage::open()?), config.storage_key.clone());
        let controller = SessionController::new(config, store, Box::new(LocalClock));
        log::info!("Chat session {}", controller.session_id());

        let widget = Rc::new(Self {
            messages: dom::get_element_by_id(&document, MESSAGES_ID)?,
            typing,
            input: dom::typed_element_by_id(&document, INPUT_ID)?,
            send_button: dom::typed_element_by_id(&document, SEND_ID)?,
            document,
            controller: RefCell::new(controller),
            links: RefCell::new(HashMap::new()),
            sounds: SoundBank::new(),
        });

        widget.setup_input()?;
        widget.setup_buttons()?;
        widget.setup_teardown()?;
        widget.refresh_controls();

        Ok(widget)
    }

    /// Restore history or request the greeting
    pub fn start(self: &Rc<Self>) {
        self.controller.borrow_mut().start();
        self.pump();
    }

    fn setup_input(self: &Rc<Self>) -> Result<(), JsValue> {
        let widget = self.clone();
        dom::add_listener(&self.input, "input", move |_event| {
            widget.refresh_controls();
        })?;

        let widget = self.clone();
        dom::add_listener(&self.input, "keydown", move |event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if key_event.key() == "Enter"
                && !widget.controller.borrow().is_busy()
                && !widget.input.value().trim().is_empty()
            {
                event.prevent_default();
                widget.submit_input();
            }
        })?;

        Ok(())
    }

    fn setup_buttons(self: &Rc<Self>) -> Result<(), JsValue> {
        let widget = self.clone();
        dom::add_listener(&self.send_button, "click", move |_event| {
            widget.submit_input();
        })?;

        let clear_button = dom::get_element_by_id(&self.document, CLEAR_ID)?;
        let widget = self.clone();
        dom::add_listener(&clear_button, "click", move |_event| {
            widget.controller.borrow_mut().clear();
            widget.pump();
        })?;

        Ok(())
    }

    fn setup_teardown(self: &Rc<Self>) -> Result<(), JsValue> {
        let window = crate::window()?;
        let widget = self.clone();
        dom::add_listener(&window, "pagehide", move |_event| {
            widget.controller.borrow_mut().shutdown();
            widget.pump();
        })
    }

    /// Send button and Enter key: submit, or cancel while a reply streams
    fn submit_input(self: &Rc<Self>) {
        let text = self.input.value();
        let outcome = self.controller.borrow_mut().submit(&text);
        if outcome == SubmitOutcome::Sent {
            self.input.set_value("");
        }
        self.pump();
    }

    fn deliver(self: &Rc<Self>, event: ConnectionEvent) {
        self.controller.borrow_mut().handle_event(event);
        self.pump();
    }

    /// Execute queued effects until the controller has nothing left
    fn pump(self: &Rc<Self>) {
        loop {
            let effects = self.controller.borrow_mut().poll_effects();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                if let Err(e) = self.apply(effect) {
                    log::error!("Failed to apply effect: {:?}", e);
                }
            }
        }

        // Handles for connections the controller let go of close their sockets on drop
        let active = self.controller.borrow().state().connection();
        self.links.borrow_mut().retain(|id, _| Some(*id) == active);

        self.refresh_controls();
    }

    fn apply(self: &Rc<Self>, effect: Effect) -> Result<(), JsValue> {
        match effect {
            Effect::Connect { connection, url } => {
                let widget = Rc::downgrade(self);
                let link = websocket::spawn_link(connection, url, move |event| {
                    if let Some(widget) = widget.upgrade() {
                        widget.deliver(event);
                    }
                });
                self.links.borrow_mut().insert(connection, link);
            }
            Effect::Transmit { connection, payload } => match self.links.borrow().get(&connection) {
                Some(link) => link.transmit(payload),
                None => log::warn!("No live link for {}", connection),
            },
            Effect::Disconnect { connection, code } => {
                if let Some(link) = self.links.borrow_mut().remove(&connection) {
                    link.close(code);
                }
            }
            Effect::TranscriptChanged => self.render_transcript()?,
            Effect::Typing(true) => dom::show_element(&self.typing),
            Effect::Typing(false) => dom::hide_element(&self.typing),
            Effect::ScrollToLatest => dom::scroll_to_bottom(&self.messages),
            Effect::PlaySound(sound) => self.sounds.play(sound),
        }
        Ok(())
    }

    fn render_transcript(&self) -> Result<(), JsValue> {
        dom::clear_element(&self.messages);

        let controller = self.controller.borrow();
        for message in controller.transcript() {
            let row = dom::create_element_with_class(
                &self.document,
                "div",
                &format!("message {}", message.alignment.as_str()),
            )?;

            let bubble = dom::create_element_with_class(&self.document, "div", "message-content")?;
            dom::set_text_content(&bubble, &message.text);
            row.append_child(&bubble)?;

            let time = dom::create_element_with_class(&self.document, "span", "message-time")?;
            dom::set_text_content(&time, &message.time);
            row.append_child(&time)?;

            self.messages.append_child(&row)?;
        }

        Ok(())
    }

    /// Input disabled while busy; the send button doubles as cancel
    fn refresh_controls(&self) {
        let busy = self.controller.borrow().is_busy();
        let blank = self.input.value().trim().is_empty();

        self.input.set_disabled(busy);
        self.send_button.set_disabled(!busy && blank);
        self.send_button
            .set_text_content(Some(if busy { CANCEL_LABEL } else { SEND_LABEL }));
        self.send_button
            .set_class_name(if busy { "send-button cancel" } else { "send-button" });
    }
}
