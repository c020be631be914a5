use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

/// Look up a required widget element; a missing one is a mount error
pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{} missing from page", id)))
}

/// Required element with a specific DOM type (`HtmlInputElement`, `HtmlButtonElement`, ...)
pub fn typed_element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    get_element_by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|element| JsValue::from_str(&format!("#{} has unexpected type <{}>", id, element.tag_name())))
}

/// New detached element carrying the given CSS class list
pub fn create_element_with_class(
    document: &Document,
    tag: &str,
    class: &str,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

/// Message text is always inserted as text, never parsed as markup
pub fn set_text_content(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

/// Drop every rendered bubble
pub fn clear_element(element: &Element) {
    element.set_text_content(None);
}

pub fn scroll_to_bottom(element: &Element) {
    if let Ok(html_element) = element.clone().dyn_into::<HtmlElement>() {
        html_element.set_scroll_top(html_element.scroll_height());
    }
}

/// Add a listener that lives as long as the page
pub fn add_listener<F>(target: &EventTarget, event: &str, callback: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Typing indicator is a flex row when visible
pub fn show_element(element: &HtmlElement) {
    let _ = element.style().set_property("display", "flex");
}

pub fn hide_element(element: &HtmlElement) {
    let _ = element.style().set_property("display", "none");
}
