//! Browser bindings used by the widget.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    // LocalStorage bindings; access throws when storage is disabled or full.
    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
    pub fn ls_get_item(key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
    pub fn ls_set_item(key: &str, value: &str) -> Result<(), JsValue>;

    // Console logging for debugging
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = window)]
    pub fn alert(message: &str);

    // Timers
    #[wasm_bindgen(js_name = setTimeout)]
    pub fn set_timeout(handler: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = clearTimeout)]
    pub fn clear_timeout(id: i32);

    // Document
    #[derive(Clone)]
    pub type Element;

    #[wasm_bindgen(js_namespace = document, js_name = getElementById)]
    pub fn get_element_by_id(id: &str) -> Option<Element>;

    #[wasm_bindgen(js_namespace = document, js_name = querySelector)]
    pub fn query_selector(selector: &str) -> Option<Element>;

    #[wasm_bindgen(js_namespace = document, js_name = createElement)]
    pub fn create_element(tag: &str) -> Element;

    #[wasm_bindgen(js_namespace = ["document", "head"], js_name = appendChild)]
    pub fn append_to_head(child: &Element);

    #[wasm_bindgen(js_namespace = ["document", "body"], js_name = appendChild)]
    pub fn append_to_body(child: &Element);

    #[wasm_bindgen(method, getter)]
    pub fn value(this: &Element) -> String;

    #[wasm_bindgen(method, setter)]
    pub fn set_value(this: &Element, value: &str);

    #[wasm_bindgen(method, getter, js_name = innerHTML)]
    pub fn inner_html(this: &Element) -> String;

    #[wasm_bindgen(method, setter, js_name = innerHTML)]
    pub fn set_inner_html(this: &Element, html: &str);

    #[wasm_bindgen(method, setter, js_name = textContent)]
    pub fn set_text_content(this: &Element, text: &str);

    #[wasm_bindgen(method, setter, js_name = className)]
    pub fn set_class_name(this: &Element, class: &str);

    #[wasm_bindgen(method, setter)]
    pub fn set_id(this: &Element, id: &str);

    #[wasm_bindgen(method, setter)]
    pub fn set_disabled(this: &Element, disabled: bool);

    #[wasm_bindgen(method, getter, js_name = isConnected)]
    pub fn is_connected(this: &Element) -> bool;

    #[wasm_bindgen(method)]
    pub fn focus(this: &Element);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Element);

    #[wasm_bindgen(method)]
    pub fn reset(this: &Element);

    #[wasm_bindgen(method, js_name = appendChild)]
    pub fn append_child(this: &Element, child: &Element);

    #[wasm_bindgen(method, js_name = querySelector)]
    pub fn query_selector_in(this: &Element, selector: &str) -> Option<Element>;

    #[wasm_bindgen(method, getter)]
    pub fn style(this: &Element) -> Style;

    #[wasm_bindgen(method, js_name = addEventListener)]
    pub fn add_event_listener(this: &Element, kind: &str, listener: &Closure<dyn FnMut(Event)>);

    #[wasm_bindgen(method, js_name = removeEventListener)]
    pub fn remove_event_listener(
        this: &Element,
        kind: &str,
        listener: &Closure<dyn FnMut(Event)>,
    );

    pub type Style;

    #[wasm_bindgen(method, setter)]
    pub fn set_display(this: &Style, value: &str);

    #[wasm_bindgen(method, setter)]
    pub fn set_animation(this: &Style, value: &str);

    // Events
    pub type Event;

    #[wasm_bindgen(method, js_name = preventDefault)]
    pub fn prevent_default(this: &Event);

    pub type ErrorEvent;

    #[wasm_bindgen(method, getter)]
    pub fn message(this: &ErrorEvent) -> Option<String>;

    #[wasm_bindgen(method, getter)]
    pub fn filename(this: &ErrorEvent) -> Option<String>;

    #[wasm_bindgen(method, getter)]
    pub fn lineno(this: &ErrorEvent) -> Option<u32>;

    #[wasm_bindgen(js_namespace = window, js_name = addEventListener)]
    pub fn add_window_listener(kind: &str, listener: &Closure<dyn FnMut(ErrorEvent)>);

    #[wasm_bindgen(js_namespace = window, js_name = removeEventListener)]
    pub fn remove_window_listener(kind: &str, listener: &Closure<dyn FnMut(ErrorEvent)>);
}

/// Render a thrown JavaScript value for logs and error messages.
pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
