//! The widget as the browser sees it.
//!
//! [`BookingWidget::mount`] is the single entry point for the hosting page. It
//! wires the DOM, `localStorage` and timers into a [`BookingController`] and
//! keeps every listener it attached until the widget is disposed or dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;

use crate::admin::{ADMIN_STATS_ID, AdminSummary, refresh_admin_panel};
use crate::clock::SystemClock;
use crate::config::BookingConfig;
use crate::controller::{BookingController, Environment};
use crate::error::{BookingError, Result};
use crate::ledger::BookingLedger;
use crate::logging::init_logging;
use crate::notify::{
    CLOSE_CLASS, FADE_OUT_ANIMATION, MARKER_CLASS, NotificationId, NotificationSurface, Notifier,
    STYLESHEET, STYLESHEET_ID, Severity,
};
use crate::page::{BookingPage, FORM_ID, MODAL_ID, SUBMIT_SELECTOR};
use crate::scheduler::{Scheduler, Task, TaskHandle};
use crate::store::KeyValueStore;
use crate::validate::Field;
use crate::wasm::{self, Element, ErrorEvent, Event};

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        wasm::ls_get_item(key).map_err(|e| BookingError::storage(wasm::describe(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        wasm::ls_set_item(key, value).map_err(|e| BookingError::storage(wasm::describe(&e)))
    }
}

/// `setTimeout` / `clearTimeout`.
///
/// The handler is handed to JavaScript with `Closure::once_into_js`, which
/// frees it only when it runs. A timer cancelled through its [`TaskHandle`]
/// therefore leaks its boxed task. Only the confirmation task is ever
/// cancelled, at most once per submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handler = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let id = wasm::set_timeout(&handler, millis);
        TaskHandle::new(move || wasm::clear_timeout(id))
    }
}

/// The booking form and its surroundings in the live document.
#[derive(Default)]
pub struct DomPage {
    saved_label: RefCell<Option<String>>,
}

impl DomPage {
    fn form(&self) -> Option<Element> {
        wasm::get_element_by_id(FORM_ID)
    }

    fn input(&self, field: Field) -> Result<Element> {
        wasm::get_element_by_id(field.element_id())
            .ok_or(BookingError::MissingElement(field.element_id()))
    }

    fn submit_button(&self) -> Result<Element> {
        self.form()
            .ok_or(BookingError::MissingElement(FORM_ID))?
            .query_selector_in(SUBMIT_SELECTOR)
            .ok_or(BookingError::MissingElement("submit button"))
    }
}

impl BookingPage for DomPage {
    fn has_form(&self) -> bool {
        self.form().is_some()
    }

    fn field_value(&self, field: Field) -> Result<String> {
        Ok(self.input(field)?.value())
    }

    fn set_field_value(&self, field: Field, value: &str) -> Result<()> {
        self.input(field)?.set_value(value);
        Ok(())
    }

    fn focus(&self, field: Field) {
        if let Ok(element) = self.input(field) {
            element.focus();
        }
    }

    fn begin_processing(&self, label: &str) -> Result<()> {
        let button = self.submit_button()?;
        self.saved_label.replace(Some(button.inner_html()));
        button.set_inner_html(label);
        button.set_disabled(true);
        Ok(())
    }

    fn end_processing(&self) {
        let Ok(button) = self.submit_button() else {
            return;
        };
        if let Some(label) = self.saved_label.take() {
            button.set_inner_html(&label);
        }
        button.set_disabled(false);
    }

    fn show_confirmation(&self, message: &str) {
        wasm::alert(message);
    }

    fn close_modal(&self) {
        if let Some(modal) = wasm::get_element_by_id(MODAL_ID) {
            modal.style().set_display("none");
        }
    }

    fn reset_form(&self) {
        if let Some(form) = self.form() {
            form.reset();
        }
    }

    fn render_admin_summary(&self, summary: &AdminSummary) -> bool {
        match wasm::get_element_by_id(ADMIN_STATS_ID) {
            Some(panel) => {
                panel.set_inner_html(&summary.to_html());
                true
            }
            None => false,
        }
    }
}

struct MountedBanner {
    element: Element,
    _on_close: Closure<dyn FnMut(Event)>,
}

/// Banners as real elements appended to `<body>`.
#[derive(Default)]
pub struct DomSurface {
    mounted: RefCell<HashMap<NotificationId, MountedBanner>>,
}

impl NotificationSurface for DomSurface {
    fn ensure_stylesheet(&self) {
        if wasm::get_element_by_id(STYLESHEET_ID).is_some() {
            return;
        }
        let style = wasm::create_element("style");
        style.set_id(STYLESHEET_ID);
        style.set_text_content(STYLESHEET);
        wasm::append_to_head(&style);
    }

    fn remove_all(&self) {
        // Dropping the close closures is safe here: none of them is running.
        self.mounted.borrow_mut().clear();
        while let Some(stray) = wasm::query_selector(&format!(".{MARKER_CLASS}")) {
            stray.remove();
        }
    }

    fn mount(&self, id: NotificationId, message: &str, severity: Severity) {
        let banner = wasm::create_element("div");
        banner.set_class_name(&severity.class_name());

        let text = wasm::create_element("span");
        text.set_text_content(message);
        banner.append_child(&text);

        let close = wasm::create_element("button");
        close.set_class_name(CLOSE_CLASS);
        close.set_inner_html("&times;");
        banner.append_child(&close);

        // The closure only detaches the element; the map entry is cleaned up
        // by the next remove or remove_all.
        let target = banner.clone();
        let on_close = Closure::<dyn FnMut(Event)>::new(move |_event: Event| target.remove());
        close.add_event_listener("click", &on_close);

        wasm::append_to_body(&banner);
        self.mounted.borrow_mut().insert(
            id,
            MountedBanner {
                element: banner,
                _on_close: on_close,
            },
        );
    }

    fn is_mounted(&self, id: NotificationId) -> bool {
        self.mounted
            .borrow()
            .get(&id)
            .is_some_and(|banner| banner.element.is_connected())
    }

    fn fade_out(&self, id: NotificationId) {
        if let Some(banner) = self.mounted.borrow().get(&id) {
            banner.element.style().set_animation(FADE_OUT_ANIMATION);
        }
    }

    fn remove(&self, id: NotificationId) {
        if let Some(banner) = self.mounted.borrow_mut().remove(&id) {
            banner.element.remove();
        }
    }
}

enum Listener {
    Element {
        target: Element,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    },
    Window {
        kind: &'static str,
        closure: Closure<dyn FnMut(ErrorEvent)>,
    },
}

impl Listener {
    fn on_element(target: Element, kind: &'static str, closure: Closure<dyn FnMut(Event)>) -> Self {
        target.add_event_listener(kind, &closure);
        Self::Element {
            target,
            kind,
            closure,
        }
    }

    fn on_window(kind: &'static str, closure: Closure<dyn FnMut(ErrorEvent)>) -> Self {
        wasm::add_window_listener(kind, &closure);
        Self::Window { kind, closure }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        match self {
            Self::Element {
                target,
                kind,
                closure,
            } => target.remove_event_listener(kind, closure),
            Self::Window { kind, closure } => wasm::remove_window_listener(kind, closure),
        }
    }
}

/// Handle returned to the hosting page.
#[wasm_bindgen]
pub struct BookingWidget {
    controller: Option<BookingController>,
    ledger: BookingLedger,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl BookingWidget {
    /// Attach the widget to the current document.
    ///
    /// `config` is an optional JSON document overriding the defaults.
    #[wasm_bindgen(js_name = "mount")]
    pub fn mount(config: Option<String>) -> std::result::Result<BookingWidget, JsValue> {
        let config = BookingConfig::from_json(config.as_deref().unwrap_or_default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        init_logging(config.verbosity);
        info!("loading booking system");

        let page: Rc<DomPage> = Rc::new(DomPage::default());
        let store: Rc<dyn KeyValueStore> = Rc::new(LocalStore);
        let scheduler: Rc<dyn Scheduler> = Rc::new(TimeoutScheduler);
        let surface: Rc<dyn NotificationSurface> = Rc::new(DomSurface::default());

        let ledger = BookingLedger::new(store.clone(), config.storage.clone());
        if let Err(err) = refresh_admin_panel(&ledger, page.as_ref()) {
            warn!(%err, "could not read bookings for the admin panel");
        }

        let timing = config.timing.clone();
        let controller = BookingController::setup(
            config,
            Environment {
                page: page.clone(),
                store,
                surface: surface.clone(),
                scheduler: scheduler.clone(),
                clock: Rc::new(SystemClock),
                confirmation: None,
            },
        );

        // One notifier for the whole page so banner ids stay unique.
        let notifier = match &controller {
            Some(controller) => controller.notifier().clone(),
            None => Notifier::new(surface, scheduler, &timing),
        };
        let mut listeners = vec![Self::error_listener(notifier.clone())];

        if let Some(controller) = &controller {
            if let Some(form) = page.form() {
                listeners.push(Self::submit_listener(form, controller.clone(), notifier.clone()));
            }
            if let Some(phone) = wasm::get_element_by_id(Field::Phone.element_id()) {
                listeners.push(Self::phone_listener(phone, controller.clone(), notifier));
            }
        }

        info!("booking system ready");
        Ok(BookingWidget {
            controller,
            ledger,
            listeners,
        })
    }

    /// Detach every listener and cancel a pending confirmation.
    pub fn dispose(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.dispose();
        }
        let count = self.listeners.len();
        self.listeners.clear();
        debug!(count, "booking widget disposed");
    }

    /// Current counts as `{ total, pending, confirmed }` text.
    #[wasm_bindgen(js_name = "adminSummary")]
    pub fn admin_summary(&self) -> std::result::Result<String, JsValue> {
        self.ledger
            .admin_summary()
            .map(|summary| summary.to_string())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter, js_name = "hasForm")]
    pub fn has_form(&self) -> bool {
        self.controller.is_some()
    }
}

impl Drop for BookingWidget {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl BookingWidget {
    fn error_listener(notifier: Notifier) -> Listener {
        let closure = Closure::<dyn FnMut(ErrorEvent)>::new(move |event: ErrorEvent| {
            notifier.report_uncaught_error(
                &event.message().unwrap_or_default(),
                &event.filename().unwrap_or_default(),
                event.lineno().unwrap_or(0),
            );
        });
        Listener::on_window("error", closure)
    }

    fn submit_listener(form: Element, controller: BookingController, notifier: Notifier) -> Listener {
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            match controller.submit() {
                Ok(outcome) => debug!(?outcome, "submit handled"),
                Err(err) => {
                    error!(%err, "submit failed");
                    notifier.report_uncaught_error(&err.to_string(), file!(), line!());
                }
            }
        });
        Listener::on_element(form, "submit", closure)
    }

    fn phone_listener(input: Element, controller: BookingController, notifier: Notifier) -> Listener {
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Err(err) = controller.format_phone_input() {
                notifier.report_uncaught_error(&err.to_string(), file!(), line!());
            }
        });
        Listener::on_element(input, "input", closure)
    }
}
