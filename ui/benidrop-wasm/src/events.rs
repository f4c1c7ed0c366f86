//! Event binding.
//!
//! Wires all UI event listeners once at startup. Async handlers are spawned
//! with `wasm_bindgen_futures::spawn_local`; nothing de-duplicates repeated
//! clicks while a request is in flight.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::app::App;
use crate::dom::{self, Elements};
use crate::pages::{self, PageSwitcher};

/// Helper: attach an async click handler calling an `App` method.
macro_rules! on_click_async {
    ($el:expr, $app:expr, $method:ident) => {{
        let app = Rc::clone($app);
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let app = Rc::clone(&app);
            wasm_bindgen_futures::spawn_local(async move {
                app.$method().await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after the session is loaded.
pub fn bind_events(app: &Rc<App>, els: &Elements) {
    // ── Rewards ──
    on_click_async!(els.daily_checkin_btn, app, daily_check_in);

    // ── Wallet ──
    {
        let app = Rc::clone(app);
        let address = els.wallet_address_input.clone();
        let tag = els.wallet_tag_input.clone();
        let cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
            e.prevent_default();
            let app = Rc::clone(&app);
            let address = dom::get_input_value(&address);
            let tag = dom::get_input_value(&tag);
            wasm_bindgen_futures::spawn_local(async move {
                app.submit_wallet(&address, &tag).await;
            });
        }) as Box<dyn FnMut(_)>);
        els.wallet_form
            .add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    on_click_async!(els.copy_wallet_btn, app, copy_wallet_address);

    // ── Referral ──
    on_click_async!(els.copy_referral_btn, app, copy_referral_link);

    // ── Tasks ──
    // Cards are re-rendered on every task load, so listen on the container.
    {
        let app = Rc::clone(app);
        on_click!(els.tasks_list, move |e: web_sys::MouseEvent| {
            let Some(title) = e.target().and_then(|t| task_title_for(&t)) else {
                return;
            };
            let app = Rc::clone(&app);
            wasm_bindgen_futures::spawn_local(async move {
                app.complete_task(&title).await;
            });
        });
    }

    // ── Donations ──
    for (amount, btn) in &els.donate_btns {
        let app = Rc::clone(app);
        let amount = *amount;
        on_click!(btn, move |_: web_sys::MouseEvent| {
            app.donate(amount);
        });
    }

    // ── Navigation ──
    let switcher = Rc::new(RefCell::new(PageSwitcher::new(els.initial_page())));
    for pc in &els.pages {
        let page = pc.page;
        let controls = els.pages.clone();
        let switcher = Rc::clone(&switcher);
        on_click!(pc.nav, move |_: web_sys::MouseEvent| {
            pages::switch_to(&controls, &switcher, page);
        });
    }
}

/// Title of the task whose action control was clicked, read from the
/// enclosing card's `<h3>`.
fn task_title_for(target: &web_sys::EventTarget) -> Option<String> {
    let el: &Element = target.dyn_ref()?;
    let button = el.closest(".glow-button").ok()??;
    let card = button.closest(".task-card").ok()??;
    let heading = card.query_selector("h3").ok()??;
    heading.text_content()
}
