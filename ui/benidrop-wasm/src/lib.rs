//! BeniDrop rewards mini-app, WASM frontend.
//!
//! Runs inside the Telegram WebApp shell: reads the session identity, loads
//! profile, tasks, leaderboard and project wallet from the backend, and
//! renders them into the static markup. Each concern lives in its own module.

pub mod api;
pub mod app;
pub mod config;
pub mod dom;
pub mod effects;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod pages;
pub mod render;
pub mod state;
pub mod view;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::app::{App, Capabilities};

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence.
async fn init() -> Result<(), JsValue> {
    let (config, config_errors) = config::Config::from_document();
    logging::init(&config.log_filter);
    for e in &config_errors {
        tracing::warn!(error = %e, "ignoring invalid configuration value");
    }
    tracing::info!(api_base = %config.api_base, "starting BeniDrop mini-app");

    let els = dom::Elements::bind()?;

    let caps = Capabilities {
        api: Rc::new(api::HttpApi::new(config.api_base.clone())),
        host: Rc::from(host::detect()),
        clipboard: Rc::new(host::NavigatorClipboard),
        view: Rc::new(view::DomView::new(els.clone(), config.clone())),
        effect: Rc::new(effects::NoopEffect),
        donations: Rc::new(effects::LoggingDonations),
    };
    let app = Rc::new(App::new(config, caps));

    // Identity, then user → tasks → leaderboard → project wallet
    app.load_session().await;

    // Bind all event listeners
    events::bind_events(&app, &els);

    app.render();

    Ok(())
}
