//! Host shell integration.
//!
//! The mini-app runs inside Telegram, which injects `window.Telegram.WebApp`.
//! Everything we need from it goes through `HostShell`; outside Telegram the
//! `BrowserHost` fallback keeps the page usable for development.

use async_trait::async_trait;
use bd_api_types::{HostUser, Identity};
use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub trait HostShell {
    /// Logged-in identity, if the host supplied one.
    fn identity(&self) -> Option<Identity>;
    /// Ask the host to expand the mini-app to full height.
    fn expand(&self);
    /// Modal alert; the only channel for user-facing notifications.
    fn show_alert(&self, message: &str);
}

#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), JsValue>;
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) -> Result<JsValue, JsValue> {
    let func: Function = get(target, name)
        .ok_or_else(|| JsValue::from_str(&format!("{} is not available", name)))?
        .dyn_into()?;
    match args {
        [] => func.call0(target),
        [a] => func.call1(target, a),
        [a, b, ..] => func.call2(target, a, b),
    }
}

/// `window.Telegram.WebApp`.
pub struct TelegramHost {
    web_app: JsValue,
}

impl TelegramHost {
    /// `None` when the page is not running inside Telegram.
    pub fn detect() -> Option<Self> {
        let window: JsValue = gloo_utils::window().into();
        let telegram = get(&window, "Telegram")?;
        let web_app = get(&telegram, "WebApp")?;
        Some(Self { web_app })
    }
}

impl HostShell for TelegramHost {
    fn identity(&self) -> Option<Identity> {
        let init = get(&self.web_app, "initDataUnsafe")?;
        let user = get(&init, "user")?;
        let host_user: HostUser = match serde_wasm_bindgen::from_value(user) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = %e, "host user object has an unexpected shape");
                return None;
            }
        };
        let start_param = get(&init, "start_param").and_then(|v| v.as_string());
        host_user.into_identity(start_param)
    }

    fn expand(&self) {
        if let Err(e) = call_method(&self.web_app, "expand", &[]) {
            tracing::warn!(error = ?e, "WebApp.expand failed");
        }
    }

    fn show_alert(&self, message: &str) {
        if let Err(e) = call_method(&self.web_app, "showAlert", &[&JsValue::from_str(message)]) {
            tracing::warn!(error = ?e, "WebApp.showAlert failed, using window.alert");
            let _ = gloo_utils::window().alert_with_message(message);
        }
    }
}

/// Plain browser tab: no identity, nothing to expand, native `alert`.
pub struct BrowserHost;

impl HostShell for BrowserHost {
    fn identity(&self) -> Option<Identity> {
        None
    }

    fn expand(&self) {}

    fn show_alert(&self, message: &str) {
        let _ = gloo_utils::window().alert_with_message(message);
    }
}

/// Pick the Telegram host when present.
pub fn detect() -> Box<dyn HostShell> {
    match TelegramHost::detect() {
        Some(host) => Box::new(host),
        None => {
            tracing::info!("Telegram WebApp not found; running as a plain browser page");
            Box::new(BrowserHost)
        }
    }
}

/// `navigator.clipboard.writeText`.
pub struct NavigatorClipboard;

#[async_trait(?Send)]
impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<(), JsValue> {
        let navigator: JsValue = gloo_utils::window().navigator().into();
        let clipboard =
            get(&navigator, "clipboard").ok_or_else(|| JsValue::from_str("clipboard API unavailable"))?;
        let promise: js_sys::Promise =
            call_method(&clipboard, "writeText", &[&JsValue::from_str(text)])?.dyn_into()?;
        JsFuture::from(promise).await.map(|_| ())
    }
}
