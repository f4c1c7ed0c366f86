//! DOM element bindings.
//!
//! Every element the app touches is resolved once at startup in
//! `Elements::bind()`; a missing id aborts initialisation instead of failing
//! later inside a handler. To add a new element, add a field and bind it here.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::effects::{DONATION_PRESETS, DonationAmount};
use crate::pages::Page;

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

/// Input value with surrounding whitespace removed.
pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

// ── Elements struct ──

/// A page container together with its navigation control.
#[derive(Clone)]
pub struct PageControls {
    pub page: Page,
    pub container: Element,
    pub nav: Element,
}

/// All DOM element references used by the mini-app.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Profile
    pub profile_picture: HtmlImageElement,
    pub profile_name: Element,
    pub join_date: Element,

    // Stats
    pub total_tokens: Element,
    pub check_in_streak: Element,
    pub tasks_completed: Element,
    pub total_referrals: Element,
    pub leaderboard_rank: Element,
    pub referral_code: Element,
    pub copy_referral_btn: HtmlElement,

    // User wallet
    pub wallet_status: Element,
    pub wallet_form: Element,
    pub wallet_address_input: HtmlInputElement,
    pub wallet_tag_input: HtmlInputElement,

    // Project wallet
    pub project_wallet: Element,
    pub wallet_tag_display: Element,
    pub copy_wallet_btn: HtmlElement,

    // Lists
    pub leaderboard_list: Element,
    pub tasks_list: Element,

    // Actions
    pub daily_checkin_btn: HtmlElement,
    pub donate_btns: Vec<(DonationAmount, HtmlElement)>,

    // Navigation
    pub pages: Vec<PageControls>,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_img {
    ($id:expr) => {
        by_id_typed::<HtmlImageElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing img #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        let mut donate_btns = Vec::with_capacity(DONATION_PRESETS.len());
        for amount in DONATION_PRESETS {
            donate_btns.push((amount, get_html!(&amount.element_id())));
        }

        let mut pages = Vec::with_capacity(Page::ALL.len());
        for page in Page::ALL {
            pages.push(PageControls {
                page,
                container: get_el!(&page.container_id()),
                nav: get_el!(&page.nav_id()),
            });
        }

        Ok(Elements {
            profile_picture: get_img!("profile-picture"),
            profile_name: get_el!("profile-name"),
            join_date: get_el!("join-date"),

            total_tokens: get_el!("total-tokens"),
            check_in_streak: get_el!("check-in-streak"),
            tasks_completed: get_el!("tasks-completed"),
            total_referrals: get_el!("total-referrals"),
            leaderboard_rank: get_el!("leaderboard-rank"),
            referral_code: get_el!("referral-code"),
            copy_referral_btn: get_html!("copy-referral"),

            wallet_status: get_el!("wallet-status"),
            wallet_form: get_el!("wallet-form"),
            wallet_address_input: get_input!("wallet-address"),
            wallet_tag_input: get_input!("wallet-tag"),

            project_wallet: get_el!("project-wallet"),
            wallet_tag_display: get_el!("wallet-tag-display"),
            copy_wallet_btn: get_html!("copy-wallet"),

            leaderboard_list: get_el!("leaderboard-list"),
            tasks_list: get_el!("tasks-list"),

            daily_checkin_btn: get_html!("daily-checkin"),
            donate_btns,

            pages,
        })
    }

    /// The page the markup marks `active`, or Home.
    pub fn initial_page(&self) -> Page {
        self.pages
            .iter()
            .find(|pc| has_class(&pc.container, "active"))
            .map(|pc| pc.page)
            .unwrap_or(Page::Home)
    }
}
