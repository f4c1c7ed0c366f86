//! Page switcher.
//!
//! States are the fixed set of `Page`s; the only transition is an explicit
//! `show`. The DOM side hides every page, reveals the target and adds
//! `active` after a short delay so the CSS transition runs.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use crate::dom::{self, PageControls};

/// Delay before the target page gets `active`.
pub const TRANSITION_DELAY_MS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Tasks,
    Leaderboard,
    Wallet,
    Profile,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Tasks,
        Page::Leaderboard,
        Page::Wallet,
        Page::Profile,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Tasks => "tasks",
            Page::Leaderboard => "leaderboard",
            Page::Wallet => "wallet",
            Page::Profile => "profile",
        }
    }

    /// `{id}-page` container.
    pub fn container_id(self) -> String {
        format!("{}-page", self.id())
    }

    /// `nav-{id}` control.
    pub fn nav_id(self) -> String {
        format!("nav-{}", self.id())
    }
}

/// Active page plus a counter bumped on every switch, so a delayed
/// transition can tell whether it has been superseded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSwitcher {
    current: Page,
    generation: u64,
}

impl PageSwitcher {
    pub fn new(initial: Page) -> Self {
        Self {
            current: initial,
            generation: 0,
        }
    }

    pub fn is_active(&self, page: Page) -> bool {
        self.current == page
    }

    /// Switch to `page`; returns the generation of this switch.
    pub fn show(&mut self, page: Page) -> u64 {
        self.current = page;
        self.generation += 1;
        self.generation
    }

    /// True while no later switch has happened.
    pub fn is_latest(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Switch to `page` and project the result onto the page containers and
/// nav controls. The delayed `active` class is skipped if another switch
/// lands first.
pub fn switch_to(controls: &[PageControls], switcher: &Rc<RefCell<PageSwitcher>>, page: Page) {
    let generation = switcher.borrow_mut().show(page);

    {
        let state = switcher.borrow();
        for pc in controls {
            dom::remove_class(&pc.container, "active");
            dom::add_class(&pc.container, "hidden");
            dom::toggle_class(&pc.nav, "active", state.is_active(pc.page));
        }
    }

    if let Some(pc) = controls.iter().find(|pc| pc.page == page) {
        dom::remove_class(&pc.container, "hidden");
        let container = pc.container.clone();
        let switcher = Rc::clone(switcher);
        Timeout::new(TRANSITION_DELAY_MS, move || {
            if switcher.borrow().is_latest(generation) {
                dom::add_class(&container, "active");
            }
        })
        .forget();
    }

    gloo_utils::window().scroll_to_with_x_and_y(0.0, 0.0);
}
