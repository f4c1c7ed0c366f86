//! Rendering seam.
//!
//! The controller only talks to `View`; `DomView` is the browser
//! implementation writing into the bound `Elements`.

use bd_api_types::{LeaderboardEntry, ProjectWallet, Task};

use crate::config::Config;
use crate::dom::{self, Elements};
use crate::render::{self, NOT_AVAILABLE};
use crate::state::UserState;

pub trait View {
    /// Full re-projection of the user onto the profile/stat elements.
    fn update_ui(&self, user: &UserState);
    fn render_tasks(&self, tasks: &[Task]);
    fn render_leaderboard(&self, entries: &[LeaderboardEntry]);
    fn render_project_wallet(&self, wallet: &ProjectWallet);
}

pub struct DomView {
    els: Elements,
    config: Config,
}

impl DomView {
    pub fn new(els: Elements, config: Config) -> Self {
        Self { els, config }
    }
}

impl View for DomView {
    fn update_ui(&self, user: &UserState) {
        let view = render::profile_view(user, &self.config);
        let els = &self.els;

        els.profile_picture.set_src(&view.picture_src);
        dom::set_text(&els.profile_name, &view.display_name);
        dom::set_text(&els.join_date, &view.join_date);

        dom::set_text(&els.total_tokens, &view.total_tokens);
        dom::set_text(&els.check_in_streak, &view.check_in_streak);
        dom::set_text(&els.tasks_completed, &view.tasks_completed);
        dom::set_text(&els.total_referrals, &view.total_referrals);
        dom::set_text(&els.leaderboard_rank, &view.leaderboard_rank);
        dom::set_text(&els.referral_code, &view.referral_code);

        // Once connected the panel stays, even if the address is cleared later.
        if let Some(panel) = view.wallet_panel {
            dom::set_inner_html(&els.wallet_status, &panel);
        }
    }

    fn render_tasks(&self, tasks: &[Task]) {
        dom::set_inner_html(&self.els.tasks_list, &render::tasks_html(tasks));
    }

    fn render_leaderboard(&self, entries: &[LeaderboardEntry]) {
        dom::set_inner_html(&self.els.leaderboard_list, &render::leaderboard_html(entries));
    }

    fn render_project_wallet(&self, wallet: &ProjectWallet) {
        dom::set_text(&self.els.project_wallet, &wallet.address);
        let tag = wallet
            .tag
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(NOT_AVAILABLE);
        dom::set_text(&self.els.wallet_tag_display, tag);
    }
}
