//! Application state.
//!
//! One `AppState` per page view, owned by the `App` controller. Nothing here
//! is persisted; the backend owns every durable value.

use bd_api_types::{Identity, ProjectWallet, UserPatch};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserState {
    pub telegram_id: Option<String>,
    pub username: Option<String>,
    pub profile_picture: Option<String>,
    pub wallet_address: Option<String>,
    pub wallet_tag: Option<String>,
    pub total_tokens: i64,
    pub check_in_streak: i64,
    pub tasks_completed: i64,
    pub total_referrals: i64,
    pub leaderboard_rank: i64,
    pub referral_code: Option<String>,
    pub join_date: Option<String>,
}

impl UserState {
    pub fn apply_identity(&mut self, identity: &Identity) {
        self.telegram_id = Some(identity.telegram_id.clone());
        self.username = identity.username.clone();
        self.profile_picture = identity.photo_url.clone();
    }

    /// Field-by-field merge: every key present in `patch` overwrites, every
    /// absent key keeps its current value.
    pub fn merge(&mut self, patch: UserPatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        if let Some(id) = patch.telegram_id {
            self.telegram_id = Some(id);
        }
        set(&mut self.username, patch.username);
        set(&mut self.profile_picture, patch.photo_url);
        set(&mut self.wallet_address, patch.wallet_address);
        set(&mut self.wallet_tag, patch.wallet_tag);
        set(&mut self.total_tokens, patch.total_tokens);
        set(&mut self.check_in_streak, patch.check_in_streak);
        set(&mut self.tasks_completed, patch.tasks_completed);
        set(&mut self.total_referrals, patch.total_referrals);
        set(&mut self.leaderboard_rank, patch.leaderboard_rank);
        set(&mut self.referral_code, patch.referral_code);
        set(&mut self.join_date, patch.join_date);
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet_address.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Everything the view layer knows about the session.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub user: UserState,
    pub project_wallet: ProjectWallet,
    /// Identity as handed over by the host; `None` outside a logged-in session.
    pub identity: Option<Identity>,
}

impl AppState {
    pub fn telegram_id(&self) -> Option<String> {
        self.user.telegram_id.clone()
    }
}
