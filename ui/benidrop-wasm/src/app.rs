//! Application controller.
//!
//! `App` owns the session state and every capability the view layer needs
//! (backend, host shell, clipboard, view, effects). Loaders and mutators are
//! methods on it; event handlers hold an `Rc<App>`.
//!
//! State is kept in a `RefCell` and no borrow is held across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use bd_api_types::{CompleteTaskRequest, Identity, SubmitWalletRequest, UseReferralRequest};
use tracing::{debug, error, info, warn};

use crate::api::RewardsApi;
use crate::config::Config;
use crate::effects::{DonationAmount, DonationHandler, RewardEffect};
use crate::error::ApiError;
use crate::host::{Clipboard, HostShell};
use crate::render;
use crate::state::{AppState, UserState};
use crate::view::View;

pub const WALLET_SAVED: &str = "Wallet information saved successfully!";
pub const WALLET_SAVE_FAILED: &str = "Failed to save wallet information. Please try again.";
pub const CHECK_IN_FAILED: &str = "Failed to check in. Please try again later.";
pub const TASK_COMPLETED: &str = "🎉 Task completed successfully!";
pub const TASK_FAILED: &str = "Failed to complete task. Please try again.";
pub const WALLET_COPIED: &str = "Wallet address copied! 🎉";
pub const WALLET_COPY_FAILED: &str = "Failed to copy wallet address.";
pub const REFERRAL_COPIED: &str = "Referral link copied! 🎉";
pub const REFERRAL_COPY_FAILED: &str = "Failed to copy referral link.";

pub fn check_in_message(tokens_earned: i64) -> String {
    format!("🎉 Check-in successful! You earned {} tokens!", tokens_earned)
}

pub fn referral_bonus_message(tokens_earned: i64) -> String {
    format!("🎁 Referral applied! You earned {} tokens!", tokens_earned)
}

/// Everything `App` talks to.
pub struct Capabilities {
    pub api: Rc<dyn RewardsApi>,
    pub host: Rc<dyn HostShell>,
    pub clipboard: Rc<dyn Clipboard>,
    pub view: Rc<dyn View>,
    pub effect: Rc<dyn RewardEffect>,
    pub donations: Rc<dyn DonationHandler>,
}

pub struct App {
    config: Config,
    state: RefCell<AppState>,
    caps: Capabilities,
}

impl App {
    pub fn new(config: Config, caps: Capabilities) -> Self {
        Self {
            config,
            state: RefCell::new(AppState::default()),
            caps,
        }
    }

    /// Snapshot of the current user.
    pub fn user(&self) -> UserState {
        self.state.borrow().user.clone()
    }

    fn telegram_id(&self) -> Option<String> {
        self.state.borrow().telegram_id()
    }

    fn notify(&self, message: &str) {
        self.caps.host.show_alert(message);
    }

    // ── Session bootstrap ──

    /// Expand the host, read the identity and run the startup loaders in
    /// order. Returns `false` when the host supplied no identity, in which
    /// case nothing is fetched.
    pub async fn load_session(&self) -> bool {
        self.caps.host.expand();

        let Some(identity) = self.caps.host.identity() else {
            info!("no host identity; skipping data loads");
            return false;
        };
        debug!(telegram_id = %identity.telegram_id, "session identity received");

        {
            let mut state = self.state.borrow_mut();
            state.user.apply_identity(&identity);
            state.identity = Some(identity.clone());
        }

        match self.refresh_user().await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => self.register(&identity).await,
            Err(e) => error!(error = %e, "Error loading user data"),
        }
        self.load_tasks().await;
        self.load_leaderboard().await;
        self.load_project_wallet().await;
        self.redeem_referral(&identity).await;

        true
    }

    /// Full re-projection of the current user.
    pub fn render(&self) {
        let user = self.user();
        self.caps.view.update_ui(&user);
    }

    // ── Loaders ──

    async fn refresh_user(&self) -> Result<(), ApiError> {
        let Some(id) = self.telegram_id() else {
            return Ok(());
        };
        let patch = self.caps.api.user(&id).await?;
        self.state.borrow_mut().user.merge(patch);
        self.render();
        Ok(())
    }

    /// GET /user/{id}; failures are logged and leave state untouched.
    pub async fn load_user_data(&self) {
        if let Err(e) = self.refresh_user().await {
            error!(error = %e, "Error loading user data");
        }
    }

    pub async fn load_tasks(&self) {
        match self.caps.api.tasks().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "tasks loaded");
                self.caps.view.render_tasks(&tasks);
            }
            Err(e) => error!(error = %e, "Error loading tasks"),
        }
    }

    pub async fn load_leaderboard(&self) {
        match self.caps.api.leaderboard().await {
            Ok(entries) => self.caps.view.render_leaderboard(&entries),
            Err(e) => error!(error = %e, "Error loading leaderboard"),
        }
    }

    pub async fn load_project_wallet(&self) {
        match self.caps.api.project_wallet().await {
            Ok(wallet) => {
                self.caps.view.render_project_wallet(&wallet);
                self.state.borrow_mut().project_wallet = wallet;
            }
            Err(e) => error!(error = %e, "Error loading project wallet"),
        }
    }

    /// First visit: the backend does not know this user yet.
    async fn register(&self, identity: &Identity) {
        info!(telegram_id = %identity.telegram_id, "user not found; registering");
        match self
            .caps
            .api
            .register(&identity.telegram_id, identity.username.as_deref())
            .await
        {
            Ok(patch) => {
                self.state.borrow_mut().user.merge(patch);
                self.render();
            }
            Err(e) => error!(error = %e, "Error registering user"),
        }
    }

    /// Redeem the referral code the app was opened with, if any.
    async fn redeem_referral(&self, identity: &Identity) {
        let Some(code) = identity.start_param.clone() else {
            return;
        };
        let req = UseReferralRequest {
            telegram_id: identity.telegram_id.clone(),
            referral_code: code,
        };
        match self.caps.api.use_referral(&req).await {
            Ok(resp) => {
                self.notify(&referral_bonus_message(resp.tokens_earned));
                self.load_user_data().await;
            }
            // Already used, own code, unknown code: all routine.
            Err(e) => info!(error = %e, "referral code not applied"),
        }
    }

    // ── Mutators ──

    /// POST /submit-wallet with trimmed inputs.
    pub async fn submit_wallet(&self, address: &str, tag: &str) {
        let address = address.trim().to_owned();
        let tag = tag.trim().to_owned();

        let Some(telegram_id) = self.telegram_id() else {
            warn!("wallet submitted without a session identity");
            self.notify(WALLET_SAVE_FAILED);
            return;
        };

        let req = SubmitWalletRequest {
            telegram_id,
            wallet_address: address.clone(),
            wallet_tag: tag.clone(),
        };
        match self.caps.api.submit_wallet(&req).await {
            Ok(()) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.user.wallet_address = Some(address);
                    state.user.wallet_tag = Some(tag);
                }
                self.render();
                self.notify(WALLET_SAVED);
            }
            Err(e) => {
                error!(error = %e, "Error saving wallet");
                self.notify(WALLET_SAVE_FAILED);
            }
        }
    }

    /// POST /daily-check-in/{id}, then re-fetch the profile so the streak
    /// stays authoritative.
    pub async fn daily_check_in(&self) {
        let Some(telegram_id) = self.telegram_id() else {
            warn!("check-in without a session identity");
            self.notify(CHECK_IN_FAILED);
            return;
        };

        match self.caps.api.daily_check_in(&telegram_id).await {
            Ok(resp) => {
                self.caps.effect.celebrate();
                self.notify(&check_in_message(resp.tokens_earned));
                self.load_user_data().await;
            }
            Err(e) => {
                error!(error = %e, "Error during check-in");
                self.notify(e.detail().unwrap_or(CHECK_IN_FAILED));
            }
        }
    }

    /// POST /complete-task. `title` is whatever the task card shows.
    pub async fn complete_task(&self, title: &str) {
        let Some(telegram_id) = self.telegram_id() else {
            warn!(task = title, "task completion without a session identity");
            self.notify(TASK_FAILED);
            return;
        };

        let req = CompleteTaskRequest {
            telegram_id,
            task_title: title.to_owned(),
        };
        match self.caps.api.complete_task(&req).await {
            Ok(()) => {
                self.caps.effect.celebrate();
                self.notify(TASK_COMPLETED);
                self.load_user_data().await;
            }
            Err(e) => {
                error!(error = %e, task = title, "Error completing task");
                self.notify(TASK_FAILED);
            }
        }
    }

    pub async fn copy_wallet_address(&self) {
        let text = render::wallet_clipboard_text(&self.state.borrow().project_wallet);
        match self.caps.clipboard.write_text(&text).await {
            Ok(()) => self.notify(WALLET_COPIED),
            Err(e) => {
                warn!(error = ?e, "clipboard write failed");
                self.notify(WALLET_COPY_FAILED);
            }
        }
    }

    /// Referral link for the configured bot, or the user's own handle.
    pub fn referral_link(&self) -> Option<String> {
        let state = self.state.borrow();
        let code = state.user.referral_code.as_deref().filter(|c| !c.is_empty())?;
        let handle = self
            .config
            .bot_username
            .clone()
            .or_else(|| state.identity.as_ref().and_then(|i| i.username.clone()))?;
        Some(render::referral_link(&handle, code))
    }

    pub async fn copy_referral_link(&self) {
        let Some(link) = self.referral_link() else {
            warn!("referral link unavailable: missing handle or referral code");
            self.notify(REFERRAL_COPY_FAILED);
            return;
        };
        match self.caps.clipboard.write_text(&link).await {
            Ok(()) => self.notify(REFERRAL_COPIED),
            Err(e) => {
                warn!(error = ?e, "clipboard write failed");
                self.notify(REFERRAL_COPY_FAILED);
            }
        }
    }

    pub fn donate(&self, amount: DonationAmount) {
        self.caps.donations.donate(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::DONATION_PRESETS;
    use async_trait::async_trait;
    use bd_api_types::{LeaderboardEntry, ProjectWallet, RewardResponse, Task, UserPatch};
    use std::cell::{Cell, RefCell};
    use wasm_bindgen::JsValue;

    // ── Fakes ──

    struct FakeApi {
        calls: RefCell<Vec<String>>,
        user: RefCell<Result<UserPatch, ApiError>>,
        register: Result<UserPatch, ApiError>,
        tasks: Result<Vec<Task>, ApiError>,
        leaderboard: Result<Vec<LeaderboardEntry>, ApiError>,
        wallet: Result<ProjectWallet, ApiError>,
        submit: Result<(), ApiError>,
        check_in: Result<RewardResponse, ApiError>,
        complete: Result<(), ApiError>,
        referral: Result<RewardResponse, ApiError>,
        last_task: RefCell<Option<CompleteTaskRequest>>,
        last_wallet: RefCell<Option<SubmitWalletRequest>>,
    }

    impl FakeApi {
        fn ok() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                user: RefCell::new(Ok(UserPatch::default())),
                register: Ok(UserPatch::default()),
                tasks: Ok(Vec::new()),
                leaderboard: Ok(Vec::new()),
                wallet: Ok(ProjectWallet::default()),
                submit: Ok(()),
                check_in: Ok(RewardResponse::default()),
                complete: Ok(()),
                referral: Ok(RewardResponse::default()),
                last_task: RefCell::new(None),
                last_wallet: RefCell::new(None),
            }
        }

        fn log(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    fn network() -> ApiError {
        ApiError::Network("connection refused".into())
    }

    #[async_trait(?Send)]
    impl RewardsApi for FakeApi {
        async fn user(&self, telegram_id: &str) -> Result<UserPatch, ApiError> {
            self.log(format!("user/{telegram_id}"));
            self.user.borrow().clone()
        }
        async fn tasks(&self) -> Result<Vec<Task>, ApiError> {
            self.log("tasks");
            self.tasks.clone()
        }
        async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
            self.log("leaderboard");
            self.leaderboard.clone()
        }
        async fn project_wallet(&self) -> Result<ProjectWallet, ApiError> {
            self.log("project-wallet");
            self.wallet.clone()
        }
        async fn submit_wallet(&self, req: &SubmitWalletRequest) -> Result<(), ApiError> {
            self.log("submit-wallet");
            *self.last_wallet.borrow_mut() = Some(req.clone());
            self.submit.clone()
        }
        async fn daily_check_in(&self, telegram_id: &str) -> Result<RewardResponse, ApiError> {
            self.log(format!("daily-check-in/{telegram_id}"));
            self.check_in.clone()
        }
        async fn complete_task(&self, req: &CompleteTaskRequest) -> Result<(), ApiError> {
            self.log("complete-task");
            *self.last_task.borrow_mut() = Some(req.clone());
            self.complete.clone()
        }
        async fn register(
            &self,
            telegram_id: &str,
            _username: Option<&str>,
        ) -> Result<UserPatch, ApiError> {
            self.log(format!("register/{telegram_id}"));
            self.register.clone()
        }
        async fn use_referral(&self, req: &UseReferralRequest) -> Result<RewardResponse, ApiError> {
            self.log(format!("use-referral/{}", req.referral_code));
            self.referral.clone()
        }
    }

    #[derive(Default)]
    struct FakeHost {
        identity: Option<Identity>,
        expanded: Cell<u32>,
        alerts: RefCell<Vec<String>>,
    }

    impl FakeHost {
        fn alerts(&self) -> Vec<String> {
            self.alerts.borrow().clone()
        }
    }

    impl HostShell for FakeHost {
        fn identity(&self) -> Option<Identity> {
            self.identity.clone()
        }
        fn expand(&self) {
            self.expanded.set(self.expanded.get() + 1);
        }
        fn show_alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_owned());
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        fail: bool,
        written: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl Clipboard for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), JsValue> {
            if self.fail {
                // reserved constants are the only JsValues usable natively
                return Err(JsValue::NULL);
            }
            self.written.borrow_mut().push(text.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeView {
        updates: RefCell<Vec<UserState>>,
        tasks: RefCell<Option<Vec<Task>>>,
        leaderboard: RefCell<Option<Vec<LeaderboardEntry>>>,
        wallet: RefCell<Option<ProjectWallet>>,
    }

    impl View for FakeView {
        fn update_ui(&self, user: &UserState) {
            self.updates.borrow_mut().push(user.clone());
        }
        fn render_tasks(&self, tasks: &[Task]) {
            *self.tasks.borrow_mut() = Some(tasks.to_vec());
        }
        fn render_leaderboard(&self, entries: &[LeaderboardEntry]) {
            *self.leaderboard.borrow_mut() = Some(entries.to_vec());
        }
        fn render_project_wallet(&self, wallet: &ProjectWallet) {
            *self.wallet.borrow_mut() = Some(wallet.clone());
        }
    }

    #[derive(Default)]
    struct CountingEffect(Cell<u32>);

    impl RewardEffect for CountingEffect {
        fn celebrate(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[derive(Default)]
    struct RecordingDonations(RefCell<Vec<f64>>);

    impl DonationHandler for RecordingDonations {
        fn donate(&self, amount: DonationAmount) {
            self.0.borrow_mut().push(amount.egld);
        }
    }

    struct Harness {
        app: App,
        api: Rc<FakeApi>,
        host: Rc<FakeHost>,
        clipboard: Rc<FakeClipboard>,
        view: Rc<FakeView>,
        effect: Rc<CountingEffect>,
        donations: Rc<RecordingDonations>,
    }

    fn alice() -> Identity {
        Identity {
            telegram_id: "42".into(),
            username: Some("alice".into()),
            photo_url: Some("https://t.me/i/alice.jpg".into()),
            start_param: None,
        }
    }

    fn harness_with(
        api: FakeApi,
        identity: Option<Identity>,
        clipboard: FakeClipboard,
        config: Config,
    ) -> Harness {
        let api = Rc::new(api);
        let host = Rc::new(FakeHost {
            identity,
            ..FakeHost::default()
        });
        let clipboard = Rc::new(clipboard);
        let view = Rc::new(FakeView::default());
        let effect = Rc::new(CountingEffect::default());
        let donations = Rc::new(RecordingDonations::default());
        let app = App::new(
            config,
            Capabilities {
                api: api.clone(),
                host: host.clone(),
                clipboard: clipboard.clone(),
                view: view.clone(),
                effect: effect.clone(),
                donations: donations.clone(),
            },
        );
        Harness {
            app,
            api,
            host,
            clipboard,
            view,
            effect,
            donations,
        }
    }

    fn harness(api: FakeApi) -> Harness {
        harness_with(api, Some(alice()), FakeClipboard::default(), Config::default())
    }

    // ── Bootstrap ──

    #[tokio::test]
    async fn session_runs_loaders_in_order() {
        let h = harness(FakeApi::ok());

        assert!(h.app.load_session().await);

        assert_eq!(h.host.expanded.get(), 1);
        assert_eq!(
            h.api.calls(),
            ["user/42", "tasks", "leaderboard", "project-wallet"]
        );
        let user = h.app.user();
        assert_eq!(user.telegram_id.as_deref(), Some("42"));
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.profile_picture.as_deref(), Some("https://t.me/i/alice.jpg"));
    }

    #[tokio::test]
    async fn session_without_identity_loads_nothing() {
        let h = harness_with(FakeApi::ok(), None, FakeClipboard::default(), Config::default());

        assert!(!h.app.load_session().await);

        assert_eq!(h.host.expanded.get(), 1);
        assert!(h.api.calls().is_empty());
        assert_eq!(h.app.user(), UserState::default());
    }

    #[tokio::test]
    async fn failing_loader_does_not_stop_the_others() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Err(network());
        api.tasks = Err(ApiError::Decode("expected a sequence".into()));
        api.wallet = Ok(ProjectWallet {
            address: "erd1proj".into(),
            tag: Some("99".into()),
        });
        let h = harness(api);

        h.app.load_session().await;

        assert_eq!(
            h.api.calls(),
            ["user/42", "tasks", "leaderboard", "project-wallet"]
        );
        assert!(h.view.tasks.borrow().is_none());
        assert_eq!(h.view.leaderboard.borrow().as_deref(), Some(&[][..]));
        assert_eq!(
            h.view.wallet.borrow().as_ref().map(|w| w.address.as_str()),
            Some("erd1proj")
        );
        // read failures never reach the user
        assert!(h.host.alerts().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_registered() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Err(ApiError::Status {
            status: 404,
            detail: Some("User not found".into()),
        });
        api.register = Ok(UserPatch {
            total_tokens: Some(500),
            referral_code: Some(Some("BENI10001".into())),
            ..UserPatch::default()
        });
        let h = harness(api);

        h.app.load_session().await;

        assert_eq!(h.api.calls()[..2], ["user/42", "register/42"]);
        let user = h.app.user();
        assert_eq!(user.total_tokens, 500);
        assert_eq!(user.referral_code.as_deref(), Some("BENI10001"));
    }

    #[tokio::test]
    async fn start_param_redeems_referral_and_refreshes() {
        let mut api = FakeApi::ok();
        api.referral = Ok(RewardResponse {
            tokens_earned: 2500,
            ..RewardResponse::default()
        });
        let identity = Identity {
            start_param: Some("BENI77777".into()),
            ..alice()
        };
        let h = harness_with(api, Some(identity), FakeClipboard::default(), Config::default());

        h.app.load_session().await;

        let calls = h.api.calls();
        assert_eq!(calls[4..], ["use-referral/BENI77777", "user/42"]);
        assert_eq!(h.host.alerts().len(), 1);
        assert!(h.host.alerts()[0].contains("2500"));
    }

    #[tokio::test]
    async fn rejected_referral_is_silent() {
        let mut api = FakeApi::ok();
        api.referral = Err(ApiError::Status {
            status: 400,
            detail: Some("Already used a referral code".into()),
        });
        let identity = Identity {
            start_param: Some("BENI77777".into()),
            ..alice()
        };
        let h = harness_with(api, Some(identity), FakeClipboard::default(), Config::default());

        h.app.load_session().await;

        assert!(h.host.alerts().is_empty());
    }

    // ── Loaders ──

    #[tokio::test]
    async fn user_load_merges_partially_and_renders() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Ok(UserPatch {
            total_tokens: Some(1500),
            check_in_streak: Some(3),
            ..UserPatch::default()
        });
        let h = harness(api);
        h.app.load_session().await;

        let user = h.app.user();
        assert_eq!(user.total_tokens, 1500);
        assert_eq!(user.check_in_streak, 3);
        // identity fields absent from the response survive
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(h.view.updates.borrow().last(), Some(&user));
    }

    #[tokio::test]
    async fn failed_user_load_keeps_previous_state() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Ok(UserPatch {
            total_tokens: Some(800),
            ..UserPatch::default()
        });
        let h = harness(api);
        h.app.load_session().await;
        let before = h.app.user();

        *h.api.user.borrow_mut() = Err(network());
        h.app.load_user_data().await;

        assert_eq!(h.app.user(), before);
    }

    #[tokio::test]
    async fn render_twice_projects_same_state() {
        let h = harness(FakeApi::ok());
        h.app.load_session().await;

        h.app.render();
        h.app.render();

        let updates = h.view.updates.borrow();
        let n = updates.len();
        assert!(n >= 2);
        assert_eq!(updates[n - 1], updates[n - 2]);
    }

    // ── Submit wallet ──

    #[tokio::test]
    async fn submit_wallet_trims_and_updates_local_fields() {
        let h = harness(FakeApi::ok());
        h.app.load_session().await;

        h.app.submit_wallet("  erd1new  ", " 42 ").await;

        let sent = h.api.last_wallet.borrow().clone().unwrap();
        assert_eq!(sent.telegram_id, "42");
        assert_eq!(sent.wallet_address, "erd1new");
        assert_eq!(sent.wallet_tag, "42");

        let user = h.app.user();
        assert_eq!(user.wallet_address.as_deref(), Some("erd1new"));
        assert_eq!(user.wallet_tag.as_deref(), Some("42"));
        assert_eq!(h.host.alerts(), [WALLET_SAVED]);
        assert_eq!(h.view.updates.borrow().last(), Some(&user));
    }

    #[tokio::test]
    async fn failed_submit_wallet_keeps_wallet_fields() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Ok(UserPatch {
            wallet_address: Some(Some("erd1old".into())),
            wallet_tag: Some(Some("1".into())),
            ..UserPatch::default()
        });
        api.submit = Err(ApiError::Status {
            status: 500,
            detail: None,
        });
        let h = harness(api);
        h.app.load_session().await;

        h.app.submit_wallet("erd1new", "2").await;

        let user = h.app.user();
        assert_eq!(user.wallet_address.as_deref(), Some("erd1old"));
        assert_eq!(user.wallet_tag.as_deref(), Some("1"));
        assert_eq!(h.host.alerts(), [WALLET_SAVE_FAILED]);
    }

    // ── Check-in ──

    #[tokio::test]
    async fn check_in_announces_tokens_and_refreshes() {
        let mut api = FakeApi::ok();
        api.check_in = Ok(RewardResponse {
            tokens_earned: 10,
            streak: Some(4),
            ..RewardResponse::default()
        });
        let h = harness(api);
        h.app.load_session().await;
        let calls_before = h.api.calls().len();

        h.app.daily_check_in().await;

        let alerts = h.host.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("10"));
        assert_eq!(h.effect.0.get(), 1);
        assert_eq!(
            h.api.calls()[calls_before..],
            ["daily-check-in/42", "user/42"]
        );
    }

    #[tokio::test]
    async fn check_in_failure_prefers_server_detail() {
        let mut api = FakeApi::ok();
        api.check_in = Err(ApiError::Status {
            status: 400,
            detail: Some("Already checked in today".into()),
        });
        let h = harness(api);
        h.app.load_session().await;

        h.app.daily_check_in().await;

        assert_eq!(h.host.alerts(), ["Already checked in today"]);
        assert_eq!(h.effect.0.get(), 0);
    }

    #[tokio::test]
    async fn check_in_failure_without_detail_is_generic() {
        let mut api = FakeApi::ok();
        api.check_in = Err(network());
        let h = harness(api);
        h.app.load_session().await;

        h.app.daily_check_in().await;

        assert_eq!(h.host.alerts(), [CHECK_IN_FAILED]);
    }

    // ── Tasks ──

    #[tokio::test]
    async fn complete_task_sends_title_and_refreshes() {
        let h = harness(FakeApi::ok());
        h.app.load_session().await;

        h.app.complete_task("Join Discord").await;

        let sent = h.api.last_task.borrow().clone().unwrap();
        assert_eq!(sent.task_title, "Join Discord");
        assert_eq!(sent.telegram_id, "42");
        assert_eq!(h.host.alerts(), [TASK_COMPLETED]);
        assert_eq!(h.effect.0.get(), 1);
        assert_eq!(h.api.calls().last().map(String::as_str), Some("user/42"));
    }

    #[tokio::test]
    async fn complete_task_failure_is_generic() {
        let mut api = FakeApi::ok();
        api.complete = Err(ApiError::Status {
            status: 400,
            detail: Some("Task already completed".into()),
        });
        let h = harness(api);
        h.app.load_session().await;

        h.app.complete_task("Join Discord").await;

        assert_eq!(h.host.alerts(), [TASK_FAILED]);
        assert_eq!(h.effect.0.get(), 0);
    }

    #[tokio::test]
    async fn mutators_without_identity_do_not_call_backend() {
        let h = harness_with(FakeApi::ok(), None, FakeClipboard::default(), Config::default());
        h.app.load_session().await;

        h.app.complete_task("Join Discord").await;
        h.app.daily_check_in().await;
        h.app.submit_wallet("erd1", "").await;

        assert!(h.api.calls().is_empty());
        assert_eq!(h.host.alerts(), [TASK_FAILED, CHECK_IN_FAILED, WALLET_SAVE_FAILED]);
    }

    // ── Clipboard ──

    #[tokio::test]
    async fn copy_wallet_uses_loaded_project_wallet() {
        let mut api = FakeApi::ok();
        api.wallet = Ok(ProjectWallet {
            address: "erd1proj".into(),
            tag: Some("1234".into()),
        });
        let h = harness(api);
        h.app.load_session().await;

        h.app.copy_wallet_address().await;

        assert_eq!(
            h.clipboard.written.borrow().as_slice(),
            ["Address: erd1proj\nTag/Memo: 1234"]
        );
        assert_eq!(h.host.alerts(), [WALLET_COPIED]);
    }

    #[tokio::test]
    async fn clipboard_failure_has_its_own_message() {
        let clipboard = FakeClipboard {
            fail: true,
            ..FakeClipboard::default()
        };
        let h = harness_with(FakeApi::ok(), Some(alice()), clipboard, Config::default());
        h.app.load_session().await;

        h.app.copy_wallet_address().await;

        assert_eq!(h.host.alerts(), [WALLET_COPY_FAILED]);
    }

    #[tokio::test]
    async fn referral_link_uses_identity_handle_by_default() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Ok(UserPatch {
            referral_code: Some(Some("BENI12345".into())),
            ..UserPatch::default()
        });
        let h = harness(api);
        h.app.load_session().await;

        h.app.copy_referral_link().await;

        assert_eq!(
            h.clipboard.written.borrow().as_slice(),
            ["https://t.me/alice?start=BENI12345"]
        );
        assert_eq!(h.host.alerts(), [REFERRAL_COPIED]);
    }

    #[tokio::test]
    async fn referral_link_prefers_configured_bot() {
        let mut api = FakeApi::ok();
        *api.user.get_mut() = Ok(UserPatch {
            referral_code: Some(Some("BENI12345".into())),
            ..UserPatch::default()
        });
        let config = Config {
            bot_username: Some("BeniDropBot".into()),
            ..Config::default()
        };
        let h = harness_with(api, Some(alice()), FakeClipboard::default(), config);
        h.app.load_session().await;

        assert_eq!(
            h.app.referral_link().as_deref(),
            Some("https://t.me/BeniDropBot?start=BENI12345")
        );
    }

    #[tokio::test]
    async fn referral_link_without_code_fails_without_clipboard() {
        let h = harness(FakeApi::ok());
        h.app.load_session().await;

        h.app.copy_referral_link().await;

        assert!(h.clipboard.written.borrow().is_empty());
        assert_eq!(h.host.alerts(), [REFERRAL_COPY_FAILED]);
    }

    // ── Donations ──

    #[test]
    fn donate_dispatches_to_handler() {
        let h = harness(FakeApi::ok());
        for amount in DONATION_PRESETS {
            h.app.donate(amount);
        }
        assert_eq!(h.donations.0.borrow().as_slice(), [0.1, 0.5, 1.0, 5.0]);
    }
}
