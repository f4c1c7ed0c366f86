//! Pure projection of state into display text and HTML fragments.
//!
//! Nothing here touches the DOM; `view::DomView` writes the results into
//! elements. Keeping the projection pure is what makes `update_ui`
//! idempotent and testable without a browser.

use bd_api_types::{LeaderboardEntry, ProjectWallet, Task};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::Config;
use crate::state::UserState;

pub const ANONYMOUS: &str = "Anonymous";
pub const NOT_AVAILABLE: &str = "N/A";

/// Display values for every profile/stat element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub picture_src: String,
    pub display_name: String,
    pub join_date: String,
    pub total_tokens: String,
    pub check_in_streak: String,
    pub tasks_completed: String,
    pub total_referrals: String,
    pub leaderboard_rank: String,
    pub referral_code: String,
    /// Wallet-connected panel; `None` means "leave the panel alone".
    pub wallet_panel: Option<String>,
}

pub fn profile_view(user: &UserState, config: &Config) -> ProfileView {
    ProfileView {
        picture_src: user
            .profile_picture
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| config.placeholder_avatar.clone()),
        display_name: user
            .username
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_owned()),
        join_date: format!("Joined {}", format_date(user.join_date.as_deref())),
        total_tokens: group_thousands(user.total_tokens),
        check_in_streak: user.check_in_streak.to_string(),
        tasks_completed: format!("{}/{}", user.tasks_completed, config.max_tasks),
        total_referrals: user.total_referrals.to_string(),
        leaderboard_rank: format!("#{}", user.leaderboard_rank),
        referral_code: user
            .referral_code
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        wallet_panel: wallet_panel(user),
    }
}

/// Present iff the user has a non-empty wallet address.
pub fn wallet_panel(user: &UserState) -> Option<String> {
    if !user.has_wallet() {
        return None;
    }
    let address = user.wallet_address.as_deref().unwrap_or_default();
    Some(format!(
        r#"
            <div class="text-center">
                <i class="fas fa-check-circle text-4xl text-green-500 mb-4"></i>
                <h3 class="text-xl font-bold mb-2">Wallet Connected</h3>
                <p class="text-gray-400 break-all">{}</p>
            </div>
        "#,
        escape_html(address)
    ))
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO-8601 timestamp (`2024-03-05T10:00:00`) → `3/5/2024`. Text that is
/// not a real calendar date is shown as-is.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return NOT_AVAILABLE.to_owned();
    };
    match parse_date(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => raw.to_owned(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ── Leaderboard ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    fn color_class(self) -> &'static str {
        match self {
            Medal::Gold => "text-yellow-500",
            Medal::Silver => "text-gray-500",
            Medal::Bronze => "text-orange-500",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub tokens: String,
    pub medal: Option<Medal>,
}

/// Rows in backend order; the backend's own `rank` field is not consulted.
pub fn leaderboard_rows(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| LeaderboardRow {
            rank: i + 1,
            name: e
                .username
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ANONYMOUS.to_owned()),
            tokens: group_thousands(e.total_tokens),
            medal: Medal::for_rank(i + 1),
        })
        .collect()
}

pub fn leaderboard_html(entries: &[LeaderboardEntry]) -> String {
    leaderboard_rows(entries)
        .iter()
        .map(|row| {
            let marker = row
                .medal
                .map(|m| format!(r#"<i class="fas fa-crown {}"></i>"#, m.color_class()))
                .unwrap_or_default();
            format!(
                r#"
            <div class="leaderboard-item rounded-xl p-4 flex items-center">
                <div class="flex-shrink-0 w-8 text-center">
                    <span class="font-bold">#{}</span>
                </div>
                <div class="flex-grow ml-4">
                    <p class="font-bold">{}</p>
                    <p class="text-gray-400 text-sm">{} tokens</p>
                </div>
                {}
            </div>
        "#,
                row.rank,
                escape_html(&row.name),
                row.tokens,
                marker
            )
        })
        .collect()
}

// ── Tasks ──

/// Task cards. The completion handler identifies a task by the text of the
/// card's `<h3>`, so the title must be the only text in that heading.
pub fn tasks_html(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return r#"<div class="task-card task-card--empty text-gray-400">No tasks available right now.</div>"#
            .to_owned();
    }
    tasks
        .iter()
        .map(|t| {
            let description = t
                .description
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| format!(r#"<p class="text-gray-400 text-sm">{}</p>"#, escape_html(d)))
                .unwrap_or_default();
            let reward = t
                .reward
                .map(|r| {
                    format!(
                        r#"<span class="task-reward">+{} tokens</span>"#,
                        group_thousands(r)
                    )
                })
                .unwrap_or_default();
            let link = t
                .link
                .as_deref()
                .filter(|l| !l.is_empty())
                .map(|l| {
                    format!(
                        r#"<a class="task-link" href="{}" target="_blank" rel="noopener">Open</a>"#,
                        escape_html(l)
                    )
                })
                .unwrap_or_default();
            format!(
                r#"
            <div class="task-card rounded-xl p-4">
                <h3 class="font-bold">{}</h3>
                {}
                <div class="flex items-center justify-between mt-2">
                    {}
                    {}
                    <button class="glow-button">Complete</button>
                </div>
            </div>
        "#,
                escape_html(&t.title),
                description,
                reward,
                link
            )
        })
        .collect()
}

// ── Clipboard payloads ──

pub fn wallet_clipboard_text(wallet: &ProjectWallet) -> String {
    match wallet.tag.as_deref().filter(|t| !t.is_empty()) {
        Some(tag) => format!("Address: {}\nTag/Memo: {}", wallet.address, tag),
        None => wallet.address.clone(),
    }
}

/// Bot deep link (`?start=`). Telegram delivers that payload to the bot's
/// `/start` handler, not to the mini-app's `start_param`, which only
/// `?startapp=` links fill.
pub fn referral_link(handle: &str, referral_code: &str) -> String {
    format!("https://t.me/{}?start={}", handle, referral_code)
}
