//! Wire types shared between the BeniDrop backend and the mini-app view layer.

use serde::{Deserialize, Deserializer, Serialize};

/// Telegram user handed to the mini-app through `initDataUnsafe.user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Identity of the current session as read from the host shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub telegram_id: String,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    /// Referral code the mini-app was opened with (`?startapp=` payload).
    pub start_param: Option<String>,
}

impl HostUser {
    /// A host user without an id is not a logged-in session.
    pub fn into_identity(self, start_param: Option<String>) -> Option<Identity> {
        let id = self.id?;
        Some(Identity {
            telegram_id: id.to_string(),
            username: self.username,
            photo_url: self.photo_url,
            start_param: start_param.filter(|p| !p.trim().is_empty()),
        })
    }
}

/// `GET /user/{id}` and `POST /register` body.
///
/// Every field is optional: absent keys leave the local value untouched.
/// Nullable text fields distinguish "absent" (`None`) from "explicitly null"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    #[serde(default, alias = "telegramId")]
    pub telegram_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Option<String>>,
    #[serde(default, alias = "profilePicture", deserialize_with = "present")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, alias = "walletAddress", deserialize_with = "present")]
    pub wallet_address: Option<Option<String>>,
    #[serde(default, alias = "walletTag", deserialize_with = "present")]
    pub wallet_tag: Option<Option<String>>,
    #[serde(default, alias = "totalTokens")]
    pub total_tokens: Option<i64>,
    #[serde(default, alias = "checkInStreak")]
    pub check_in_streak: Option<i64>,
    #[serde(default, alias = "tasksCompleted")]
    pub tasks_completed: Option<i64>,
    #[serde(default, alias = "totalReferrals")]
    pub total_referrals: Option<i64>,
    #[serde(default, alias = "leaderboardRank")]
    pub leaderboard_rank: Option<i64>,
    #[serde(default, alias = "referralCode", deserialize_with = "present")]
    pub referral_code: Option<Option<String>>,
    #[serde(default, alias = "joinDate", deserialize_with = "present")]
    pub join_date: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "points")]
    pub reward: Option<i64>,
    #[serde(default, alias = "url")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub total_tokens: i64,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectWallet {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitWalletRequest {
    pub telegram_id: String,
    pub wallet_address: String,
    pub wallet_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompleteTaskRequest {
    pub telegram_id: String,
    pub task_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UseReferralRequest {
    pub telegram_id: String,
    pub referral_code: String,
}

/// Reward acknowledgement returned by check-in, task completion and referral
/// redemption.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tokens_earned: i64,
    #[serde(default)]
    pub streak: Option<i64>,
    #[serde(default)]
    pub total_tokens: Option<i64>,
}

/// Body of a non-success response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_patch_tells_null_from_absent() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"wallet_address": null, "total_tokens": 1500}"#).unwrap();

        assert_eq!(patch.wallet_address, Some(None));
        assert_eq!(patch.referral_code, None);
        assert_eq!(patch.total_tokens, Some(1500));
        assert_eq!(patch.check_in_streak, None);
    }

    #[test]
    fn user_patch_accepts_camel_case_keys() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"walletAddress": "erd1abc", "checkInStreak": 4}"#).unwrap();

        assert_eq!(patch.wallet_address, Some(Some("erd1abc".to_owned())));
        assert_eq!(patch.check_in_streak, Some(4));
    }

    #[test]
    fn task_accepts_backend_aliases() {
        let task: Task =
            serde_json::from_str(r#"{"name": "Join Discord", "points": 1000}"#).unwrap();

        assert_eq!(task.title, "Join Discord");
        assert_eq!(task.reward, Some(1000));
        assert!(task.description.is_none());
    }

    #[test]
    fn host_user_without_id_is_not_an_identity() {
        let user = HostUser {
            id: None,
            username: Some("alice".to_owned()),
            photo_url: None,
        };
        assert!(user.into_identity(None).is_none());
    }

    #[test]
    fn blank_start_param_is_dropped() {
        let user = HostUser {
            id: Some(42),
            ..HostUser::default()
        };
        let identity = user.into_identity(Some("  ".to_owned())).unwrap();

        assert_eq!(identity.telegram_id, "42");
        assert!(identity.start_param.is_none());
    }
}
