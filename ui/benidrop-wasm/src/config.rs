//! Startup configuration.
//!
//! Read once from `data-*` attributes on `<body>`, so the same build can be
//! pointed at different backends by the hosting page:
//!
//! ```html
//! <body data-api-base="https://api.benidrop.xyz/api" data-bot-username="BeniDropBot">
//! ```

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
pub const DEFAULT_PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/80";
pub const DEFAULT_MAX_TASKS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("data-max-tasks must be a positive integer, got {0:?}")]
    InvalidMaxTasks(String),
    #[error("data-api-base must be an http(s) URL or an absolute path, got {0:?}")]
    InvalidApiBase(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base path, without a trailing slash.
    pub api_base: String,
    /// Bot used in referral links; the user's own handle when unset.
    pub bot_username: Option<String>,
    /// Denominator of the "tasks completed" counter.
    pub max_tasks: u32,
    pub placeholder_avatar: String,
    /// `EnvFilter` directive for browser console logging.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            bot_username: None,
            max_tasks: DEFAULT_MAX_TASKS,
            placeholder_avatar: DEFAULT_PLACEHOLDER_AVATAR.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Config {
    /// Build from `(key, value)` pairs named like the `dataset` keys
    /// (`apiBase`, `botUsername`, ...). Unknown keys are ignored.
    ///
    /// Invalid values keep their default and are reported back so the caller
    /// can log them once logging is up.
    pub fn from_pairs<'a, I>(pairs: I) -> (Self, Vec<ConfigError>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Config::default();
        let mut errors = Vec::new();

        for (key, raw) in pairs {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "apiBase" => match normalize_api_base(value) {
                    Ok(base) => config.api_base = base,
                    Err(e) => errors.push(e),
                },
                "botUsername" => {
                    config.bot_username = Some(value.trim_start_matches('@').to_owned());
                }
                "maxTasks" => match value.parse::<u32>() {
                    Ok(n) if n > 0 => config.max_tasks = n,
                    _ => errors.push(ConfigError::InvalidMaxTasks(value.to_owned())),
                },
                "placeholderAvatar" => config.placeholder_avatar = value.to_owned(),
                "logFilter" => config.log_filter = value.to_owned(),
                _ => {}
            }
        }

        (config, errors)
    }

    /// Read the `<body>` dataset. Falls back to defaults outside a browser
    /// document or when `<body>` is not yet available.
    pub fn from_document() -> (Self, Vec<ConfigError>) {
        let Some(body) = gloo_utils::document().body() else {
            return (Config::default(), Vec::new());
        };
        let dataset = body.dataset();
        let keys = [
            "apiBase",
            "botUsername",
            "maxTasks",
            "placeholderAvatar",
            "logFilter",
        ];
        let values: Vec<(&str, String)> = keys
            .iter()
            .filter_map(|k| dataset.get(k).map(|v| (*k, v)))
            .collect();

        Config::from_pairs(values.iter().map(|(k, v)| (*k, v.as_str())))
    }
}

fn normalize_api_base(value: &str) -> Result<String, ConfigError> {
    if !(value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/')) {
        return Err(ConfigError::InvalidApiBase(value.to_owned()));
    }
    Ok(value.trim_end_matches('/').to_owned())
}
