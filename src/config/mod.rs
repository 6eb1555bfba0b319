use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mailer::SmtpSettings;

use crate::errors::{ScoutError, ScoutResult};

pub const DEFAULT_SUBREDDIT: &str = "sanpedrocactusforsale";
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "pachanoi",
    "bridgesii",
    "peruvianus",
    "trichocereus",
    "san pedro",
    "crest",
    "variegata",
];

/// Where and how to fetch the feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub subreddit: String,
    pub page_size: usize,
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            page_size: 25,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Keyword and exclusion rules
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub keywords: Vec<String>,
    pub exclude_terms: Vec<String>,
    pub exclude_enabled: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            exclude_terms: vec!["sold".to_string()],
            exclude_enabled: true,
        }
    }
}

/// Pacing of the lookback scan
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub page_delay: Duration,
    pub max_pages: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(600),
            max_pages: 40,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp: SmtpSettings,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub filter: FilterConfig,
    pub poll: PollConfig,
    pub state_path: PathBuf,
    pub log_level: String,
    /// `None` when email delivery is disabled
    pub email: Option<EmailConfig>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> ScoutResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys fall back to defaults
    pub fn from_vars<F>(var: F) -> ScoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed_defaults = FeedConfig::default();
        let feed = FeedConfig {
            base_url: var("SCOUT_FEED_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(feed_defaults.base_url),
            subreddit: var("SCOUT_SUBREDDIT").unwrap_or(feed_defaults.subreddit),
            ..feed_defaults
        };

        let filter_defaults = FilterConfig::default();
        let keywords = var("SCOUT_KEYWORDS")
            .map(|raw| split_list(&raw))
            .unwrap_or(filter_defaults.keywords);
        if keywords.is_empty() {
            return Err(ScoutError::Config(
                "SCOUT_KEYWORDS must name at least one keyword".to_string(),
            ));
        }
        let filter = FilterConfig {
            keywords,
            exclude_terms: var("SCOUT_EXCLUDE_TERMS")
                .map(|raw| split_list(&raw))
                .unwrap_or(filter_defaults.exclude_terms),
            exclude_enabled: parse_var(&var, "SCOUT_FILTER_SOLD", parse_bool)?
                .unwrap_or(filter_defaults.exclude_enabled),
        };

        let poll_defaults = PollConfig::default();
        let poll = PollConfig {
            page_delay: parse_var(&var, "SCOUT_PAGE_DELAY_MS", parse_number::<u64>)?
                .map(Duration::from_millis)
                .unwrap_or(poll_defaults.page_delay),
            max_pages: parse_var(&var, "SCOUT_MAX_PAGES", parse_number::<usize>)?
                .unwrap_or(poll_defaults.max_pages)
                .max(1),
        };

        // Default state file lives next to the executable
        let state_path = var("SCOUT_STATE_FILE").map(PathBuf::from).unwrap_or_else(|| {
            Self::exe_dir()
                .map(|d| d.join("cactus_seen.json"))
                .unwrap_or_else(|| PathBuf::from("./cactus_seen.json"))
        });

        let log_level = var("SCOUT_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let email_enabled = parse_var(&var, "EMAIL_ENABLED", parse_bool)?.unwrap_or(true);
        let email = if email_enabled {
            Some(EmailConfig::from_vars(&var)?)
        } else {
            None
        };

        Ok(Self {
            feed,
            filter,
            poll,
            state_path,
            log_level,
            email,
        })
    }
}

impl EmailConfig {
    fn from_vars<F>(var: &F) -> ScoutResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| var(key).ok_or_else(|| ScoutError::MissingEnvVar(key.to_string()));

        let username = required("SMTP_USER")?;
        let password = required("SMTP_PASSWORD")?;
        let host = var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string());
        let port = parse_var(var, "SMTP_PORT", parse_number::<u16>)?.unwrap_or(587);
        let from = var("EMAIL_FROM").unwrap_or_else(|| username.clone());
        let to = var("EMAIL_TO").unwrap_or_else(|| from.clone());

        Ok(Self {
            smtp: SmtpSettings {
                host,
                port,
                username,
                password,
            },
            from,
            to,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<F, T>(var: &F, key: &str, parse: fn(&str) -> Option<T>) -> ScoutResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => parse(raw.trim())
            .map(Some)
            .ok_or_else(|| ScoutError::Config(format!("Invalid value for {}: {}", key, raw))),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_number<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}
