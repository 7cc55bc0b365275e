//! Environment configuration
//!
//! Parsed once into an immutable value and passed down explicitly. The
//! aggregation core only ever sees resolved parameters (meal kind, served
//! date, quantity limits), never ambient process state.

use crate::types::{MealKind, MealtallyError, QuantityLimits, Result};
use chrono::{Duration, FixedOffset, NaiveDate, Utc};

/// What the run does: nudge people to register, or tally and report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Remind,
    Report,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "remind" => Some(Mode::Remind),
            "report" => Some(Mode::Report),
            _ => None,
        }
    }
}

/// Bitable app credentials plus table coordinates, required in report mode.
#[derive(Debug, Clone)]
pub struct BitableCredentials {
    pub app_id: String,
    pub app_secret: String,
    pub app_token: String,
    pub table_id: String,
}

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    /// UTC offset used to resolve "today" (the runner usually fires from a
    /// scheduler in a different timezone than the canteen).
    pub timezone: FixedOffset,
    pub mode: Mode,
    pub meal_kind: MealKind,
    pub date_shift_days: i64,
    pub form_url: String,
    pub deadline_hhmm: String,
    pub mention_userids: Vec<String>,
    pub lock_date: bool,
    pub limits: QuantityLimits,
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub bitable_app_token: Option<String>,
    pub bitable_table_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let timezone = match env_opt("TIMEZONE") {
            Some(tz) => parse_utc_offset(&tz).ok_or_else(|| {
                MealtallyError::Config(format!(
                    "TIMEZONE must be a UTC offset like +08:00, got {tz:?}"
                ))
            })?,
            None => default_timezone(),
        };
        let mode = match env_opt("MODE") {
            Some(mode) => Mode::parse(&mode).ok_or_else(|| {
                MealtallyError::Config(format!("MODE must be remind or report, got {mode:?}"))
            })?,
            None => Mode::Report,
        };
        let meal_kind = match env_opt("MEAL_KIND") {
            Some(kind) => MealKind::parse(&kind).ok_or_else(|| {
                MealtallyError::Config(format!(
                    "MEAL_KIND must be lunch, dinner, or breakfast_next, got {kind:?}"
                ))
            })?,
            None => MealKind::Lunch,
        };

        Ok(Config {
            webhook_url: require_env("WECHAT_WEBHOOK")?,
            timezone,
            mode,
            meal_kind,
            date_shift_days: parse_env("DATE_SHIFT_DAYS", 0)?,
            form_url: env_opt("FORM_URL").unwrap_or_default(),
            deadline_hhmm: env_opt("DEADLINE_HHMM").unwrap_or_default(),
            mention_userids: split_userids(&env_opt("MENTION_USERIDS").unwrap_or_default()),
            lock_date: env_opt("LOCK_DATE").as_deref() == Some("1"),
            limits: QuantityLimits {
                adult_max: parse_env("ADULT_MAX", 2)?,
                child_max: parse_env("CHILD_MAX", 2)?,
            },
            app_id: env_opt("FEISHU_APP_ID"),
            app_secret: env_opt("FEISHU_APP_SECRET"),
            bitable_app_token: env_opt("BITABLE_APP_TOKEN"),
            bitable_table_id: env_opt("BITABLE_TABLE_ID"),
        })
    }

    /// Today in the configured timezone, shifted by `DATE_SHIFT_DAYS`.
    pub fn target_date(&self) -> NaiveDate {
        let today = Utc::now().with_timezone(&self.timezone).date_naive();
        Duration::try_days(self.date_shift_days)
            .and_then(|shift| today.checked_add_signed(shift))
            .unwrap_or(today)
    }

    /// The Bitable credential set, or a config error naming every missing
    /// variable (report mode needs all four).
    pub fn bitable_credentials(&self) -> Result<BitableCredentials> {
        let mut missing = Vec::new();
        let mut take = |value: &Option<String>, name: &'static str| {
            if value.is_none() {
                missing.push(name);
            }
            value.clone().unwrap_or_default()
        };

        let credentials = BitableCredentials {
            app_id: take(&self.app_id, "FEISHU_APP_ID"),
            app_secret: take(&self.app_secret, "FEISHU_APP_SECRET"),
            app_token: take(&self.bitable_app_token, "BITABLE_APP_TOKEN"),
            table_id: take(&self.bitable_table_id, "BITABLE_TABLE_ID"),
        };
        if !missing.is_empty() {
            return Err(MealtallyError::Config(format!(
                "report mode requires {}",
                missing.join(", ")
            )));
        }
        Ok(credentials)
    }
}

/// Asia/Shanghai, where the canteen lives.
fn default_timezone() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("+08:00 is a valid offset")
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_env(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| MealtallyError::Config(format!("{key} is not set")))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env_opt(key) {
        Some(raw) => raw.parse().map_err(|_| {
            MealtallyError::Config(format!("{key} is not a valid number, got {raw:?}"))
        }),
        None => Ok(default),
    }
}

/// Parse a `+08:00` / `-05:30` style UTC offset.
fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    let (sign, rest) = match (s.strip_prefix('+'), s.strip_prefix('-')) {
        (Some(rest), _) => (1, rest),
        (_, Some(rest)) => (-1, rest),
        _ => (1, s),
    };
    let (hh, mm) = rest.split_once(':')?;
    let hours = hh.parse::<u32>().ok()? as i32;
    let minutes = mm.parse::<u32>().ok()? as i32;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn split_userids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== parse_utc_offset ==========

    #[test]
    fn test_parse_utc_offset_east() {
        assert_eq!(
            parse_utc_offset("+08:00"),
            FixedOffset::east_opt(8 * 3600)
        );
        assert_eq!(parse_utc_offset("08:00"), FixedOffset::east_opt(8 * 3600));
    }

    #[test]
    fn test_parse_utc_offset_west_and_half_hour() {
        assert_eq!(
            parse_utc_offset("-05:30"),
            FixedOffset::east_opt(-(5 * 3600 + 30 * 60))
        );
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        assert_eq!(parse_utc_offset("Asia/Shanghai"), None);
        assert_eq!(parse_utc_offset("+8"), None);
        assert_eq!(parse_utc_offset("+25:00"), None);
        assert_eq!(parse_utc_offset("+08:-5"), None);
        assert_eq!(parse_utc_offset(""), None);
    }

    // ========== Mode ==========

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("remind"), Some(Mode::Remind));
        assert_eq!(Mode::parse("report"), Some(Mode::Report));
        assert_eq!(Mode::parse("Report"), None);
        assert_eq!(Mode::parse(""), None);
    }

    // ========== Mention list ==========

    #[test]
    fn test_split_userids() {
        assert_eq!(
            split_userids("mr.Yu, zhangsan ,,"),
            vec!["mr.Yu".to_string(), "zhangsan".to_string()]
        );
        assert!(split_userids("").is_empty());
    }

    // ========== Bitable credentials ==========

    fn base_config() -> Config {
        Config {
            webhook_url: "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=k".into(),
            timezone: default_timezone(),
            mode: Mode::Report,
            meal_kind: MealKind::Lunch,
            date_shift_days: 0,
            form_url: String::new(),
            deadline_hhmm: String::new(),
            mention_userids: Vec::new(),
            lock_date: false,
            limits: QuantityLimits::default(),
            app_id: Some("cli_a".into()),
            app_secret: Some("secret".into()),
            bitable_app_token: Some("bascn".into()),
            bitable_table_id: Some("tbl".into()),
        }
    }

    #[test]
    fn test_bitable_credentials_complete() {
        let credentials = base_config().bitable_credentials().unwrap();
        assert_eq!(credentials.app_id, "cli_a");
        assert_eq!(credentials.table_id, "tbl");
    }

    #[test]
    fn test_bitable_credentials_names_missing_vars() {
        let mut config = base_config();
        config.app_secret = None;
        config.bitable_table_id = None;

        let err = config.bitable_credentials().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("FEISHU_APP_SECRET"));
        assert!(message.contains("BITABLE_TABLE_ID"));
        assert!(!message.contains("FEISHU_APP_ID"));
    }
}
