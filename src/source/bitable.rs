//! Feishu Bitable record source
//!
//! Tenant token acquisition plus paginated record listing filtered by base
//! date. Infrastructure failures (transport errors, non-zero API codes)
//! propagate as errors; only the aggregation core degrades gracefully.

use crate::types::{MealtallyError, RawRecord, Result, DATE_FIELD};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const TENANT_TOKEN_URL: &str =
    "https://open.feishu.cn/open-apis/auth/v3/tenant_access_token/internal";

const BITABLE_BASE_URL: &str = "https://open.feishu.cn/open-apis/bitable/v1";

/// HTTP request timeout for token acquisition in seconds
const TOKEN_TIMEOUT_SECS: u64 = 10;

/// HTTP request timeout for record listing in seconds
const LIST_TIMEOUT_SECS: u64 = 15;

/// Records fetched per page
const PAGE_SIZE: u32 = 500;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    tenant_access_token: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<ListData>,
}

#[derive(Debug, Default, Deserialize)]
struct ListData {
    #[serde(default)]
    items: Vec<RawRecord>,
    #[serde(default)]
    page_token: Option<String>,
    #[serde(default)]
    has_more: bool,
}

/// Client for one Bitable table
pub struct BitableSource {
    client: reqwest::blocking::Client,
    app_token: String,
    table_id: String,
}

impl BitableSource {
    pub fn new(app_token: impl Into<String>, table_id: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(LIST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            app_token: app_token.into(),
            table_id: table_id.into(),
        })
    }

    /// Exchange app credentials for a tenant access token.
    pub fn tenant_token(&self, app_id: &str, app_secret: &str) -> Result<String> {
        let response: TokenResponse = self
            .client
            .post(TENANT_TOKEN_URL)
            .timeout(Duration::from_secs(TOKEN_TIMEOUT_SECS))
            .json(&serde_json::json!({
                "app_id": app_id,
                "app_secret": app_secret,
            }))
            .send()?
            .error_for_status()?
            .json()?;

        if response.code != 0 {
            return Err(MealtallyError::Source(format!(
                "token request rejected: code {} ({})",
                response.code, response.msg
            )));
        }
        Ok(response.tenant_access_token)
    }

    /// Fetch every record filed under `base_date`, following pagination
    /// until the server reports no more pages.
    pub fn list_by_base_date(&self, token: &str, base_date: NaiveDate) -> Result<Vec<RawRecord>> {
        let url = format!(
            "{BITABLE_BASE_URL}/apps/{}/tables/{}/records",
            self.app_token, self.table_id
        );
        let filter = date_filter(base_date);

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(token)
                .query(&[("page_size", PAGE_SIZE.to_string()), ("filter", filter.clone())]);
            if let Some(ref pt) = page_token {
                request = request.query(&[("page_token", pt.as_str())]);
            }

            let response: ListResponse = request.send()?.error_for_status()?.json()?;
            if response.code != 0 {
                return Err(MealtallyError::Source(format!(
                    "record listing rejected: code {} ({})",
                    response.code, response.msg
                )));
            }

            let data = response.data.unwrap_or_default();
            items.extend(data.items);
            if !data.has_more || data.page_token.is_none() {
                break;
            }
            page_token = data.page_token;
        }
        Ok(items)
    }
}

/// Server-side filter selecting records filed under one base date.
fn date_filter(base_date: NaiveDate) -> String {
    format!(
        "CurrentValue.[{DATE_FIELD}] = \"{}\"",
        base_date.format("%Y-%m-%d")
    )
}
