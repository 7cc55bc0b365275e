//! WeCom group-robot webhook client

use crate::types::{MealtallyError, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// Client for one WeCom group-robot webhook URL
pub struct WecomWebhook {
    client: reqwest::blocking::Client,
    webhook_url: String,
}

impl WecomWebhook {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Send a plain-text message, @-mentioning the given WeCom user IDs.
    pub fn send_text(&self, content: &str, mentioned: &[String]) -> Result<()> {
        self.post(text_payload(content, mentioned))
    }

    /// Send a markdown message.
    pub fn send_markdown(&self, content: &str) -> Result<()> {
        self.post(markdown_payload(content))
    }

    fn post(&self, payload: Value) -> Result<()> {
        let response: WebhookResponse = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()?
            .error_for_status()?
            .json()?;

        if response.errcode != 0 {
            return Err(MealtallyError::Notify(format!(
                "message rejected: errcode {} ({})",
                response.errcode, response.errmsg
            )));
        }
        Ok(())
    }
}

fn text_payload(content: &str, mentioned: &[String]) -> Value {
    let mut payload = json!({
        "msgtype": "text",
        "text": { "content": content },
    });
    if !mentioned.is_empty() {
        payload["text"]["mentioned_list"] = json!(mentioned);
    }
    payload
}

fn markdown_payload(content: &str) -> Value {
    json!({
        "msgtype": "markdown",
        "markdown": { "content": content },
    })
}
