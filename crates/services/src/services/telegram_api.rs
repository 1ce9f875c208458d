//! Telegram Bot API client used by the notification relay.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use super::relay::{RelayError, map_reqwest_error, require_token};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TelegramSendRequest {
    #[serde(alias = "chatId")]
    pub chat_id: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct TelegramApi {
    http: Client,
    base_url: String,
}

impl TelegramApi {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new() -> Result<Self, RelayError> {
        Self::with_base_url(TELEGRAM_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("opsboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn send_message(&self, request: &TelegramSendRequest) -> Result<Value, RelayError> {
        let token = require_token(TELEGRAM_TOKEN_VAR)?;
        let url = format!("{}/bot{}/sendMessage", self.base_url, token);

        let res = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": request.chat_id,
                "text": request.text,
            }))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if status.is_success() {
            res.json::<Value>()
                .await
                .map_err(|e| RelayError::Serde(e.to_string()))
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}
