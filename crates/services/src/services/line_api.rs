//! LINE Messaging API client used by the notification relay.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use super::relay::{RelayError, map_reqwest_error, require_token};

const LINE_API_BASE: &str = "https://api.line.me";
pub const LINE_TOKEN_VAR: &str = "LINE_CHANNEL_ACCESS_TOKEN";

/// Push-message request as accepted by `POST /api/line/send`. Message
/// objects are forwarded untouched so any message type the platform supports
/// (text, sticker, flex, ...) passes through.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LinePushRequest {
    pub to: String,
    #[ts(type = "Array<unknown>")]
    pub messages: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct LineApi {
    http: Client,
    base_url: String,
}

impl LineApi {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new() -> Result<Self, RelayError> {
        Self::with_base_url(LINE_API_BASE)
    }

    /// Base URL override, used by tests to point at a stub upstream.
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

    /// Forward a push message to the platform. The token is read from the
    /// environment before the outbound call; a missing token fails fast.
    pub async fn push_message(&self, request: &LinePushRequest) -> Result<Value, RelayError> {
        let token = require_token(LINE_TOKEN_VAR)?;
        let url = format!("{}/v2/bot/message/push", self.base_url);

        let res = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Self::passthrough(res).await
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Value, RelayError> {
        let token = require_token(LINE_TOKEN_VAR)?;
        let url = format!("{}/v2/bot/profile/{}", self.base_url, user_id);

        let res = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Self::passthrough(res).await
    }

    /// Success bodies come back as JSON; failures echo the upstream status
    /// and body verbatim.
    async fn passthrough(res: reqwest::Response) -> Result<Value, RelayError> {
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
