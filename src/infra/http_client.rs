use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::{Result, TrackerError};

pub struct ReqwestHttp {
    client: reqwest::Client,
    user_agent: String,
}

impl ReqwestHttp {
    /// `timeout` bounds the whole request, body included.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        tracing::debug!("HTTP GET request to: {}", url);
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TrackerError::HttpStatus(status.as_u16()));
        }

        let bytes = resp.bytes().await?.to_vec();
        tracing::debug!("HTTP response: status={}, size={} bytes", status.as_u16(), bytes.len());

        Ok(HttpGetResult {
            status: status.as_u16(),
            bytes,
        })
    }
}
