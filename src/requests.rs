use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, ClientBuilder, Response};

use crate::error::{Result, ScheduleError};

/// HTTP retrieval as the pipeline needs it: page text and document bytes.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = ClientBuilder::new().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn fetch_url_response(&self, url: &str) -> Result<Response> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

fn transport(url: &str, source: reqwest::Error) -> ScheduleError {
    ScheduleError::Transport {
        url: url.to_string(),
        source: Box::new(source),
    }
}

#[async_trait]
impl Fetch for RequestClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch_url_response(url).await?;
        response.text().await.map_err(|e| transport(url, e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.fetch_url_response(url).await?;
        let body = response.bytes().await.map_err(|e| transport(url, e))?;
        Ok(body.to_vec())
    }
}
