use std::time::Duration;

use serenity::async_trait;
use tracing::{error, info, instrument};

use crate::models::error::FetchError;
use crate::models::event::RawPage;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<RawPage, FetchError>;
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<RawPage, FetchError> {
        info!("Fetching event page");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("HTTP {} when fetching {}", status, url);
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        info!("Fetched {} bytes", html.len());
        Ok(RawPage {
            url: url.to_string(),
            html,
        })
    }
}
