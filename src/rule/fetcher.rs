//! 指纹库原始数据拉取
//! 远程源走 reqwest（可配置超时/重试），本地源直接读文件

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::{FetchConfig, SignatureSource};
use crate::error::{SigError, SigResult};

/// 重试间隔
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// 原始数据拉取器（无状态）
#[derive(Debug, Default)]
pub struct RemoteFetcher;

impl RemoteFetcher {
    /// 按配置来源拉取原始字节
    pub async fn fetch(&self, config: &FetchConfig) -> SigResult<Vec<u8>> {
        match &config.source {
            SignatureSource::Remote(url) => {
                let url = Url::parse(url)?;
                let client = Client::builder().timeout(config.http_timeout).build()?;
                self.fetch_remote(&client, &url, config).await
            }
            SignatureSource::LocalFile(path) => {
                debug!("Reading signature database from local file: {}", path.display());
                let bytes = tokio::fs::read(path).await?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
        }
    }

    /// 拉取远程指纹库，按重试策略重试
    async fn fetch_remote(&self, client: &Client, url: &Url, config: &FetchConfig) -> SigResult<Vec<u8>> {
        let max_retries = config.retry.max_retries();
        let mut last_err: Option<SigError> = None;

        for attempt in 0..=max_retries {
            match self.fetch_once(client, url, config).await {
                Ok(bytes) => {
                    debug!("Fetched signature database from [{}], {} bytes", url, bytes.len());
                    return Ok(bytes);
                }
                Err(e) => {
                    if attempt < max_retries {
                        warn!(
                            "Fetching [{}] failed: {}, retrying (attempt {}/{})",
                            url,
                            e,
                            attempt + 1,
                            max_retries
                        );
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| SigError::FetchError("All retry attempts exhausted".to_string())))
    }

    async fn fetch_once(&self, client: &Client, url: &Url, config: &FetchConfig) -> SigResult<Vec<u8>> {
        let mut request = client
            .get(url.clone())
            .header("User-Agent", config.user_agent.as_str())
            .header("Accept-Encoding", "gzip, deflate");
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SigError::FetchError(format!(
                "URL {} returned status code {}",
                url, status
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
