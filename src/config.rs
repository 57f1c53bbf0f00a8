//! 拉取配置管理，存储所有可配置项

use std::path::PathBuf;
use std::time::Duration;

/// 上游技术指纹库默认地址
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/AliasIO/wappalyzer/master/src/apps.json";

/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Techsig/0.1.0";

/// 指纹库来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource {
    Remote(String),      // 远程 URL
    LocalFile(PathBuf),  // 本地文件（离线/测试夹具）
}

impl Default for SignatureSource {
    fn default() -> Self {
        SignatureSource::Remote(DEFAULT_SOURCE_URL.to_string())
    }
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    #[default]
    Never,     // 不重试
    Times(u8), // 固定次数重试（不含第一次）
}

impl RetryPolicy {
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::Never => 0,
            RetryPolicy::Times(n) => *n as usize,
        }
    }
}

/// 拉取配置
#[derive(Debug, Clone)]
pub struct FetchConfig {
    // 指纹库来源
    pub source: SignatureSource,
    // HTTP 超时
    pub http_timeout: Duration,
    // 重试策略
    pub retry: RetryPolicy,
    pub user_agent: String,
    // 附加请求头
    pub headers: Vec<(String, String)>,
    // 调试模式：字段解码失败是否输出到诊断日志
    pub debug: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            source: SignatureSource::default(),
            http_timeout: Duration::from_secs(30),
            retry: RetryPolicy::Never,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: Vec::new(),
            debug: false,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> FetchConfig {
        FetchConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: FetchConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FetchConfig::default(),
        }
    }

    pub fn source(mut self, source: SignatureSource) -> Self {
        self.config.source = source;
        self
    }

    pub fn remote_url(mut self, url: impl Into<String>) -> Self {
        self.config.source = SignatureSource::Remote(url.into());
        self
    }

    pub fn local_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source = SignatureSource::LocalFile(path.into());
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.push((name.into(), value.into()));
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> FetchConfig {
        self.config
    }
}
