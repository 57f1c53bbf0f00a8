//! techsig - Wappalyzer 技术指纹库加载与归一化
//!
//! 拉取上游指纹库 JSON，将每项技术的多形态字段（字符串 / 数组 / 映射）
//! 解码为预编译正则，构建以小写技术名为键的只读索引。
//!
//! ```no_run
//! # async fn demo() -> techsig::SigResult<()> {
//! let config = techsig::ConfigManager::custom().debug(true).build();
//! let index = techsig::fetch_technology_signatures(&config).await?;
//! if let Some(wp) = index.get("wordpress") {
//!     println!("{} patterns for {}", wp.matcher.pattern_count(), wp);
//! }
//! # Ok(())
//! # }
//! ```

// 导出全局错误类型
pub use self::error::{FieldError, SigError, SigResult};

// 导出配置模块
pub use self::config::{
    ConfigManager, CustomConfigBuilder, FetchConfig, RetryPolicy, SignatureSource,
    DEFAULT_SOURCE_URL,
};

// 导出编译模块核心接口
pub use self::compiler::{CompiledPattern, PatternCompiler};

// 导出规则模块核心接口
pub use self::rule::{
    fetch_technology_signatures, fetch_technology_signatures_with_sink, DatabaseParser,
    FieldNormalizer, Matcher, PatternList, RemoteFetcher, RuleLoader, SignatureIndex, TechnologySignature,
};

// 导出诊断接口
pub use self::diagnostics::{DiagnosticSink, FieldDiagnostic, NullSink, TracingSink};

// 导出全局单例接口
pub use self::global::{
    global_signatures, init_global_signatures, init_global_signatures_with_config,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod compiler;
pub mod rule;
pub mod diagnostics;
pub mod global;
