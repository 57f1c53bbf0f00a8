//! 规则模块：负责指纹库的拉取、解析、归一化与数据模型定义
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod fetcher;
pub mod loader;

// 导出核心接口
pub use self::model::{Matcher, SignatureIndex, TechnologySignature};
pub use self::normalizer::{FieldNormalizer, PatternList};
pub use self::parser::DatabaseParser;
pub use self::fetcher::RemoteFetcher;
pub use self::loader::{fetch_technology_signatures, fetch_technology_signatures_with_sink, RuleLoader};
