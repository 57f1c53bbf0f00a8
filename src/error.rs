//! 全局错误类型定义
//! SigError：整次拉取失败（调用级）；FieldError：单个字段解码失败（字段级，只上报不中断）

use std::fmt;
use std::io::Error as IoError;

use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum SigError {
    // 拉取相关错误
    #[error("Signature database fetch failed: {0}")]
    FetchError(String),
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // 解析相关错误
    #[error("Signature database JSON decode failed: {0}")]
    JsonError(#[from] SerdeJsonError),

    // 全局索引
    #[error("Signature index not initialized: {0}")]
    NotInitialized(String),

    // 基础错误
    #[error("IO operation failed: {0}")]
    IoError(#[from] IoError),
    #[error("Invalid source URL: {0}")]
    UrlError(#[from] UrlParseError),
}

// 全局Result类型
pub type SigResult<T> = Result<T, SigError>;

/// 字段级解码错误
/// 只影响所在字段：字段被置空并上报诊断，技术条目本身照常入库
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("not a pattern string (found {found})")]
    NotAString { found: &'static str },

    #[error("not a list of pattern strings (found {found})")]
    NotAList { found: &'static str },

    #[error("not a map of pattern strings (found {found})")]
    NotAnObject { found: &'static str },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: RegexError,
    },

    #[error("list item {index}: {source}")]
    ListItem {
        index: usize,
        #[source]
        source: Box<FieldError>,
    },

    #[error("key `{key}`: {source}")]
    MapEntry {
        key: String,
        #[source]
        source: Box<FieldError>,
    },

    /// 分类 / 技术条目层级不是对象，整条跳过
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    /// 非空列表中没有任何可用模式，逐项失败原因按行拼接
    #[error("no usable pattern in list:\n{}", JoinLines(.0))]
    NoUsablePattern(Vec<FieldError>),

    /// 所有候选形态均不成立，各形态的失败原因按行拼接
    #[error("{}", JoinLines(.0))]
    NoInterpretation(Vec<FieldError>),
}

struct JoinLines<'a>(&'a [FieldError]);

impl fmt::Display for JoinLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// JSON 值类型名（用于错误提示）
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
