//! 模式编译器
//! 上游文本变为可执行正则的唯一入口：不补锚点、不注入标志、不改写模式文本

use regex::Regex;
use serde_json::Value;

use super::pattern::CompiledPattern;
use crate::error::{json_kind, FieldError};

/// 模式编译器（无状态）
pub struct PatternCompiler;

impl PatternCompiler {
    /// 编译单个模式字符串
    pub fn compile_str(raw_pattern: &str) -> Result<CompiledPattern, FieldError> {
        Regex::new(raw_pattern)
            .map(CompiledPattern::new)
            .map_err(|source| FieldError::InvalidPattern {
                pattern: raw_pattern.to_string(),
                source,
            })
    }

    /// 编译 JSON 值，值必须是字符串
    pub fn compile(value: &Value) -> Result<CompiledPattern, FieldError> {
        match value {
            Value::String(s) => Self::compile_str(s),
            other => Err(FieldError::NotAString {
                found: json_kind(other),
            }),
        }
    }
}
