//! 编译后模式模型
//! 正则编译后的结构

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

/// 编译后的正则模式
/// 相等性与序列化均基于正则源文本
#[derive(Debug, Clone)]
pub struct CompiledPattern(Regex);

impl CompiledPattern {
    pub(crate) fn new(regex: Regex) -> Self {
        Self(regex)
    }

    /// 正则源文本
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// 简单匹配判断
    pub fn is_match(&self, input: &str) -> bool {
        self.0.is_match(input)
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for CompiledPattern {}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl Serialize for CompiledPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
