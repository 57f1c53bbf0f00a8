//! 指纹索引数据模型定义
//! 仅存储归一化后的规则数据，构建完成后只读

use std::collections::hash_map::{Iter, Keys, Values};
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::compiler::CompiledPattern;

/// 单项技术可检测的特征集合，所有字段可选（缺省即零值）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matcher {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    /// 页面正文
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_content: Vec<CompiledPattern>,
    /// script 标签 src
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<CompiledPattern>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, CompiledPattern>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub cookies: HashMap<String, CompiledPattern>,
    /// JS 全局属性路径
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub java_script: HashMap<String, CompiledPattern>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, CompiledPattern>,
}

impl Matcher {
    /// 已编译模式总数
    pub fn pattern_count(&self) -> usize {
        self.response_content.len()
            + self.script.len()
            + self.headers.len()
            + self.cookies.len()
            + self.java_script.len()
            + self.meta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icon.is_empty() && self.pattern_count() == 0
    }
}

/// 技术指纹（索引中的一行）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechnologySignature {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub website: String,
    pub matcher: Matcher,
}

impl TechnologySignature {
    /// 从名称快速创建（其余字段为零值）
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for TechnologySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.website.as_str() {
            "" => write!(f, "{}", self.name),
            website => write!(f, "{} ({})", self.name, website),
        }
    }
}

/// 指纹索引：小写技术名 -> 技术指纹
/// 仅在解析阶段写入，对外只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignatureIndex {
    signatures: HashMap<String, TechnologySignature>,
}

impl SignatureIndex {
    /// 写入条目，同名（忽略大小写）覆盖
    pub(crate) fn insert(&mut self, signature: TechnologySignature) {
        self.signatures.insert(signature.name.to_lowercase(), signature);
    }

    /// 按名称查找（忽略大小写）
    pub fn get(&self, name: &str) -> Option<&TechnologySignature> {
        self.signatures.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn keys(&self) -> Keys<'_, String, TechnologySignature> {
        self.signatures.keys()
    }

    pub fn values(&self) -> Values<'_, String, TechnologySignature> {
        self.signatures.values()
    }

    pub fn iter(&self) -> Iter<'_, String, TechnologySignature> {
        self.signatures.iter()
    }

    pub fn into_inner(self) -> HashMap<String, TechnologySignature> {
        self.signatures
    }
}

impl<'a> IntoIterator for &'a SignatureIndex {
    type Item = (&'a String, &'a TechnologySignature);
    type IntoIter = Iter<'a, String, TechnologySignature>;

    fn into_iter(self) -> Self::IntoIter {
        self.signatures.iter()
    }
}
