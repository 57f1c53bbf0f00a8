//! 字段归一化
//! 将多形态 JSON 字段（字符串 / 字符串数组 / 字符串映射）解码为编译后的模式
//! 失败策略：字段整体失败并返回错误，由调用方置空字段并上报；
//! 列表中的坏元素单独跳过，随结果一并交给调用方上报

use std::collections::HashMap;

use serde_json::Value;

use crate::compiler::{CompiledPattern, PatternCompiler};
use crate::error::{json_kind, FieldError};

/// 列表型字段解码结果
#[derive(Debug, Default)]
pub struct PatternList {
    /// 可用模式，保持上游顺序
    pub patterns: Vec<CompiledPattern>,
    /// 被跳过的元素（ListItem 错误）
    pub skipped: Vec<FieldError>,
}

/// 字段归一化器（无状态）
pub struct FieldNormalizer;

impl FieldNormalizer {
    /// 解码「单字符串或字符串数组」字段（html/script）
    /// 先按 JSON 类型分支，只走一种形态，不混合多种解释的结果
    /// 数组中编译失败的元素被跳过；非空数组没有任何可用模式时字段失败
    pub fn decode_pattern_list(value: &Value) -> Result<PatternList, FieldError> {
        match value {
            Value::String(s) => Ok(PatternList {
                patterns: vec![PatternCompiler::compile_str(s)?],
                skipped: Vec::new(),
            }),
            Value::Array(items) => {
                let mut list = PatternList::default();
                for (index, item) in items.iter().enumerate() {
                    match PatternCompiler::compile(item) {
                        Ok(pattern) => list.patterns.push(pattern),
                        Err(e) => list.skipped.push(FieldError::ListItem {
                            index,
                            source: Box::new(e),
                        }),
                    }
                }

                if list.patterns.is_empty() && !list.skipped.is_empty() {
                    return Err(FieldError::NoUsablePattern(list.skipped));
                }
                Ok(list)
            }
            other => {
                let found = json_kind(other);
                Err(FieldError::NoInterpretation(vec![
                    FieldError::NotAString { found },
                    FieldError::NotAList { found },
                ]))
            }
        }
    }

    /// 解码键值映射字段（headers/cookies/js/meta）
    /// 任一键失败即整个字段失败，不做按键恢复
    pub fn decode_pattern_map(value: &Value) -> Result<HashMap<String, CompiledPattern>, FieldError> {
        let Value::Object(map) = value else {
            return Err(FieldError::NotAnObject {
                found: json_kind(value),
            });
        };

        map.iter()
            .map(|(key, val)| {
                PatternCompiler::compile(val)
                    .map(|pattern| (key.clone(), pattern))
                    .map_err(|e| FieldError::MapEntry {
                        key: key.clone(),
                        source: Box::new(e),
                    })
            })
            .collect()
    }

    /// 解码纯文本字段（website/icon）
    pub fn decode_text(value: &Value) -> Result<String, FieldError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(FieldError::NotAString {
                found: json_kind(other),
            }),
        }
    }
}
