//! 指纹库解析器
//! 原始字节 -> 无类型 JSON 树 -> 逐条归一化 -> 以小写技术名为键的索引

use std::time::Instant;

use serde_json::{Map, Value};
use tracing::debug;

use super::model::{SignatureIndex, TechnologySignature};
use super::normalizer::{FieldNormalizer, PatternList};
use crate::compiler::CompiledPattern;
use crate::diagnostics::{DiagnosticSink, FieldDiagnostic};
use crate::error::{json_kind, FieldError, SigResult};

/// 指纹库解析器（无状态）
pub struct DatabaseParser;

impl DatabaseParser {
    /// 从字节流解析指纹库
    /// 顶层 JSON 非法或不是对象即返回错误，不返回半成品索引；
    /// 形态不符的分类 / 技术条目跳过并上报
    pub fn parse(bytes: &[u8], sink: &mut dyn DiagnosticSink) -> SigResult<SignatureIndex> {
        let root: Map<String, Value> = serde_json::from_slice(bytes)?;
        Ok(Self::parse_document(root, sink))
    }

    /// 从字符串解析指纹库
    pub fn parse_str(content: &str, sink: &mut dyn DiagnosticSink) -> SigResult<SignatureIndex> {
        let root: Map<String, Value> = serde_json::from_str(content)?;
        Ok(Self::parse_document(root, sink))
    }

    fn parse_document(root: Map<String, Value>, sink: &mut dyn DiagnosticSink) -> SignatureIndex {
        let start = Instant::now();
        let mut index = SignatureIndex::default();
        let mut stats = ParseStats::default();

        // 分类 -> 技术名 -> 字段
        for (category, technologies) in &root {
            // 上游顶层还带有 "$schema" 之类的字符串键
            let Value::Object(technologies) = technologies else {
                stats.skipped_categories += 1;
                sink.report(FieldDiagnostic {
                    technology: category.clone(),
                    field: "category",
                    error: FieldError::UnexpectedShape {
                        expected: "an object of technologies",
                        found: json_kind(technologies),
                    },
                });
                continue;
            };

            for (tech_name, fields) in technologies {
                let Value::Object(fields) = fields else {
                    stats.skipped_technologies += 1;
                    sink.report(FieldDiagnostic {
                        technology: tech_name.clone(),
                        field: "entry",
                        error: FieldError::UnexpectedShape {
                            expected: "an object of fields",
                            found: json_kind(fields),
                        },
                    });
                    continue;
                };

                let signature = Self::build_signature(tech_name, fields, sink, &mut stats);
                stats.technologies += 1;
                index.insert(signature);
            }
        }

        debug!("Signature database parsed in {:?}", start.elapsed());
        debug!(
            "Parse stats: technologies={}, indexed={}, html={}, script={}, headers={}, cookies={}, js={}, meta={}, dropped_fields={}, dropped_items={}, skipped_categories={}, skipped_technologies={}",
            stats.technologies,
            index.len(),
            stats.html_count,
            stats.script_count,
            stats.header_count,
            stats.cookie_count,
            stats.js_count,
            stats.meta_count,
            stats.dropped_fields,
            stats.dropped_items,
            stats.skipped_categories,
            stats.skipped_technologies,
        );

        index
    }

    /// 归一化单个技术条目，字段失败只上报不中断
    fn build_signature(
        tech_name: &str,
        fields: &Map<String, Value>,
        sink: &mut dyn DiagnosticSink,
        stats: &mut ParseStats,
    ) -> TechnologySignature {
        let mut signature = TechnologySignature::from_name(tech_name);
        let mut field = FieldDecoder {
            tech_name,
            fields,
            sink,
            stats,
        };

        if let Some(website) = field.decode("website", FieldNormalizer::decode_text) {
            signature.website = website;
        }

        let matcher = &mut signature.matcher;
        if let Some(icon) = field.decode("icon", FieldNormalizer::decode_text) {
            matcher.icon = icon;
        }
        if let Some(patterns) = field.decode_list("html") {
            field.stats.html_count += patterns.len();
            matcher.response_content = patterns;
        }
        if let Some(patterns) = field.decode_list("script") {
            field.stats.script_count += patterns.len();
            matcher.script = patterns;
        }
        if let Some(patterns) = field.decode("headers", FieldNormalizer::decode_pattern_map) {
            field.stats.header_count += patterns.len();
            matcher.headers = patterns;
        }
        if let Some(patterns) = field.decode("cookies", FieldNormalizer::decode_pattern_map) {
            field.stats.cookie_count += patterns.len();
            matcher.cookies = patterns;
        }
        if let Some(patterns) = field.decode("js", FieldNormalizer::decode_pattern_map) {
            field.stats.js_count += patterns.len();
            matcher.java_script = patterns;
        }
        if let Some(patterns) = field.decode("meta", FieldNormalizer::decode_pattern_map) {
            field.stats.meta_count += patterns.len();
            matcher.meta = patterns;
        }

        signature
    }
}

/// 单条目字段解码上下文
struct FieldDecoder<'a, 'b> {
    tech_name: &'a str,
    fields: &'a Map<String, Value>,
    sink: &'b mut dyn DiagnosticSink,
    stats: &'b mut ParseStats,
}

impl FieldDecoder<'_, '_> {
    /// 缺失或为 null 返回 None；解码失败上报诊断并返回 None
    fn decode<T>(&mut self, key: &'static str, decoder: fn(&Value) -> Result<T, FieldError>) -> Option<T> {
        let value = self.fields.get(key).filter(|v| !v.is_null())?;
        match decoder(value) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                self.stats.dropped_fields += 1;
                self.report(key, error);
                None
            }
        }
    }

    /// 列表字段：保留可用模式，跳过的元素逐个上报
    fn decode_list(&mut self, key: &'static str) -> Option<Vec<CompiledPattern>> {
        let PatternList { patterns, skipped } = self.decode(key, FieldNormalizer::decode_pattern_list)?;
        self.stats.dropped_items += skipped.len();
        for error in skipped {
            self.report(key, error);
        }
        Some(patterns)
    }

    fn report(&mut self, key: &'static str, error: FieldError) {
        self.sink.report(FieldDiagnostic {
            technology: self.tech_name.to_string(),
            field: key,
            error,
        });
    }
}

/// 解析统计信息
#[derive(Debug, Clone, Default)]
struct ParseStats {
    technologies: usize,
    html_count: usize,
    script_count: usize,
    header_count: usize,
    cookie_count: usize,
    js_count: usize,
    meta_count: usize,
    dropped_fields: usize,
    dropped_items: usize,
    skipped_categories: usize,
    skipped_technologies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::error::SigError;

    fn parse(doc: &str) -> (SignatureIndex, Vec<FieldDiagnostic>) {
        let mut diagnostics = Vec::new();
        let index = DatabaseParser::parse_str(doc, &mut diagnostics).expect("document should parse");
        (index, diagnostics)
    }

    #[test]
    fn wordpress_scenario() {
        let (index, diagnostics) = parse(
            r#"{"cat":{"WordPress":{"website":"wordpress.org","headers":{"X-Powered-By":"WordPress"},"html":["wp-content","wp-includes"]}}}"#,
        );
        assert!(diagnostics.is_empty());
        assert_eq!(index.len(), 1);

        let wp = index.get("wordpress").unwrap();
        assert_eq!(wp.name, "WordPress");
        assert_eq!(wp.website, "wordpress.org");
        assert_eq!(wp.matcher.headers.len(), 1);
        assert_eq!(wp.matcher.headers["X-Powered-By"].as_str(), "WordPress");
        let html: Vec<&str> = wp.matcher.response_content.iter().map(|p| p.as_str()).collect();
        assert_eq!(html, vec!["wp-content", "wp-includes"]);
        assert!(wp.matcher.script.is_empty());
        assert!(wp.matcher.cookies.is_empty());
        assert!(wp.matcher.java_script.is_empty());
        assert!(wp.matcher.meta.is_empty());
        assert!(wp.matcher.icon.is_empty());
    }

    #[test]
    fn case_collisions_keep_the_later_entry() {
        let (index, _) = parse(
            r#"{
                "a": {"jQuery": {"website": "first"}},
                "b": {"JQUERY": {"website": "second"}}
            }"#,
        );
        assert_eq!(index.len(), 1);
        let kept = index.get("jquery").unwrap();
        assert_eq!(kept.name, "JQUERY");
        assert_eq!(kept.website, "second");
    }

    #[test]
    fn case_collisions_within_one_category() {
        let (index, _) = parse(r#"{"cat": {"Vue": {"icon": "a.svg"}, "vue": {"icon": "b.svg"}}}"#);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("vue").unwrap().matcher.icon, "b.svg");
    }

    #[test]
    fn scalar_and_list_fields() {
        let (index, _) = parse(r#"{"cat": {"X": {"html": "foo.*bar", "script": ["a+", "b+"]}}}"#);
        let matcher = &index.get("x").unwrap().matcher;
        assert_eq!(matcher.response_content.len(), 1);
        assert_eq!(matcher.response_content[0].as_str(), "foo.*bar");
        let scripts: Vec<&str> = matcher.script.iter().map(|p| p.as_str()).collect();
        assert_eq!(scripts, vec!["a+", "b+"]);
    }

    #[test]
    fn double_failure_drops_field_and_reports_both_attempts() {
        let (index, diagnostics) = parse(r#"{"cat": {"X": {"html": 12345, "script": "ok"}}}"#);
        let matcher = &index.get("x").unwrap().matcher;
        assert!(matcher.response_content.is_empty());
        assert_eq!(matcher.script.len(), 1);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].technology, "X");
        assert_eq!(diagnostics[0].field, "html");
        assert!(matches!(diagnostics[0].error, FieldError::NoInterpretation(_)));
        let message = diagnostics[0].error.to_string();
        assert!(message.contains("not a pattern string"));
        assert!(message.contains("not a list of pattern strings"));
    }

    #[test]
    fn partial_mapping_failure_drops_the_whole_field() {
        let (index, diagnostics) = parse(
            r#"{"cat": {"X": {"cookies": {"ok": "yes", "session": 123}, "headers": {"Server": "x"}}}}"#,
        );
        let matcher = &index.get("x").unwrap().matcher;
        assert!(matcher.cookies.is_empty());
        assert_eq!(matcher.headers.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "cookies");
    }

    #[test]
    fn all_mapping_fields_are_decoded() {
        let (index, diagnostics) = parse(
            r#"{"cat": {"Shopify": {
                "icon": "Shopify.svg",
                "cookies": {"_shopify_s": ""},
                "js": {"Shopify.theme": ""},
                "meta": {"shopify-checkout-api-token": ".*"}
            }}}"#,
        );
        assert!(diagnostics.is_empty());
        let matcher = &index.get("shopify").unwrap().matcher;
        assert_eq!(matcher.icon, "Shopify.svg");
        assert!(matcher.cookies.contains_key("_shopify_s"));
        assert!(matcher.java_script.contains_key("Shopify.theme"));
        assert!(matcher.meta["shopify-checkout-api-token"].is_match("abc"));
    }

    #[test]
    fn unknown_keys_and_nulls_are_ignored() {
        let (index, diagnostics) = parse(
            r#"{"cat": {"X": {"cats": [1], "implies": "PHP", "html": null, "website": null}}}"#,
        );
        assert!(diagnostics.is_empty());
        let x = index.get("x").unwrap();
        assert!(x.website.is_empty());
        assert!(x.matcher.is_empty());
    }

    #[test]
    fn non_string_website_is_a_field_failure() {
        let (index, diagnostics) = parse(r#"{"cat": {"X": {"website": 1, "icon": ["a"], "html": "x"}}}"#);
        let x = index.get("x").unwrap();
        assert!(x.website.is_empty());
        assert!(x.matcher.icon.is_empty());
        assert_eq!(x.matcher.response_content.len(), 1);

        let fields: Vec<&str> = diagnostics.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["website", "icon"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = DatabaseParser::parse(b"{\"cat\": {", &mut NullSink).unwrap_err();
        assert!(matches!(err, SigError::JsonError(_)));

        let err = DatabaseParser::parse(b"[1, 2]", &mut NullSink).unwrap_err();
        assert!(matches!(err, SigError::JsonError(_)));
    }

    #[test]
    fn malformed_technology_is_skipped() {
        let (index, diagnostics) = parse(
            r#"{"cat": {"Good": {"html": "a+"}, "Bad": "oops", "Other": {"script": "b+"}}}"#,
        );
        assert_eq!(index.len(), 2);
        assert!(index.contains("good"));
        assert!(index.contains("other"));
        assert!(!index.contains("bad"));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].technology, "Bad");
        assert_eq!(diagnostics[0].field, "entry");
        assert!(matches!(
            diagnostics[0].error,
            FieldError::UnexpectedShape { found: "string", .. }
        ));
    }

    #[test]
    fn non_object_category_is_skipped() {
        let (index, diagnostics) = parse(
            r#"{"$schema": "../schema.json", "apps": {"WordPress": {"html": "wp-content"}}, "broken": 5}"#,
        );
        assert_eq!(index.len(), 1);
        assert!(index.contains("wordpress"));

        let skipped: Vec<&str> = diagnostics.iter().map(|d| d.technology.as_str()).collect();
        assert_eq!(skipped, vec!["$schema", "broken"]);
        assert!(diagnostics.iter().all(|d| d.field == "category"));
    }

    #[test]
    fn list_fields_keep_usable_patterns() {
        let (index, diagnostics) = parse(
            r#"{"cat": {"WordPress": {"html": ["wp-(?:content|includes)", "s\\d+\\.wp\\.com\\;version:\\1"]}}}"#,
        );
        let html: Vec<&str> = index
            .get("wordpress")
            .unwrap()
            .matcher
            .response_content
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(html, vec!["wp-(?:content|includes)"]);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "html");
        assert!(matches!(diagnostics[0].error, FieldError::ListItem { index: 1, .. }));
    }

    #[test]
    fn list_without_usable_patterns_drops_the_field() {
        let (index, diagnostics) = parse(r#"{"cat": {"X": {"script": [1, "(("]}}}"#);
        assert!(index.get("x").unwrap().matcher.script.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0].error, FieldError::NoUsablePattern(_)));
    }

    #[test]
    fn empty_document_yields_empty_index() {
        let index = DatabaseParser::parse(b"{}", &mut NullSink).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn parsing_twice_is_idempotent() {
        let doc = br#"{"cat": {"Nginx": {"headers": {"Server": "nginx(?:/([\\d.]+))?"}, "html": ["a", "b"]}}}"#;
        let first = DatabaseParser::parse(doc, &mut NullSink).unwrap();
        let second = DatabaseParser::parse(doc, &mut NullSink).unwrap();
        assert_eq!(first, second);
    }
}
