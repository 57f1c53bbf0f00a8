//! 字段解码诊断输出
//! 诊断只影响索引的完整性提示，不影响索引本身

use std::fmt;

use tracing::warn;

use crate::error::FieldError;

/// 单条字段解码失败记录
#[derive(Debug)]
pub struct FieldDiagnostic {
    /// 技术名（原始大小写）
    pub technology: String,
    /// 上游字段名（html/headers/js ...）
    pub field: &'static str,
    pub error: FieldError,
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error parsing {} data for [{}]: {}",
            self.field, self.technology, self.error
        )
    }
}

/// 诊断接收端
pub trait DiagnosticSink: Send {
    fn report(&mut self, diagnostic: FieldDiagnostic);
}

/// 丢弃所有诊断（非调试模式）
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: FieldDiagnostic) {}
}

/// 通过 tracing 输出诊断（调试模式）
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: FieldDiagnostic) {
        warn!(
            technology = %diagnostic.technology,
            field = diagnostic.field,
            "{}",
            diagnostic
        );
    }
}

/// 收集全部诊断，供调用方自行处理
impl DiagnosticSink for Vec<FieldDiagnostic> {
    fn report(&mut self, diagnostic: FieldDiagnostic) {
        self.push(diagnostic);
    }
}
