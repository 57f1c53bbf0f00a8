//! 编译模块：将上游模式文本编译为可执行的正则
pub mod pattern;
pub mod compiler;

pub use self::pattern::CompiledPattern;
pub use self::compiler::PatternCompiler;
