//! 指纹索引加载入口
//! 每次调用：拉取一次原始数据 -> 解析一次 -> 返回全新的索引

use std::time::Instant;

use tracing::debug;

use super::fetcher::RemoteFetcher;
use super::model::SignatureIndex;
use super::parser::DatabaseParser;
use crate::config::FetchConfig;
use crate::diagnostics::{DiagnosticSink, NullSink, TracingSink};
use crate::error::SigResult;

/// 指纹索引加载器
pub struct RuleLoader;

impl RuleLoader {
    /// 拉取并解析指纹库
    /// 调试模式下字段解码失败通过 tracing 输出，否则静默丢弃
    pub async fn load(config: &FetchConfig) -> SigResult<SignatureIndex> {
        if config.debug {
            Self::load_with_sink(config, &mut TracingSink).await
        } else {
            Self::load_with_sink(config, &mut NullSink).await
        }
    }

    /// 拉取并解析指纹库，字段解码失败交给指定的诊断接收端
    pub async fn load_with_sink(config: &FetchConfig, sink: &mut dyn DiagnosticSink) -> SigResult<SignatureIndex> {
        let start = Instant::now();
        let bytes = RemoteFetcher.fetch(config).await?;
        let index = DatabaseParser::parse(&bytes, sink)?;
        debug!(
            "Loaded {} technology signatures in {:?}",
            index.len(),
            start.elapsed()
        );
        Ok(index)
    }
}

/// 拉取并归一化技术指纹库
pub async fn fetch_technology_signatures(config: &FetchConfig) -> SigResult<SignatureIndex> {
    RuleLoader::load(config).await
}

/// 拉取并归一化技术指纹库，字段解码失败交给指定的诊断接收端
pub async fn fetch_technology_signatures_with_sink(
    config: &FetchConfig,
    sink: &mut dyn DiagnosticSink,
) -> SigResult<SignatureIndex> {
    RuleLoader::load_with_sink(config, sink).await
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::Level;

    use super::*;
    use crate::config::ConfigManager;

    const FIXTURE: &str = r#"{"cat": {
        "Broken": {"html": 12345, "meta": "generator"},
        "Fine": {"script": "fine\\.js"}
    }}"#;

    /// 收集日志输出的写入端
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn warn_lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .filter(|line| line.contains("WARN"))
                .map(str::to_string)
                .collect()
        }
    }

    async fn load_capturing_logs(debug: bool) -> (SignatureIndex, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, FIXTURE).unwrap();
        let config = ConfigManager::custom().local_file(&path).debug(debug).build();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let index = RuleLoader::load(&config).await.unwrap();
        let lines = logs.warn_lines();
        (index, lines)
    }

    #[tokio::test]
    async fn debug_mode_logs_each_failed_field() {
        let (index, lines) = load_capturing_logs(true).await;
        assert_eq!(index.len(), 2);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("error parsing html data for [Broken]"));
        assert!(lines[1].contains("error parsing meta data for [Broken]"));
    }

    #[tokio::test]
    async fn failures_are_silent_without_debug() {
        let (index, lines) = load_capturing_logs(false).await;
        assert_eq!(index.len(), 2);
        assert!(index.get("broken").unwrap().matcher.is_empty());
        assert!(lines.is_empty());
    }
}
