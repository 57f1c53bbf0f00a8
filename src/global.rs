//! 全局指纹索引单例管理
use once_cell::sync::Lazy;
use tokio::sync::OnceCell;

use crate::config::{ConfigManager, FetchConfig};
use crate::error::{SigError, SigResult};
use crate::rule::{RuleLoader, SignatureIndex};

/// 全局指纹索引实例
static GLOBAL_SIGNATURES: Lazy<OnceCell<SignatureIndex>> = Lazy::new(OnceCell::new);

/// 初始化全局指纹索引（默认配置）
pub async fn init_global_signatures() -> SigResult<&'static SignatureIndex> {
    init_global_signatures_with_config(&ConfigManager::get_default()).await
}

/// 带自定义配置初始化全局指纹索引，已初始化时直接返回已有实例
pub async fn init_global_signatures_with_config(config: &FetchConfig) -> SigResult<&'static SignatureIndex> {
    GLOBAL_SIGNATURES
        .get_or_try_init(|| RuleLoader::load(config))
        .await
}

/// 获取全局指纹索引
pub fn global_signatures() -> SigResult<&'static SignatureIndex> {
    GLOBAL_SIGNATURES.get().ok_or_else(|| {
        SigError::NotInitialized("call init_global_signatures first".to_string())
    })
}
