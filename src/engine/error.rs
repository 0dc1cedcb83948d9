// ==========================================
// 供应商SKU混合匹配引擎 - 引擎层错误类型
// ==========================================
// 传播策略: 单阶段检索失败就地降级 (不报错);
//           全量检索不可用与非法输入以类型化错误上抛;
//           引擎内部不做自动重试
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum MatcherError {
    /// 非法输入: 检索前同步拒绝, 不做静默纠正
    #[error("非法匹配输入: {0}")]
    InvalidInput(String),

    /// 全量检索不可用: 词法阶段失败且语义阶段失败或缺失
    #[error("检索全量不可用: {0}")]
    RetrievalUnavailable(String),

    /// 仓储层错误透传
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// 租户参数解析失败
    #[error("租户参数解析失败: {0}")]
    SettingsError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type MatcherResult<T> = Result<T, MatcherError>;
