// ==========================================
// 供应商SKU混合匹配引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 转换下层错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因 (可解释性)
// ==========================================

use crate::engine::error::MatcherError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ===== 检索错误 =====
    #[error("检索全量不可用: {0}")]
    RetrievalUnavailable(String),

    // ===== 系统错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::ValidationError(msg)
            | RepositoryError::UniqueConstraintViolation(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("{}: {}", field, message))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// 实现 From<MatcherError>
impl From<MatcherError> for ApiError {
    fn from(err: MatcherError) -> Self {
        match err {
            MatcherError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            MatcherError::RetrievalUnavailable(msg) => ApiError::RetrievalUnavailable(msg),
            MatcherError::Repository(repo_err) => repo_err.into(),
            MatcherError::SettingsError(msg) => ApiError::InternalError(msg),
            MatcherError::Other(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
