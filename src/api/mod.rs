// ==========================================
// 供应商SKU混合匹配引擎 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供抽取流水线与操作员界面调用
// ==========================================

pub mod error;
pub mod mapping_api;
pub mod match_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use mapping_api::{MappingApi, Page};
pub use match_api::MatchApi;
pub use validator::MappingRequestValidator;
