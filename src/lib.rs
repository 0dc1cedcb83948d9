// ==========================================
// 供应商SKU混合匹配引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 订单行到内部产品的解析引擎 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 租户参数
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一/建表)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MappingStatus, MatchMethod, MatchStatus, RetrievalStage};

// 领域实体
pub use domain::{
    normalize_customer_sku, Candidate, ConfirmedMapping, MatchInput, MatchResult, MergedCandidate,
    Product, RetrievalHit, UomConversion,
};

// 引擎
pub use engine::{
    ConfirmRequest, HybridMatcher, LearningLoop, MatchProviders, MatchRanker, MatchScorer,
    MatcherError, MatcherResult,
};

// 配置
pub use config::{SettingsManager, TenantSettings};

// API
pub use api::{ApiError, ApiResult, MappingApi, MatchApi, Page};
