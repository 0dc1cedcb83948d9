// ==========================================
// 供应商SKU混合匹配引擎 - 领域层
// ==========================================
// 职责: 实体与类型定义, 纯数据模型
// 红线: 领域层不含持久化与检索逻辑
// ==========================================

pub mod candidate;
pub mod mapping;
pub mod match_input;
pub mod match_result;
pub mod product;
pub mod types;
pub mod uom;

// 重导出核心类型
pub use candidate::{Candidate, MergedCandidate, RetrievalHit};
pub use mapping::{ConfirmedMapping, UomConversion};
pub use match_input::{normalize_customer_sku, MatchInput};
pub use match_result::{MatchResult, TOP_CANDIDATES};
pub use product::Product;
pub use types::{MappingStatus, MatchMethod, MatchStatus, RetrievalStage};
pub use uom::{classify_uom, dimensions_incompatible, normalize_uom, UomDimension};
