// ==========================================
// 供应商SKU混合匹配引擎 - 匹配结果模型
// ==========================================
// 职责: 单行匹配的最终结论 + 审计候选列表
// ==========================================

use crate::domain::candidate::Candidate;
use crate::domain::types::{MatchMethod, MatchStatus};
use serde::{Deserialize, Serialize};

/// 审计候选列表保留条数
pub const TOP_CANDIDATES: usize = 5;

// ==========================================
// MatchResult - 单行匹配结果
// ==========================================
// 零候选是合法结果 (UNMATCHED + 空列表), 不是错误
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// 选定内部SKU (UNMATCHED 时为 None)
    pub internal_sku: Option<String>,
    /// 选定产品ID (UNMATCHED 时为 None)
    pub product_id: Option<String>,
    /// 最终置信度
    pub confidence: f64,
    /// 匹配方法 (无候选时为 None)
    pub method: Option<MatchMethod>,
    /// 匹配状态
    pub status: MatchStatus,
    /// Top-N 候选 (透明度/人工复核用)
    pub candidates: Vec<Candidate>,
}

impl MatchResult {
    /// 无任何结论的空结果
    pub fn unmatched(candidates: Vec<Candidate>) -> Self {
        Self {
            internal_sku: None,
            product_id: None,
            confidence: 0.0,
            method: None,
            status: MatchStatus::Unmatched,
            candidates,
        }
    }

    /// 确认映射短路命中
    ///
    /// 注意: 返回置信度固定 0.99; 存储侧确认行的 confidence 为 1.0。
    /// 两者口径不同, 不要统一。
    pub fn exact_mapping(internal_sku: &str, product_id: Option<String>) -> Self {
        Self {
            internal_sku: Some(internal_sku.to_string()),
            product_id,
            confidence: 0.99,
            method: Some(MatchMethod::ExactMapping),
            status: MatchStatus::Matched,
            candidates: Vec::new(),
        }
    }
}
