// ==========================================
// 供应商SKU混合匹配引擎 - 候选模型
// ==========================================
// 职责: 检索命中与评分候选的数据载体
// 用途: 每次匹配调用即时生成, 不落库
//       (仅作为 MatchResult 审计快照随结果返回)
// ==========================================

use crate::domain::types::MatchMethod;
use serde::{Deserialize, Serialize};

// ==========================================
// RetrievalHit - 单阶段检索命中
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub product_id: String,
    /// 词法阶段: 相似度 [0,1]; 语义阶段: 余弦相似度 [-1,1]
    pub similarity: f64,
}

impl RetrievalHit {
    pub fn new(product_id: &str, similarity: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            similarity,
        }
    }
}

// ==========================================
// MergedCandidate - 归并后的原始信号
// ==========================================
// 集合并集, 键为 product_id; 缺失阶段默认 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedCandidate {
    pub product_id: String,
    /// SKU 字段词法相似度 [0,1]
    pub sku_lexical: f64,
    /// 名称+描述字段词法相似度 [0,1]
    pub desc_lexical: f64,
    /// 语义余弦相似度 [-1,1], 无语义阶段时为 None
    pub semantic_cosine: Option<f64>,
}

// ==========================================
// Candidate - 评分后候选
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub product_id: String,
    pub internal_sku: String,
    pub product_name: String,

    // ===== 原始相似度信号 =====
    pub sku_lexical_score: f64,
    pub desc_lexical_score: f64,
    /// 重缩放后的语义分量 [0,1]
    pub semantic_score: f64,

    // ===== 惩罚因子 =====
    pub uom_penalty: f64,
    pub price_penalty: f64,

    // ===== 最终结论 =====
    pub confidence: f64,
    pub method: MatchMethod,
}
