// ==========================================
// MatchScorer - 纯函数评分库
// ==========================================
// 计算链: 词法分量 → 语义分量 → 混合原始分 → 惩罚因子 → 最终置信度
// ==========================================

use crate::domain::candidate::{Candidate, MergedCandidate};
use crate::domain::match_input::MatchInput;
use crate::domain::product::Product;
use crate::domain::types::MatchMethod;
use crate::domain::uom::dimensions_incompatible;

/// 词法分量权重 (词法更廉价且偏精确匹配)
pub const LEXICAL_WEIGHT: f64 = 0.62;
/// 语义分量权重 (语义捕捉同义/转述场景)
pub const SEMANTIC_WEIGHT: f64 = 0.38;
/// 描述相似度折扣 (SKU 相似度比描述相似度更可信)
const DESC_DISCOUNT: f64 = 0.7;
/// 映射分量命中时的原始分上限
const MAPPING_SCORE: f64 = 0.99;

/// UoM 惩罚: 单位缺失或未识别
const UOM_PENALTY_UNKNOWN: f64 = 0.9;
/// UoM 惩罚: 单位存在但量纲硬不兼容
const UOM_PENALTY_INCOMPATIBLE: f64 = 0.2;

/// 价格惩罚: 偏差超容差但未超 2 倍容差
const PRICE_PENALTY_SOFT: f64 = 0.85;
/// 价格惩罚: 偏差超 2 倍容差
const PRICE_PENALTY_HARD: f64 = 0.65;

// ==========================================
// MatchScorer - 纯函数工具类
// ==========================================
pub struct MatchScorer;

impl MatchScorer {
    /// 词法分量
    ///
    /// # 规则
    /// - S_tri = max(S_tri_sku, 0.7 × S_tri_desc)
    /// - 描述相似度打 30% 折扣后才允许压过 SKU 相似度
    pub fn lexical_component(sku_similarity: f64, desc_similarity: f64) -> f64 {
        sku_similarity.max(DESC_DISCOUNT * desc_similarity)
    }

    /// 语义分量
    ///
    /// # 规则
    /// - S_emb = clamp((cos + 1) / 2, 0, 1), 余弦区间 [-1,1] 重缩放到 [0,1]
    /// - 语义阶段未运行 → 0
    pub fn semantic_component(cosine: Option<f64>) -> f64 {
        match cosine {
            Some(cos) => ((cos + 1.0) / 2.0).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    /// 混合原始分
    ///
    /// # 规则
    /// - 存在映射分量 → 0.99 (实践中被确认映射短路取代, 为公式完整性保留)
    /// - 否则 → 0.62 × S_tri + 0.38 × S_emb
    pub fn hybrid_raw(s_tri: f64, s_emb: f64, has_mapping: bool) -> f64 {
        if has_mapping {
            MAPPING_SCORE
        } else {
            LEXICAL_WEIGHT * s_tri + SEMANTIC_WEIGHT * s_emb
        }
    }

    /// 计量单位惩罚因子 P_uom
    ///
    /// # 规则
    /// - 1.0: 行单位等于产品基准单位, 或在产品换算表中声明
    /// - 0.9: 行单位缺失/未识别 (含同量纲但未声明换算的单位)
    /// - 0.2: 行单位已识别且与基准单位量纲硬不兼容
    pub fn uom_penalty(line_uom: Option<&str>, product: &Product) -> f64 {
        let uom = match line_uom {
            Some(u) if !u.trim().is_empty() => u,
            _ => return UOM_PENALTY_UNKNOWN,
        };

        if product.accepts_uom(uom) {
            return 1.0;
        }
        if dimensions_incompatible(uom, &product.base_uom) {
            return UOM_PENALTY_INCOMPATIBLE;
        }
        UOM_PENALTY_UNKNOWN
    }

    /// 价格惩罚因子 P_price
    ///
    /// # 规则
    /// - 1.0: 无参考价 / 行价缺失 / 偏差在容差内
    /// - 0.85: 偏差超容差但 ≤ 2 倍容差
    /// - 0.65: 偏差超 2 倍容差
    ///
    /// # 参数
    /// - tolerance_percent: 租户价格容差百分比 (默认 5.0)
    pub fn price_penalty(
        unit_price: Option<f64>,
        reference_price: Option<f64>,
        tolerance_percent: f64,
    ) -> f64 {
        let (price, reference) = match (unit_price, reference_price) {
            (Some(p), Some(r)) if r > 0.0 && p.is_finite() => (p, r),
            _ => return 1.0,
        };

        let deviation_percent = ((price - reference).abs() / reference) * 100.0;
        if deviation_percent <= tolerance_percent {
            1.0
        } else if deviation_percent <= 2.0 * tolerance_percent {
            PRICE_PENALTY_SOFT
        } else {
            PRICE_PENALTY_HARD
        }
    }

    /// 评分单个候选
    ///
    /// # 参数
    /// - merged: 归并后的原始相似度信号
    /// - input: 匹配输入
    /// - product: 产品只读视图
    /// - has_mapping: 此产品是否存在 (未参与短路的) 映射记录
    /// - reference_price: 参考单价 (无则 None)
    /// - tolerance_percent: 租户价格容差百分比
    ///
    /// # 返回
    /// - Candidate: 最终置信度 = clamp(raw × P_uom × P_price, 0, 1)
    pub fn score(
        merged: &MergedCandidate,
        input: &MatchInput,
        product: &Product,
        has_mapping: bool,
        reference_price: Option<f64>,
        tolerance_percent: f64,
    ) -> Candidate {
        let s_tri = Self::lexical_component(merged.sku_lexical, merged.desc_lexical);
        let s_emb = Self::semantic_component(merged.semantic_cosine);
        let raw = Self::hybrid_raw(s_tri, s_emb, has_mapping);

        let uom_penalty = Self::uom_penalty(input.uom.as_deref(), product);
        let price_penalty =
            Self::price_penalty(input.unit_price, reference_price, tolerance_percent);

        let confidence = (raw * uom_penalty * price_penalty).clamp(0.0, 1.0);

        Candidate {
            product_id: product.product_id.clone(),
            internal_sku: product.internal_sku.clone(),
            product_name: product.name.clone(),
            sku_lexical_score: merged.sku_lexical,
            desc_lexical_score: merged.desc_lexical,
            semantic_score: s_emb,
            uom_penalty,
            price_penalty,
            confidence,
            method: MatchMethod::Hybrid,
        }
    }
}
