// ==========================================
// 供应商SKU混合匹配引擎 - 排序与自动建议决策
// ==========================================
// 职责: 候选排序 + 无状态决策 (每次调用即时计算)
// 红线: 排序确定可复现, 置信度降序, 同分按 product_id 升序
//       (测试确定性与 UI 稳定性均依赖此序)
// ==========================================

use crate::config::tenant_settings::TenantSettings;
use crate::domain::candidate::Candidate;
use crate::domain::match_result::{MatchResult, TOP_CANDIDATES};
use crate::domain::types::{MatchMethod, MatchStatus};
use std::cmp::Ordering;

// ==========================================
// MatchRanker - 排序与决策
// ==========================================
pub struct MatchRanker;

impl MatchRanker {
    /// 排序候选列表
    ///
    /// 排序键:
    /// 1) confidence 降序
    /// 2) product_id 升序 (确定性平局裁决)
    pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        candidates
    }

    /// 自动建议决策
    ///
    /// # 规则
    /// - top1.confidence ≥ auto_apply_threshold 且
    ///   (top1 − top2) ≥ auto_apply_gap (无第二候选时 top2 记 0)
    ///   → SUGGESTED, 选定 top1
    /// - 否则 → UNMATCHED, 不选定 (候选仍返回供人工复核)
    ///
    /// # 参数
    /// - ranked: 已排序候选 (rank 的输出)
    /// - settings: 租户匹配参数
    pub fn decide(ranked: Vec<Candidate>, settings: &TenantSettings) -> MatchResult {
        let mut top: Vec<Candidate> = ranked.into_iter().take(TOP_CANDIDATES).collect();

        let top1_confidence = top.first().map(|c| c.confidence).unwrap_or(0.0);
        let top2_confidence = top.get(1).map(|c| c.confidence).unwrap_or(0.0);

        let auto_apply = !top.is_empty()
            && top1_confidence >= settings.auto_apply_threshold
            && (top1_confidence - top2_confidence) >= settings.auto_apply_gap;

        if auto_apply {
            let top1 = top.remove(0);
            let mut candidates = vec![top1.clone()];
            candidates.append(&mut top);
            MatchResult {
                internal_sku: Some(top1.internal_sku),
                product_id: Some(top1.product_id),
                confidence: top1.confidence,
                method: Some(MatchMethod::Hybrid),
                status: MatchStatus::Suggested,
                candidates,
            }
        } else {
            let mut result = MatchResult::unmatched(top);
            result.confidence = top1_confidence;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MatchMethod;

    fn make_candidate(product_id: &str, confidence: f64) -> Candidate {
        Candidate {
            product_id: product_id.to_string(),
            internal_sku: format!("SKU-{}", product_id),
            product_name: format!("产品 {}", product_id),
            sku_lexical_score: 0.0,
            desc_lexical_score: 0.0,
            semantic_score: 0.0,
            uom_penalty: 1.0,
            price_penalty: 1.0,
            confidence,
            method: MatchMethod::Hybrid,
        }
    }

    fn settings() -> TenantSettings {
        TenantSettings::default()
    }

    #[test]
    fn test_rank_by_confidence_desc() {
        let ranked = MatchRanker::rank(vec![
            make_candidate("p1", 0.5),
            make_candidate("p2", 0.9),
            make_candidate("p3", 0.7),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
    }

    #[test]
    fn test_rank_tie_break_by_product_id() {
        let ranked = MatchRanker::rank(vec![
            make_candidate("p9", 0.8),
            make_candidate("p1", 0.8),
            make_candidate("p5", 0.8),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p5", "p9"]);
    }

    #[test]
    fn test_decide_suggested_when_both_thresholds_met() {
        // top1=0.95, top2=0.80: 差距 0.15 ≥ 0.10 且 0.95 ≥ 0.92
        let ranked = vec![make_candidate("p1", 0.95), make_candidate("p2", 0.80)];
        let result = MatchRanker::decide(ranked, &settings());

        assert_eq!(result.status, MatchStatus::Suggested);
        assert_eq!(result.internal_sku.as_deref(), Some("SKU-p1"));
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn test_decide_unmatched_when_gap_too_small() {
        // top1=0.93 超阈值但差距 0.03 < 0.10
        let ranked = vec![make_candidate("p1", 0.93), make_candidate("p2", 0.90)];
        let result = MatchRanker::decide(ranked, &settings());

        assert_eq!(result.status, MatchStatus::Unmatched);
        assert!(result.internal_sku.is_none());
        // 候选仍然返回供人工复核
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn test_decide_unmatched_below_threshold() {
        let ranked = vec![make_candidate("p1", 0.8686)];
        let result = MatchRanker::decide(ranked, &settings());

        assert_eq!(result.status, MatchStatus::Unmatched);
        assert_eq!(result.confidence, 0.8686);
    }

    #[test]
    fn test_decide_single_candidate_top2_is_zero() {
        // 无第二候选: top2 记 0, 差距必然满足
        let ranked = vec![make_candidate("p1", 0.93)];
        let result = MatchRanker::decide(ranked, &settings());
        assert_eq!(result.status, MatchStatus::Suggested);
    }

    #[test]
    fn test_decide_empty_candidates_is_unmatched() {
        let result = MatchRanker::decide(Vec::new(), &settings());
        assert_eq!(result.status, MatchStatus::Unmatched);
        assert!(result.candidates.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_decide_truncates_to_top_five() {
        let ranked = MatchRanker::rank(
            (0..8).map(|i| make_candidate(&format!("p{}", i), 0.1 * f64::from(i))).collect(),
        );
        let result = MatchRanker::decide(ranked, &settings());
        assert_eq!(result.candidates.len(), 5);
    }

    #[test]
    fn test_auto_apply_monotonic_in_top1() {
        // top1 提升不会把 SUGGESTED 翻转为 UNMATCHED
        let base = vec![make_candidate("p1", 0.92), make_candidate("p2", 0.80)];
        let result = MatchRanker::decide(base, &settings());
        assert_eq!(result.status, MatchStatus::Suggested);

        for bump in [0.93, 0.95, 0.99, 1.0] {
            let ranked = vec![make_candidate("p1", bump), make_candidate("p2", 0.80)];
            let result = MatchRanker::decide(ranked, &settings());
            assert_eq!(result.status, MatchStatus::Suggested);
        }
    }
}
