// ==========================================
// 供应商SKU混合匹配引擎 - 候选归并器
// ==========================================
// 职责: 三路检索结果按 product_id 做集合并集 (纯逻辑)
// 红线: 无状态、无副作用、无 I/O 操作
// 说明: 此阶段不排序 (排序在评分之后), 但输出顺序确定
//       (BTreeMap 按 product_id 升序), 保证整条链路可复现
// ==========================================

use crate::domain::candidate::{MergedCandidate, RetrievalHit};
use std::collections::BTreeMap;

// ==========================================
// CandidateMerger - 候选归并器
// ==========================================
pub struct CandidateMerger;

impl CandidateMerger {
    /// 归并三路检索结果
    ///
    /// # 参数
    /// - sku_hits: SKU字段词法命中
    /// - desc_hits: 名称+描述字段词法命中
    /// - semantic_hits: 语义命中 (None = 语义阶段未运行)
    ///
    /// # 规则
    /// - 每个 product_id 输出一条, 携带各阶段找到的相似度
    /// - 缺失阶段默认 0 (语义缺失记 None, 评分阶段归 0)
    /// - 同阶段重复命中取最大相似度
    pub fn merge(
        sku_hits: &[RetrievalHit],
        desc_hits: &[RetrievalHit],
        semantic_hits: Option<&[RetrievalHit]>,
    ) -> Vec<MergedCandidate> {
        let mut by_id: BTreeMap<String, MergedCandidate> = BTreeMap::new();

        for hit in sku_hits {
            let entry = by_id
                .entry(hit.product_id.clone())
                .or_insert_with(|| MergedCandidate {
                    product_id: hit.product_id.clone(),
                    ..MergedCandidate::default()
                });
            entry.sku_lexical = entry.sku_lexical.max(hit.similarity);
        }

        for hit in desc_hits {
            let entry = by_id
                .entry(hit.product_id.clone())
                .or_insert_with(|| MergedCandidate {
                    product_id: hit.product_id.clone(),
                    ..MergedCandidate::default()
                });
            entry.desc_lexical = entry.desc_lexical.max(hit.similarity);
        }

        if let Some(hits) = semantic_hits {
            for hit in hits {
                let entry = by_id
                    .entry(hit.product_id.clone())
                    .or_insert_with(|| MergedCandidate {
                        product_id: hit.product_id.clone(),
                        ..MergedCandidate::default()
                    });
                entry.semantic_cosine = Some(match entry.semantic_cosine {
                    Some(existing) => existing.max(hit.similarity),
                    None => hit.similarity,
                });
            }
        }

        by_id.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(product_id: &str, similarity: f64) -> RetrievalHit {
        RetrievalHit::new(product_id, similarity)
    }

    #[test]
    fn test_merge_unions_by_product_id() {
        let merged = CandidateMerger::merge(
            &[hit("p1", 0.9), hit("p2", 0.5)],
            &[hit("p2", 0.7), hit("p3", 0.4)],
            Some(&[hit("p1", 0.6), hit("p4", 0.3)]),
        );

        assert_eq!(merged.len(), 4);
        let p1 = merged.iter().find(|c| c.product_id == "p1").unwrap();
        assert_eq!(p1.sku_lexical, 0.9);
        assert_eq!(p1.desc_lexical, 0.0);
        assert_eq!(p1.semantic_cosine, Some(0.6));

        let p2 = merged.iter().find(|c| c.product_id == "p2").unwrap();
        assert_eq!(p2.sku_lexical, 0.5);
        assert_eq!(p2.desc_lexical, 0.7);
        assert_eq!(p2.semantic_cosine, None);
    }

    #[test]
    fn test_merge_without_semantic_stage() {
        let merged = CandidateMerger::merge(&[hit("p1", 0.8)], &[], None);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].semantic_cosine, None);
    }

    #[test]
    fn test_merge_duplicate_hits_keep_max() {
        let merged = CandidateMerger::merge(&[hit("p1", 0.4), hit("p1", 0.9)], &[], None);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].sku_lexical, 0.9);
    }

    #[test]
    fn test_merge_output_order_deterministic() {
        let merged = CandidateMerger::merge(
            &[hit("p9", 0.8), hit("p1", 0.8)],
            &[hit("p5", 0.8)],
            None,
        );
        let ids: Vec<&str> = merged.iter().map(|c| c.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p5", "p9"]);
    }
}
