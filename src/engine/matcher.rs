// ==========================================
// 供应商SKU混合匹配引擎 - 匹配编排器
// ==========================================
// 主流程: 校验 → 规范化 → 确认映射短路 → 并行检索扇出
//         → 归并 → 评分 → 排序/决策 → 结果
// 红线: 匹配调用无副作用, 可跨行/草稿/租户并发;
//       单阶段检索失败就地降级, 仅全量不可用才上抛
// ==========================================

use crate::config::tenant_settings::TenantSettings;
use crate::domain::candidate::{Candidate, RetrievalHit};
use crate::domain::match_input::{normalize_customer_sku, MatchInput};
use crate::domain::match_result::MatchResult;
use crate::domain::product::Product;
use crate::domain::types::{MappingStatus, RetrievalStage};
use crate::engine::error::{MatcherError, MatcherResult};
use crate::engine::merger::CandidateMerger;
use crate::engine::ports::{
    EmbeddingProvider, LexicalField, LexicalSearchProvider, ProductReadModel,
    ReferencePriceProvider, SemanticSearchProvider, DEFAULT_MIN_SIMILARITY,
    DEFAULT_RETRIEVAL_LIMIT,
};
use crate::engine::scoring::MatchScorer;
use crate::engine::ranking::MatchRanker;
use crate::repository::mapping_repo::ConfirmedMappingRepository;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 批量匹配的并发上限
const MAX_BATCH_CONCURRENCY: usize = 8;

// ==========================================
// MatchProviders - 外部提供方集合
// ==========================================
// 聚合匹配所需的所有外部协作方, 简化依赖注入,
// 便于单元测试时整体替换为桩实现
#[derive(Clone)]
pub struct MatchProviders {
    /// 词法检索提供方
    pub lexical: Arc<dyn LexicalSearchProvider>,
    /// 语义检索提供方 (未接入时为 None)
    pub semantic: Option<Arc<dyn SemanticSearchProvider>>,
    /// 查询向量提供方 (未接入时为 None)
    pub embedding: Option<Arc<dyn EmbeddingProvider>>,
    /// 产品目录只读模型
    pub products: Arc<dyn ProductReadModel>,
    /// 参考价提供方 (可选)
    pub reference_prices: Option<Arc<dyn ReferencePriceProvider>>,
}

// ==========================================
// 阶段结果 (内部)
// ==========================================
enum StageOutcome {
    /// 阶段正常返回 (可能为空)
    Hits(Vec<RetrievalHit>),
    /// 语义阶段无向量可用 (降级, 非失败)
    Unavailable,
    /// 阶段调用失败
    Failed,
}

// ==========================================
// HybridMatcher - 匹配编排器
// ==========================================
pub struct HybridMatcher {
    providers: MatchProviders,
    mapping_repo: Arc<ConfirmedMappingRepository>,
}

impl HybridMatcher {
    /// 创建新的编排器实例
    pub fn new(providers: MatchProviders, mapping_repo: Arc<ConfirmedMappingRepository>) -> Self {
        Self {
            providers,
            mapping_repo,
        }
    }

    /// 单行匹配
    ///
    /// # 参数
    /// - input: 匹配输入 (每次调用构造一次, 不可变)
    /// - settings: 租户匹配参数 (每次请求解析一次)
    ///
    /// # 返回
    /// - Ok(MatchResult): 零候选时为 UNMATCHED + 空列表, 不是错误
    /// - Err(InvalidInput): 非法输入, 检索前同步拒绝
    /// - Err(RetrievalUnavailable): 词法阶段失败且语义阶段失败或缺失
    pub async fn match_line(
        &self,
        input: &MatchInput,
        settings: &TenantSettings,
    ) -> MatcherResult<MatchResult> {
        Self::validate(input)?;

        // 规范化幂等, 与确认路径共用同一函数
        let sku_norm = normalize_customer_sku(&input.customer_sku_norm);

        // ===== 1. 确认映射短路 =====
        if let Some(mapping) =
            self.mapping_repo
                .lookup(&input.tenant_id, &input.customer_id, &sku_norm)?
        {
            debug!(
                tenant_id = %input.tenant_id,
                customer_sku_norm = %sku_norm,
                internal_sku = %mapping.internal_sku,
                "确认映射命中, 跳过模糊检索"
            );
            let product_id = self
                .find_product_id_by_sku(&input.tenant_id, &mapping.internal_sku)
                .await;
            return Ok(MatchResult::exact_mapping(&mapping.internal_sku, product_id));
        }

        // 键下未确认的 SUGGESTED 行参与映射分量 (公式完整性)
        let suggested_sku = self
            .mapping_repo
            .find_active(&input.tenant_id, &input.customer_id, &sku_norm)?
            .filter(|m| m.status == MappingStatus::Suggested)
            .map(|m| m.internal_sku);

        // ===== 2. 并行检索扇出 (join 后归并) =====
        let (sku_outcome, desc_outcome, semantic_outcome) = tokio::join!(
            self.lexical_stage(input, LexicalField::InternalSku, &sku_norm),
            self.lexical_stage(input, LexicalField::NameDescription, &input.description),
            self.semantic_stage(input),
        );

        let lexical_failed = matches!(sku_outcome, StageOutcome::Failed)
            && matches!(desc_outcome, StageOutcome::Failed);
        let semantic_usable = matches!(semantic_outcome, StageOutcome::Hits(_));

        if lexical_failed && !semantic_usable {
            return Err(MatcherError::RetrievalUnavailable(format!(
                "词法与语义检索均不可用: tenant={}",
                input.tenant_id
            )));
        }

        let sku_hits = match sku_outcome {
            StageOutcome::Hits(hits) => hits,
            _ => Vec::new(),
        };
        let desc_hits = match desc_outcome {
            StageOutcome::Hits(hits) => hits,
            _ => Vec::new(),
        };
        let semantic_hits = match semantic_outcome {
            StageOutcome::Hits(hits) => Some(hits),
            _ => None,
        };

        // ===== 3. 归并 → 评分 → 排序/决策 =====
        let merged = CandidateMerger::merge(&sku_hits, &desc_hits, semantic_hits.as_deref());
        if merged.is_empty() {
            return Ok(MatchResult::unmatched(Vec::new()));
        }

        let candidates = self
            .score_candidates(input, settings, &merged, suggested_sku.as_deref())
            .await?;

        Ok(MatchRanker::decide(MatchRanker::rank(candidates), settings))
    }

    /// 批量匹配
    ///
    /// 仅为吞吐优化: 有界并发扇出, 保持输入顺序,
    /// 每行的外部可观察行为与单独调用 match_line 一致。
    pub async fn match_batch(
        &self,
        inputs: &[MatchInput],
        settings: &TenantSettings,
    ) -> Vec<MatcherResult<MatchResult>> {
        stream::iter(inputs)
            .map(|input| self.match_line(input, settings))
            .buffered(MAX_BATCH_CONCURRENCY)
            .collect()
            .await
    }

    // ==========================================
    // 输入校验
    // ==========================================

    /// 校验匹配输入 (检索前同步拒绝, 不做静默纠正)
    pub fn validate(input: &MatchInput) -> MatcherResult<()> {
        if input.tenant_id.trim().is_empty() {
            return Err(MatcherError::InvalidInput("tenant_id 缺失".to_string()));
        }
        if input.customer_id.trim().is_empty() {
            return Err(MatcherError::InvalidInput("customer_id 缺失".to_string()));
        }
        if input.customer_sku_norm.trim().is_empty() && input.description.trim().is_empty() {
            return Err(MatcherError::InvalidInput(
                "customer_sku 与 description 至少提供一项".to_string(),
            ));
        }
        if !input.quantity.is_finite() || input.quantity <= 0.0 {
            return Err(MatcherError::InvalidInput(format!(
                "quantity 非法: {}",
                input.quantity
            )));
        }
        if let Some(price) = input.unit_price {
            if !price.is_finite() || price < 0.0 {
                return Err(MatcherError::InvalidInput(format!(
                    "unit_price 非法: {}",
                    price
                )));
            }
        }
        Ok(())
    }

    // ==========================================
    // 检索阶段
    // ==========================================

    /// 词法检索单查询 (失败降级为 Failed, 由调用方决策)
    async fn lexical_stage(
        &self,
        input: &MatchInput,
        field: LexicalField,
        query: &str,
    ) -> StageOutcome {
        if query.trim().is_empty() {
            return StageOutcome::Hits(Vec::new());
        }

        let stage = match field {
            LexicalField::InternalSku => RetrievalStage::LexicalSku,
            LexicalField::NameDescription => RetrievalStage::LexicalDescription,
        };

        match self
            .providers
            .lexical
            .search(
                &input.tenant_id,
                field,
                query,
                DEFAULT_MIN_SIMILARITY,
                DEFAULT_RETRIEVAL_LIMIT,
            )
            .await
        {
            Ok(hits) => StageOutcome::Hits(hits),
            Err(e) => {
                warn!(
                    tenant_id = %input.tenant_id,
                    stage = stage.as_str(),
                    error = %e,
                    "词法检索失败, 该查询贡献归零"
                );
                StageOutcome::Failed
            }
        }
    }

    /// 语义检索阶段 (向量缺失为降级信号, 不是失败)
    async fn semantic_stage(&self, input: &MatchInput) -> StageOutcome {
        let (semantic, embedding) = match (&self.providers.semantic, &self.providers.embedding) {
            (Some(s), Some(e)) => (s, e),
            _ => return StageOutcome::Unavailable,
        };

        let query_text = input.semantic_query_text();
        let vector = match embedding.embed(&input.tenant_id, &query_text).await {
            Ok(Some(v)) => v,
            Ok(None) => {
                debug!(
                    tenant_id = %input.tenant_id,
                    "无可用查询向量, 语义阶段跳过"
                );
                return StageOutcome::Unavailable;
            }
            Err(e) => {
                warn!(
                    tenant_id = %input.tenant_id,
                    stage = RetrievalStage::Semantic.as_str(),
                    error = %e,
                    "查询向量生成失败, 语义贡献归零"
                );
                return StageOutcome::Failed;
            }
        };

        match semantic
            .search(&input.tenant_id, &vector, DEFAULT_RETRIEVAL_LIMIT)
            .await
        {
            Ok(hits) => StageOutcome::Hits(hits),
            Err(e) => {
                warn!(
                    tenant_id = %input.tenant_id,
                    stage = RetrievalStage::Semantic.as_str(),
                    error = %e,
                    "语义检索失败, 语义贡献归零"
                );
                StageOutcome::Failed
            }
        }
    }

    // ==========================================
    // 评分
    // ==========================================

    /// 读取产品并评分全部归并候选
    async fn score_candidates(
        &self,
        input: &MatchInput,
        settings: &TenantSettings,
        merged: &[crate::domain::candidate::MergedCandidate],
        suggested_sku: Option<&str>,
    ) -> MatcherResult<Vec<Candidate>> {
        let product_ids: Vec<String> = merged.iter().map(|c| c.product_id.clone()).collect();
        let products = self
            .providers
            .products
            .get_many(&input.tenant_id, &product_ids)
            .await
            .map_err(MatcherError::Other)?;

        let by_id: HashMap<&str, &Product> = products
            .iter()
            .filter(|p| p.active && p.tenant_id == input.tenant_id)
            .map(|p| (p.product_id.as_str(), p))
            .collect();

        let mut candidates = Vec::with_capacity(merged.len());
        for entry in merged {
            let product = match by_id.get(entry.product_id.as_str()) {
                Some(p) => *p,
                // 目录侧已下线/不存在的产品直接丢弃
                None => continue,
            };

            let has_mapping = suggested_sku == Some(product.internal_sku.as_str());
            let reference_price = self.reference_price(input, product).await;

            candidates.push(MatchScorer::score(
                entry,
                input,
                product,
                has_mapping,
                reference_price,
                settings.price_tolerance_percent,
            ));
        }
        Ok(candidates)
    }

    /// 获取参考价 (提供方缺失或查询失败均按无参考价处理)
    async fn reference_price(&self, input: &MatchInput, product: &Product) -> Option<f64> {
        let provider = self.providers.reference_prices.as_ref()?;
        input.unit_price?;

        match provider
            .expected_unit_price(
                &input.tenant_id,
                &input.customer_id,
                &product.internal_sku,
                input.quantity,
                input.currency.as_deref(),
                input.order_date,
            )
            .await
        {
            Ok(price) => price,
            Err(e) => {
                warn!(
                    tenant_id = %input.tenant_id,
                    internal_sku = %product.internal_sku,
                    error = %e,
                    "参考价查询失败, 价格惩罚按 1.0 处理"
                );
                None
            }
        }
    }

    /// 按内部SKU反查 product_id (短路结果补全用, 失败不阻断)
    async fn find_product_id_by_sku(
        &self,
        tenant_id: &str,
        internal_sku: &str,
    ) -> Option<String> {
        match self
            .providers
            .products
            .find_by_internal_sku(tenant_id, internal_sku)
            .await
        {
            Ok(product) => product.map(|p| p.product_id),
            Err(e) => {
                warn!(
                    tenant_id,
                    internal_sku,
                    error = %e,
                    "按内部SKU反查产品失败"
                );
                None
            }
        }
    }
}
