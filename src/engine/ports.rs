// ==========================================
// 供应商SKU混合匹配引擎 - 外部检索契约
// ==========================================
// 职责: 定义检索/产品/价格提供方 trait, 实现依赖倒置
// 说明: Engine 层定义 trait, 基础设施层实现适配器
//       (词法/语义两个检索后端共用同一"命中"返回形状,
//        便于互换与测试桩替换, 不触碰评分器)
// ==========================================

use crate::domain::candidate::RetrievalHit;
use crate::domain::product::Product;
use async_trait::async_trait;
use chrono::NaiveDate;

/// 词法相似度下限 (提供方在返回前过滤)
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.3;
/// 单阶段检索返回条数上限
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 30;

// ==========================================
// 词法检索字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalField {
    /// 产品内部SKU字段 (查询串: 规范化客户SKU)
    InternalSku,
    /// 产品名称+描述组合字段 (查询串: 自由文本描述)
    NameDescription,
}

// ==========================================
// 检索提供方 Trait
// ==========================================

/// 词法相似度检索提供方
///
/// 约束: 按租户过滤, 仅返回激活产品, 相似度 ∈ [0,1],
///       低于 min_similarity 的结果由提供方剔除
#[async_trait]
pub trait LexicalSearchProvider: Send + Sync {
    async fn search(
        &self,
        tenant_id: &str,
        field: LexicalField,
        query: &str,
        min_similarity: f64,
        limit: usize,
    ) -> anyhow::Result<Vec<RetrievalHit>>;
}

/// 语义向量检索提供方
///
/// 约束: 按租户过滤, 仅返回激活产品, 相似度为余弦值 ∈ [-1,1]
#[async_trait]
pub trait SemanticSearchProvider: Send + Sync {
    async fn search(
        &self,
        tenant_id: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> anyhow::Result<Vec<RetrievalHit>>;
}

/// 查询向量提供方
///
/// Ok(None) 表示租户/目录无可用向量 (降级信号, 不是错误)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, tenant_id: &str, text: &str) -> anyhow::Result<Option<Vec<f32>>>;
}

/// 产品目录只读模型
#[async_trait]
pub trait ProductReadModel: Send + Sync {
    async fn get(&self, tenant_id: &str, product_id: &str) -> anyhow::Result<Option<Product>>;

    /// 按内部SKU反查 (确认映射短路时补全 product_id 用)
    async fn find_by_internal_sku(
        &self,
        tenant_id: &str,
        internal_sku: &str,
    ) -> anyhow::Result<Option<Product>>;

    /// 批量读取 (默认实现逐个读取, 适配器可覆写为批查询)
    async fn get_many(
        &self,
        tenant_id: &str,
        product_ids: &[String],
    ) -> anyhow::Result<Vec<Product>> {
        let mut products = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            if let Some(product) = self.get(tenant_id, product_id).await? {
                products.push(product);
            }
        }
        Ok(products)
    }
}

/// 参考价提供方 (可选协作方)
///
/// Ok(None) 表示无参考价, 价格惩罚按 1.0 处理
#[async_trait]
pub trait ReferencePriceProvider: Send + Sync {
    async fn expected_unit_price(
        &self,
        tenant_id: &str,
        customer_id: &str,
        internal_sku: &str,
        quantity: f64,
        currency: Option<&str>,
        order_date: Option<NaiveDate>,
    ) -> anyhow::Result<Option<f64>>;
}

// ==========================================
// 空实现 (未接入相应协作方的场景/单元测试)
// ==========================================

/// 语义检索空实现: 始终无向量可用
#[derive(Debug, Clone, Default)]
pub struct NoEmbedding;

#[async_trait]
impl EmbeddingProvider for NoEmbedding {
    async fn embed(&self, _tenant_id: &str, _text: &str) -> anyhow::Result<Option<Vec<f32>>> {
        Ok(None)
    }
}

/// 参考价空实现: 始终无参考价
#[derive(Debug, Clone, Default)]
pub struct NoReferencePrices;

#[async_trait]
impl ReferencePriceProvider for NoReferencePrices {
    async fn expected_unit_price(
        &self,
        _tenant_id: &str,
        _customer_id: &str,
        _internal_sku: &str,
        _quantity: f64,
        _currency: Option<&str>,
        _order_date: Option<NaiveDate>,
    ) -> anyhow::Result<Option<f64>> {
        Ok(None)
    }
}
