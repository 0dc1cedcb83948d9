// ==========================================
// 供应商SKU混合匹配引擎 - 匹配输入模型
// ==========================================
// 职责: 单订单行的匹配请求 + SKU 规范化
// 红线: 规范化必须与确认映射写入路径使用同一函数,
//       否则学习回路的短路查找永远不命中
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// MatchInput - 单行匹配请求
// ==========================================
// 用途: 每次调用构造一次, 不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInput {
    // ===== 租户与客户 =====
    pub tenant_id: String,
    pub customer_id: String,

    // ===== 供应商侧产品引用 =====
    /// 规范化客户SKU (学习回路查找键)
    pub customer_sku_norm: String,
    /// 原始客户SKU (仅展示)
    pub customer_sku_raw: String,
    /// 自由文本产品描述
    pub description: String,
    /// 行单位
    pub uom: Option<String>,

    // ===== 商务维度 =====
    pub unit_price: Option<f64>,
    pub quantity: f64,
    pub currency: Option<String>,
    pub order_date: Option<NaiveDate>,
}

impl MatchInput {
    /// 构造匹配输入, 规范化 SKU 由本函数统一完成
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: &str,
        customer_id: &str,
        customer_sku_raw: &str,
        description: &str,
        uom: Option<&str>,
        unit_price: Option<f64>,
        quantity: f64,
        currency: Option<&str>,
        order_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_sku_norm: normalize_customer_sku(customer_sku_raw),
            customer_sku_raw: customer_sku_raw.to_string(),
            description: description.trim().to_string(),
            uom: uom.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
            unit_price,
            quantity,
            currency: currency.map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty()),
            order_date,
        }
    }

    /// 语义检索的查询文本 (SKU + 描述 + 单位拼接)
    pub fn semantic_query_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.customer_sku_norm.is_empty() {
            parts.push(&self.customer_sku_norm);
        }
        if !self.description.is_empty() {
            parts.push(&self.description);
        }
        if let Some(uom) = &self.uom {
            parts.push(uom);
        }
        parts.join(" ")
    }
}

/// 规范化客户SKU
///
/// # 规则
/// - 去首尾空白
/// - 统一大写
/// - 内部连续空白折叠为单个空格
///
/// 幂等: normalize(normalize(x)) == normalize(x)
pub fn normalize_customer_sku(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
