// ==========================================
// 供应商SKU混合匹配引擎 - 确认映射领域模型
// ==========================================
// 职责: 学习回路的持久化记录
// 红线: (tenant, customer, sku_norm) 键下活动行至多一条
// 对齐: confirmed_mapping 表
// ==========================================

use crate::domain::types::MappingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// UomConversion - 单位换算对
// ==========================================
// 操作员确认时可附带的客户单位→内部单位换算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UomConversion {
    /// 客户侧单位
    pub uom_from: String,
    /// 内部单位
    pub uom_to: String,
    /// 包装系数 (1 uom_from = pack_factor uom_to)
    pub pack_factor: f64,
}

// ==========================================
// ConfirmedMapping - 确认映射记录
// ==========================================
// 创建: 首次确认; 变更: 后续确认/否决 (计数器+状态+时间戳)
// 永不物理删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedMapping {
    // ===== 主键 =====
    pub mapping_id: String,

    // ===== 学习键 =====
    pub tenant_id: String,
    pub customer_id: String,
    pub customer_sku_norm: String,
    /// 原始客户SKU (仅展示)
    pub customer_sku_raw: Option<String>,

    // ===== 映射目标 =====
    pub internal_sku: String,
    pub uom_conversion: Option<UomConversion>,

    // ===== 生命周期 =====
    pub status: MappingStatus,
    /// 存储置信度 (确认时写 1.0; 匹配短路返回的 0.99 是另一口径)
    pub confidence: f64,
    /// 确认次数
    pub support_count: i64,
    /// 否决次数
    pub reject_count: i64,

    // ===== 审计字段 =====
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
