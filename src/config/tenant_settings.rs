// ==========================================
// 供应商SKU混合匹配引擎 - 租户匹配参数
// ==========================================
// 职责: 每次请求解析一次的不可变参数结构
// 红线: 评分/决策函数只接收显式参数, 不读全局可变状态
// ==========================================

use serde::{Deserialize, Serialize};

/// 自动建议置信度阈值默认值
pub const DEFAULT_AUTO_APPLY_THRESHOLD: f64 = 0.92;
/// 自动建议 Top1-Top2 差距阈值默认值
pub const DEFAULT_AUTO_APPLY_GAP: f64 = 0.10;
/// 价格容差百分比默认值
pub const DEFAULT_PRICE_TOLERANCE_PERCENT: f64 = 5.0;

// ==========================================
// TenantSettings - 租户匹配参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TenantSettings {
    /// 自动建议置信度阈值
    pub auto_apply_threshold: f64,
    /// 自动建议 Top1-Top2 最小差距
    pub auto_apply_gap: f64,
    /// 价格容差百分比
    pub price_tolerance_percent: f64,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            auto_apply_threshold: DEFAULT_AUTO_APPLY_THRESHOLD,
            auto_apply_gap: DEFAULT_AUTO_APPLY_GAP,
            price_tolerance_percent: DEFAULT_PRICE_TOLERANCE_PERCENT,
        }
    }
}
