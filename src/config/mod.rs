// ==========================================
// 供应商SKU混合匹配引擎 - 配置层
// ==========================================
// 职责: 租户匹配参数的定义与解析
// 红线: 参数每次请求解析一次, 以不可变结构传入引擎
// ==========================================

pub mod settings_manager;
pub mod tenant_settings;

pub use settings_manager::SettingsManager;
pub use tenant_settings::{
    TenantSettings, DEFAULT_AUTO_APPLY_GAP, DEFAULT_AUTO_APPLY_THRESHOLD,
    DEFAULT_PRICE_TOLERANCE_PERCENT,
};
