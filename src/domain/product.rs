// ==========================================
// 供应商SKU混合匹配引擎 - 产品读模型
// ==========================================
// 职责: 产品目录只读视图 (目录 CRUD 与向量生成均为外部协作方)
// 用途: 评分阶段读取基准单位/换算表/激活标志
// ==========================================

use crate::domain::uom::normalize_uom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Product - 产品只读视图
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub internal_sku: String,
    pub name: String,
    pub description: Option<String>,
    /// 基准计量单位
    pub base_uom: String,
    /// 单位换算表: 规范化单位 → 换算系数 (到基准单位)
    pub uom_conversions: HashMap<String, f64>,
    pub active: bool,
    pub tenant_id: String,
}

impl Product {
    /// 判定行单位是否被产品配置接受
    ///
    /// # 返回
    /// - true: 等于基准单位, 或在换算表中声明
    pub fn accepts_uom(&self, uom: &str) -> bool {
        let norm = normalize_uom(uom);
        if norm.is_empty() {
            return false;
        }
        if normalize_uom(&self.base_uom) == norm {
            return true;
        }
        self.uom_conversions.keys().any(|k| normalize_uom(k) == norm)
    }
}
