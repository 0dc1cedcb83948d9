// ==========================================
// 供应商SKU混合匹配引擎 - 计量单位维度分类
// ==========================================
// 职责: 单位字符串规范化 + 量纲分类 (纯逻辑)
// 用途: UoM 惩罚因子判定 (同量纲≠不兼容, 异量纲=硬不兼容)
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 单位量纲 (UoM Dimension)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UomDimension {
    /// 质量 (kg/t/g/lb)
    Mass,
    /// 长度 (m/mm/cm/km)
    Length,
    /// 面积 (m2/sqm)
    Area,
    /// 体积 (l/ml/m3)
    Volume,
    /// 计数 (pc/ea/box/ctn)
    Count,
}

/// 规范化单位字符串
///
/// 小写 + 去空白 + 去点号, 与产品目录的单位配置口径一致。
/// 幂等: normalize_uom(normalize_uom(x)) == normalize_uom(x)
pub fn normalize_uom(uom: &str) -> String {
    uom.trim().to_lowercase().replace('.', "")
}

/// 单位量纲分类
///
/// # 参数
/// - uom: 原始单位字符串 (内部会先规范化)
///
/// # 返回
/// - Some(dimension): 已知单位
/// - None: 未识别单位 (惩罚判定按"未知"处理, 不按"不兼容"处理)
pub fn classify_uom(uom: &str) -> Option<UomDimension> {
    let norm = normalize_uom(uom);
    match norm.as_str() {
        // 质量
        "kg" | "kgs" | "kilogram" | "kilograms" | "g" | "gram" | "grams" | "t" | "ton"
        | "tons" | "tonne" | "tonnes" | "mt" | "lb" | "lbs" | "pound" | "pounds" => {
            Some(UomDimension::Mass)
        }
        // 长度
        "m" | "mtr" | "meter" | "meters" | "metre" | "metres" | "mm" | "cm" | "km" | "ft"
        | "foot" | "feet" | "in" | "inch" | "inches" => Some(UomDimension::Length),
        // 面积
        "m2" | "sqm" | "sq m" | "qm" | "ft2" | "sqft" => Some(UomDimension::Area),
        // 体积
        "l" | "ltr" | "liter" | "liters" | "litre" | "litres" | "ml" | "cl" | "m3" | "cbm"
        | "gal" | "gallon" | "gallons" => Some(UomDimension::Volume),
        // 计数
        "pc" | "pcs" | "piece" | "pieces" | "ea" | "each" | "stk" | "unit" | "units"
        | "box" | "boxes" | "ctn" | "carton" | "cartons" | "pal" | "pallet" | "pallets"
        | "pack" | "packs" | "set" | "sets" | "roll" | "rolls" | "pair" | "pairs" => {
            Some(UomDimension::Count)
        }
        _ => None,
    }
}

/// 判定两个单位是否量纲硬不兼容
///
/// # 规则
/// - 双方量纲均已识别且不同 → true (如长度单位对质量计价产品)
/// - 任一方未识别 → false (按"未知"处理, 不做硬判)
pub fn dimensions_incompatible(uom_a: &str, uom_b: &str) -> bool {
    match (classify_uom(uom_a), classify_uom(uom_b)) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uom_idempotent() {
        let once = normalize_uom("  Kg. ");
        let twice = normalize_uom(&once);
        assert_eq!(once, "kg");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_classify_known_units() {
        assert_eq!(classify_uom("KG"), Some(UomDimension::Mass));
        assert_eq!(classify_uom("pcs"), Some(UomDimension::Count));
        assert_eq!(classify_uom("mtr"), Some(UomDimension::Length));
        assert_eq!(classify_uom("Ltr"), Some(UomDimension::Volume));
        assert_eq!(classify_uom("sqm"), Some(UomDimension::Area));
    }

    #[test]
    fn test_classify_unknown_unit() {
        assert_eq!(classify_uom("blister"), None);
        assert_eq!(classify_uom(""), None);
    }

    #[test]
    fn test_dimensions_incompatible() {
        // 长度 vs 质量 → 硬不兼容
        assert!(dimensions_incompatible("m", "kg"));
        // 同量纲 → 兼容
        assert!(!dimensions_incompatible("kg", "t"));
        // 未识别单位不做硬判
        assert!(!dimensions_incompatible("blister", "kg"));
    }
}
