// ==========================================
// 供应商SKU混合匹配引擎 - 领域类型定义
// ==========================================
// 职责: 匹配状态/方法/映射生命周期等核心枚举
// 序列化格式: 与数据库存储字符串一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 匹配状态 (Match Status)
// ==========================================
// MATCHED   - 确认映射直接命中 (短路路径)
// SUGGESTED - 自动建议 (置信度与差距双阈值满足)
// UNMATCHED - 无自动结论, 候选列表供人工复核
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Matched,
    Suggested,
    Unmatched,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "MATCHED"),
            MatchStatus::Suggested => write!(f, "SUGGESTED"),
            MatchStatus::Unmatched => write!(f, "UNMATCHED"),
        }
    }
}

// ==========================================
// 匹配方法 (Match Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// 确认映射表直接命中
    ExactMapping,
    /// 词法+语义混合检索
    Hybrid,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::ExactMapping => "exact_mapping",
            MatchMethod::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 映射生命周期状态 (Mapping Status)
// ==========================================
// 红线: 同一 (tenant, customer, sku_norm) 键下
//       {CONFIRMED, SUGGESTED} 状态的行至多一条 (活动行唯一约束)
// 行永不物理删除: 被取代 → DEPRECATED, 被否决 → REJECTED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
    Suggested,
    Confirmed,
    Rejected,
    Deprecated,
}

impl MappingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingStatus::Suggested => "SUGGESTED",
            MappingStatus::Confirmed => "CONFIRMED",
            MappingStatus::Rejected => "REJECTED",
            MappingStatus::Deprecated => "DEPRECATED",
        }
    }

    /// 活动状态: 占用键唯一槽位的状态集合
    pub fn is_active(&self) -> bool {
        matches!(self, MappingStatus::Confirmed | MappingStatus::Suggested)
    }
}

impl fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MappingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SUGGESTED" => Ok(MappingStatus::Suggested),
            "CONFIRMED" => Ok(MappingStatus::Confirmed),
            "REJECTED" => Ok(MappingStatus::Rejected),
            "DEPRECATED" => Ok(MappingStatus::Deprecated),
            other => Err(format!("未知映射状态: {}", other)),
        }
    }
}

// ==========================================
// 检索阶段标识 (Retrieval Stage)
// ==========================================
// 用于降级日志与阶段结果归并
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStage {
    /// 词法检索 - 内部SKU字段
    LexicalSku,
    /// 词法检索 - 名称+描述字段
    LexicalDescription,
    /// 语义向量检索
    Semantic,
}

impl RetrievalStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStage::LexicalSku => "lexical_sku",
            RetrievalStage::LexicalDescription => "lexical_description",
            RetrievalStage::Semantic => "semantic",
        }
    }
}

impl fmt::Display for RetrievalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
