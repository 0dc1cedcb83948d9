// ==========================================
// 供应商SKU混合匹配引擎 - 置信度评分器
// ==========================================
// 红线: 纯函数, 无隐藏状态, 无随机性,
//       相同 (候选, 输入, 产品) 三元组必得相同输出
// ==========================================

mod core;


pub use core::{MatchScorer, LEXICAL_WEIGHT, SEMANTIC_WEIGHT};
