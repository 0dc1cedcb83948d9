// ==========================================
// 供应商SKU混合匹配引擎 - 确认映射仓储
// ==========================================
// 红线: Repository 不含业务逻辑, 只做数据映射
// 红线: 计数器在 SQL 内原子自增, 禁止应用层读-改-写
// ==========================================

mod core;
mod queries;


pub use core::{ConfirmMappingParams, ConfirmedMappingRepository};
pub use queries::MappingListFilter;
