// ==========================================
// 供应商SKU混合匹配引擎 - 映射管理 API
// ==========================================
// 职责: 操作员确认/否决/查询映射, 供操作员界面调用
// 约束: 租户ID来自调用方上下文, 不信任请求体内的租户字段
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator::MappingRequestValidator;
use crate::domain::mapping::{ConfirmedMapping, UomConversion};
use crate::engine::learning::{ConfirmRequest, LearningLoop};
use crate::repository::mapping_repo::{ConfirmedMappingRepository, MappingListFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// Page - 分页结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

// ==========================================
// MappingApi - 映射管理接口
// ==========================================
pub struct MappingApi {
    learning: Arc<LearningLoop>,
    mapping_repo: Arc<ConfirmedMappingRepository>,
}

impl MappingApi {
    /// 创建新的 MappingApi 实例
    pub fn new(learning: Arc<LearningLoop>, mapping_repo: Arc<ConfirmedMappingRepository>) -> Self {
        Self {
            learning,
            mapping_repo,
        }
    }

    /// 确认映射
    ///
    /// # 参数
    /// - uom_from/uom_to/pack_factor: 可选单位换算对 (三项须同时提供)
    #[allow(clippy::too_many_arguments)]
    pub fn confirm_mapping(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_raw: &str,
        internal_sku: &str,
        uom_from: Option<&str>,
        uom_to: Option<&str>,
        pack_factor: Option<f64>,
        confirmed_by: Option<&str>,
    ) -> ApiResult<ConfirmedMapping> {
        let uom_conversion = match (uom_from, uom_to, pack_factor) {
            (Some(from), Some(to), Some(factor)) => Some(UomConversion {
                uom_from: from.to_string(),
                uom_to: to.to_string(),
                pack_factor: factor,
            }),
            (None, None, None) => None,
            _ => {
                return Err(crate::api::error::ApiError::InvalidInput(
                    "单位换算对必须同时提供 uom_from/uom_to/pack_factor".to_string(),
                ))
            }
        };

        let request = ConfirmRequest {
            tenant_id: tenant_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_sku_raw: customer_sku_raw.to_string(),
            internal_sku: internal_sku.to_string(),
            uom_conversion,
            confirmed_by: confirmed_by.map(|s| s.to_string()),
        };
        MappingRequestValidator::validate_confirm(&request)?;

        Ok(self.learning.confirm(&request)?)
    }

    /// 否决映射
    pub fn reject_mapping(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_raw: &str,
        internal_sku: &str,
    ) -> ApiResult<()> {
        MappingRequestValidator::validate_reject(
            tenant_id,
            customer_id,
            customer_sku_raw,
            internal_sku,
        )?;
        Ok(self
            .learning
            .reject(tenant_id, customer_id, customer_sku_raw, internal_sku)?)
    }

    /// 分页列出映射
    pub fn list_mappings(
        &self,
        tenant_id: &str,
        filter: MappingListFilter,
        page: u32,
        page_size: u32,
    ) -> ApiResult<Page<ConfirmedMapping>> {
        MappingRequestValidator::validate_paging(page, page_size)?;
        let (items, total) = self.mapping_repo.list(tenant_id, &filter, page, page_size)?;
        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }
}
