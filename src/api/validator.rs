// ==========================================
// 供应商SKU混合匹配引擎 - 请求校验器
// ==========================================
// 职责: 外部请求的同步前置校验
// 说明: 匹配输入的校验逻辑由引擎层拥有 (HybridMatcher::validate),
//       此处补充映射操作与分页参数的校验
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::engine::learning::ConfirmRequest;

// ==========================================
// MappingRequestValidator - 映射操作校验器
// ==========================================
pub struct MappingRequestValidator;

impl MappingRequestValidator {
    /// 校验确认请求
    pub fn validate_confirm(request: &ConfirmRequest) -> ApiResult<()> {
        if request.tenant_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("tenant_id 缺失".to_string()));
        }
        if request.customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("customer_id 缺失".to_string()));
        }
        if request.customer_sku_raw.trim().is_empty() {
            return Err(ApiError::InvalidInput("customer_sku 缺失".to_string()));
        }
        if request.internal_sku.trim().is_empty() {
            return Err(ApiError::InvalidInput("internal_sku 缺失".to_string()));
        }
        if let Some(conversion) = &request.uom_conversion {
            if conversion.uom_from.trim().is_empty() || conversion.uom_to.trim().is_empty() {
                return Err(ApiError::InvalidInput(
                    "单位换算对的 uom_from/uom_to 不能为空".to_string(),
                ));
            }
            if !conversion.pack_factor.is_finite() || conversion.pack_factor <= 0.0 {
                return Err(ApiError::InvalidInput(format!(
                    "pack_factor 非法: {}",
                    conversion.pack_factor
                )));
            }
        }
        Ok(())
    }

    /// 校验否决请求
    pub fn validate_reject(
        tenant_id: &str,
        customer_id: &str,
        customer_sku_raw: &str,
        internal_sku: &str,
    ) -> ApiResult<()> {
        if tenant_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("tenant_id 缺失".to_string()));
        }
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("customer_id 缺失".to_string()));
        }
        if customer_sku_raw.trim().is_empty() {
            return Err(ApiError::InvalidInput("customer_sku 缺失".to_string()));
        }
        if internal_sku.trim().is_empty() {
            return Err(ApiError::InvalidInput("internal_sku 缺失".to_string()));
        }
        Ok(())
    }

    /// 校验分页参数
    pub fn validate_paging(page: u32, page_size: u32) -> ApiResult<()> {
        if page == 0 {
            return Err(ApiError::InvalidInput("page 必须从 1 开始".to_string()));
        }
        if page_size == 0 || page_size > 500 {
            return Err(ApiError::InvalidInput(format!(
                "page_size 必须在 1..=500: {}",
                page_size
            )));
        }
        Ok(())
    }
}
