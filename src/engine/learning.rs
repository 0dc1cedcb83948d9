// ==========================================
// 供应商SKU混合匹配引擎 - 学习回路
// ==========================================
// 职责: 操作员确认/否决 → 确认映射表变更 + 反馈事件
// 红线: 确认/否决是引擎仅有的两个写操作, 与匹配失败完全独立
// ==========================================

use crate::domain::mapping::{ConfirmedMapping, UomConversion};
use crate::domain::match_input::normalize_customer_sku;
use crate::engine::events::{
    FeedbackAction, MappingFeedbackEvent, OptionalFeedbackPublisher,
};
use crate::repository::mapping_repo::{ConfirmMappingParams, ConfirmedMappingRepository};
use crate::repository::RepositoryResult;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// ConfirmRequest - 确认操作请求
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    pub tenant_id: String,
    pub customer_id: String,
    pub customer_sku_raw: String,
    pub internal_sku: String,
    pub uom_conversion: Option<UomConversion>,
    pub confirmed_by: Option<String>,
}

// ==========================================
// LearningLoop - 学习回路服务
// ==========================================
pub struct LearningLoop {
    mapping_repo: Arc<ConfirmedMappingRepository>,
    feedback: OptionalFeedbackPublisher,
}

impl LearningLoop {
    /// 创建学习回路服务
    pub fn new(
        mapping_repo: Arc<ConfirmedMappingRepository>,
        feedback: OptionalFeedbackPublisher,
    ) -> Self {
        Self {
            mapping_repo,
            feedback,
        }
    }

    /// 确认映射
    ///
    /// SKU 规范化与匹配路径共用同一函数, 保证短路查找可命中。
    ///
    /// # 返回
    /// - Ok(ConfirmedMapping): upsert 后的活动行
    pub fn confirm(&self, request: &ConfirmRequest) -> RepositoryResult<ConfirmedMapping> {
        let customer_sku_norm = normalize_customer_sku(&request.customer_sku_raw);

        let before = self.mapping_repo.find_active(
            &request.tenant_id,
            &request.customer_id,
            &customer_sku_norm,
        )?;

        let params = ConfirmMappingParams {
            tenant_id: request.tenant_id.clone(),
            customer_id: request.customer_id.clone(),
            customer_sku_norm: customer_sku_norm.clone(),
            customer_sku_raw: Some(request.customer_sku_raw.clone()),
            internal_sku: request.internal_sku.clone(),
            uom_conversion: request.uom_conversion.clone(),
            created_by: request.confirmed_by.clone(),
        };
        let after = self.mapping_repo.confirm(&params)?;

        info!(
            tenant_id = %request.tenant_id,
            customer_id = %request.customer_id,
            customer_sku_norm = %customer_sku_norm,
            internal_sku = %request.internal_sku,
            support_count = after.support_count,
            "映射已确认"
        );

        self.publish_feedback(
            &request.tenant_id,
            &request.customer_id,
            &customer_sku_norm,
            &request.internal_sku,
            FeedbackAction::Confirmed,
            before,
            Some(after.clone()),
        );

        Ok(after)
    }

    /// 否决映射
    ///
    /// 行不存在时为无操作; 否决不阻止后续对同键确认不同内部SKU。
    pub fn reject(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_raw: &str,
        internal_sku: &str,
    ) -> RepositoryResult<()> {
        let customer_sku_norm = normalize_customer_sku(customer_sku_raw);

        let before =
            self.mapping_repo
                .find_active(tenant_id, customer_id, &customer_sku_norm)?;

        let rows = self
            .mapping_repo
            .reject(tenant_id, customer_id, &customer_sku_norm, internal_sku)?;

        info!(
            tenant_id,
            customer_id,
            customer_sku_norm = %customer_sku_norm,
            internal_sku,
            rows,
            "映射已否决"
        );

        let after =
            self.mapping_repo
                .find_active(tenant_id, customer_id, &customer_sku_norm)?;

        self.publish_feedback(
            tenant_id,
            customer_id,
            &customer_sku_norm,
            internal_sku,
            FeedbackAction::Rejected,
            before,
            after,
        );

        Ok(())
    }

    /// 发布反馈事件 (失败仅告警, 不影响主操作)
    #[allow(clippy::too_many_arguments)]
    fn publish_feedback(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_norm: &str,
        internal_sku: &str,
        action: FeedbackAction,
        before: Option<ConfirmedMapping>,
        after: Option<ConfirmedMapping>,
    ) {
        if !self.feedback.is_configured() {
            return;
        }

        let event = MappingFeedbackEvent {
            tenant_id: tenant_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_sku_norm: customer_sku_norm.to_string(),
            internal_sku: internal_sku.to_string(),
            action,
            before,
            after,
            occurred_at: Utc::now(),
        };

        if let Err(e) = self.feedback.publish(event) {
            warn!(
                tenant_id,
                customer_sku_norm,
                action = action.as_str(),
                error = %e,
                "反馈事件发布失败"
            );
        }
    }
}
