// ==========================================
// 供应商SKU混合匹配引擎 - 学习反馈事件
// ==========================================
// 职责: 定义反馈事件发布 trait, 实现依赖倒置
// 说明: Engine 层定义 trait, 下游学习反馈收集方实现适配器
//       引擎只暴露钩子, 不拥有事件存储
// ==========================================

use crate::domain::mapping::ConfirmedMapping;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 反馈动作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAction {
    /// 操作员确认映射
    Confirmed,
    /// 操作员否决映射
    Rejected,
}

impl FeedbackAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackAction::Confirmed => "confirmed",
            FeedbackAction::Rejected => "rejected",
        }
    }
}

// ==========================================
// MappingFeedbackEvent - 反馈事件
// ==========================================
// 携带变更前后快照, 供下游学习反馈收集方消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingFeedbackEvent {
    pub tenant_id: String,
    pub customer_id: String,
    pub customer_sku_norm: String,
    pub internal_sku: String,
    pub action: FeedbackAction,
    /// 变更前快照 (首次确认时为 None)
    pub before: Option<ConfirmedMapping>,
    /// 变更后快照 (行不存在的否决为 None)
    pub after: Option<ConfirmedMapping>,
    pub occurred_at: DateTime<Utc>,
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 学习反馈事件发布者 Trait
///
/// Engine 层定义, 下游收集方实现。
/// 发布失败不回滚确认/否决本身 (调用方记录告警后继续)。
pub trait MappingFeedbackPublisher: Send + Sync {
    /// 发布反馈事件
    fn publish(&self, event: MappingFeedbackEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
///
/// 用于不需要反馈收集的场景 (如单元测试)
#[derive(Debug, Clone, Default)]
pub struct NoOpFeedbackPublisher;

impl MappingFeedbackPublisher for NoOpFeedbackPublisher {
    fn publish(&self, event: MappingFeedbackEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpFeedbackPublisher: 跳过事件发布 - key={}/{}/{}, action={}",
            event.tenant_id,
            event.customer_id,
            event.customer_sku_norm,
            event.action.as_str()
        );
        Ok(())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn MappingFeedbackPublisher>> 的使用
pub struct OptionalFeedbackPublisher {
    inner: Option<Arc<dyn MappingFeedbackPublisher>>,
}

impl OptionalFeedbackPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn MappingFeedbackPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例 (不发布事件)
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件 (如果有发布者)
    pub fn publish(&self, event: MappingFeedbackEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => Ok(()),
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalFeedbackPublisher {
    fn default() -> Self {
        Self::none()
    }
}
