// ==========================================
// 供应商SKU混合匹配引擎 - 匹配 API
// ==========================================
// 职责: 提供单行/批量匹配接口, 供抽取/草稿流水线调用
// 约束: 租户ID来自调用方上下文, 不信任请求体内的租户字段
// ==========================================

use crate::api::error::ApiResult;
use crate::config::settings_manager::SettingsManager;
use crate::config::tenant_settings::TenantSettings;
use crate::domain::match_input::MatchInput;
use crate::domain::match_result::MatchResult;
use crate::engine::error::MatcherError;
use crate::engine::matcher::HybridMatcher;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// MatchApi - 匹配接口
// ==========================================
pub struct MatchApi {
    matcher: Arc<HybridMatcher>,
    settings_manager: Arc<SettingsManager>,
}

impl MatchApi {
    /// 创建新的 MatchApi 实例
    pub fn new(matcher: Arc<HybridMatcher>, settings_manager: Arc<SettingsManager>) -> Self {
        Self {
            matcher,
            settings_manager,
        }
    }

    /// 解析租户匹配参数 (每次请求一次)
    fn resolve_settings(&self, tenant_id: &str) -> Result<TenantSettings, MatcherError> {
        self.settings_manager
            .resolve(tenant_id)
            .map_err(|e| MatcherError::SettingsError(e.to_string()))
    }

    /// 单行匹配建议
    #[instrument(skip(self, input), fields(tenant_id = %input.tenant_id))]
    pub async fn suggest_match(&self, input: &MatchInput) -> ApiResult<MatchResult> {
        let settings = self.resolve_settings(&input.tenant_id)?;
        let result = self.matcher.match_line(input, &settings).await?;
        Ok(result)
    }

    /// 批量匹配建议
    ///
    /// 每行结果独立, 单行失败不影响其他行。
    /// 约束: 一个批次属于同一租户, 行内租户与调用方租户不一致时整批拒绝
    ///       (否则该行会以调用方租户的阈值查询其他租户的目录)。
    pub async fn suggest_match_batch(
        &self,
        tenant_id: &str,
        inputs: &[MatchInput],
    ) -> ApiResult<Vec<ApiResult<MatchResult>>> {
        if let Some(input) = inputs.iter().find(|i| i.tenant_id != tenant_id) {
            return Err(crate::api::error::ApiError::InvalidInput(format!(
                "批次租户不一致: 调用方为 {}, 行内为 {}",
                tenant_id, input.tenant_id
            )));
        }

        let settings = self.resolve_settings(tenant_id)?;
        let results = self.matcher.match_batch(inputs, &settings).await;
        Ok(results
            .into_iter()
            .map(|r| r.map_err(Into::into))
            .collect())
    }
}
