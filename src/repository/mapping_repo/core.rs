// ==========================================
// ConfirmedMappingRepository - 写入路径
// ==========================================
// 红线: confirm/reject 的并发冲突由存储层 upsert 吸收,
//       不做应用层加锁, 不同键互不阻塞
// ==========================================

use crate::domain::mapping::{ConfirmedMapping, UomConversion};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 时间戳存储格式 (与表内 TEXT 列一致)
pub(super) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// ConfirmMappingParams - 确认操作入参
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfirmMappingParams {
    pub tenant_id: String,
    pub customer_id: String,
    pub customer_sku_norm: String,
    pub customer_sku_raw: Option<String>,
    pub internal_sku: String,
    pub uom_conversion: Option<UomConversion>,
    pub created_by: Option<String>,
}

// ==========================================
// ConfirmedMappingRepository - 确认映射仓储
// ==========================================
pub struct ConfirmedMappingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ConfirmedMappingRepository {
    /// 创建新的确认映射仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 确认映射 (原子 upsert)
    ///
    /// # 语义
    /// - 键下存在活动行: support_count 自增, status=CONFIRMED, confidence=1.0,
    ///   非计数器字段按最后写入者覆盖, last_used_at 刷新
    /// - 键下无活动行: 插入新行 (support_count=1, confidence=1.0)
    ///
    /// 冲突目标为部分唯一索引 ux_confirmed_mapping_active,
    /// 同键并发确认在存储层序列化, 计数器只增不覆盖。
    ///
    /// # 返回
    /// - Ok(ConfirmedMapping): upsert 后的活动行
    pub fn confirm(&self, p: &ConfirmMappingParams) -> RepositoryResult<ConfirmedMapping> {
        let now = Utc::now().format(TS_FORMAT).to_string();
        let mapping_id = Uuid::new_v4().to_string();
        let (uom_from, uom_to, pack_factor) = match &p.uom_conversion {
            Some(c) => (
                Some(c.uom_from.clone()),
                Some(c.uom_to.clone()),
                Some(c.pack_factor),
            ),
            None => (None, None, None),
        };

        {
            let conn = self.get_conn()?;
            conn.execute(
                r#"
                INSERT INTO confirmed_mapping (
                    mapping_id, tenant_id, customer_id, customer_sku_norm,
                    customer_sku_raw, internal_sku, uom_from, uom_to, pack_factor,
                    status, confidence, support_count, reject_count,
                    last_used_at, created_by, created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                    'CONFIRMED', 1.0, 1, 0, ?10, ?11, ?10, ?10
                )
                ON CONFLICT (tenant_id, customer_id, customer_sku_norm)
                    WHERE status IN ('CONFIRMED', 'SUGGESTED')
                DO UPDATE SET
                    customer_sku_raw = excluded.customer_sku_raw,
                    internal_sku = excluded.internal_sku,
                    uom_from = excluded.uom_from,
                    uom_to = excluded.uom_to,
                    pack_factor = excluded.pack_factor,
                    status = 'CONFIRMED',
                    confidence = 1.0,
                    support_count = support_count + 1,
                    last_used_at = excluded.last_used_at,
                    updated_at = excluded.updated_at
                "#,
                params![
                    mapping_id,
                    p.tenant_id,
                    p.customer_id,
                    p.customer_sku_norm,
                    p.customer_sku_raw,
                    p.internal_sku,
                    uom_from,
                    uom_to,
                    pack_factor,
                    now,
                    p.created_by,
                ],
            )?;
        }

        self.find_active(&p.tenant_id, &p.customer_id, &p.customer_sku_norm)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "confirmed_mapping".to_string(),
                id: format!(
                    "{}/{}/{}",
                    p.tenant_id, p.customer_id, p.customer_sku_norm
                ),
            })
    }

    /// 写入建议映射 (不降级已确认行)
    ///
    /// # 语义
    /// - 键下无活动行: 插入 SUGGESTED 行
    /// - 键下活动行为 SUGGESTED: 更新映射目标
    /// - 键下活动行为 CONFIRMED: 保持不变 (DO UPDATE 带状态守卫)
    pub fn suggest(
        &self,
        p: &ConfirmMappingParams,
        confidence: f64,
    ) -> RepositoryResult<ConfirmedMapping> {
        let now = Utc::now().format(TS_FORMAT).to_string();
        let mapping_id = Uuid::new_v4().to_string();

        {
            let conn = self.get_conn()?;
            conn.execute(
                r#"
                INSERT INTO confirmed_mapping (
                    mapping_id, tenant_id, customer_id, customer_sku_norm,
                    customer_sku_raw, internal_sku,
                    status, confidence, support_count, reject_count,
                    created_by, created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, 'SUGGESTED', ?7, 0, 0, ?8, ?9, ?9
                )
                ON CONFLICT (tenant_id, customer_id, customer_sku_norm)
                    WHERE status IN ('CONFIRMED', 'SUGGESTED')
                DO UPDATE SET
                    internal_sku = excluded.internal_sku,
                    confidence = excluded.confidence,
                    updated_at = excluded.updated_at
                WHERE confirmed_mapping.status = 'SUGGESTED'
                "#,
                params![
                    mapping_id,
                    p.tenant_id,
                    p.customer_id,
                    p.customer_sku_norm,
                    p.customer_sku_raw,
                    p.internal_sku,
                    confidence,
                    p.created_by,
                    now,
                ],
            )?;
        }

        self.find_active(&p.tenant_id, &p.customer_id, &p.customer_sku_norm)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "confirmed_mapping".to_string(),
                id: format!(
                    "{}/{}/{}",
                    p.tenant_id, p.customer_id, p.customer_sku_norm
                ),
            })
    }

    /// 否决映射
    ///
    /// # 语义
    /// - 命中键+目标SKU的活动行: reject_count 自增, status=REJECTED
    ///   (释放活动槽位, 后续对同键确认其他SKU会插入新活动行)
    /// - 无活动行但存在历史 REJECTED 行: 在最近一条上累计 reject_count
    /// - 行不存在: 无操作
    ///
    /// 否决不阻止后续对同键确认不同的内部SKU。
    ///
    /// # 返回
    /// - Ok(rows): 被更新的行数 (0 或 1)
    pub fn reject(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_norm: &str,
        internal_sku: &str,
    ) -> RepositoryResult<usize> {
        let now = Utc::now().format(TS_FORMAT).to_string();
        let conn = self.get_conn()?;

        let rows = conn.execute(
            r#"
            UPDATE confirmed_mapping
            SET reject_count = reject_count + 1,
                status = 'REJECTED',
                updated_at = ?5
            WHERE tenant_id = ?1 AND customer_id = ?2
              AND customer_sku_norm = ?3 AND internal_sku = ?4
              AND status IN ('CONFIRMED', 'SUGGESTED')
            "#,
            params![tenant_id, customer_id, customer_sku_norm, internal_sku, now],
        )?;

        if rows > 0 {
            return Ok(rows);
        }

        // 重复否决: 在最近一条 REJECTED 行上继续累计
        let rows = conn.execute(
            r#"
            UPDATE confirmed_mapping
            SET reject_count = reject_count + 1,
                updated_at = ?5
            WHERE mapping_id = (
                SELECT mapping_id FROM confirmed_mapping
                WHERE tenant_id = ?1 AND customer_id = ?2
                  AND customer_sku_norm = ?3 AND internal_sku = ?4
                  AND status = 'REJECTED'
                ORDER BY updated_at DESC
                LIMIT 1
            )
            "#,
            params![tenant_id, customer_id, customer_sku_norm, internal_sku, now],
        )?;
        Ok(rows)
    }

    /// 废弃映射 (目录侧产品下线等场景)
    ///
    /// # 返回
    /// - Ok(rows): 被更新的行数
    pub fn deprecate(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_norm: &str,
    ) -> RepositoryResult<usize> {
        let now = Utc::now().format(TS_FORMAT).to_string();
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE confirmed_mapping
            SET status = 'DEPRECATED',
                updated_at = ?4
            WHERE tenant_id = ?1 AND customer_id = ?2
              AND customer_sku_norm = ?3
              AND status IN ('CONFIRMED', 'SUGGESTED')
            "#,
            params![tenant_id, customer_id, customer_sku_norm, now],
        )?;
        Ok(rows)
    }
}
