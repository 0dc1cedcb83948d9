// ==========================================
// ConfirmedMappingRepository - 查询路径
// ==========================================
// 约束: 所有查询以租户ID为第一过滤条件, 使用参数化 SQL
// ==========================================

use super::core::{ConfirmedMappingRepository, TS_FORMAT};
use crate::domain::mapping::{ConfirmedMapping, UomConversion};
use crate::domain::types::MappingStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

/// 映射列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct MappingListFilter {
    pub customer_id: Option<String>,
    pub status: Option<MappingStatus>,
}

/// 解析 TEXT 时间戳列
fn parse_ts(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| NaiveDateTime::parse_from_str(&s, TS_FORMAT).ok())
        .map(|naive| naive.and_utc())
}

/// 行映射: confirmed_mapping 表 → 领域实体
fn map_row(row: &Row<'_>) -> rusqlite::Result<ConfirmedMapping> {
    let status_raw: String = row.get("status")?;
    let uom_from: Option<String> = row.get("uom_from")?;
    let uom_to: Option<String> = row.get("uom_to")?;
    let pack_factor: Option<f64> = row.get("pack_factor")?;

    let uom_conversion = match (uom_from, uom_to, pack_factor) {
        (Some(from), Some(to), Some(factor)) => Some(UomConversion {
            uom_from: from,
            uom_to: to,
            pack_factor: factor,
        }),
        _ => None,
    };

    Ok(ConfirmedMapping {
        mapping_id: row.get("mapping_id")?,
        tenant_id: row.get("tenant_id")?,
        customer_id: row.get("customer_id")?,
        customer_sku_norm: row.get("customer_sku_norm")?,
        customer_sku_raw: row.get("customer_sku_raw")?,
        internal_sku: row.get("internal_sku")?,
        uom_conversion,
        status: status_raw
            .parse::<MappingStatus>()
            .unwrap_or(MappingStatus::Deprecated),
        confidence: row.get("confidence")?,
        support_count: row.get("support_count")?,
        reject_count: row.get("reject_count")?,
        last_used_at: parse_ts(row.get("last_used_at")?),
        created_by: row.get("created_by")?,
        created_at: parse_ts(row.get("created_at")?).unwrap_or_else(Utc::now),
        updated_at: parse_ts(row.get("updated_at")?).unwrap_or_else(Utc::now),
    })
}

const SELECT_COLUMNS: &str = r#"
    SELECT mapping_id, tenant_id, customer_id, customer_sku_norm,
           customer_sku_raw, internal_sku, uom_from, uom_to, pack_factor,
           status, confidence, support_count, reject_count,
           last_used_at, created_by, created_at, updated_at
    FROM confirmed_mapping
"#;

impl ConfirmedMappingRepository {
    // ==========================================
    // 读取操作
    // ==========================================

    /// 学习回路短路查找 (仅 CONFIRMED 行)
    ///
    /// O(1) 索引读, 匹配主流程每行调用一次。
    pub fn lookup(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_norm: &str,
    ) -> RepositoryResult<Option<ConfirmedMapping>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE tenant_id = ?1 AND customer_id = ?2 \
             AND customer_sku_norm = ?3 AND status = 'CONFIRMED' LIMIT 1",
            SELECT_COLUMNS
        );
        let result = conn.query_row(
            &sql,
            params![tenant_id, customer_id, customer_sku_norm],
            map_row,
        );
        match result {
            Ok(mapping) => Ok(Some(mapping)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查找键下活动行 (CONFIRMED 或 SUGGESTED)
    ///
    /// 唯一约束保证至多一条。
    pub fn find_active(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_norm: &str,
    ) -> RepositoryResult<Option<ConfirmedMapping>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE tenant_id = ?1 AND customer_id = ?2 \
             AND customer_sku_norm = ?3 AND status IN ('CONFIRMED', 'SUGGESTED') LIMIT 1",
            SELECT_COLUMNS
        );
        let result = conn.query_row(
            &sql,
            params![tenant_id, customer_id, customer_sku_norm],
            map_row,
        );
        match result {
            Ok(mapping) => Ok(Some(mapping)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 键下活动行计数 (唯一约束的不变式测试用)
    pub fn count_active(
        &self,
        tenant_id: &str,
        customer_id: &str,
        customer_sku_norm: &str,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM confirmed_mapping
            WHERE tenant_id = ?1 AND customer_id = ?2
              AND customer_sku_norm = ?3
              AND status IN ('CONFIRMED', 'SUGGESTED')
            "#,
            params![tenant_id, customer_id, customer_sku_norm],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 分页列出租户映射
    ///
    /// # 参数
    /// - filter: 客户/状态过滤条件
    /// - page: 页码 (从 1 开始)
    /// - page_size: 页大小
    ///
    /// # 返回
    /// - Ok((rows, total)): 当前页数据 + 过滤后总条数
    pub fn list(
        &self,
        tenant_id: &str,
        filter: &MappingListFilter,
        page: u32,
        page_size: u32,
    ) -> RepositoryResult<(Vec<ConfirmedMapping>, u64)> {
        if page == 0 || page_size == 0 {
            return Err(RepositoryError::FieldValueError {
                field: "page/page_size".to_string(),
                message: "分页参数必须从 1 开始".to_string(),
            });
        }

        let conn = self.get_conn()?;

        let mut where_sql = String::from("WHERE tenant_id = ?1");
        let mut values: Vec<Value> = vec![Value::from(tenant_id.to_string())];

        if let Some(customer_id) = &filter.customer_id {
            values.push(Value::from(customer_id.clone()));
            where_sql.push_str(&format!(" AND customer_id = ?{}", values.len()));
        }
        if let Some(status) = &filter.status {
            values.push(Value::from(status.as_str().to_string()));
            where_sql.push_str(&format!(" AND status = ?{}", values.len()));
        }

        let count_sql = format!("SELECT COUNT(*) FROM confirmed_mapping {}", where_sql);
        let total: i64 = conn.query_row(
            &count_sql,
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(Value::from(i64::from(page_size)));
        let limit_idx = values.len();
        values.push(Value::from(i64::from(page - 1) * i64::from(page_size)));
        let offset_idx = values.len();

        let list_sql = format!(
            "{} {} ORDER BY updated_at DESC, mapping_id ASC LIMIT ?{} OFFSET ?{}",
            SELECT_COLUMNS, where_sql, limit_idx, offset_idx
        );

        let mut stmt = conn.prepare(&list_sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_row)?;

        let mut mappings = Vec::new();
        for row in rows {
            mappings.push(row?);
        }
        Ok((mappings, total as u64))
    }
}
