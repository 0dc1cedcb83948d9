// ==========================================
// 供应商SKU混合匹配引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout, 减少并发确认时的偶发 busy 错误
// - 引擎自有表 (confirmed_mapping / config_kv) 的建表入口
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout (毫秒)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明:
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化引擎自有表结构 (幂等)
///
/// # 表
/// - confirmed_mapping: 学习回路持久化表
/// - config_kv: 租户参数表
///
/// # 约束
/// - ux_confirmed_mapping_active: 活动行唯一约束 (部分唯一索引),
///   upsert 的冲突目标, 学习回路"键下至多一条活动行"的存储层保证
pub fn init_engine_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS confirmed_mapping (
            mapping_id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            customer_id TEXT NOT NULL,
            customer_sku_norm TEXT NOT NULL,
            customer_sku_raw TEXT,
            internal_sku TEXT NOT NULL,
            uom_from TEXT,
            uom_to TEXT,
            pack_factor REAL,
            status TEXT NOT NULL DEFAULT 'CONFIRMED',
            confidence REAL NOT NULL DEFAULT 1.0,
            support_count INTEGER NOT NULL DEFAULT 1,
            reject_count INTEGER NOT NULL DEFAULT 0,
            last_used_at TEXT,
            created_by TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_confirmed_mapping_active
            ON confirmed_mapping (tenant_id, customer_id, customer_sku_norm)
            WHERE status IN ('CONFIRMED', 'SUGGESTED');

        CREATE INDEX IF NOT EXISTS ix_confirmed_mapping_tenant_customer
            ON confirmed_mapping (tenant_id, customer_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;
    Ok(())
}
