// ==========================================
// 供应商SKU混合匹配引擎 - 租户参数管理器
// ==========================================
// 职责: 参数加载与默认值回退
// 存储: config_kv 表 (key-value + tenant scope)
// ==========================================

use crate::config::tenant_settings::TenantSettings;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// SettingsManager - 租户参数管理器
// ==========================================
pub struct SettingsManager {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsManager {
    /// 创建新的 SettingsManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 SettingsManager
    ///
    /// 说明: 为保证连接行为一致, 会对传入连接再次应用统一 PRAGMA (幂等)。
    pub fn from_connection(
        conn: Arc<Mutex<Connection>>,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id = 租户)
    fn get_config_value(
        &self,
        tenant_id: &str,
        key: &str,
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![tenant_id, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取浮点配置, 解析失败按未配置处理 (记录告警)
    fn get_f64(
        &self,
        tenant_id: &str,
        key: &str,
    ) -> Result<Option<f64>, Box<dyn Error + Send + Sync>> {
        match self.get_config_value(tenant_id, key)? {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) => Ok(Some(v)),
                Err(_) => {
                    warn!(tenant_id, key, value = %raw, "配置值非法, 回退默认值");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// 解析租户匹配参数 (缺失项回退默认值)
    ///
    /// # 参数
    /// - tenant_id: 租户标识
    ///
    /// # 返回
    /// - TenantSettings: 每次请求解析一次的不可变参数
    pub fn resolve(
        &self,
        tenant_id: &str,
    ) -> Result<TenantSettings, Box<dyn Error + Send + Sync>> {
        let defaults = TenantSettings::default();
        Ok(TenantSettings {
            auto_apply_threshold: self
                .get_f64(tenant_id, "match.auto_apply_threshold")?
                .unwrap_or(defaults.auto_apply_threshold),
            auto_apply_gap: self
                .get_f64(tenant_id, "match.auto_apply_gap")?
                .unwrap_or(defaults.auto_apply_gap),
            price_tolerance_percent: self
                .get_f64(tenant_id, "match.price_tolerance_percent")?
                .unwrap_or(defaults.price_tolerance_percent),
        })
    }
}
