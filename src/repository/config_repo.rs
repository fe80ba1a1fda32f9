// ==========================================
// 餐饮门店排班系统 - 排班配置数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: hours_per_day 为遗留配置,算法不消费（见 DESIGN.md）
// ==========================================

use crate::domain::schedule::ScheduleConfiguration;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleConfigRepository - 排班配置仓储
// ==========================================

pub struct ScheduleConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleConfigRepository {
    /// 创建新的配置仓储实例
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(&db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按门店查询排班配置
    ///
    /// # 返回
    /// - Ok(Some(ScheduleConfiguration)): 找到配置
    /// - Ok(None): 门店未配置
    pub fn find_by_branch(
        &self,
        branch_id: &str,
    ) -> RepositoryResult<Option<ScheduleConfiguration>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT branch_id, hours_per_day, calendar_color
            FROM schedule_config
            WHERE branch_id = ?1
            "#,
        )?;

        let config = stmt
            .query_row(params![branch_id], |row| {
                Ok(ScheduleConfiguration {
                    branch_id: row.get(0)?,
                    hours_per_day: row.get(1)?,
                    calendar_color: row.get(2)?,
                })
            })
            .optional()?;

        Ok(config)
    }
}
