// ==========================================
// 餐饮门店排班系统 - 需求模板数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 周循环模板与特殊日期模板,此处只读
// ==========================================

use crate::domain::template::{ShiftTemplate, SpecialDate, SpecialDateTemplate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 解析 "%H:%M:%S" 时间,解析失败回退 00:00:00
fn parse_time(value: String) -> NaiveTime {
    NaiveTime::parse_from_str(&value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M"))
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

/// 解析 "%Y-%m-%d" 日期,解析失败回退 1970-01-01
fn parse_date(value: String) -> NaiveDate {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

// ==========================================
// ShiftTemplateRepository - 周循环模板仓储
// ==========================================

pub struct ShiftTemplateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftTemplateRepository {
    /// 创建新的模板仓储实例
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

    /// 查询门店全部周循环模板
    ///
    /// # 返回
    /// - Ok(Vec<ShiftTemplate>): 按 (weekday, start_time, area_id, role_id, template_id)
    ///   升序,保证需求线遍历顺序确定
    pub fn list_by_branch(&self, branch_id: &str) -> RepositoryResult<Vec<ShiftTemplate>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                template_id, branch_id, area_id, role_id, weekday,
                start_time, end_time, break_minutes, lunch_minutes,
                required_count, notes
            FROM shift_template
            WHERE branch_id = ?1
            ORDER BY weekday, start_time, area_id, role_id, template_id
            "#,
        )?;

        let templates = stmt
            .query_map(params![branch_id], |row| {
                Ok(ShiftTemplate {
                    template_id: row.get(0)?,
                    branch_id: row.get(1)?,
                    area_id: row.get(2)?,
                    role_id: row.get(3)?,
                    weekday: row.get::<_, i64>(4)? as u8,
                    start_time: parse_time(row.get::<_, String>(5)?),
                    end_time: parse_time(row.get::<_, String>(6)?),
                    break_minutes: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
                    lunch_minutes: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
                    required_count: row.get(9)?,
                    notes: row.get(10)?,
                })
            })?
            .collect::<SqliteResult<Vec<ShiftTemplate>>>()?;

        Ok(templates)
    }
}

// ==========================================
// SpecialDateRepository - 特殊日期仓储
// ==========================================

pub struct SpecialDateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SpecialDateRepository {
    /// 创建新的特殊日期仓储实例
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

    /// 查询门店在日期范围内的特殊日期
    pub fn list_by_branch_range(
        &self,
        branch_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<SpecialDate>> {
        let conn = self.get_conn()?;
        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT special_date_id, branch_id, date, name
            FROM special_date
            WHERE branch_id = ?1
              AND date BETWEEN ?2 AND ?3
            ORDER BY date, special_date_id
            "#,
        )?;

        let dates = stmt
            .query_map(params![branch_id, start_str, end_str], |row| {
                Ok(SpecialDate {
                    special_date_id: row.get(0)?,
                    branch_id: row.get(1)?,
                    date: parse_date(row.get::<_, String>(2)?),
                    name: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<SpecialDate>>>()?;

        Ok(dates)
    }

    /// 查询门店在日期范围内全部特殊日期模板（连带所属日期）
    ///
    /// # 返回
    /// - Ok(Vec<SpecialDateTemplate>): 按 (special_date_id, start_time, area_id,
    ///   role_id, id) 升序
    pub fn list_templates_by_branch_range(
        &self,
        branch_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<SpecialDateTemplate>> {
        let conn = self.get_conn()?;
        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT
                sdt.id, sdt.special_date_id, sdt.area_id, sdt.role_id,
                sdt.start_time, sdt.end_time, sdt.break_minutes, sdt.lunch_minutes,
                sdt.required_count, sdt.notes
            FROM special_date_template sdt
            JOIN special_date sd ON sd.special_date_id = sdt.special_date_id
            WHERE sd.branch_id = ?1
              AND sd.date BETWEEN ?2 AND ?3
            ORDER BY sdt.special_date_id, sdt.start_time, sdt.area_id, sdt.role_id, sdt.id
            "#,
        )?;

        let templates = stmt
            .query_map(params![branch_id, start_str, end_str], |row| {
                Ok(SpecialDateTemplate {
                    id: row.get(0)?,
                    special_date_id: row.get(1)?,
                    area_id: row.get(2)?,
                    role_id: row.get(3)?,
                    start_time: parse_time(row.get::<_, String>(4)?),
                    end_time: parse_time(row.get::<_, String>(5)?),
                    break_minutes: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
                    lunch_minutes: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
                    required_count: row.get(8)?,
                    notes: row.get(9)?,
                })
            })?
            .collect::<SqliteResult<Vec<SpecialDateTemplate>>>()?;

        Ok(templates)
    }
}
