// ==========================================
// 餐饮门店排班系统 - 班次分配数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 月度班次读取 / 生成窗口软删除 / 批量写入
// ==========================================

use crate::domain::assignment::ShiftAssignment;
use crate::domain::types::ApprovalState;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

use crate::repository::error::{RepositoryError, RepositoryResult};

fn parse_timestamp(value: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(value: String) -> NaiveDate {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

fn parse_time(value: String) -> NaiveTime {
    NaiveTime::parse_from_str(&value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M"))
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

// ==========================================
// ShiftAssignmentRepository - 班次分配仓储
// ==========================================

pub struct ShiftAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftAssignmentRepository {
    /// 创建新的班次分配仓储实例
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

    fn map_assignment(row: &Row<'_>) -> SqliteResult<ShiftAssignment> {
        Ok(ShiftAssignment {
            assignment_id: row.get(0)?,
            branch_id: row.get(1)?,
            employee_id: row.get(2)?,
            date: parse_date(row.get::<_, String>(3)?),
            area_id: row.get(4)?,
            role_id: row.get(5)?,
            start_time: parse_time(row.get::<_, String>(6)?),
            end_time: parse_time(row.get::<_, String>(7)?),
            break_minutes: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
            lunch_minutes: row.get::<_, Option<i64>>(9)?.unwrap_or(0),
            worked_hours: row.get(10)?,
            approval_state: ApprovalState::from_str(&row.get::<_, String>(11)?),
            notes: row.get(12)?,
            deleted: row.get::<_, i64>(13)? != 0,
            created_at: parse_timestamp(row.get::<_, String>(14)?),
            updated_at: parse_timestamp(row.get::<_, String>(15)?),
        })
    }

    /// 查询门店在日期范围内的全部未删除班次
    ///
    /// # 返回
    /// - Ok(Vec<ShiftAssignment>): 按 (date, employee_id) 升序
    pub fn list_active_by_branch_range(
        &self,
        branch_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<ShiftAssignment>> {
        let conn = self.get_conn()?;
        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT
                assignment_id, branch_id, employee_id, date, area_id, role_id,
                start_time, end_time, break_minutes, lunch_minutes, worked_hours,
                approval_state, notes, deleted, created_at, updated_at
            FROM shift_assignment
            WHERE branch_id = ?1
              AND date BETWEEN ?2 AND ?3
              AND deleted = 0
            ORDER BY date, employee_id
            "#,
        )?;

        let assignments = stmt
            .query_map(params![branch_id, start_str, end_str], Self::map_assignment)?
            .collect::<SqliteResult<Vec<ShiftAssignment>>>()?;

        Ok(assignments)
    }

    /// 以单事务替换生成窗口内的班次
    ///
    /// 步骤:
    /// 1) 软删除窗口内全部未删除班次（将被重新生成的 "future" 行）
    /// 2) 批量插入新生成的班次
    ///
    /// 整库单事务保证: 请求级全量提交或全量失败,不产生半成品窗口
    ///
    /// # 参数
    /// - branch_id: 门店ID
    /// - window_start / window_end: 生成窗口（闭区间）
    /// - assignments: 新生成的班次列表
    ///
    /// # 返回
    /// - Ok(usize): 插入的班次数
    pub fn replace_window(
        &self,
        branch_id: &str,
        window_start: NaiveDate,
        window_end: NaiveDate,
        assignments: &[ShiftAssignment],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let start_str = window_start.format("%Y-%m-%d").to_string();
        let end_str = window_end.format("%Y-%m-%d").to_string();
        let now_str = Utc::now().to_rfc3339();

        // 开启事务
        conn.execute("BEGIN TRANSACTION", [])?;

        let result = (|| -> RepositoryResult<usize> {
            // 1. 软删除窗口内旧班次
            conn.execute(
                r#"
                UPDATE shift_assignment
                SET deleted = 1, updated_at = ?1
                WHERE branch_id = ?2
                  AND date BETWEEN ?3 AND ?4
                  AND deleted = 0
                "#,
                params![now_str, branch_id, start_str, end_str],
            )?;

            // 2. 批量插入新班次
            let mut inserted = 0;
            for a in assignments {
                inserted += conn.execute(
                    r#"
                    INSERT INTO shift_assignment (
                        assignment_id, branch_id, employee_id, date, area_id, role_id,
                        start_time, end_time, break_minutes, lunch_minutes, worked_hours,
                        approval_state, notes, deleted, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                    "#,
                    params![
                        a.assignment_id,
                        a.branch_id,
                        a.employee_id,
                        a.date.format("%Y-%m-%d").to_string(),
                        a.area_id,
                        a.role_id,
                        a.start_time.format("%H:%M:%S").to_string(),
                        a.end_time.format("%H:%M:%S").to_string(),
                        a.break_minutes,
                        a.lunch_minutes,
                        a.worked_hours,
                        a.approval_state.to_db_str(),
                        a.notes,
                        a.deleted as i64,
                        a.created_at.to_rfc3339(),
                        a.updated_at.to_rfc3339(),
                    ],
                )?;
            }

            Ok(inserted)
        })();

        match result {
            Ok(count) => {
                // 提交事务
                conn.execute("COMMIT", [])?;
                Ok(count)
            }
            Err(e) => {
                // 回滚事务（回滚失败时保留原始错误）
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}
