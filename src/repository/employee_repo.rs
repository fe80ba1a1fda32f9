// ==========================================
// 餐饮门店排班系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 员工/岗位关联/不可用日期均为只读协作数据
// ==========================================

use crate::domain::employee::{AvailabilityException, Employee, EmployeeRoleAssignment};
use crate::domain::types::ContractType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 解析 RFC3339 时间戳,解析失败回退当前时刻
fn parse_timestamp(value: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// 解析 "%Y-%m-%d" 日期,解析失败回退 1970-01-01
fn parse_date(value: String) -> NaiveDate {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================

/// 员工仓储
/// 职责: 读取 employee / employee_role / availability_exception 表
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    /// 创建新的员工仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_employee(row: &Row<'_>) -> SqliteResult<Employee> {
        Ok(Employee {
            employee_id: row.get(0)?,
            branch_id: row.get(1)?,
            name: row.get(2)?,
            contract_type: ContractType::from_str(&row.get::<_, String>(3)?),
            weekly_min_hours: row.get(4)?,
            weekly_max_hours: row.get(5)?,
            free_days_per_month: row.get(6)?,
            active: row.get::<_, i64>(7)? != 0,
            created_at: parse_timestamp(row.get::<_, String>(8)?),
            updated_at: parse_timestamp(row.get::<_, String>(9)?),
        })
    }

    /// 查询门店全部在职员工
    ///
    /// # 参数
    /// - branch_id: 门店ID
    ///
    /// # 返回
    /// - Ok(Vec<Employee>): 按 employee_id 升序（保证排班确定性）
    pub fn list_active_by_branch(&self, branch_id: &str) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                employee_id, branch_id, name, contract_type,
                weekly_min_hours, weekly_max_hours, free_days_per_month,
                active, created_at, updated_at
            FROM employee
            WHERE branch_id = ?1 AND active = 1
            ORDER BY employee_id
            "#,
        )?;

        let employees = stmt
            .query_map(params![branch_id], Self::map_employee)?
            .collect::<SqliteResult<Vec<Employee>>>()?;

        Ok(employees)
    }

    /// 查询门店全部员工岗位关联
    ///
    /// # 返回
    /// - Ok(Vec<EmployeeRoleAssignment>): 按 (employee_id, priority_rank) 升序
    pub fn list_role_assignments_by_branch(
        &self,
        branch_id: &str,
    ) -> RepositoryResult<Vec<EmployeeRoleAssignment>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT er.employee_id, er.role_id, er.is_primary, er.priority_rank
            FROM employee_role er
            JOIN employee e ON e.employee_id = er.employee_id
            WHERE e.branch_id = ?1 AND e.active = 1
            ORDER BY er.employee_id, er.priority_rank
            "#,
        )?;

        let assignments = stmt
            .query_map(params![branch_id], |row| {
                Ok(EmployeeRoleAssignment {
                    employee_id: row.get(0)?,
                    role_id: row.get(1)?,
                    is_primary: row.get::<_, i64>(2)? != 0,
                    priority_rank: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<EmployeeRoleAssignment>>>()?;

        Ok(assignments)
    }

    /// 查询门店员工在日期范围内的不可用日期
    ///
    /// # 参数
    /// - branch_id: 门店ID
    /// - start_date / end_date: 日期范围（闭区间）
    pub fn list_availability_exceptions(
        &self,
        branch_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<AvailabilityException>> {
        let conn = self.get_conn()?;
        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let mut stmt = conn.prepare(
            r#"
            SELECT ae.employee_id, ae.date, ae.reason
            FROM availability_exception ae
            JOIN employee e ON e.employee_id = ae.employee_id
            WHERE e.branch_id = ?1
              AND ae.date BETWEEN ?2 AND ?3
            ORDER BY ae.employee_id, ae.date
            "#,
        )?;

        let exceptions = stmt
            .query_map(params![branch_id, start_str, end_str], |row| {
                Ok(AvailabilityException {
                    employee_id: row.get(0)?,
                    date: parse_date(row.get::<_, String>(1)?),
                    reason: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<AvailabilityException>>>()?;

        Ok(exceptions)
    }
}
