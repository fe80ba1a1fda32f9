// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

// 各集成测试通过 `mod test_helpers;` 引入,未用到的辅助函数属正常
#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use restaurant_shift_aps::db;
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(db::open_sqlite_connection(db_path)?)
}

/// 插入测试员工
#[allow(clippy::too_many_arguments)]
pub fn insert_employee(
    conn: &Connection,
    employee_id: &str,
    branch_id: &str,
    name: &str,
    contract_type: &str,
    weekly_max_hours: f64,
    free_days_per_month: i32,
    active: bool,
) -> Result<(), Box<dyn Error>> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
        INSERT INTO employee (
            employee_id, branch_id, name, contract_type,
            weekly_min_hours, weekly_max_hours, free_days_per_month,
            active, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, ?8, ?8)
        "#,
        params![
            employee_id,
            branch_id,
            name,
            contract_type,
            weekly_max_hours,
            free_days_per_month,
            active as i64,
            now
        ],
    )?;
    Ok(())
}

/// 插入工作区域与岗位
pub fn insert_area_and_role(
    conn: &Connection,
    area_id: &str,
    area_name: &str,
    role_id: &str,
    role_name: &str,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR IGNORE INTO work_area (area_id, name, color) VALUES (?1, ?2, '#4CAF50')",
        params![area_id, area_name],
    )?;
    conn.execute(
        "INSERT INTO work_role (role_id, area_id, name) VALUES (?1, ?2, ?3)",
        params![role_id, area_id, role_name],
    )?;
    Ok(())
}

/// 插入员工岗位关联
pub fn insert_employee_role(
    conn: &Connection,
    employee_id: &str,
    role_id: &str,
    is_primary: bool,
    priority_rank: i32,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT INTO employee_role (employee_id, role_id, is_primary, priority_rank)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![employee_id, role_id, is_primary as i64, priority_rank],
    )?;
    Ok(())
}

/// 插入周循环模板
#[allow(clippy::too_many_arguments)]
pub fn insert_template(
    conn: &Connection,
    template_id: &str,
    branch_id: &str,
    area_id: &str,
    role_id: &str,
    weekday: u8,
    start_time: &str,
    end_time: &str,
    required_count: i32,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT INTO shift_template (
            template_id, branch_id, area_id, role_id, weekday,
            start_time, end_time, break_minutes, lunch_minutes, required_count, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0, ?8, NULL)
        "#,
        params![
            template_id,
            branch_id,
            area_id,
            role_id,
            weekday as i64,
            start_time,
            end_time,
            required_count
        ],
    )?;
    Ok(())
}

/// 插入特殊日期及其模板
#[allow(clippy::too_many_arguments)]
pub fn insert_special_date_with_template(
    conn: &Connection,
    special_date_id: &str,
    branch_id: &str,
    date: NaiveDate,
    name: &str,
    area_id: &str,
    role_id: &str,
    start_time: &str,
    end_time: &str,
    required_count: i32,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO special_date (special_date_id, branch_id, date, name) VALUES (?1, ?2, ?3, ?4)",
        params![
            special_date_id,
            branch_id,
            date.format("%Y-%m-%d").to_string(),
            name
        ],
    )?;
    conn.execute(
        r#"
        INSERT INTO special_date_template (
            id, special_date_id, area_id, role_id,
            start_time, end_time, break_minutes, lunch_minutes, required_count, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, ?7, NULL)
        "#,
        params![
            format!("{special_date_id}-T1"),
            special_date_id,
            area_id,
            role_id,
            start_time,
            end_time,
            required_count
        ],
    )?;
    Ok(())
}

/// 插入不可用日期
pub fn insert_exception(
    conn: &Connection,
    employee_id: &str,
    date: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT INTO availability_exception (employee_id, date, reason) VALUES (?1, ?2, '请假')",
        params![employee_id, date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(())
}

/// 插入已有班次（模拟历史数据）
#[allow(clippy::too_many_arguments)]
pub fn insert_assignment(
    conn: &Connection,
    assignment_id: &str,
    branch_id: &str,
    employee_id: &str,
    date: NaiveDate,
    area_id: &str,
    role_id: &str,
    start_time: &str,
    end_time: &str,
    worked_hours: f64,
) -> Result<(), Box<dyn Error>> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"
        INSERT INTO shift_assignment (
            assignment_id, branch_id, employee_id, date, area_id, role_id,
            start_time, end_time, break_minutes, lunch_minutes, worked_hours,
            approval_state, notes, deleted, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0, ?9, 'PENDING', NULL, 0, ?10, ?10)
        "#,
        params![
            assignment_id,
            branch_id,
            employee_id,
            date.format("%Y-%m-%d").to_string(),
            area_id,
            role_id,
            start_time,
            end_time,
            worked_hours,
            now
        ],
    )?;
    Ok(())
}
