// ==========================================
// 餐饮门店排班系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 此版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
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

/// 初始化数据库 schema（幂等）
///
/// 全部使用 CREATE TABLE IF NOT EXISTS，可安全地对已有库重复执行。
/// 不做版本迁移：schema_version 仅用于提示/告警。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employee (
            employee_id         TEXT PRIMARY KEY,
            branch_id           TEXT NOT NULL,
            name                TEXT NOT NULL,
            contract_type       TEXT NOT NULL,
            weekly_min_hours    REAL NOT NULL DEFAULT 0,
            weekly_max_hours    REAL NOT NULL DEFAULT 0,
            free_days_per_month INTEGER NOT NULL DEFAULT 0,
            active              INTEGER NOT NULL DEFAULT 1,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS work_area (
            area_id TEXT PRIMARY KEY,
            name    TEXT NOT NULL,
            color   TEXT
        );

        CREATE TABLE IF NOT EXISTS work_role (
            role_id TEXT PRIMARY KEY,
            area_id TEXT NOT NULL REFERENCES work_area(area_id),
            name    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS employee_role (
            employee_id   TEXT NOT NULL REFERENCES employee(employee_id),
            role_id       TEXT NOT NULL REFERENCES work_role(role_id),
            is_primary    INTEGER NOT NULL DEFAULT 0,
            priority_rank INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (employee_id, role_id)
        );

        CREATE TABLE IF NOT EXISTS availability_exception (
            employee_id TEXT NOT NULL REFERENCES employee(employee_id),
            date        TEXT NOT NULL,
            reason      TEXT,
            PRIMARY KEY (employee_id, date)
        );

        CREATE TABLE IF NOT EXISTS shift_template (
            template_id    TEXT PRIMARY KEY,
            branch_id      TEXT NOT NULL,
            area_id        TEXT NOT NULL REFERENCES work_area(area_id),
            role_id        TEXT NOT NULL REFERENCES work_role(role_id),
            weekday        INTEGER NOT NULL CHECK (weekday BETWEEN 1 AND 7),
            start_time     TEXT NOT NULL,
            end_time       TEXT NOT NULL,
            break_minutes  INTEGER,
            lunch_minutes  INTEGER,
            required_count INTEGER NOT NULL DEFAULT 1,
            notes          TEXT
        );

        CREATE TABLE IF NOT EXISTS special_date (
            special_date_id TEXT PRIMARY KEY,
            branch_id       TEXT NOT NULL,
            date            TEXT NOT NULL,
            name            TEXT
        );

        CREATE TABLE IF NOT EXISTS special_date_template (
            id              TEXT PRIMARY KEY,
            special_date_id TEXT NOT NULL REFERENCES special_date(special_date_id),
            area_id         TEXT NOT NULL REFERENCES work_area(area_id),
            role_id         TEXT NOT NULL REFERENCES work_role(role_id),
            start_time      TEXT NOT NULL,
            end_time        TEXT NOT NULL,
            break_minutes   INTEGER,
            lunch_minutes   INTEGER,
            required_count  INTEGER NOT NULL DEFAULT 1,
            notes           TEXT
        );

        CREATE TABLE IF NOT EXISTS shift_assignment (
            assignment_id  TEXT PRIMARY KEY,
            branch_id      TEXT NOT NULL,
            employee_id    TEXT NOT NULL REFERENCES employee(employee_id),
            date           TEXT NOT NULL,
            area_id        TEXT NOT NULL REFERENCES work_area(area_id),
            role_id        TEXT NOT NULL REFERENCES work_role(role_id),
            start_time     TEXT NOT NULL,
            end_time       TEXT NOT NULL,
            break_minutes  INTEGER,
            lunch_minutes  INTEGER,
            worked_hours   REAL NOT NULL DEFAULT 0,
            approval_state TEXT NOT NULL DEFAULT 'PENDING',
            notes          TEXT,
            deleted        INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_shift_assignment_branch_date
            ON shift_assignment(branch_id, date, deleted);

        CREATE TABLE IF NOT EXISTS schedule_config (
            branch_id      TEXT PRIMARY KEY,
            hours_per_day  REAL NOT NULL DEFAULT 8,
            calendar_color TEXT
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            CURRENT_SCHEMA_VERSION,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
