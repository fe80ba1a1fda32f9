// ==========================================
// 餐饮门店排班系统 - 岗位目录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 区域/岗位目录由外部 CRUD 协作方维护,此处只读
// ==========================================

use crate::domain::role::{WorkArea, WorkRole};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// WorkAreaRepository - 工作区域仓储
// ==========================================

pub struct WorkAreaRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkAreaRepository {
    /// 创建新的区域仓储实例
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

    /// 查询全部工作区域
    pub fn list_all(&self) -> RepositoryResult<Vec<WorkArea>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT area_id, name, color
            FROM work_area
            ORDER BY area_id
            "#,
        )?;

        let areas = stmt
            .query_map([], |row| {
                Ok(WorkArea {
                    area_id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<WorkArea>>>()?;

        Ok(areas)
    }
}

// ==========================================
// WorkRoleRepository - 工作岗位仓储
// ==========================================

pub struct WorkRoleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkRoleRepository {
    /// 创建新的岗位仓储实例
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

    /// 查询全部工作岗位
    pub fn list_all(&self) -> RepositoryResult<Vec<WorkRole>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT role_id, area_id, name
            FROM work_role
            ORDER BY role_id
            "#,
        )?;

        let roles = stmt
            .query_map([], |row| {
                Ok(WorkRole {
                    role_id: row.get(0)?,
                    area_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<WorkRole>>>()?;

        Ok(roles)
    }
}
