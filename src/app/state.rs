// ==========================================
// 餐饮门店排班系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::ScheduleApi;
use crate::engine::{ScheduleOrchestrator, ScheduleRepositories};
use crate::repository::ScheduleConfigRepository;

/// 应用状态
///
/// 包含 API 实例与共享资源,作为宿主进程的全局状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 排班生成 API
    pub schedule_api: Arc<ScheduleApi<ScheduleConfigRepository>>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会:
    /// 1. 打开共享数据库连接并初始化 schema（幂等）
    /// 2. 初始化仓储层与引擎编排器
    /// 3. 创建 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::init_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;

        match crate::db::read_schema_version(&conn) {
            Ok(Some(v)) if v != crate::db::CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    found = v,
                    expected = crate::db::CURRENT_SCHEMA_VERSION,
                    "schema_version 与当前代码不一致"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));
        let repos = ScheduleRepositories::from_connection(conn.clone());
        let config = Arc::new(ScheduleConfigRepository::from_connection(conn));
        let orchestrator = ScheduleOrchestrator::new(repos, config);
        let schedule_api = Arc::new(ScheduleApi::new(orchestrator));

        Ok(Self {
            db_path,
            schedule_api,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("RESTAURANT_SHIFT_APS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./restaurant_shift_aps.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录,避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("restaurant-shift-aps-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("restaurant-shift-aps");
        }

        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("无法创建数据目录 {:?}: {}", path, e);
            path = PathBuf::from(".");
        }
        path = path.join("restaurant_shift_aps.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    // 注意: AppState::new() 的测试需要真实的数据库文件,在集成测试中进行
}
