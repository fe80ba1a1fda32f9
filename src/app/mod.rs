// ==========================================
// 餐饮门店排班系统 - 应用层
// ==========================================
// 职责: 应用状态管理与启动装配
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
