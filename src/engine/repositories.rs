// ==========================================
// 餐饮门店排班系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合排班编排器所需的全部 Repository
// 目标: 减少编排器构造函数参数数量
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    EmployeeRepository, RepositoryResult, ScheduleConfigRepository, ShiftAssignmentRepository,
    ShiftTemplateRepository, SpecialDateRepository, WorkAreaRepository, WorkRoleRepository,
};

/// 排班引擎仓储集合
///
/// 聚合一次生成运行所需的全部 Repository,简化依赖注入
#[derive(Clone)]
pub struct ScheduleRepositories {
    /// 员工仓储（员工/岗位关联/不可用例外）
    pub employee_repo: Arc<EmployeeRepository>,
    /// 工作区域仓储
    pub area_repo: Arc<WorkAreaRepository>,
    /// 工作岗位仓储
    pub role_repo: Arc<WorkRoleRepository>,
    /// 周循环模板仓储
    pub template_repo: Arc<ShiftTemplateRepository>,
    /// 特殊日期仓储
    pub special_date_repo: Arc<SpecialDateRepository>,
    /// 班次分配仓储
    pub assignment_repo: Arc<ShiftAssignmentRepository>,
    /// 排班配置仓储
    pub config_repo: Arc<ScheduleConfigRepository>,
}

impl ScheduleRepositories {
    /// 创建新的仓储集合
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        area_repo: Arc<WorkAreaRepository>,
        role_repo: Arc<WorkRoleRepository>,
        template_repo: Arc<ShiftTemplateRepository>,
        special_date_repo: Arc<SpecialDateRepository>,
        assignment_repo: Arc<ShiftAssignmentRepository>,
        config_repo: Arc<ScheduleConfigRepository>,
    ) -> Self {
        Self {
            employee_repo,
            area_repo,
            role_repo,
            template_repo,
            special_date_repo,
            assignment_repo,
            config_repo,
        }
    }

    /// 在同一个 SQLite 连接上构建全部仓储
    ///
    /// 各仓储共享连接,保证窗口替换事务与读取看到同一数据库
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            employee_repo: Arc::new(EmployeeRepository::from_connection(conn.clone())),
            area_repo: Arc::new(WorkAreaRepository::from_connection(conn.clone())),
            role_repo: Arc::new(WorkRoleRepository::from_connection(conn.clone())),
            template_repo: Arc::new(ShiftTemplateRepository::from_connection(conn.clone())),
            special_date_repo: Arc::new(SpecialDateRepository::from_connection(conn.clone())),
            assignment_repo: Arc::new(ShiftAssignmentRepository::from_connection(conn.clone())),
            config_repo: Arc::new(ScheduleConfigRepository::from_connection(conn)),
        }
    }

    /// 打开数据库文件并构建全部仓储
    pub fn from_db_path(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }
}
