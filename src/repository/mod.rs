// ==========================================
// 餐饮门店排班系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_repo;
pub mod catalog_repo;
pub mod config_repo;
pub mod employee_repo;
pub mod error;
pub mod template_repo;

// 重导出核心仓储
pub use assignment_repo::ShiftAssignmentRepository;
pub use catalog_repo::{WorkAreaRepository, WorkRoleRepository};
pub use config_repo::ScheduleConfigRepository;
pub use employee_repo::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use template_repo::{ShiftTemplateRepository, SpecialDateRepository};
