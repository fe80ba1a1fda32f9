// ==========================================
// 餐饮门店排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod employee;
pub mod role;
pub mod schedule;
pub mod template;
pub mod types;

// 重导出核心类型
pub use assignment::{calculate_worked_hours, round_hours, ShiftAssignment};
pub use employee::{AvailabilityException, Employee, EmployeeRoleAssignment};
pub use role::{WorkArea, WorkRole};
pub use schedule::{DemandLine, ScheduleConfiguration, ScheduleWarning};
pub use template::{ShiftTemplate, SpecialDate, SpecialDateTemplate};
pub use types::{ApprovalState, ContractType, CoverageReason, DemandSource};
