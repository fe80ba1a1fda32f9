// ==========================================
// 餐饮门店排班系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 月度排班生成引擎 (人工最终控制权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排班规则
pub mod engine;

// 配置层 - 门店配置读取接口
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 进程装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ApprovalState, ContractType, CoverageReason, DemandSource};

// 领域实体
pub use domain::{
    AvailabilityException, DemandLine, Employee, EmployeeRoleAssignment, ScheduleConfiguration,
    ScheduleWarning, ShiftAssignment, ShiftTemplate, SpecialDate, SpecialDateTemplate, WorkArea,
    WorkRole,
};

// 引擎
pub use engine::{
    AssignmentEngine, AssignmentTracker, CapacityAuditor, DemandResolver, EligibilityFilter,
    GenerationWindow, OffDayPlanner, PostAuditor, ScheduleError, ScheduleOrchestrator,
    ScheduleRepositories, ScheduleResult,
};

// 配置
pub use config::ScheduleConfigReader;

// API
pub use api::{ApiError, ApiResult, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "餐饮门店排班系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
